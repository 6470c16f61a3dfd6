//! Enrollment status relay.
//!
//! Bridges the management SDK's externally-owned enrollment state into UI
//! transitions. Two signal paths feed it: a fixed-interval poll of
//! `is_management_enabled`, and pushed events from the bus; whichever
//! arrives first wins, and the loser is a no-op.
//!
//! The relay never reads the clock itself; callers pass `Instant`s in, so
//! tests drive it with synthetic time and never sleep.

use std::time::{Duration, Instant};

use crate::bus::EnrollmentEvent;

/// Interval between management-status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How long the success state stays visible before the screen closes itself.
pub const DISMISS_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Checking,
    Enrolled,
    Failed { reason: String },
}

/// A state change the owning screen must reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Enrolled,
    Failed { reason: String },
    InProgress,
}

pub struct StatusRelay {
    state: RelayState,
    poll_interval: Duration,
    dismiss_delay: Duration,
    active: bool,
    next_poll_at: Option<Instant>,
    dismiss_at: Option<Instant>,
}

impl StatusRelay {
    pub fn new() -> Self {
        Self::with_timing(POLL_INTERVAL, DISMISS_DELAY)
    }

    pub fn with_timing(poll_interval: Duration, dismiss_delay: Duration) -> Self {
        Self {
            state: RelayState::Idle,
            poll_interval,
            dismiss_delay,
            active: false,
            next_poll_at: None,
            dismiss_at: None,
        }
    }

    pub fn state(&self) -> &RelayState {
        &self.state
    }

    /// The owning screen became active. If management is already enabled the
    /// relay goes straight to `Enrolled`; otherwise it starts checking and
    /// arms the poll schedule. Re-activating while already checking only
    /// re-arms the schedule; there is never more than one pending poll.
    pub fn activate(&mut self, now: Instant, already_enabled: bool) -> Option<Transition> {
        self.active = true;
        if already_enabled {
            return self.enrolled(now);
        }
        match self.state {
            RelayState::Idle | RelayState::Failed { .. } | RelayState::Checking => {
                self.state = RelayState::Checking;
                self.next_poll_at = Some(now + self.poll_interval);
                None
            }
            RelayState::Enrolled => None,
        }
    }

    /// The owning screen left the active state: cancel every pending
    /// schedule. Redundant calls are no-ops.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.next_poll_at = None;
        self.dismiss_at = None;
    }

    /// Explicit retry after a failure. Re-arms polling.
    pub fn retry(&mut self, now: Instant) {
        if matches!(self.state, RelayState::Failed { .. }) {
            self.state = RelayState::Checking;
            self.active = true;
            self.next_poll_at = Some(now + self.poll_interval);
        }
    }

    /// Whether the poll interval has elapsed and a status check is owed.
    pub fn poll_due(&self, now: Instant) -> bool {
        self.active
            && self.state == RelayState::Checking
            && self.next_poll_at.map(|at| now >= at).unwrap_or(false)
    }

    /// Feed in the result of a status check.
    pub fn record_poll(&mut self, now: Instant, enabled: bool) -> Option<Transition> {
        if self.state != RelayState::Checking {
            return None;
        }
        self.next_poll_at = Some(now + self.poll_interval);
        if enabled {
            self.enrolled(now)
        } else {
            None
        }
    }

    /// Feed in a pushed event from the bus.
    pub fn handle_event(&mut self, now: Instant, event: &EnrollmentEvent) -> Option<Transition> {
        match event {
            EnrollmentEvent::Succeeded => {
                if self.state == RelayState::Enrolled {
                    None
                } else {
                    self.enrolled(now)
                }
            }
            EnrollmentEvent::Failed { reason } => {
                if self.state == RelayState::Checking {
                    self.state = RelayState::Failed {
                        reason: reason.clone(),
                    };
                    self.next_poll_at = None;
                    Some(Transition::Failed {
                        reason: reason.clone(),
                    })
                } else {
                    None
                }
            }
            EnrollmentEvent::StatusChanged => {
                if self.state == RelayState::Checking {
                    Some(Transition::InProgress)
                } else {
                    None
                }
            }
        }
    }

    /// True once the post-success delay has elapsed and the owning screen
    /// should close itself.
    pub fn dismiss_due(&self, now: Instant) -> bool {
        self.state == RelayState::Enrolled
            && self.dismiss_at.map(|at| now >= at).unwrap_or(false)
    }

    fn enrolled(&mut self, now: Instant) -> Option<Transition> {
        self.state = RelayState::Enrolled;
        self.next_poll_at = None;
        self.dismiss_at = Some(now + self.dismiss_delay);
        Some(Transition::Enrolled)
    }
}

impl Default for StatusRelay {
    fn default() -> Self {
        Self::new()
    }
}

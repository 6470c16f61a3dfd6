//! Device-management client boundary.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use onboard_core::bus::{EnrollmentEvent, EventBus};

/// Device-management client capability.
pub trait ManagementClient: Send + Sync {
    /// Cheap in-process check of whether management is active for the device.
    fn is_management_enabled(&self) -> bool;

    /// Kick off registration + enrollment for `account_id`.
    ///
    /// Fire-and-forget: completion is observed as `EnrollmentEvent`s on the
    /// bus, never as a return value.
    fn register_and_enroll(&self, account_id: &str, bus: &EventBus<EnrollmentEvent>);
}

/// Scripted behavior for the simulated management SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentScenario {
    /// Management reports enabled from the Nth status check onward. `1`
    /// means the device looks already-enrolled on the first check.
    EnableAfterChecks(u32),
    /// Enrollment pushes a failure event shortly after starting.
    Fail,
}

/// Simulated management SDK.
///
/// Status checks count against the scenario threshold; the enroll call spawns
/// a worker that pushes `StatusChanged` and then, depending on the scenario,
/// `Succeeded` or `Failed`, exercising the push path alongside the poll
/// path.
pub struct SimulatedManagement {
    scenario: EnrollmentScenario,
    checks: AtomicU32,
    enroll_started: AtomicBool,
    push_delay: Duration,
}

impl SimulatedManagement {
    pub fn new(scenario: EnrollmentScenario) -> Self {
        Self {
            scenario,
            checks: AtomicU32::new(0),
            enroll_started: AtomicBool::new(false),
            push_delay: Duration::from_secs(6),
        }
    }

    /// Delay before the worker pushes its terminal event.
    pub fn with_push_delay(mut self, push_delay: Duration) -> Self {
        self.push_delay = push_delay;
        self
    }

    pub fn checks_seen(&self) -> u32 {
        self.checks.load(Ordering::Relaxed)
    }
}

impl ManagementClient for SimulatedManagement {
    fn is_management_enabled(&self) -> bool {
        let seen = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        match self.scenario {
            EnrollmentScenario::EnableAfterChecks(threshold) => seen >= threshold,
            EnrollmentScenario::Fail => false,
        }
    }

    fn register_and_enroll(&self, account_id: &str, bus: &EventBus<EnrollmentEvent>) {
        if self.enroll_started.swap(true, Ordering::Relaxed) {
            log::debug!("simulated management: enrollment already in flight");
            return;
        }
        log::debug!("simulated management: enrolling account {}", account_id);
        let scenario = self.scenario;
        let push_delay = self.push_delay;
        let bus = bus.clone();
        thread::spawn(move || {
            bus.publish(EnrollmentEvent::StatusChanged);
            thread::sleep(push_delay);
            match scenario {
                EnrollmentScenario::EnableAfterChecks(_) => {
                    bus.publish(EnrollmentEvent::Succeeded);
                }
                EnrollmentScenario::Fail => {
                    bus.publish(EnrollmentEvent::Failed {
                        reason: "The management service rejected the device registration."
                            .to_string(),
                    });
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn status_checks_flip_at_the_scenario_threshold() {
        let client = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(3));
        assert!(!client.is_management_enabled());
        assert!(!client.is_management_enabled());
        assert!(client.is_management_enabled());
        assert!(client.is_management_enabled());
        assert_eq!(client.checks_seen(), 4);
    }

    #[test]
    fn failing_scenario_never_reports_enabled() {
        let client = SimulatedManagement::new(EnrollmentScenario::Fail);
        for _ in 0..10 {
            assert!(!client.is_management_enabled());
        }
    }

    #[test]
    fn enroll_pushes_progress_then_success_on_the_bus() {
        let client = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1))
            .with_push_delay(Duration::from_millis(10));
        let bus: EventBus<EnrollmentEvent> = EventBus::new();
        let rx = bus.subscribe("test");

        client.register_and_enroll("alice@example.com", &bus);

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(EnrollmentEvent::StatusChanged)
        );
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(EnrollmentEvent::Succeeded)
        );
    }

    #[test]
    fn enroll_pushes_failure_with_a_reason() {
        let client = SimulatedManagement::new(EnrollmentScenario::Fail)
            .with_push_delay(Duration::from_millis(10));
        let bus: EventBus<EnrollmentEvent> = EventBus::new();
        let rx = bus.subscribe("test");

        client.register_and_enroll("alice@example.com", &bus);

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(EnrollmentEvent::StatusChanged)
        );
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(EnrollmentEvent::Failed { reason }) => {
                assert!(reason.contains("rejected"));
            }
            other => panic!("expected failure event, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_enroll_calls_spawn_a_single_worker() {
        let client = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1))
            .with_push_delay(Duration::from_millis(10));
        let bus: EventBus<EnrollmentEvent> = EventBus::new();
        let rx = bus.subscribe("test");

        client.register_and_enroll("alice@example.com", &bus);
        client.register_and_enroll("alice@example.com", &bus);

        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_millis(500)) {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![EnrollmentEvent::StatusChanged, EnrollmentEvent::Succeeded]
        );
    }
}

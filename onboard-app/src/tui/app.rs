//! Application state machine for the onboard TUI.
//!
//! Two screens (sign-in, enrollment) plus the floating diagnostic overlay
//! and the modal log viewer. Vendor SDK calls run on worker threads; their
//! results come back over channels and the event bus, and are folded into
//! state on every tick of the UI loop.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use onboard_core::bus::{EnrollmentEvent, EventBus};
use onboard_core::config;
use onboard_core::diag::{DiagSink, Severity};
use onboard_core::errors::{classify_auth_failure, AuthError, EnrollmentError};
use onboard_core::relay::{StatusRelay, Transition};
use onboard_mdm::{
    AuthOutcome, AuthRequest, AuthScenario, EnrollmentScenario, IdentityClient, ManagementClient,
    SdkError, SimulatedIdentity, SimulatedManagement,
};

use super::overlay::OverlayPanel;
use super::style::{self, emoji};
use super::viewer::{LogViewer, ViewerAction};
use crate::cli::{AuthOutcomeArg, Cli, EnrollOutcomeArg};
use crate::report;

/// Bus identity of the enrollment screen's subscription.
const ENROLLMENT_SUBSCRIBER: &str = "enrollment-screen";

/// Available screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    Enrollment,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::SignIn => "Sign In",
            Screen::Enrollment => "Device Enrollment",
        }
    }
}

/// Result of handling input.
pub enum InputResult {
    Continue,
    Quit,
}

/// Application state.
pub struct App {
    pub screen: Screen,
    pub sink: DiagSink,
    pub relay: StatusRelay,
    pub overlay: OverlayPanel,
    pub viewer: Option<LogViewer>,

    // Sign-in screen
    pub signing_in: bool,
    pub signed_in_account: Option<String>,
    pub status_message: String,
    pub status_severity: Severity,

    // Enrollment screen
    pub enroll_headline: String,
    pub enroll_detail: String,
    pub enroll_failed: bool,

    pub spinner_frame: usize,

    bus: EventBus<EnrollmentEvent>,
    identity: Arc<dyn IdentityClient>,
    management: Arc<dyn ManagementClient>,
    auth_request: AuthRequest,
    report_dir: PathBuf,
    auth_rx: Option<Receiver<Result<AuthOutcome, SdkError>>>,
    bus_rx: Option<Receiver<EnrollmentEvent>>,
}

impl App {
    pub fn new(
        sink: DiagSink,
        bus: EventBus<EnrollmentEvent>,
        identity: Arc<dyn IdentityClient>,
        management: Arc<dyn ManagementClient>,
        auth_request: AuthRequest,
        report_dir: PathBuf,
    ) -> Self {
        sink.success("✅ Diagnostics console ready");
        sink.info(format!("🔧 Authority: {}", auth_request.authority));
        sink.info(format!("🔧 Client ID: {}", auth_request.client_id));
        sink.info(format!("🔧 Redirect URI: {}", config::REDIRECT_URI));
        sink.success("✅ Identity client initialized");

        Self {
            screen: Screen::SignIn,
            sink,
            relay: StatusRelay::new(),
            overlay: OverlayPanel::new(true),
            viewer: None,

            signing_in: false,
            signed_in_account: None,
            status_message: String::new(),
            status_severity: Severity::Info,

            enroll_headline: "Sign-in Successful".to_string(),
            enroll_detail: "Enrolling device...".to_string(),
            enroll_failed: false,

            spinner_frame: 0,

            bus,
            identity,
            management,
            auth_request,
            report_dir,
            auth_rx: None,
            bus_rx: None,
        }
    }

    /// Build the app from CLI flags, wiring up the simulated SDK clients.
    pub fn from_cli(cli: &Cli) -> Self {
        let scenario = match cli.auth {
            AuthOutcomeArg::Succeed => AuthScenario::Succeed,
            AuthOutcomeArg::Cancel => AuthScenario::UserCancel,
            AuthOutcomeArg::NoBroker => AuthScenario::NoBroker,
            AuthOutcomeArg::Timeout => AuthScenario::BrokerTimeout,
            AuthOutcomeArg::Fail => AuthScenario::Fail,
        };
        let identity: Arc<dyn IdentityClient> =
            Arc::new(SimulatedIdentity::new(scenario, cli.account.clone()));
        let management: Arc<dyn ManagementClient> = Arc::new(match cli.enroll {
            EnrollOutcomeArg::Succeed => SimulatedManagement::new(
                EnrollmentScenario::EnableAfterChecks(cli.enabled_after_checks),
            ),
            EnrollOutcomeArg::Fail => SimulatedManagement::new(EnrollmentScenario::Fail),
        });
        let auth_request = AuthRequest {
            client_id: config::CLIENT_ID.to_string(),
            authority: config::AUTHORITY.to_string(),
            scopes: config::SCOPES.iter().map(|s| s.to_string()).collect(),
            login_hint: Some(cli.account.clone()),
        };

        let mut app = Self::new(
            DiagSink::new(),
            EventBus::new(),
            identity,
            management,
            auth_request,
            cli.report_dir.clone(),
        );
        if cli.no_overlay {
            app.overlay.visible = false;
        }
        app
    }

    /// Handle keyboard input, returns the action to take.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        // The modal viewer swallows everything while open.
        if let Some(viewer) = self.viewer.as_mut() {
            match viewer.handle_key(key, self.sink.len()) {
                ViewerAction::Close => {
                    self.viewer = None;
                    self.sink.info("📱 Log viewer dismissed");
                }
                ViewerAction::Export => self.export_logs(),
                ViewerAction::None => {}
            }
            return InputResult::Continue;
        }

        match key.code {
            KeyCode::F(2) => {
                self.overlay.toggle();
                return InputResult::Continue;
            }
            KeyCode::Char('l') => {
                self.sink.info("📱 Opening log viewer");
                self.viewer = Some(LogViewer::new());
                return InputResult::Continue;
            }
            _ => {}
        }

        // Overlay keys only bind while the panel is on screen.
        if self.overlay.visible {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Left => {
                        self.overlay.nudge(-2, 0);
                        return InputResult::Continue;
                    }
                    KeyCode::Right => {
                        self.overlay.nudge(2, 0);
                        return InputResult::Continue;
                    }
                    KeyCode::Up => {
                        self.overlay.nudge(0, -1);
                        return InputResult::Continue;
                    }
                    KeyCode::Down => {
                        self.overlay.nudge(0, 1);
                        return InputResult::Continue;
                    }
                    _ => {}
                }
            }
            match key.code {
                KeyCode::Char('m') => {
                    self.overlay.toggle_minimized(&self.sink);
                    return InputResult::Continue;
                }
                KeyCode::Char('x') => {
                    self.sink.clear();
                    // Facade only: appending to the sink right after a clear
                    // would defeat the clear.
                    log::info!("{}", style::with(emoji::CLEANUP, "Diagnostics cleared"));
                    return InputResult::Continue;
                }
                KeyCode::Char('s') => {
                    self.export_logs();
                    return InputResult::Continue;
                }
                _ => {}
            }
        }

        match self.screen {
            Screen::SignIn => self.handle_sign_in_key(key),
            Screen::Enrollment => self.handle_enrollment_key(key),
        }
    }

    fn handle_sign_in_key(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => {
                if !self.signing_in {
                    self.start_sign_in();
                }
                InputResult::Continue
            }
            KeyCode::Char('q') | KeyCode::Esc => InputResult::Quit,
            _ => InputResult::Continue,
        }
    }

    fn handle_enrollment_key(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Char('r') => {
                if self.enroll_failed {
                    self.retry_enrollment();
                }
                InputResult::Continue
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                self.sink.info("📱 Back to sign-in");
                self.leave_enrollment();
                InputResult::Continue
            }
            KeyCode::Char('q') => InputResult::Quit,
            _ => InputResult::Continue,
        }
    }

    /// Drive time-based work: worker results, bus events, the status poll
    /// and the post-success dismissal. Called once per loop iteration.
    pub fn tick(&mut self, now: Instant) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);

        if let Some(rx) = self.auth_rx.take() {
            match rx.try_recv() {
                Ok(result) => {
                    self.signing_in = false;
                    self.finish_sign_in(result, now);
                }
                Err(TryRecvError::Empty) => self.auth_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {
                    self.signing_in = false;
                    self.sink.error("❌ Sign-in worker exited without a result");
                    self.set_status("Authentication failed: no result received", Severity::Error);
                }
            }
        }

        let mut events = Vec::new();
        if let Some(rx) = &self.bus_rx {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            match &event {
                EnrollmentEvent::Succeeded => {
                    self.sink.success("✅ Enrollment succeeded notification received");
                }
                EnrollmentEvent::Failed { .. } => {
                    self.sink.error("❌ Enrollment failed notification received");
                }
                EnrollmentEvent::StatusChanged => {
                    self.sink.info("📱 Enrollment status change notification received");
                }
            }
            if let Some(transition) = self.relay.handle_event(now, &event) {
                self.apply_transition(transition);
            }
        }

        if self.relay.poll_due(now) {
            let enabled = self.management.is_management_enabled();
            if let Some(transition) = self.relay.record_poll(now, enabled) {
                self.apply_transition(transition);
            }
        }

        if self.relay.dismiss_due(now) {
            self.sink.info("📱 Enrollment complete, returning to sign-in");
            let account = self.signed_in_account.clone().unwrap_or_default();
            self.leave_enrollment();
            self.set_status(
                style::with(emoji::SUCCESS, &format!("Successfully enrolled {}", account)),
                Severity::Success,
            );
        }
    }

    fn start_sign_in(&mut self) {
        self.signing_in = true;
        self.set_status("Signing in...", Severity::Info);
        self.sink.info("🔑 Sign-in requested");
        self.sink
            .info(format!("🔑 Requesting scopes: {:?}", self.auth_request.scopes));

        let identity = Arc::clone(&self.identity);
        let request = self.auth_request.clone();
        let (tx, rx) = mpsc::channel();
        self.auth_rx = Some(rx);
        thread::spawn(move || {
            let result = identity.acquire_token(&request);
            let _ = tx.send(result);
        });
    }

    fn finish_sign_in(&mut self, result: Result<AuthOutcome, SdkError>, now: Instant) {
        match result {
            Ok(outcome) => {
                self.sink.success("✅ Authentication successful");
                self.sink.info(format!("👤 Account: {}", outcome.account));
                let prefix: String = outcome.access_token.chars().take(10).collect();
                self.sink.info(format!("🔑 Access token: {}...", prefix));
                self.set_status(
                    format!("Signed in as {}", outcome.account),
                    Severity::Success,
                );
                self.enter_enrollment(now, outcome.account);
            }
            Err(err) => {
                self.sink
                    .error(format!("❌ Authentication failed: {}", err.description));
                match classify_auth_failure(&err.description) {
                    AuthError::UserCancelled => {
                        self.sink.warning("User cancelled authentication");
                        self.set_status("Sign-in was cancelled by the user", Severity::Warning);
                    }
                    AuthError::BrokerUnavailable => {
                        self.set_status(
                            "Authentication failed: the broker app is required. Install it and retry.",
                            Severity::Error,
                        );
                    }
                    AuthError::BrokerTimeout => {
                        self.set_status(
                            "Authentication failed: the broker app did not respond. Make sure you are signed in there.",
                            Severity::Error,
                        );
                    }
                    AuthError::AuthenticationFailed(desc) => {
                        self.set_status(format!("Authentication failed: {}", desc), Severity::Error);
                    }
                }
            }
        }
    }

    fn enter_enrollment(&mut self, now: Instant, account: String) {
        self.screen = Screen::Enrollment;
        self.enroll_failed = false;
        self.enroll_headline = "Sign-in Successful".to_string();
        self.enroll_detail = "Enrolling device...".to_string();
        self.sink.info("📱 Enrollment screen active");

        // Subscribing replaces any previous subscription for this screen,
        // so events are never delivered twice to the same handler.
        self.bus_rx = Some(self.bus.subscribe(ENROLLMENT_SUBSCRIBER));

        let enabled = self.management.is_management_enabled();
        if let Some(transition) = self.relay.activate(now, enabled) {
            self.apply_transition(transition);
        }
        if enabled {
            self.sink.success("✅ Device is already enrolled");
        } else {
            self.sink.info("📱 Device not enrolled, starting enrollment...");
            self.management.register_and_enroll(&account, &self.bus);
        }
        self.signed_in_account = Some(account);
    }

    fn leave_enrollment(&mut self) {
        self.relay.deactivate();
        self.bus.unsubscribe(ENROLLMENT_SUBSCRIBER);
        self.bus_rx = None;
        self.screen = Screen::SignIn;
    }

    fn retry_enrollment(&mut self) {
        self.sink.info("📱 Retrying enrollment status check");
        self.enroll_failed = false;
        self.enroll_headline = "Sign-in Successful".to_string();
        self.enroll_detail = "Enrolling device...".to_string();
        self.relay.retry(Instant::now());
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Enrolled => {
                self.enroll_failed = false;
                self.enroll_headline = "Device Enrolled".to_string();
                self.enroll_detail =
                    "Your device has been successfully enrolled into management.".to_string();
                self.sink.success("✅ Device is now managed");
            }
            Transition::Failed { reason } => {
                self.enroll_failed = true;
                self.enroll_headline = "Enrollment Failed".to_string();
                self.enroll_detail = format!("{} Press r to retry.", reason);
                self.sink
                    .error(format!("❌ {}", EnrollmentError::Failed(reason)));
            }
            Transition::InProgress => {
                self.enroll_detail = "Enrollment in progress...".to_string();
            }
        }
    }

    fn export_logs(&mut self) {
        match report::export(&self.report_dir, &self.sink.snapshot()) {
            Ok(path) => {
                self.sink
                    .success(format!("✅ Diagnostics exported to {}", path.display()));
                self.set_status(
                    style::with(emoji::SUCCESS, &format!("Exported {}", path.display())),
                    Severity::Success,
                );
            }
            Err(err) => {
                self.sink.error(format!("❌ Export failed: {}", err));
                self.set_status(style::with(emoji::ERROR, "Export failed"), Severity::Error);
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>, severity: Severity) {
        self.status_message = message.into();
        self.status_severity = severity;
    }
}

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use onboard_app::tui::app::{App, InputResult, Screen};
use onboard_core::bus::EventBus;
use onboard_core::diag::{DiagSink, Severity};
use onboard_core::relay::RelayState;
use onboard_mdm::{
    AuthRequest, AuthScenario, EnrollmentScenario, SimulatedIdentity, SimulatedManagement,
};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn make_app(auth: AuthScenario, management: SimulatedManagement, report_dir: PathBuf) -> App {
    let request = AuthRequest {
        client_id: "demo-client".to_string(),
        authority: "https://login.example.com/common".to_string(),
        scopes: vec!["User.Read".to_string()],
        login_hint: None,
    };
    App::new(
        DiagSink::new(),
        EventBus::new(),
        Arc::new(SimulatedIdentity::new(auth, "alice@example.com").with_latency(Duration::ZERO)),
        Arc::new(management),
        request,
        report_dir,
    )
}

/// Tick at a fixed instant until the worker-side condition holds.
fn wait_until(app: &mut App, now: Instant, pred: impl Fn(&App) -> bool) {
    for _ in 0..400 {
        app.tick(now);
        if pred(app) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not reached");
}

#[test]
fn sign_in_reaches_enrollment_and_auto_dismisses() {
    // Push delay far in the future: the poll path must win on its own.
    let management = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(3))
        .with_push_delay(Duration::from_secs(60));
    let mut app = make_app(AuthScenario::Succeed, management, std::env::temp_dir());
    let t0 = Instant::now();

    assert!(matches!(
        app.handle_key(key(KeyCode::Enter)),
        InputResult::Continue
    ));
    assert!(app.signing_in);

    wait_until(&mut app, t0, |app| app.screen == Screen::Enrollment);
    assert_eq!(app.signed_in_account.as_deref(), Some("alice@example.com"));
    assert_eq!(app.relay.state(), &RelayState::Checking);

    // First poll: management still reports disabled.
    app.tick(t0 + Duration::from_millis(2100));
    assert_eq!(app.relay.state(), &RelayState::Checking);

    // Second poll observes enabled.
    app.tick(t0 + Duration::from_millis(4200));
    assert_eq!(app.relay.state(), &RelayState::Enrolled);
    assert_eq!(app.enroll_headline, "Device Enrolled");

    // The success state stays visible for the fixed delay, then the screen
    // closes itself.
    app.tick(t0 + Duration::from_millis(4800));
    assert_eq!(app.screen, Screen::Enrollment);
    app.tick(t0 + Duration::from_millis(5400));
    assert_eq!(app.screen, Screen::SignIn);
    assert!(app
        .status_message
        .contains("Successfully enrolled alice@example.com"));
}

#[test]
fn cancelled_sign_in_stays_on_the_sign_in_screen() {
    let management = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1));
    let mut app = make_app(AuthScenario::UserCancel, management, std::env::temp_dir());
    let t0 = Instant::now();

    app.handle_key(key(KeyCode::Enter));
    wait_until(&mut app, t0, |app| !app.signing_in);

    assert_eq!(app.screen, Screen::SignIn);
    assert_eq!(app.status_severity, Severity::Warning);
    assert!(app.status_message.contains("cancelled"));
}

#[test]
fn already_enrolled_device_short_circuits_to_success() {
    let management = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1));
    let mut app = make_app(AuthScenario::Succeed, management, std::env::temp_dir());
    let t0 = Instant::now();

    app.handle_key(key(KeyCode::Enter));
    wait_until(&mut app, t0, |app| app.screen == Screen::Enrollment);

    // The initial check already reported enabled; no polling needed.
    assert_eq!(app.relay.state(), &RelayState::Enrolled);
    assert_eq!(app.enroll_headline, "Device Enrolled");
}

#[test]
fn pushed_failure_is_surfaced_and_retry_rearms() {
    let management = SimulatedManagement::new(EnrollmentScenario::Fail)
        .with_push_delay(Duration::from_millis(10));
    let mut app = make_app(AuthScenario::Succeed, management, std::env::temp_dir());
    let t0 = Instant::now();

    app.handle_key(key(KeyCode::Enter));
    wait_until(&mut app, t0, |app| app.screen == Screen::Enrollment);
    wait_until(&mut app, t0, |app| app.enroll_failed);

    assert_eq!(app.enroll_headline, "Enrollment Failed");
    assert!(matches!(app.relay.state(), RelayState::Failed { .. }));

    app.handle_key(key(KeyCode::Char('r')));
    assert_eq!(app.relay.state(), &RelayState::Checking);
    assert!(!app.enroll_failed);

    // Leaving the screen stops the relay and returns to sign-in.
    app.handle_key(key(KeyCode::Char('b')));
    assert_eq!(app.screen, Screen::SignIn);
}

#[test]
fn overlay_keys_toggle_clear_and_unbind_when_hidden() {
    let management = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1));
    let mut app = make_app(AuthScenario::Succeed, management, std::env::temp_dir());

    assert!(app.overlay.visible);
    assert!(!app.sink.is_empty(), "startup burst expected");

    app.handle_key(key(KeyCode::Char('x')));
    assert!(app.sink.is_empty());

    app.handle_key(key(KeyCode::Char('m')));
    assert!(app.overlay.minimized);

    app.handle_key(key(KeyCode::F(2)));
    assert!(!app.overlay.visible);

    // With the overlay hidden its keys unbind: 'x' no longer clears.
    app.sink.info("kept");
    app.handle_key(key(KeyCode::Char('x')));
    assert_eq!(app.sink.len(), 1);
}

#[test]
fn modal_viewer_captures_keys_until_dismissed() {
    let management = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1));
    let mut app = make_app(AuthScenario::Succeed, management, std::env::temp_dir());

    app.handle_key(key(KeyCode::Char('l')));
    assert!(app.viewer.is_some());

    // Keys go to the viewer: Enter must not start a sign-in.
    app.handle_key(key(KeyCode::Enter));
    assert!(!app.signing_in);

    app.handle_key(key(KeyCode::Esc));
    assert!(app.viewer.is_none());
}

#[test]
fn export_writes_report_files_and_reports_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let management = SimulatedManagement::new(EnrollmentScenario::EnableAfterChecks(1));
    let mut app = make_app(
        AuthScenario::Succeed,
        management,
        dir.path().to_path_buf(),
    );

    app.handle_key(key(KeyCode::Char('s')));

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 2, "transcript + JSON sidecar: {:?}", entries);
    assert!(entries.iter().any(|name| name.ends_with(".log")));
    assert!(entries.iter().any(|name| name.ends_with(".json")));
    assert!(app.status_message.contains("Exported"));
}

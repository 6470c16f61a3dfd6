//! Identity-provider client boundary.

use std::thread;
use std::time::Duration;

use crate::SdkError;

/// Parameters for an interactive token acquisition.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub client_id: String,
    pub authority: String,
    pub scopes: Vec<String>,
    pub login_hint: Option<String>,
}

/// Successful sign-in result.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub account: String,
    pub access_token: String,
    pub expires_in: Duration,
}

/// Identity-provider client capability.
///
/// `acquire_token` blocks for the duration of the interactive flow; callers
/// run it on a worker thread and collect the result over a channel.
pub trait IdentityClient: Send + Sync {
    fn acquire_token(&self, request: &AuthRequest) -> Result<AuthOutcome, SdkError>;
}

/// Scripted outcome for the simulated identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScenario {
    /// Sign-in completes for the configured account.
    Succeed,
    /// The user backs out of the broker prompt.
    UserCancel,
    /// No broker application is installed on the device.
    NoBroker,
    /// The broker never answers.
    BrokerTimeout,
    /// Generic authority rejection.
    Fail,
}

/// Simulated identity provider. Error descriptions match the wording real
/// broker stacks produce, since downstream classification inspects them.
pub struct SimulatedIdentity {
    scenario: AuthScenario,
    account: String,
    latency: Duration,
}

impl SimulatedIdentity {
    pub fn new(scenario: AuthScenario, account: impl Into<String>) -> Self {
        Self {
            scenario,
            account: account.into(),
            latency: Duration::from_millis(600),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl IdentityClient for SimulatedIdentity {
    fn acquire_token(&self, request: &AuthRequest) -> Result<AuthOutcome, SdkError> {
        log::debug!(
            "simulated broker: client={} scopes={:?}",
            request.client_id,
            request.scopes
        );
        thread::sleep(self.latency);
        match self.scenario {
            AuthScenario::Succeed => Ok(AuthOutcome {
                account: self.account.clone(),
                access_token: "eyJhbGciOiJSUzI1NiJ9.c2ltdWxhdGVk.ZGVtbw".to_string(),
                expires_in: Duration::from_secs(3600),
            }),
            AuthScenario::UserCancel => {
                Err(SdkError::new("User canceled the authorization session."))
            }
            AuthScenario::NoBroker => Err(SdkError::new(
                "Broker application is not installed on this device.",
            )),
            AuthScenario::BrokerTimeout => Err(SdkError::new(
                "Did not receive response from broker within the allotted time.",
            )),
            AuthScenario::Fail => Err(SdkError::new(
                "The authority rejected the request (AADSTS700016).",
            )),
        }
    }
}

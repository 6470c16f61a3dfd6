//! Vendor SDK boundary.
//!
//! The identity-provider and device-management SDKs are closed-source and
//! platform-bound; the traits here are the seam where a real one mounts.
//! The simulated clients reproduce the observable contract (latency,
//! outcome selection, human-readable error text) and back the demo binary
//! and every test.

mod error;
pub mod identity;
pub mod management;

pub use error::SdkError;
pub use identity::{AuthOutcome, AuthRequest, AuthScenario, IdentityClient, SimulatedIdentity};
pub use management::{EnrollmentScenario, ManagementClient, SimulatedManagement};

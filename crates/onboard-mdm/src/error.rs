use thiserror::Error;

/// Opaque vendor SDK failure.
///
/// The vendor surfaces only a human-readable description; structured
/// classification happens once, in `onboard_core::errors`.
#[derive(Error, Debug, Clone)]
#[error("{description}")]
pub struct SdkError {
    pub description: String,
}

impl SdkError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

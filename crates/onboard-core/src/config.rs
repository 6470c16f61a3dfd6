//! Identity-provider configuration echoed at startup.
//!
//! Demo placeholders; a deployment substitutes its own tenant values.

pub const CLIENT_ID: &str = "4b6f0c2d-91a7-4de3-b3a8-57d20f1c8aa4";
pub const AUTHORITY: &str = "https://login.microsoftonline.com/common";
pub const REDIRECT_URI: &str = "onboard://auth";
pub const SCOPES: &[&str] = &["User.Read"];

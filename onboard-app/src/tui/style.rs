//! Centralized emoji + severity palette for consistent UX copy.

use onboard_core::diag::Severity;
use ratatui::style::Color;

pub mod emoji {
    pub const BADGE: &str = "🛂";
    pub const SUCCESS: &str = "✅";
    pub const ERROR: &str = "❌";
    pub const CLEANUP: &str = "🧹";
}

/// Severity is only required to be visually distinguishable; this is the
/// palette every surface uses.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::White,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

pub fn with(emoji: &str, message: &str) -> String {
    format!("{} {}", emoji, message)
}

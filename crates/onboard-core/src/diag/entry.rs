use chrono::{DateTime, Local};
use serde::Serialize;

/// Classification of a diagnostic entry's importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A single immutable diagnostic entry. Created at log time, never mutated,
/// destroyed by eviction or a bulk clear.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub(crate) fn new(message: String, severity: Severity) -> Self {
        Self {
            message,
            severity,
            timestamp: Local::now(),
        }
    }

    /// Render as a `[HH:MM:SS] message` line.
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_has_bracketed_clock_prefix() {
        let entry = LogEntry::new("hello".to_string(), Severity::Info);
        let line = entry.display_line();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] hello"));
        // [HH:MM:SS] is 10 chars.
        assert_eq!(line.find(']'), Some(9));
    }

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::Info.label(), "info");
        assert_eq!(Severity::Error.label(), "error");
    }
}

//! Diagnostic report export.
//!
//! The terminal has no share sheet or pasteboard, so "share" and "copy" both
//! materialize the buffer as files: a plain-text transcript plus a JSON
//! sidecar for tooling.

use chrono::Local;
use onboard_core::diag::LogEntry;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct DiagReport<'a> {
    generated_at: String,
    entry_count: usize,
    entries: &'a [LogEntry],
}

/// Write the transcript and its JSON sidecar, returning the transcript path.
pub fn export(dir: &Path, entries: &[LogEntry]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let text_path = dir.join(format!("onboard-diagnostics-{}.log", stamp));
    let json_path = dir.join(format!("onboard-diagnostics-{}.json", stamp));

    let mut transcript = String::new();
    for entry in entries {
        transcript.push_str(&entry.display_line());
        transcript.push('\n');
    }
    std::fs::write(&text_path, transcript)?;

    let report = DiagReport {
        generated_at: Local::now().to_rfc3339(),
        entry_count: entries.len(),
        entries,
    };
    std::fs::write(&json_path, serde_json::to_vec_pretty(&report)?)?;

    Ok(text_path)
}

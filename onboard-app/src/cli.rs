//! CLI argument parsing for onboard.
//!
//! Running without arguments launches the TUI. The vendor SDKs are simulated;
//! flags select the scripted outcome for each boundary, so every sign-in and
//! enrollment path can be exercised without a real backend.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthOutcomeArg {
    /// Sign-in completes for the configured account
    Succeed,
    /// User backs out of the broker prompt
    Cancel,
    /// No broker application installed on the device
    NoBroker,
    /// Broker never responds
    Timeout,
    /// Generic authority rejection
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnrollOutcomeArg {
    /// Enrollment succeeds
    Succeed,
    /// The management service rejects the device
    Fail,
}

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "🛂 onboard - device sign-in & enrollment companion")]
#[command(long_about = "🛂 onboard - device sign-in & enrollment companion\n\n\
    Signs a user in through the identity provider, enrolls the device into\n\
    management and shows a live diagnostic console while it happens.\n\n\
    Run without arguments to launch the interactive TUI.")]
pub struct Cli {
    /// Account used by the simulated identity provider
    #[arg(long, default_value = "alice@example.com")]
    pub account: String,

    /// Outcome of the simulated sign-in
    #[arg(long, value_enum, default_value = "succeed")]
    pub auth: AuthOutcomeArg,

    /// Outcome of the simulated enrollment
    #[arg(long, value_enum, default_value = "succeed")]
    pub enroll: EnrollOutcomeArg,

    /// Management reports enabled from this status check onward
    #[arg(long, default_value_t = 3)]
    pub enabled_after_checks: u32,

    /// Start with the diagnostic overlay hidden
    #[arg(long)]
    pub no_overlay: bool,

    /// Write process logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Directory for exported diagnostic reports
    #[arg(long, default_value = ".")]
    pub report_dir: PathBuf,

    /// Dump TUI screen render text to stdout and exit
    #[arg(long)]
    pub dump_tui: bool,
}

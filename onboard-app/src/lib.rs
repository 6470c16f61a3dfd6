use clap::Parser;

pub mod cli;
pub mod logging;
pub mod report;
pub mod tui;

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.log_file.clone());

    if cli.dump_tui {
        tui::dump_all_screens(&cli)?;
        return Ok(());
    }

    log::info!("🛂 Launching onboard...");
    tui::run(&cli)?;
    Ok(())
}

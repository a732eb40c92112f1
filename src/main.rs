use anyhow::Result;
use clap::Parser;

use qcd::cli::{Cli, CliCommand};
use qcd::telemetry::{init_tracing, LogTarget};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = qcd::config::from_cli(&cli)?;

    match cli
        .command
        .clone()
        .unwrap_or_else(|| CliCommand::Tui(Default::default()))
    {
        CliCommand::Tui(args) => {
            qcd::config::apply_tui_args(&mut config, &args);
            // The terminal belongs to the UI, so logs go to a file.
            init_tracing(
                cli.log_filter.as_deref(),
                "info",
                LogTarget::File(config.log_path()),
            )?;
            qcd::tui::run(config)?;
        }
        command => {
            init_tracing(cli.log_filter.as_deref(), "warn", LogTarget::Stderr)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            qcd::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}

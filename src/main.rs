use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use partyplan::app;
use partyplan::cli::Cli;
use partyplan::config::PlannerConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = PlannerConfig::load(cli.global.config.as_deref(), &cli.global)?;

    partyplan::logging::init(config.log_level.as_deref(), config.log_file.as_deref())?;

    debug!(
        user = config.user.as_deref().unwrap_or("-"),
        data_dir = %config.data_dir.display(),
        generator_cmd = %config.generator_cmd,
        model = config.model.as_deref().unwrap_or("default"),
        timeout_sec = config.generate_timeout_sec,
        "config loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::execute(cli.command, &config, &mut out)
}

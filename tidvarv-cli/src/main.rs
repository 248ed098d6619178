mod commands;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();
    tidvarv_telemetry::diagnostics::init();
    commands::run(cli)
}

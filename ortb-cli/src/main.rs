//! ORTB CLI - offline tools for the territorial indicators dashboard data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ortb-cli",
    version,
    about = "ORTB territorial indicators toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: ortb_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("ortb-cli {}", env!("CARGO_PKG_VERSION"));
    ortb_cmd::run(cli.command)
}

use anyhow::Result;
use clap::Parser;

use component_audit::{cli::handle_command, cli::Cli, utils::init_logger};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Exit with appropriate code
    if !handle_command(&cli).await? {
        std::process::exit(1);
    }

    Ok(())
}

//! MShop command line tool.

use clap::Parser;
use mshop::{CliConfig, init_logging, run};
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    debug!(command = ?config.command, site_path = %config.site_path, "Running command");

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}

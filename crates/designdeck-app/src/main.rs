//! Command-line entry point.

use clap::Parser;
use designdeck_app::Cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    let output = designdeck_app::run(cli).inspect_err(|e| log::error!("{}", e))?;
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    Ok(())
}

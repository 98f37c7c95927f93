pub mod cli;
pub mod config;
pub mod crypto;
pub mod interactive;
pub mod logger;
pub mod text;

use anyhow::Result;
use clap::Parser;

pub const VERSION: &str = "v0.1.0";

pub fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    logger::init(cli.verbose);
    log::debug!("gost89 {}", VERSION);
    cli.execute()
}

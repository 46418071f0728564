// src/bin/cli.rs
use clap::Parser;
use color_eyre::eyre::{eyre, Result};

use fii_scrape::{cli, log};

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    log::init(&args.log_level);
    cli::run(args).map_err(|e| eyre!("{e}"))
}

mod cli;
mod config;
mod constants;
mod edit;
mod error;
mod gallery;
mod generation;
mod images;
mod models;
mod provider;
mod session;
mod storage;
mod utils;

use crate::cli::{build_session, process_command, Cli};
use crate::config::Config;
use clap::Parser;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let session = build_session(&config).await?;
    process_command(&session, cli.command).await?;
    Ok(())
}

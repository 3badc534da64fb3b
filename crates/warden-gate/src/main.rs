use std::path::PathBuf;

use clap::Parser;

use crate::logger::LoggerConfig;

mod application;
mod config;
mod domain;
mod logger;
mod server;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Sets a port to start the gate server
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Sets the JWKS url bearer tokens are verified against
    #[arg(long)]
    pub jwks_url: Option<String>,
    /// Sets the identity platform base url
    #[arg(long)]
    pub identity_url: Option<String>,
    /// Sets the role the privileged endpoint grants
    #[arg(long)]
    pub grant_role: Option<String>,
    /// Sets the role the gated endpoint requires
    #[arg(long)]
    pub gate_role: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app_config = config::load_config(args)?;

    logger::init_logger(LoggerConfig::default());

    let application = application::init(&app_config)?;

    server::run(application, (&app_config).into()).await?;
    Ok(())
}

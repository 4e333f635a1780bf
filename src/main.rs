use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use soapbox::config::{read_config, Config};
use soapbox::logger::configure_logger;
use soapbox::server::server_run;

#[derive(Parser)]
#[command(version, about = "A personal markdown blog and portfolio server")]
struct Args {
    /// Path to the configuration file. Defaults to soapbox.toml next to
    /// the executable.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn open_config(args: &Args) -> anyhow::Result<Config> {
    let cfg_path = match args.config {
        Some(ref path) => path.clone(),
        None => {
            let exe_path = env::current_exe().context("Could not locate the executable")?;
            let exe_dir = exe_path.parent().context("Executable has no parent directory")?;
            exe_dir.join("soapbox.toml")
        }
    };

    read_config(&cfg_path).with_context(|| format!("Reading {}", cfg_path.display()))
}

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = open_config(&args)?;
    configure_logger(&config)?;

    server_run(config).await?;
    Ok(())
}

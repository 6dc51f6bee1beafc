use crate::client::DirectoryClient;
use crate::config::Config;
use crate::model::Directory;
use clap::{ArgAction, Parser, Subcommand};
use eyre::{Error, WrapErr};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod browse;
mod client;
mod config;
mod display;
mod error;
mod model;
mod server;
mod view;

#[derive(Parser)]
#[command(version, author, about)]
struct Cli {
    /// Use FILE instead of rdirectory.toml
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the student directory over HTTP
    Serve {
        /// Address to listen on
        #[arg(long)]
        address: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Serve students from FILE instead of the built-in ones
        #[arg(long, value_name = "FILE")]
        dataset: Option<PathBuf>,
    },
    /// Browse the student directory interactively
    Browse {
        /// Directory service location
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rdirectory={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Serve {
            address,
            port,
            dataset,
        } => {
            if let Some(address) = address {
                config.server.address = address;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if dataset.is_some() {
                config.server.dataset = dataset;
            }
            let directory = match &config.server.dataset {
                Some(path) => Directory::load(path).wrap_err("cannot load students")?,
                None => Directory::seed(),
            };
            server::serve(&config.server, directory).await
        }
        Command::Browse { base_url } => {
            if let Some(base_url) = base_url {
                config.client.base_url = base_url;
            }
            let client = DirectoryClient::new(&config.client)?;
            let input = BufReader::new(tokio::io::stdin());
            browse::browse(&client, input, &mut std::io::stdout()).await
        }
    }
}

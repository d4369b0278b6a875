use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use checkout_core::{
    CatalogLoadError, CatalogSource, CheckoutClient, FileCatalogSource, HttpCatalogSource,
};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod render;

use command::{parse_command, Command, HELP};
use config::{load_settings, CatalogLocation, Overrides};
use render::render_snapshot;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "checkout.toml")]
    config: String,
    /// Base URL of the catalog server; `/items` is appended.
    #[arg(long, conflicts_with = "catalog_file")]
    catalog_url: Option<String>,
    /// Read the catalog from a local JSON file instead of a server.
    #[arg(long)]
    catalog_file: Option<PathBuf>,
    #[arg(long)]
    load_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(
        &args.config,
        Overrides {
            catalog_url: args.catalog_url,
            catalog_file: args.catalog_file,
            load_timeout_secs: args.load_timeout_secs,
        },
    );
    let source: Arc<dyn CatalogSource> = match &settings.catalog {
        CatalogLocation::Url(url) => Arc::new(HttpCatalogSource::new(url)?),
        CatalogLocation::File(path) => Arc::new(FileCatalogSource::new(path.clone())),
    };
    let client = CheckoutClient::new_with_options(source, settings.checkout_options());

    println!("{}", render_snapshot(&client.snapshot().await));
    // Failures are already captured in the snapshot phase.
    let _ = client.load().await;
    println!("{}", render_snapshot(&client.snapshot().await));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        let snapshot = match command {
            Command::Add(item_id) => client.increase(item_id).await,
            Command::Remove(item_id) => client.decrease(item_id).await,
            Command::Adjust { direction, item_id } => {
                match client.adjust(&direction, item_id).await {
                    Ok(snapshot) => snapshot,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                }
            }
            Command::Show => client.snapshot().await,
            Command::Retry => {
                match client.load().await {
                    Err(err @ (CatalogLoadError::AlreadyLoaded | CatalogLoadError::InFlight)) => {
                        println!("{err}");
                    }
                    Err(err) => debug!(%err, "retry did not produce a catalog"),
                    Ok(_) => {}
                }
                client.snapshot().await
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        };

        println!("{}", render_snapshot(&snapshot));
    }

    Ok(())
}

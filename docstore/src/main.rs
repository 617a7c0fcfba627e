use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use docstore::cli::{Cli, Command};
use docstore::{DocPath, Store, default_store_dir};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let store_dir = cli.store.unwrap_or_else(default_store_dir);

    info!("docstore opening {}", store_dir.display());
    let mut store = Store::open(&store_dir).context(format!("Failed to open store at {}", store_dir.display()))?;

    match cli.command {
        Command::Get { path } => {
            let path = DocPath::parse(&path)?;
            match store.get(&path)? {
                Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
                None => println!("{} No document at {}", "✗".red(), path.to_string().cyan()),
            }
        }
        Command::List { collection } => {
            let documents = store.list(&collection)?;
            if documents.is_empty() {
                println!("No documents found");
            } else {
                for doc in documents {
                    let updated = chrono::DateTime::from_timestamp_millis(doc.updated_at)
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default();
                    println!("{} {}", doc.path.to_string().yellow(), updated.dimmed());
                }
            }
        }
        Command::Delete { path } => {
            let path = DocPath::parse(&path)?;
            if store.delete(&path)? {
                println!("{} Deleted: {}", "✓".green(), path);
            } else {
                println!("{} No document at {}", "✗".red(), path);
            }
        }
    }

    Ok(())
}

//! CLI argument parsing for docstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docstore")]
#[command(author, version, about = "Inspect a hierarchical JSON document store", long_about = None)]
pub struct Cli {
    /// Store directory (defaults to the planner's data directory)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a document as pretty JSON
    Get {
        /// Document path, e.g. users/abc/studyPlans/plan-1
        #[arg(required = true)]
        path: String,
    },

    /// List the documents in a collection
    List {
        /// Collection path, e.g. users/abc/studyPlans
        #[arg(required = true)]
        collection: String,
    },

    /// Delete a document
    Delete {
        /// Document path
        #[arg(required = true)]
        path: String,
    },
}

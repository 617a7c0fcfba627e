//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::{Day, Subject};

/// Weekly ENEM study planner
#[derive(Parser)]
#[command(
    name = "sp",
    about = "Weekly ENEM study planner",
    version,
    after_help = "Logs are written to: ~/.local/share/studyplanner/logs/studyplanner.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level filter (overrides RUST_LOG)
    #[arg(short, long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Active week (defaults to 1)
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub week: Option<u32>,

    /// Subcommand to execute (defaults to the interactive session)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Start the interactive session
    Repl,

    /// Load the active week and print it
    Show,

    /// Generate and save the plan for the active week
    Generate {
        /// Daily study hours (1-10)
        #[arg(long)]
        hours: Option<u32>,

        /// Subject difficulty as SUBJECT=N (repeatable)
        #[arg(short, long = "difficulty", value_name = "SUBJECT=N", value_parser = parse_difficulty)]
        difficulty: Vec<(Subject, u8)>,
    },

    /// Mark a day of the active week as done
    Done {
        /// Day label, e.g. Segunda
        #[arg(value_parser = parse_day)]
        day: Day,
    },

    /// Generate or show the seminar of the active week
    Seminar,

    /// List stored weeks
    Weeks,

    /// Print the number of weeks until the exam
    Countdown,
}

/// Parse `SUBJECT=N`, where SUBJECT is a name or 1-based index
pub fn parse_difficulty(text: &str) -> Result<(Subject, u8), String> {
    let (name, value) = text
        .rsplit_once('=')
        .ok_or_else(|| format!("expected SUBJECT=N, got '{}'", text))?;
    let subject = Subject::from_name(name).ok_or_else(|| format!("unknown subject '{}'", name.trim()))?;
    let value: u8 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid difficulty '{}'", value.trim()))?;
    Ok((subject, value))
}

fn parse_day(text: &str) -> Result<Day, String> {
    Day::from_label(text).ok_or_else(|| format!("unknown day '{}'", text))
}

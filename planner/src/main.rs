//! sp - weekly ENEM study planner
//!
//! CLI entry point: the interactive session plus one-shot commands that drive
//! the same controller.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use studyplanner::calendar::{self, ExamCalendar};
use studyplanner::cli::{Cli, Command};
use studyplanner::config::Config;
use studyplanner::controller::Controller;
use studyplanner::generator::create_plan_generator;
use studyplanner::repl::ReplSession;
use studyplanner::session::{self, Session};
use studyplanner::view;

fn setup_logging(log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file, never stdout/stderr
    let log_file = fs::File::create(log_dir.join("studyplanner.log")).context("Failed to create log file")?;
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).context(format!("Invalid log level '{}'", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    info!("Logging initialized (level: {})", log_level.unwrap_or("default"));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    let calendar = config.calendar.resolve()?;

    info!(
        "studyplanner loaded config: model={}, identity={:?}",
        config.generator.model, config.identity.mode
    );

    let week = cli.week.unwrap_or(1);
    match cli.command.unwrap_or(Command::Repl) {
        Command::Countdown => cmd_countdown(&calendar),
        command => {
            let session = session::bootstrap(&config).context("Failed to start session")?;
            let controller = build_controller(&config, &session, calendar, week)?;
            let result = run_command(command, controller).await;
            let _ = session.gateway.shutdown().await;
            result
        }
    }
}

fn build_controller(config: &Config, session: &Session, calendar: ExamCalendar, week: u32) -> Result<Controller> {
    let generator = create_plan_generator(&config.generator).context("Failed to create plan generator")?;
    Ok(Controller::new(
        session.user_id.clone(),
        Arc::new(session.gateway.clone()),
        generator,
        calendar,
    )
    .with_week(week))
}

async fn run_command(command: Command, mut controller: Controller) -> Result<()> {
    match command {
        Command::Repl => return ReplSession::new(controller).run().await,
        Command::Countdown => {}
        Command::Show => controller.load_current().await,
        Command::Generate { hours, difficulty } => {
            controller.load_current().await;
            if let Some(hours) = hours {
                controller.set_hours(hours);
            }
            for (subject, value) in difficulty {
                controller.set_difficulty(subject, value);
            }
            controller.generate_plan().await;
        }
        Command::Done { day } => {
            controller.load_current().await;
            controller.mark_day_done(day).await;
        }
        Command::Seminar => {
            controller.load_current().await;
            if controller.plan().is_some_and(|p| p.seminar.is_some()) {
                controller.show_seminar();
            } else {
                controller.generate_seminar().await;
            }
        }
        Command::Weeks => {
            let weeks = controller.list_weeks().await;
            print!("{}", view::render_weeks(&weeks));
            if let Some(message) = controller.take_message() {
                eprintln!("{} {}", "✗".red(), message);
            }
            return Ok(());
        }
    }

    print!("{}", view::render(&controller.snapshot(calendar::today())));
    Ok(())
}

fn cmd_countdown(calendar: &ExamCalendar) -> Result<()> {
    let weeks = calendar.weeks_until_exam(calendar::today());
    println!(
        "Faltam {} semanas para o ENEM ({})",
        weeks.to_string().bold(),
        calendar.exam_date.format("%d/%m/%Y")
    );
    Ok(())
}

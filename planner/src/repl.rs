//! Interactive planner session

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::calendar;
use crate::catalog::{Day, Subject};
use crate::controller::Controller;
use crate::view;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Show,
    Hours(u32),
    Difficulty(Subject, u8),
    Generate,
    Done(Day),
    Seminar,
    Next,
    Prev,
    Weeks,
    Restart,
    Quit,
}

/// Parse one input line into a command
pub fn parse_command(input: &str) -> Result<ReplCommand, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let (cmd, args) = match parts.split_first() {
        Some((cmd, args)) => (*cmd, args),
        None => return Err("Empty command".to_string()),
    };

    match cmd {
        "/help" | "/h" => Ok(ReplCommand::Help),
        "/show" | "/s" => Ok(ReplCommand::Show),
        "/hours" => match args {
            [n] => n
                .parse()
                .map(ReplCommand::Hours)
                .map_err(|_| format!("Invalid hours: {}", n)),
            _ => Err("Usage: /hours N".to_string()),
        },
        "/diff" => {
            let (value, subject) = match args.split_last() {
                Some((value, subject)) if !subject.is_empty() => (value, subject.join(" ")),
                _ => return Err("Usage: /diff SUBJECT N".to_string()),
            };
            let subject = Subject::from_name(&subject).ok_or_else(|| format!("Unknown subject: {}", subject))?;
            let value = value.parse().map_err(|_| format!("Invalid difficulty: {}", value))?;
            Ok(ReplCommand::Difficulty(subject, value))
        }
        "/generate" | "/g" => Ok(ReplCommand::Generate),
        "/done" | "/d" => {
            if args.is_empty() {
                return Err("Usage: /done DAY".to_string());
            }
            let label = args.join(" ");
            Day::from_label(&label)
                .map(ReplCommand::Done)
                .ok_or_else(|| format!("Unknown day: {}", label))
        }
        "/seminar" => Ok(ReplCommand::Seminar),
        "/next" | "/n" => Ok(ReplCommand::Next),
        "/prev" | "/p" => Ok(ReplCommand::Prev),
        "/weeks" => Ok(ReplCommand::Weeks),
        "/restart" => Ok(ReplCommand::Restart),
        "/quit" | "/q" | "/exit" => Ok(ReplCommand::Quit),
        _ => Err(format!("Unknown command: {}", cmd)),
    }
}

/// Interactive REPL session over a controller
pub struct ReplSession {
    controller: Controller,
}

impl ReplSession {
    pub fn new(controller: Controller) -> Self {
        Self { controller }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.controller.on_ready(calendar::today()).await;
        self.render();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match parse_command(input) {
                        Ok(command) => match self.handle_command(command).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        },
                        Err(e) => {
                            println!("{} {}", "?".yellow(), e);
                            println!("Type {} for available commands", "/help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Plano de Estudos ENEM".bright_cyan().bold());
        println!("Usuário: {}", self.controller.user_id());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    async fn handle_command(&mut self, command: ReplCommand) -> SlashResult {
        debug!(?command, "handle_command: called");
        match command {
            ReplCommand::Help => {
                self.print_help();
                return SlashResult::Continue;
            }
            ReplCommand::Quit => return SlashResult::Quit,
            ReplCommand::Show => self.controller.show_plan(),
            ReplCommand::Hours(hours) => {
                self.controller.set_hours(hours);
                self.controller.show_form();
            }
            ReplCommand::Difficulty(subject, value) => {
                self.controller.set_difficulty(subject, value);
                self.controller.show_form();
            }
            ReplCommand::Generate => {
                println!("{}", "Gerando plano...".dimmed());
                self.controller.generate_plan().await;
            }
            ReplCommand::Done(day) => self.controller.mark_day_done(day).await,
            ReplCommand::Seminar => {
                if self.controller.plan().is_some_and(|p| p.seminar.is_some()) {
                    self.controller.show_seminar();
                } else {
                    println!("{}", "Gerando seminário...".dimmed());
                    self.controller.generate_seminar().await;
                }
            }
            ReplCommand::Next => self.controller.advance_week().await,
            ReplCommand::Prev => self.controller.rewind_week().await,
            ReplCommand::Weeks => {
                let weeks = self.controller.list_weeks().await;
                print!("{}", view::render_weeks(&weeks));
                return SlashResult::Continue;
            }
            ReplCommand::Restart => self.controller.restart().await,
        }
        self.render();
        SlashResult::Continue
    }

    /// Print the current screen and clear the one-shot message
    fn render(&mut self) {
        println!();
        print!("{}", view::render(&self.controller.snapshot(calendar::today())));
        self.controller.take_message();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:22} Show this help", "/help".yellow());
        println!("  {:22} Show the weekly checklist", "/show".yellow());
        println!("  {:22} Set daily study hours (1-10)", "/hours N".yellow());
        println!("  {:22} Set a subject's difficulty (1-5)", "/diff SUBJECT N".yellow());
        println!("  {:22} Generate the plan for this week", "/generate".yellow());
        println!("  {:22} Mark a day as done", "/done DAY".yellow());
        println!("  {:22} Show or generate the seminar", "/seminar".yellow());
        println!("  {:22} Go to the next week", "/next".yellow());
        println!("  {:22} Go to the previous week", "/prev".yellow());
        println!("  {:22} List stored weeks", "/weeks".yellow());
        println!("  {:22} Reset week 1 progress", "/restart".yellow());
        println!("  {:22} Exit", "/quit".yellow());
        println!();
        println!("{}", "Subjects:".bright_cyan());
        for (index, subject) in Subject::ALL.iter().enumerate() {
            println!("  {}. {}", index + 1, subject);
        }
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

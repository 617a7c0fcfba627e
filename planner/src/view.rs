//! Text rendering of controller snapshots

use colored::Colorize;
use std::fmt::Write;

use crate::catalog::{Day, Subject};
use crate::controller::{Snapshot, ViewState, progress_label, remaining_days};
use crate::domain::{Preferences, Seminar, StudyPlan, WeekSummary};

/// Render the whole screen for a snapshot
pub fn render(snapshot: &Snapshot<'_>) -> String {
    let mut out = String::new();
    render_header(&mut out, snapshot);

    match snapshot.state {
        ViewState::Bootstrapping => {
            let _ = writeln!(out, "{}", "Carregando...".dimmed());
        }
        ViewState::FormVisible => render_form(&mut out, snapshot.preferences),
        ViewState::PlanVisible => match snapshot.plan {
            Some(plan) => render_plan(&mut out, plan),
            None => render_form(&mut out, snapshot.preferences),
        },
        ViewState::SeminarVisible => match snapshot.plan.and_then(|p| p.seminar.as_ref()) {
            Some(seminar) => render_seminar(&mut out, seminar),
            None => {
                let _ = writeln!(out, "{}", "Nenhum seminário gerado ainda.".dimmed());
            }
        },
    }

    if let Some(message) = snapshot.message {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} {}", "»".yellow(), message.yellow());
    }
    out
}

fn render_header(out: &mut String, snapshot: &Snapshot<'_>) {
    let _ = writeln!(out, "{}", "Plano de Estudos ENEM".bright_cyan().bold());
    let _ = writeln!(
        out,
        "Usuário: {} | Semana {} | Faltam {} semanas para o ENEM",
        snapshot.user_id.dimmed(),
        snapshot.week.to_string().bold(),
        snapshot.weeks_until_exam
    );
    if let Some(plan) = snapshot.plan {
        let _ = writeln!(out, "{}", progress_label(plan));
    }
    let _ = writeln!(out);
}

fn render_form(out: &mut String, preferences: &Preferences) {
    let _ = writeln!(out, "{}", "Preferências".bright_cyan());
    let _ = writeln!(out, "  Horas de estudo por dia: {}", preferences.hours_per_day);
    let _ = writeln!(out, "  Dificuldade por matéria (1-5, onde 5 é mais difícil):");
    for (index, subject) in Subject::ALL.iter().enumerate() {
        let _ = writeln!(
            out,
            "    {}. {:22} {}",
            index + 1,
            subject.name(),
            preferences.difficulties.get(*subject)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Use {}, {} e {} para criar o plano.",
        "/hours N".yellow(),
        "/diff MATÉRIA N".yellow(),
        "/generate".yellow()
    );
}

fn render_plan(out: &mut String, plan: &StudyPlan) {
    for day in Day::ALL {
        let done = plan.is_day_done(day);
        let mark = if done { "[x]".green() } else { "[ ]".normal() };
        let label = if done { day.label().green() } else { day.label().bold() };
        let _ = writeln!(out, "{} {}", mark, label);

        for block in plan.blocks(day) {
            let _ = writeln!(out, "    {}: {}", block.subject.bright_blue(), block.main_topic);
            for sub_topic in &block.sub_topics {
                let _ = writeln!(out, "      - {}", sub_topic);
            }
            if !block.description.is_empty() {
                let _ = writeln!(out, "      {}", block.description.dimmed());
            }
        }
    }

    let _ = writeln!(out);
    if plan.is_week_complete() {
        let _ = writeln!(out, "Semana concluída! Use {} para gerar o seminário.", "/seminar".yellow());
    } else {
        let remaining: Vec<&str> = remaining_days(plan).iter().map(Day::label).collect();
        let _ = writeln!(out, "Faltam: {}", remaining.join(", ").dimmed());
    }
}

fn render_seminar(out: &mut String, seminar: &Seminar) {
    let _ = writeln!(out, "{} {}", "Seminário de Sábado:".bright_cyan(), seminar.title.bold());
    let _ = writeln!(out, "  Tópico principal: {}", seminar.main_topic);
    for sub_topic in &seminar.sub_topics {
        let _ = writeln!(out, "    - {}: {}", sub_topic.name.bright_blue(), sub_topic.description);
    }
    if !seminar.analogy.is_empty() {
        let _ = writeln!(out, "  Analogia: {}", seminar.analogy.italic());
    }
}

/// Render the stored-weeks listing
pub fn render_weeks(weeks: &[WeekSummary]) -> String {
    if weeks.is_empty() {
        return format!("{}\n", "Nenhuma semana salva.".dimmed());
    }
    let mut out = String::new();
    for week in weeks {
        let seminar = if week.has_seminar { " + seminário" } else { "" };
        let _ = writeln!(
            out,
            "Semana {:>3}: {}/{} dias{}",
            week.week,
            week.completed,
            Day::ALL.len(),
            seminar
        );
    }
    out
}

//! Application controller
//!
//! Owns the active week, the form preferences and the loaded plan, and
//! moves between view states in response to load results and user actions.
//! Every failure ends up in the single transient `message`; nothing here
//! aborts.
//!
//! Persistence is optimistic: in-memory state is updated first and a failed
//! write only produces a message. Actions take `&mut self`, so a generation
//! in flight cannot interleave with week navigation, and the document key is
//! captured before any generation starts.

use chrono::NaiveDate;
use docstore::DocPath;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::calendar::ExamCalendar;
use crate::catalog::{Day, Subject};
use crate::domain::{DAYS_PER_WEEK, PlanPatch, Preferences, StudyPlan, WeekSummary};
use crate::gateway::{PlanStore, key_for};
use crate::generator::PlanGenerator;

pub const MSG_PLAN_SAVED: &str = "Plano de estudo gerado e salvo com sucesso!";
pub const MSG_PLAN_FALLBACK: &str = "Erro ao gerar plano detalhado. Gerando um plano básico.";
pub const MSG_PLAN_EXISTS: &str = "Esta semana já tem um plano de estudo.";
pub const MSG_PLAN_SAVE_FAILED: &str = "Erro ao salvar o plano de estudo. Tente novamente.";
pub const MSG_LOAD_FAILED: &str = "Erro ao carregar o plano de estudo. Por favor, tente novamente.";
pub const MSG_MARK_FAILED: &str = "Erro ao marcar como concluído. Tente novamente.";
pub const MSG_NO_PLAN: &str = "Nenhum plano carregado. Gere um plano primeiro.";
pub const MSG_WEEK_INCOMPLETE: &str =
    "A semana não foi concluída. Marque todos os dias como feitos para gerar o seminário.";
pub const MSG_SEMINAR_READY: &str = "Seminário gerado com sucesso!";
pub const MSG_SEMINAR_FAILED: &str = "Erro ao gerar o tema do seminário. Verifique sua conexão e tente novamente.";
pub const MSG_SEMINAR_SAVE_FAILED: &str = "Erro ao salvar o seminário. Tente novamente.";
pub const MSG_RESTARTED: &str = "Progresso da semana 1 reiniciado!";
pub const MSG_RESTART_FAILED: &str = "Erro ao reiniciar o progresso.";

/// Coarse view modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Identity and store not ready yet
    Bootstrapping,
    /// Collecting hours and difficulties
    FormVisible,
    /// Showing the weekly checklist
    PlanVisible,
    /// Showing the seminar
    SeminarVisible,
}

/// Read-only view of the controller for rendering
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub user_id: &'a str,
    pub week: u32,
    pub state: ViewState,
    pub preferences: &'a Preferences,
    pub plan: Option<&'a StudyPlan>,
    pub message: Option<&'a str>,
    pub weeks_until_exam: u32,
}

/// The application state machine
pub struct Controller {
    user_id: String,
    store: Arc<dyn PlanStore>,
    generator: PlanGenerator,
    calendar: ExamCalendar,
    week: u32,
    state: ViewState,
    preferences: Preferences,
    plan: Option<StudyPlan>,
    message: Option<String>,
}

impl Controller {
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<dyn PlanStore>,
        generator: PlanGenerator,
        calendar: ExamCalendar,
    ) -> Self {
        let user_id = user_id.into();
        debug!(%user_id, "Controller::new: called");
        Self {
            user_id,
            store,
            generator,
            calendar,
            week: 1,
            state: ViewState::Bootstrapping,
            preferences: Preferences::default(),
            plan: None,
            message: None,
        }
    }

    /// Start on a week other than 1
    pub fn with_week(mut self, week: u32) -> Self {
        self.week = week.max(1);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn plan(&self) -> Option<&StudyPlan> {
        self.plan.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Clear and return the transient message
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn weeks_until_exam(&self, today: NaiveDate) -> u32 {
        self.calendar.weeks_until_exam(today)
    }

    pub fn snapshot(&self, today: NaiveDate) -> Snapshot<'_> {
        Snapshot {
            user_id: &self.user_id,
            week: self.week,
            state: self.state,
            preferences: &self.preferences,
            plan: self.plan.as_ref(),
            message: self.message.as_deref(),
            weeks_until_exam: self.weeks_until_exam(today),
        }
    }

    /// Identity and store are ready: load or create the active week
    pub async fn on_ready(&mut self, today: NaiveDate) {
        debug!(week = self.week, %today, "on_ready: called");
        self.message = None;

        let key = match self.current_key() {
            Some(key) => key,
            None => return,
        };

        match self.store.read(&key).await {
            Err(e) => {
                warn!(error = %e, "on_ready: load failed");
                self.message = Some(MSG_LOAD_FAILED.to_string());
                self.state = ViewState::FormVisible;
            }
            Ok(None) => {
                info!(week = self.week, "on_ready: no plan for week, generating");
                self.generate_for(key).await;
            }
            Ok(Some(plan)) => {
                self.adopt(plan);
                if self.calendar.is_seminar_day(today) {
                    if self.plan.as_ref().is_some_and(|p| p.seminar.is_some()) {
                        debug!("on_ready: seminar day with stored seminar");
                        self.state = ViewState::SeminarVisible;
                    } else if self.is_week_complete() {
                        debug!("on_ready: seminar day without seminar, requesting one");
                        self.generate_seminar().await;
                    }
                }
            }
        }
    }

    /// Set daily study hours (clamped to 1-10)
    pub fn set_hours(&mut self, hours: u32) {
        debug!(%hours, "set_hours: called");
        self.preferences.set_hours(hours);
    }

    /// Set a subject's difficulty (clamped to 1-5)
    pub fn set_difficulty(&mut self, subject: Subject, value: u8) {
        debug!(%subject, %value, "set_difficulty: called");
        self.preferences.difficulties.set(subject, value);
    }

    /// Show the form for the active week
    pub fn show_form(&mut self) {
        self.state = ViewState::FormVisible;
    }

    /// Replace the form contents and generate a plan from them
    pub async fn submit_form(&mut self, preferences: Preferences) {
        debug!(hours = preferences.hours_per_day, "submit_form: called");
        self.set_hours(preferences.hours_per_day);
        self.preferences.difficulties = preferences.difficulties;
        self.generate_plan().await;
    }

    /// Generate a plan for the active week from the current preferences
    ///
    /// Only creates: a week that already has a plan keeps it, along with its
    /// completed days and seminar.
    pub async fn generate_plan(&mut self) {
        debug!(week = self.week, "generate_plan: called");
        self.message = None;
        let Some(key) = self.current_key() else {
            return;
        };
        if self.plan.as_ref().is_some_and(|p| p.week == self.week) {
            debug!(week = self.week, "generate_plan: plan already loaded");
            self.message = Some(MSG_PLAN_EXISTS.to_string());
            self.state = ViewState::PlanVisible;
            return;
        }
        match self.store.read(&key).await {
            Ok(None) => self.generate_for(key).await,
            Ok(Some(plan)) => {
                info!(week = self.week, "generate_plan: week already has a plan");
                self.adopt(plan);
                self.message = Some(MSG_PLAN_EXISTS.to_string());
            }
            Err(e) => {
                warn!(%key, error = %e, "generate_plan: existence check failed");
                self.message = Some(MSG_LOAD_FAILED.to_string());
            }
        }
    }

    async fn generate_for(&mut self, key: DocPath) {
        let draft = self
            .generator
            .generate_weekly_plan(self.preferences.hours_per_day, &self.preferences.difficulties)
            .await;
        let generated = draft.is_generated();
        let plan = StudyPlan::new(self.week, &self.preferences, draft.schedule);

        let saved = match self.store.write_full(&key, &plan).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%key, error = %e, "generate_for: save failed, keeping plan in memory");
                false
            }
        };

        self.message = Some(
            match (saved, generated) {
                (false, _) => MSG_PLAN_SAVE_FAILED,
                (true, true) => MSG_PLAN_SAVED,
                (true, false) => MSG_PLAN_FALLBACK,
            }
            .to_string(),
        );
        self.plan = Some(plan);
        self.state = ViewState::PlanVisible;
        info!(week = self.week, generated, saved, "Plan ready");
    }

    /// Mark a study day as done
    ///
    /// Marking a day that is already done changes nothing.
    pub async fn mark_day_done(&mut self, day: Day) {
        debug!(%day, "mark_day_done: called");
        self.message = None;
        let Some(key) = self.current_key() else {
            return;
        };
        let Some(plan) = self.plan.as_mut() else {
            self.message = Some(MSG_NO_PLAN.to_string());
            return;
        };

        if !plan.mark_day_done(day) {
            debug!(%day, "mark_day_done: already done");
            self.message = Some(format!("{} já estava marcado como concluído.", day));
            return;
        }
        let patch = PlanPatch::completed_days(plan.completed_days.clone());

        match self.store.write_merge(&key, &patch).await {
            Ok(()) => {
                self.message = Some(format!("{} marcado como concluído!", day));
            }
            Err(e) => {
                warn!(%key, error = %e, "mark_day_done: save failed, keeping change in memory");
                self.message = Some(MSG_MARK_FAILED.to_string());
            }
        }
    }

    /// Whether all study days of the loaded plan are done
    pub fn is_week_complete(&self) -> bool {
        self.plan.as_ref().is_some_and(StudyPlan::is_week_complete)
    }

    /// Generate the end-of-week seminar
    ///
    /// Refused without any network call unless all six days are done.
    pub async fn generate_seminar(&mut self) {
        debug!(week = self.week, "generate_seminar: called");
        let difficulties = match self.plan.as_ref() {
            None => {
                self.message = Some(MSG_NO_PLAN.to_string());
                return;
            }
            Some(plan) if !plan.is_week_complete() => {
                debug!(completed = plan.completed_count(), "generate_seminar: week incomplete");
                self.message = Some(MSG_WEEK_INCOMPLETE.to_string());
                return;
            }
            Some(plan) => plan.difficulties.clone(),
        };
        let Some(key) = self.current_key() else {
            return;
        };

        let seminar = match self.generator.generate_seminar(&difficulties).await {
            Ok(seminar) => seminar,
            Err(e) => {
                warn!(error = %e, "generate_seminar: generation failed");
                self.message = Some(MSG_SEMINAR_FAILED.to_string());
                return;
            }
        };

        let patch = PlanPatch::seminar(seminar.clone());
        self.message = Some(
            match self.store.write_merge(&key, &patch).await {
                Ok(()) => MSG_SEMINAR_READY,
                Err(e) => {
                    warn!(%key, error = %e, "generate_seminar: save failed, keeping seminar in memory");
                    MSG_SEMINAR_SAVE_FAILED
                }
            }
            .to_string(),
        );
        if let Some(plan) = self.plan.as_mut() {
            plan.seminar = Some(seminar);
        }
        self.state = ViewState::SeminarVisible;
    }

    /// Show the stored seminar, if any
    pub fn show_seminar(&mut self) {
        if self.plan.as_ref().is_some_and(|p| p.seminar.is_some()) {
            self.state = ViewState::SeminarVisible;
        }
    }

    /// Show the checklist of the loaded plan, if any
    pub fn show_plan(&mut self) {
        if self.plan.is_some() {
            self.state = ViewState::PlanVisible;
        }
    }

    /// Move to the next week
    pub async fn advance_week(&mut self) {
        debug!(week = self.week, "advance_week: called");
        self.change_week(self.week.saturating_add(1)).await;
    }

    /// Move to the previous week (never below 1)
    pub async fn rewind_week(&mut self) {
        debug!(week = self.week, "rewind_week: called");
        self.change_week(self.week.saturating_sub(1).max(1)).await;
    }

    async fn change_week(&mut self, week: u32) {
        self.message = None;
        self.week = week;
        self.plan = None;
        self.load_current().await;
    }

    /// Load the active week without generating: stored plan → checklist, none → form
    pub async fn load_current(&mut self) {
        debug!(week = self.week, "load_current: called");
        let Some(key) = self.current_key() else {
            return;
        };
        match self.store.read(&key).await {
            Ok(Some(plan)) => self.adopt(plan),
            Ok(None) => {
                debug!(week = self.week, "load_current: no plan, showing form");
                self.state = ViewState::FormVisible;
            }
            Err(e) => {
                warn!(%key, error = %e, "load_current: load failed");
                self.message = Some(MSG_LOAD_FAILED.to_string());
                self.state = ViewState::FormVisible;
            }
        }
    }

    /// Go back to week 1 and clear its completed days
    pub async fn restart(&mut self) {
        debug!("restart: called");
        self.message = None;
        self.week = 1;
        self.plan = None;
        let Some(key) = self.current_key() else {
            return;
        };

        let mut plan = match self.store.read(&key).await {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                self.state = ViewState::FormVisible;
                self.message = Some(MSG_RESTARTED.to_string());
                return;
            }
            Err(e) => {
                warn!(error = %e, "restart: load failed");
                self.state = ViewState::FormVisible;
                self.message = Some(MSG_RESTART_FAILED.to_string());
                return;
            }
        };

        plan.completed_days.clear();
        let result = self
            .store
            .write_merge(&key, &PlanPatch::completed_days(Vec::new()))
            .await;
        self.message = Some(
            match result {
                Ok(()) => MSG_RESTARTED,
                Err(e) => {
                    warn!(error = %e, "restart: save failed");
                    MSG_RESTART_FAILED
                }
            }
            .to_string(),
        );
        self.adopt(plan);
    }

    /// Stored weeks for this user
    pub async fn list_weeks(&mut self) -> Vec<WeekSummary> {
        debug!("list_weeks: called");
        match self.store.list_weeks(&self.user_id).await {
            Ok(weeks) => weeks,
            Err(e) => {
                warn!(error = %e, "list_weeks: failed");
                self.message = Some(MSG_LOAD_FAILED.to_string());
                Vec::new()
            }
        }
    }

    fn adopt(&mut self, plan: StudyPlan) {
        debug!(week = plan.week, completed = plan.completed_count(), "adopt: called");
        self.preferences.set_hours(plan.hours);
        self.preferences.difficulties = plan.difficulties.clone();
        self.plan = Some(plan);
        self.state = ViewState::PlanVisible;
    }

    fn current_key(&mut self) -> Option<DocPath> {
        match key_for(&self.user_id, self.week) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "current_key: invalid key");
                self.message = Some(MSG_LOAD_FAILED.to_string());
                self.state = ViewState::FormVisible;
                None
            }
        }
    }
}

/// Days still to be done in the loaded plan, in week order
pub fn remaining_days(plan: &StudyPlan) -> Vec<Day> {
    Day::ALL.into_iter().filter(|d| !plan.is_day_done(*d)).collect()
}

/// Progress line shown in the header
pub fn progress_label(plan: &StudyPlan) -> String {
    format!("{} de {} dias concluídos nesta semana", plan.completed_count(), DAYS_PER_WEEK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DaySubjectBlock, Seminar, WeeklySchedule};
    use crate::gateway::mock::MemoryPlanStore;
    use crate::generator::RetryPolicy;
    use crate::generator::client::mock::MockTextGenerator;
    use serde_json::{Value, json};
    use std::time::Duration;

    const USER: &str = "u1";

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 27).unwrap()
    }

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
    }

    fn week_response() -> Value {
        json!({
            "weeklyPlan": Day::ALL.iter().map(|d| json!({
                "day": d.label(),
                "schedule": [{"subject": "Matemática", "mainTopic": "Funções"}]
            })).collect::<Vec<_>>()
        })
    }

    fn seminar_response() -> Value {
        json!({"title": "Seminário", "mainTopic": "Funções", "subTopics": [], "analogy": "Receita"})
    }

    fn stored_plan(week: u32, completed: &[Day]) -> StudyPlan {
        let mut schedule = WeeklySchedule::new();
        for day in Day::ALL {
            schedule.insert(day, vec![DaySubjectBlock::placeholder()]);
        }
        let mut plan = StudyPlan::new(week, &Preferences::default(), schedule);
        plan.completed_days = completed.to_vec();
        plan
    }

    struct Harness {
        controller: Controller,
        store: Arc<MemoryPlanStore>,
        generator: Arc<MockTextGenerator>,
    }

    fn harness(responses: Vec<Result<Value, crate::generator::GeneratorError>>) -> Harness {
        let store = Arc::new(MemoryPlanStore::new());
        let generator = Arc::new(MockTextGenerator::new(responses));
        let retry = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(1),
        };
        let plan_generator = PlanGenerator::new(generator.clone(), retry).unwrap();
        let controller = Controller::new(USER, store.clone(), plan_generator, ExamCalendar::default());
        Harness {
            controller,
            store,
            generator,
        }
    }

    fn key(week: u32) -> DocPath {
        key_for(USER, week).unwrap()
    }

    #[tokio::test]
    async fn test_on_ready_generates_missing_week() {
        let mut h = harness(vec![Ok(week_response())]);

        h.controller.on_ready(monday()).await;

        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.controller.message(), Some(MSG_PLAN_SAVED));
        let stored = h.store.read(&key(1)).await.unwrap().unwrap();
        assert_eq!(Some(&stored), h.controller.plan());
        assert_eq!(stored.hours, 2);
    }

    #[tokio::test]
    async fn test_on_ready_adopts_existing_plan() {
        let mut h = harness(vec![]);
        let mut plan = stored_plan(1, &[Day::Monday]);
        plan.hours = 6;
        h.store.insert(&key(1), &plan);

        h.controller.on_ready(monday()).await;

        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.controller.plan(), Some(&plan));
        assert_eq!(h.controller.preferences().hours_per_day, 6);
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_on_ready_read_failure_shows_form_with_message() {
        let mut h = harness(vec![]);
        h.store.set_fail_reads(true);

        h.controller.on_ready(monday()).await;

        assert_eq!(h.controller.state(), ViewState::FormVisible);
        assert_eq!(h.controller.message(), Some(MSG_LOAD_FAILED));
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_on_ready_seminar_day_with_stored_seminar() {
        let mut h = harness(vec![]);
        let mut plan = stored_plan(1, &Day::ALL);
        plan.seminar = Some(Seminar::default());
        h.store.insert(&key(1), &plan);

        h.controller.on_ready(saturday()).await;

        assert_eq!(h.controller.state(), ViewState::SeminarVisible);
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_on_ready_seminar_day_generates_seminar_for_complete_week() {
        let mut h = harness(vec![Ok(seminar_response())]);
        h.store.insert(&key(1), &stored_plan(1, &Day::ALL));

        h.controller.on_ready(saturday()).await;

        assert_eq!(h.controller.state(), ViewState::SeminarVisible);
        assert_eq!(h.controller.message(), Some(MSG_SEMINAR_READY));
        let stored = h.store.read(&key(1)).await.unwrap().unwrap();
        assert_eq!(stored.seminar.unwrap().title, "Seminário");
    }

    #[tokio::test]
    async fn test_on_ready_seminar_day_incomplete_week_stays_quiet() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &[Day::Monday]));

        h.controller.on_ready(saturday()).await;

        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.controller.message(), None);
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_plan_keeps_existing_week() {
        let mut h = harness(vec![Ok(week_response())]);
        let mut plan = stored_plan(1, &Day::ALL);
        plan.seminar = Some(Seminar {
            title: "Guardado".to_string(),
            ..Seminar::default()
        });
        h.store.insert(&key(1), &plan);
        h.controller.load_current().await;

        h.controller.generate_plan().await;

        assert_eq!(h.controller.message(), Some(MSG_PLAN_EXISTS));
        assert_eq!(h.generator.call_count(), 0);
        assert_eq!(h.store.write_count(), 0);
        let stored = h.store.read(&key(1)).await.unwrap().unwrap();
        assert_eq!(stored.completed_days.len(), 6);
        assert_eq!(stored.seminar.unwrap().title, "Guardado");
    }

    #[tokio::test]
    async fn test_generate_plan_checks_store_before_writing() {
        let h = harness(vec![Ok(week_response())]);
        h.store.insert(&key(2), &stored_plan(2, &[Day::Friday]));
        let Harness { controller, store, generator } = h;
        let mut controller = controller.with_week(2);

        controller.generate_plan().await;

        assert_eq!(controller.message(), Some(MSG_PLAN_EXISTS));
        assert_eq!(controller.state(), ViewState::PlanVisible);
        assert!(controller.plan().unwrap().is_day_done(Day::Friday));
        assert_eq!(generator.call_count(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_plan_does_not_write_when_check_fails() {
        let mut h = harness(vec![Ok(week_response())]);
        h.store.set_fail_reads(true);

        h.controller.generate_plan().await;

        assert_eq!(h.controller.message(), Some(MSG_LOAD_FAILED));
        assert_eq!(h.generator.call_count(), 0);
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_fallback_message() {
        let mut h = harness(vec![]);

        h.controller.generate_plan().await;

        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.controller.message(), Some(MSG_PLAN_FALLBACK));
        assert_eq!(h.generator.call_count(), 5);
        assert!(h.store.read(&key(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_plan_kept_in_memory_when_save_fails() {
        let mut h = harness(vec![Ok(week_response())]);
        h.store.set_fail_writes(true);

        h.controller.generate_plan().await;

        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.controller.message(), Some(MSG_PLAN_SAVE_FAILED));
        assert!(h.controller.plan().is_some());
        assert!(h.store.raw(&key(1)).is_none());
    }

    #[tokio::test]
    async fn test_submit_form_uses_submitted_preferences() {
        let mut h = harness(vec![Ok(week_response())]);
        let mut preferences = Preferences::default();
        preferences.set_hours(5);
        preferences.difficulties.set(Subject::Essay, 5);

        h.controller.submit_form(preferences).await;

        let plan = h.controller.plan().unwrap();
        assert_eq!(plan.hours, 5);
        assert_eq!(plan.difficulties.get(Subject::Essay), 5);
        assert!(h.generator.prompts()[0].contains("tem 5 horas"));
    }

    #[tokio::test]
    async fn test_form_setters_clamp() {
        let mut h = harness(vec![]);
        h.controller.set_hours(42);
        h.controller.set_difficulty(Subject::Mathematics, 0);
        assert_eq!(h.controller.preferences().hours_per_day, 10);
        assert_eq!(h.controller.preferences().difficulties.get(Subject::Mathematics), 1);
    }

    #[tokio::test]
    async fn test_mark_day_done_merges_completed_days() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &[]));
        h.controller.on_ready(monday()).await;

        h.controller.mark_day_done(Day::Wednesday).await;

        assert_eq!(h.controller.message(), Some("Quarta marcado como concluído!"));
        let raw = h.store.raw(&key(1)).unwrap();
        assert_eq!(raw["completedDays"], json!(["Quarta"]));
        assert_eq!(raw["hours"], 2);
    }

    #[tokio::test]
    async fn test_mark_day_done_twice_is_noop() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &[Day::Monday]));
        h.controller.on_ready(monday()).await;
        let writes_before = h.store.write_count();

        h.controller.mark_day_done(Day::Monday).await;

        assert_eq!(h.controller.plan().unwrap().completed_days, vec![Day::Monday]);
        assert_eq!(h.store.write_count(), writes_before);
        assert!(h.controller.message().unwrap().contains("já estava"));
    }

    #[tokio::test]
    async fn test_mark_day_done_without_plan() {
        let mut h = harness(vec![]);
        h.controller.mark_day_done(Day::Monday).await;
        assert_eq!(h.controller.message(), Some(MSG_NO_PLAN));
    }

    #[tokio::test]
    async fn test_mark_day_done_keeps_change_when_save_fails() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &[]));
        h.controller.on_ready(monday()).await;
        h.store.set_fail_writes(true);

        h.controller.mark_day_done(Day::Friday).await;

        assert_eq!(h.controller.message(), Some(MSG_MARK_FAILED));
        assert!(h.controller.plan().unwrap().is_day_done(Day::Friday));
    }

    #[tokio::test]
    async fn test_sixth_distinct_day_enables_seminar() {
        let mut h = harness(vec![Ok(seminar_response())]);
        h.store.insert(&key(1), &stored_plan(1, &Day::ALL[..5]));
        h.controller.on_ready(monday()).await;
        assert!(!h.controller.is_week_complete());

        h.controller.mark_day_done(Day::Saturday).await;
        assert!(h.controller.is_week_complete());

        h.controller.generate_seminar().await;

        assert_eq!(h.controller.state(), ViewState::SeminarVisible);
        assert_eq!(h.generator.call_count(), 1);
        let raw = h.store.raw(&key(1)).unwrap();
        assert_eq!(raw["seminar"]["title"], "Seminário");
        assert_eq!(raw["completedDays"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_incomplete_week_refuses_seminar_without_network_call() {
        let mut h = harness(vec![Ok(seminar_response())]);
        h.store.insert(&key(1), &stored_plan(1, &Day::ALL[..5]));
        h.controller.on_ready(monday()).await;

        h.controller.generate_seminar().await;

        assert_eq!(h.controller.message(), Some(MSG_WEEK_INCOMPLETE));
        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_completions_do_not_complete_week() {
        let mut h = harness(vec![]);
        let days = [Day::Monday; 6];
        h.store.insert(&key(1), &stored_plan(1, &days));
        h.controller.on_ready(monday()).await;

        h.controller.generate_seminar().await;

        assert_eq!(h.controller.message(), Some(MSG_WEEK_INCOMPLETE));
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_seminar_failure_reports_message() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &Day::ALL));
        h.controller.on_ready(monday()).await;

        h.controller.generate_seminar().await;

        assert_eq!(h.controller.message(), Some(MSG_SEMINAR_FAILED));
        assert_eq!(h.controller.state(), ViewState::PlanVisible);
        assert_eq!(h.generator.call_count(), 5);
    }

    #[tokio::test]
    async fn test_advance_week_to_missing_week_shows_form() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &[]));
        h.controller.on_ready(monday()).await;

        h.controller.advance_week().await;

        assert_eq!(h.controller.week(), 2);
        assert_eq!(h.controller.state(), ViewState::FormVisible);
        assert!(h.controller.plan().is_none());
    }

    #[tokio::test]
    async fn test_advance_and_rewind_load_existing_weeks() {
        let mut h = harness(vec![]);
        h.store.insert(&key(1), &stored_plan(1, &[Day::Monday]));
        h.store.insert(&key(2), &stored_plan(2, &[]));
        h.controller.on_ready(monday()).await;

        h.controller.advance_week().await;
        assert_eq!(h.controller.plan().unwrap().week, 2);
        assert_eq!(h.controller.state(), ViewState::PlanVisible);

        h.controller.rewind_week().await;
        assert_eq!(h.controller.plan().unwrap().week, 1);

        h.controller.rewind_week().await;
        assert_eq!(h.controller.week(), 1);
    }

    #[tokio::test]
    async fn test_generated_plan_targets_week_captured_at_start() {
        let Harness { controller, store, .. } = harness(vec![Ok(week_response())]);
        let mut controller = controller.with_week(3);

        controller.generate_plan().await;

        assert!(store.raw(&key(3)).is_some());
        assert!(store.raw(&key(1)).is_none());
        assert_eq!(controller.plan().unwrap().week, 3);
    }

    #[tokio::test]
    async fn test_restart_clears_week_one_progress() {
        let Harness { controller, store, .. } = harness(vec![]);
        let mut plan = stored_plan(1, &Day::ALL);
        plan.seminar = Some(Seminar::default());
        store.insert(&key(1), &plan);
        store.insert(&key(2), &stored_plan(2, &[]));
        let mut controller = controller.with_week(2);
        controller.on_ready(monday()).await;

        controller.restart().await;

        assert_eq!(controller.week(), 1);
        assert_eq!(controller.state(), ViewState::PlanVisible);
        assert_eq!(controller.message(), Some(MSG_RESTARTED));
        assert!(controller.plan().unwrap().completed_days.is_empty());
        let raw = store.raw(&key(1)).unwrap();
        assert_eq!(raw["completedDays"], json!([]));
        assert!(raw.get("seminar").is_some());
    }

    #[tokio::test]
    async fn test_restart_without_week_one_shows_form() {
        let mut h = harness(vec![]);
        h.controller.restart().await;
        assert_eq!(h.controller.state(), ViewState::FormVisible);
        assert!(h.store.raw(&key(1)).is_none());
    }

    #[tokio::test]
    async fn test_list_weeks() {
        let mut h = harness(vec![]);
        h.store.insert(&key(2), &stored_plan(2, &[Day::Monday]));
        h.store.insert(&key(1), &stored_plan(1, &[]));

        let weeks = h.controller.list_weeks().await;

        assert_eq!(weeks.iter().map(|w| w.week).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(weeks[1].completed, 1);
    }

    #[test]
    fn test_progress_and_remaining_days() {
        let plan = stored_plan(1, &[Day::Monday, Day::Tuesday]);
        assert_eq!(progress_label(&plan), "2 de 6 dias concluídos nesta semana");
        assert_eq!(remaining_days(&plan).len(), 4);
        assert_eq!(remaining_days(&plan)[0], Day::Wednesday);
    }
}

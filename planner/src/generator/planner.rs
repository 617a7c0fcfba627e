//! Weekly plan and seminar generation
//!
//! Wraps a `TextGenerator` with the retry policy, turns responses into
//! domain types, and synthesizes a local plan when the service is
//! unreachable.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::prompts::{self, PromptRenderer};
use super::{GeneratorError, RetryPolicy, TextGenerator};
use crate::catalog::{Day, Subject};
use crate::domain::{
    DaySubjectBlock, Difficulties, HARD_SUBJECT_THRESHOLD, PlanSource, Seminar, StudyPlanDraft, WeeklySchedule,
};

/// Generates plans and seminars through a text generator
pub struct PlanGenerator {
    client: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    prompts: PromptRenderer,
}

impl PlanGenerator {
    pub fn new(client: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Result<Self, GeneratorError> {
        debug!(?retry, "PlanGenerator::new: called");
        Ok(Self {
            client,
            retry,
            prompts: PromptRenderer::new()?,
        })
    }

    /// Generate a six-day plan, falling back to a local one after retries
    ///
    /// Never fails: the draft's `source` tells whether the service answered.
    pub async fn generate_weekly_plan(&self, hours: u32, difficulties: &Difficulties) -> StudyPlanDraft {
        debug!(%hours, "generate_weekly_plan: called");
        match self.try_weekly_plan(hours, difficulties).await {
            Ok(schedule) => {
                info!("generate_weekly_plan: service plan received");
                StudyPlanDraft {
                    schedule,
                    source: PlanSource::Generated,
                }
            }
            Err(e) => {
                warn!(error = %e, "generate_weekly_plan: using fallback plan");
                let schedule = fallback_schedule(difficulties, &mut rand::rng());
                StudyPlanDraft {
                    schedule,
                    source: PlanSource::Fallback,
                }
            }
        }
    }

    async fn try_weekly_plan(&self, hours: u32, difficulties: &Difficulties) -> Result<WeeklySchedule, GeneratorError> {
        let prompt = self.prompts.weekly_plan(hours, difficulties)?;
        let schema = prompts::weekly_plan_schema();
        let (client, prompt, schema) = (&self.client, prompt.as_str(), &schema);
        self.retry
            .run("weekly_plan", move || async move {
                let response = client.generate(prompt, schema).await?;
                schedule_from_response(&response)
            })
            .await
    }

    /// Generate a seminar on the hardest subjects
    ///
    /// Subjects rated at or above the hard threshold go into the prompt; an
    /// empty list is sent as-is. There is no local fallback.
    pub async fn generate_seminar(&self, difficulties: &Difficulties) -> Result<Seminar, GeneratorError> {
        let hard = difficulties.at_least(HARD_SUBJECT_THRESHOLD);
        debug!(hard_count = hard.len(), "generate_seminar: called");
        let prompt = self.prompts.seminar(&hard)?;
        let schema = prompts::seminar_schema();
        let (client, prompt, schema) = (&self.client, prompt.as_str(), &schema);
        let seminar = self
            .retry
            .run("seminar", move || async move {
                let response = client.generate(prompt, schema).await?;
                seminar_from_response(response)
            })
            .await?;
        info!(title = %seminar.title, "generate_seminar: seminar received");
        Ok(seminar)
    }
}

/// Re-key a `weeklyPlan` response by canonical day
///
/// Unknown day labels are dropped. Days the response left out, or left
/// empty, get a single placeholder block. A response without a
/// `weeklyPlan` array is rejected so that it gets retried.
pub fn schedule_from_response(response: &Value) -> Result<WeeklySchedule, GeneratorError> {
    let entries = response
        .get("weeklyPlan")
        .and_then(Value::as_array)
        .ok_or_else(|| GeneratorError::InvalidResponse("missing weeklyPlan array".to_string()))?;
    debug!(entry_count = entries.len(), "schedule_from_response: called");

    let mut schedule = WeeklySchedule::new();
    for entry in entries {
        let label = entry.get("day").and_then(Value::as_str).unwrap_or_default();
        let Some(day) = Day::from_label(label) else {
            warn!(%label, "schedule_from_response: dropping unknown day");
            continue;
        };
        let blocks: Vec<DaySubjectBlock> = match entry.get("schedule") {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };
        schedule.entry(day).or_default().extend(blocks);
    }

    for day in Day::ALL {
        let blocks = schedule.entry(day).or_default();
        if blocks.is_empty() {
            debug!(%day, "schedule_from_response: filling missing day");
            blocks.push(DaySubjectBlock::placeholder());
        }
    }
    Ok(schedule)
}

fn seminar_from_response(response: Value) -> Result<Seminar, GeneratorError> {
    if !response.is_object() {
        return Err(GeneratorError::InvalidResponse("seminar is not an object".to_string()));
    }
    Ok(serde_json::from_value(response)?)
}

/// Local plan used when the service is unavailable
///
/// Every day studies one of the highest-rated subjects (ties broken at
/// random) on a random topic from its fallback pool.
pub fn fallback_schedule<R: Rng + ?Sized>(difficulties: &Difficulties, rng: &mut R) -> WeeklySchedule {
    let hardest = difficulties.hardest();
    debug!(?hardest, "fallback_schedule: called");

    let mut schedule = WeeklySchedule::new();
    for day in Day::ALL {
        let subject = hardest.choose(&mut *rng).copied().unwrap_or(Subject::Mathematics);
        let topic = subject.fallback_topics().choose(&mut *rng).copied().unwrap_or("Revisão geral");
        let block = DaySubjectBlock {
            subject: subject.name().to_string(),
            main_topic: topic.to_string(),
            sub_topics: vec!["Sub-tópico 1".to_string(), "Sub-tópico 2".to_string()],
            description: "Revisão geral do tema".to_string(),
        };
        schedule.insert(day, vec![block]);
    }
    schedule
}

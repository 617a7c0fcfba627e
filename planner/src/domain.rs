//! Study plan domain types
//!
//! `StudyPlan` is the persisted plan document: one per user per week. Field
//! names serialize in camelCase to match the stored JSON.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use crate::catalog::{Day, Subject};

/// Number of study days in a week
pub const DAYS_PER_WEEK: usize = 6;

/// Difficulty threshold at which a subject counts as hard
pub const HARD_SUBJECT_THRESHOLD: u8 = 4;

/// Day → ordered study blocks
pub type WeeklySchedule = BTreeMap<Day, Vec<DaySubjectBlock>>;

/// Per-subject difficulty ratings (1-5)
///
/// Always holds exactly the five catalog subjects; values are clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Difficulties(BTreeMap<Subject, u8>);

impl Difficulties {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: u8 = 3;

    /// Rating for a subject
    pub fn get(&self, subject: Subject) -> u8 {
        self.0.get(&subject).copied().unwrap_or(Self::DEFAULT)
    }

    /// Set a rating, clamped to [1, 5]
    pub fn set(&mut self, subject: Subject, value: u8) {
        self.0.insert(subject, value.clamp(Self::MIN, Self::MAX));
    }

    /// Ratings in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (Subject, u8)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }

    /// Subjects sharing the highest rating
    pub fn hardest(&self) -> Vec<Subject> {
        let max = self.0.values().copied().max().unwrap_or(Self::DEFAULT);
        self.iter().filter(|(_, v)| *v == max).map(|(s, _)| s).collect()
    }

    /// Subjects rated at or above `threshold`
    pub fn at_least(&self, threshold: u8) -> Vec<Subject> {
        self.iter().filter(|(_, v)| *v >= threshold).map(|(s, _)| s).collect()
    }
}

impl Default for Difficulties {
    fn default() -> Self {
        Self(Subject::ALL.into_iter().map(|s| (s, Self::DEFAULT)).collect())
    }
}

impl From<BTreeMap<Subject, u8>> for Difficulties {
    fn from(ratings: BTreeMap<Subject, u8>) -> Self {
        let mut difficulties = Self::default();
        for (subject, value) in ratings {
            difficulties.set(subject, value);
        }
        difficulties
    }
}

impl<'de> Deserialize<'de> for Difficulties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<Subject, u8>::deserialize(deserializer).map(Self::from)
    }
}

/// One subject slot within a study day
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaySubjectBlock {
    pub subject: String,
    pub main_topic: String,
    pub sub_topics: Vec<String>,
    pub description: String,
}

impl DaySubjectBlock {
    /// Stand-in for a day the generated plan left out
    pub fn placeholder() -> Self {
        Self {
            subject: "Matéria Exemplo".to_string(),
            main_topic: "Revisão livre".to_string(),
            sub_topics: vec!["Tópico 1".to_string(), "Tópico 2".to_string()],
            description: "Conteúdo não gerado para este dia".to_string(),
        }
    }
}

/// A seminar sub-topic with a short explanation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeminarSubTopic {
    pub name: String,
    pub description: String,
}

/// The end-of-week seminar
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seminar {
    pub title: String,
    pub main_topic: String,
    pub sub_topics: Vec<SeminarSubTopic>,
    pub analogy: String,
}

/// The persisted plan document for one user and one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    /// Study hours per day
    pub hours: u32,
    pub difficulties: Difficulties,
    #[serde(deserialize_with = "deserialize_schedule")]
    pub plan: WeeklySchedule,
    #[serde(default, deserialize_with = "deserialize_days")]
    pub completed_days: Vec<Day>,
    pub week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seminar: Option<Seminar>,
}

impl StudyPlan {
    /// Create a fresh plan for a week from the form preferences
    pub fn new(week: u32, preferences: &Preferences, schedule: WeeklySchedule) -> Self {
        Self {
            hours: preferences.hours_per_day,
            difficulties: preferences.difficulties.clone(),
            plan: schedule,
            completed_days: Vec::new(),
            week,
            seminar: None,
        }
    }

    /// Check if a day has been marked done
    pub fn is_day_done(&self, day: Day) -> bool {
        self.completed_days.contains(&day)
    }

    /// Number of distinct days marked done
    pub fn completed_count(&self) -> usize {
        Day::ALL.iter().filter(|d| self.is_day_done(**d)).count()
    }

    /// Whether every study day of the week is done
    pub fn is_week_complete(&self) -> bool {
        self.completed_count() >= DAYS_PER_WEEK
    }

    /// Mark a day done. Returns false if it already was.
    pub fn mark_day_done(&mut self, day: Day) -> bool {
        if self.is_day_done(day) {
            return false;
        }
        self.completed_days.push(day);
        true
    }

    /// Blocks scheduled for a day (empty if none)
    pub fn blocks(&self, day: Day) -> &[DaySubjectBlock] {
        self.plan.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Stored schedules may use day synonyms or non-study days as keys
///
/// Blocks under synonyms of one day are concatenated; other keys are dropped.
fn deserialize_schedule<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WeeklySchedule, D::Error> {
    let raw = BTreeMap::<String, Vec<DaySubjectBlock>>::deserialize(deserializer)?;
    let mut schedule = WeeklySchedule::new();
    for (label, blocks) in raw {
        match Day::from_label(&label) {
            Some(day) => schedule.entry(day).or_default().extend(blocks),
            None => warn!(%label, "deserialize_schedule: dropping unknown day"),
        }
    }
    Ok(schedule)
}

fn deserialize_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Day>, D::Error> {
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|label| {
            let day = Day::from_label(&label);
            if day.is_none() {
                warn!(%label, "deserialize_days: dropping unknown day");
            }
            day
        })
        .collect())
}

/// Form state collected before generating a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub hours_per_day: u32,
    pub difficulties: Difficulties,
}

impl Preferences {
    pub const MIN_HOURS: u32 = 1;
    pub const MAX_HOURS: u32 = 10;

    /// Set study hours, clamped to [1, 10]
    pub fn set_hours(&mut self, hours: u32) {
        self.hours_per_day = hours.clamp(Self::MIN_HOURS, Self::MAX_HOURS);
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            hours_per_day: 2,
            difficulties: Difficulties::default(),
        }
    }
}

/// Where a generated schedule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// The generative service answered
    Generated,
    /// Retries were exhausted and the local fallback was used
    Fallback,
}

/// Result of weekly plan generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPlanDraft {
    pub schedule: WeeklySchedule,
    pub source: PlanSource,
}

impl StudyPlanDraft {
    pub fn is_generated(&self) -> bool {
        self.source == PlanSource::Generated
    }
}

/// Partial update of top-level plan fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_days: Option<Vec<Day>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seminar: Option<Seminar>,
}

impl PlanPatch {
    pub fn completed_days(days: Vec<Day>) -> Self {
        Self {
            completed_days: Some(days),
            ..Default::default()
        }
    }

    pub fn seminar(seminar: Seminar) -> Self {
        Self {
            seminar: Some(seminar),
            ..Default::default()
        }
    }

    /// The patch as a map of top-level fields
    pub fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Progress overview for one stored week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummary {
    pub week: u32,
    pub completed: usize,
    pub has_seminar: bool,
}

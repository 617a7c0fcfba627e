//! Prompt templates and response schemas
//!
//! Templates are `.pmt` files embedded at build time and rendered with
//! Handlebars. Schemas use the generateContent schema dialect (upper-case
//! type names, `propertyOrdering`).

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use super::GeneratorError;
use crate::catalog::Subject;
use crate::domain::Difficulties;

/// Weekly plan prompt
pub const WEEKLY_PLAN: &str = include_str!("../../prompts/weekly_plan.pmt");

/// Seminar prompt
pub const SEMINAR: &str = include_str!("../../prompts/seminar.pmt");

#[derive(Serialize)]
struct WeeklyPlanContext {
    hours: u32,
    difficulties: String,
}

#[derive(Serialize)]
struct SeminarContext {
    subjects: String,
}

/// Renders the embedded prompt templates
pub struct PromptRenderer {
    hbs: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, GeneratorError> {
        debug!("PromptRenderer::new: called");
        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs.register_template_string("weekly_plan", WEEKLY_PLAN)
            .map_err(|e| GeneratorError::Template(e.to_string()))?;
        hbs.register_template_string("seminar", SEMINAR)
            .map_err(|e| GeneratorError::Template(e.to_string()))?;
        Ok(Self { hbs })
    }

    /// Prompt asking for a six-day plan
    pub fn weekly_plan(&self, hours: u32, difficulties: &Difficulties) -> Result<String, GeneratorError> {
        debug!(%hours, "PromptRenderer::weekly_plan: called");
        let context = WeeklyPlanContext {
            hours,
            difficulties: serde_json::to_string(difficulties)?,
        };
        Ok(self.hbs.render("weekly_plan", &context)?.trim().to_string())
    }

    /// Prompt asking for a seminar on one of the hard subjects
    pub fn seminar(&self, hard_subjects: &[Subject]) -> Result<String, GeneratorError> {
        debug!(subject_count = hard_subjects.len(), "PromptRenderer::seminar: called");
        let subjects = hard_subjects.iter().map(Subject::name).collect::<Vec<_>>().join(", ");
        Ok(self.hbs.render("seminar", &SeminarContext { subjects })?.trim().to_string())
    }
}

/// Response schema for the weekly plan
pub fn weekly_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "weeklyPlan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING" },
                        "schedule": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "subject": { "type": "STRING" },
                                    "mainTopic": { "type": "STRING" },
                                    "subTopics": { "type": "ARRAY", "items": { "type": "STRING" } },
                                    "description": { "type": "STRING" }
                                }
                            }
                        }
                    },
                    "propertyOrdering": ["day", "schedule"]
                }
            }
        }
    })
}

/// Response schema for the seminar
pub fn seminar_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "mainTopic": { "type": "STRING" },
            "subTopics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            },
            "analogy": { "type": "STRING" }
        },
        "propertyOrdering": ["title", "mainTopic", "subTopics", "analogy"]
    })
}

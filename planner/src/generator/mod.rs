//! Generative plan client
//!
//! Builds prompts and response schemas, calls the generative service with
//! bounded retry, and turns responses into plans and seminars.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod planner;
pub mod prompts;
mod retry;

pub use client::TextGenerator;
pub use error::GeneratorError;
pub use gemini::GeminiClient;
pub use planner::{PlanGenerator, fallback_schedule, schedule_from_response};
pub use retry::RetryPolicy;

use crate::config::GeneratorConfig;

/// Create the text generator described by the config
pub fn create_client(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, GeneratorError> {
    debug!(model = %config.model, "create_client: called");
    Ok(Arc::new(GeminiClient::from_config(config)?))
}

/// Create a plan generator with the configured client and retry policy
pub fn create_plan_generator(config: &GeneratorConfig) -> Result<PlanGenerator, GeneratorError> {
    debug!("create_plan_generator: called");
    PlanGenerator::new(create_client(config)?, RetryPolicy::from_config(config))
}

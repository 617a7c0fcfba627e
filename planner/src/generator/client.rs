//! TextGenerator trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::GeneratorError;

/// Structured-output text generation, one attempt per call
///
/// Implementations send a single request and return the parsed JSON object
/// the service produced. Retrying is the caller's job (see `RetryPolicy`).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a JSON value matching `schema` for `prompt`
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, GeneratorError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock generator for unit tests
    ///
    /// Replays scripted outcomes in order and records every prompt it saw.
    /// Once the script runs out, every call fails.
    pub struct MockTextGenerator {
        responses: Mutex<Vec<Result<Value, GeneratorError>>>,
        prompts: Mutex<Vec<String>>,
        call_count: AtomicUsize,
    }

    impl MockTextGenerator {
        pub fn new(responses: Vec<Result<Value, GeneratorError>>) -> Self {
            debug!(response_count = %responses.len(), "MockTextGenerator::new: called");
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// A generator whose every call fails
        pub fn failing() -> Self {
            Self::new(Vec::new())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for MockTextGenerator {
        async fn generate(&self, prompt: &str, _schema: &Value) -> Result<Value, GeneratorError> {
            debug!("MockTextGenerator::generate: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses.lock().unwrap().pop().unwrap_or_else(|| {
                debug!("MockTextGenerator::generate: no more mock responses");
                Err(GeneratorError::ApiError {
                    status: 503,
                    message: "No more mock responses".to_string(),
                })
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[tokio::test]
        async fn test_mock_generator_replays_in_order() {
            let generator = MockTextGenerator::new(vec![Ok(json!({"n": 1})), Ok(json!({"n": 2}))]);

            assert_eq!(generator.generate("a", &json!({})).await.unwrap(), json!({"n": 1}));
            assert_eq!(generator.generate("b", &json!({})).await.unwrap(), json!({"n": 2}));
            assert!(generator.generate("c", &json!({})).await.is_err());

            assert_eq!(generator.call_count(), 3);
            assert_eq!(generator.prompts(), vec!["a", "b", "c"]);
        }
    }
}

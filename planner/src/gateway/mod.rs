//! Plan store gateway
//!
//! Maps (user, week) to a document in the hierarchical store and performs
//! full or merge writes. `PlanGateway` owns the store behind an actor; the
//! controller only sees the `PlanStore` trait.

use async_trait::async_trait;
use docstore::DocPath;

mod manager;
mod messages;

pub use manager::PlanGateway;
pub use messages::{GatewayCommand, GatewayError, GatewayResponse};

use crate::domain::{PlanPatch, StudyPlan, WeekSummary};

/// Persistence operations for study plans
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Point lookup. `Ok(None)` means the week has no plan yet.
    async fn read(&self, key: &DocPath) -> GatewayResponse<Option<StudyPlan>>;

    /// Replace the document entirely
    async fn write_full(&self, key: &DocPath, plan: &StudyPlan) -> GatewayResponse<()>;

    /// Shallow-merge the patch's fields into the document
    async fn write_merge(&self, key: &DocPath, patch: &PlanPatch) -> GatewayResponse<()>;

    /// Summaries of every stored week for a user, ordered by week
    async fn list_weeks(&self, user: &str) -> GatewayResponse<Vec<WeekSummary>>;
}

/// Collection holding a user's plans
pub fn plans_collection(user: &str) -> String {
    format!("users/{}/studyPlans", user)
}

/// Document key for a user's week: `users/{user}/studyPlans/plan-{week}`
pub fn key_for(user: &str, week: u32) -> GatewayResponse<DocPath> {
    let id = format!("plan-{}", week);
    DocPath::new(["users", user, "studyPlans", id.as_str()])
        .map_err(|e| GatewayError::InvalidKey(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_for_layout() {
        let key = key_for("anon-123", 7).unwrap();
        assert_eq!(key.to_string(), "users/anon-123/studyPlans/plan-7");
        assert_eq!(key.collection(), plans_collection("anon-123"));
    }

    #[test]
    fn test_key_for_is_deterministic() {
        assert_eq!(key_for("u", 2).unwrap(), key_for("u", 2).unwrap());
        assert_ne!(key_for("u", 2).unwrap(), key_for("u", 3).unwrap());
    }

    #[test]
    fn test_key_for_rejects_bad_user_ids() {
        assert!(matches!(key_for("", 1), Err(GatewayError::InvalidKey(_))));
        assert!(matches!(key_for("a/b", 1), Err(GatewayError::InvalidKey(_))));
    }
}

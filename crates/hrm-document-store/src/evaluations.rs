//! Performance evaluations with per-category ratings.

use crate::models::{CategoryScores, Evaluation};
use crate::record::{from_record, to_record};
use crate::{Collection, DocumentStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvaluation {
    pub employee_id: String,
    pub evaluator_id: String,
    pub categories: CategoryScores,
    #[serde(default)]
    pub comments: Option<String>,
}

impl DocumentStore {
    /// Record an evaluation; the overall score is derived from the ratings.
    pub fn submit_evaluation(&self, new: NewEvaluation) -> StoreResult<Evaluation> {
        if new.employee_id.trim().is_empty() {
            return Err(StoreError::malformed("Please select an employee"));
        }
        if new.evaluator_id.trim().is_empty() {
            return Err(StoreError::malformed("An evaluator is required"));
        }
        if let Some(category) = new.categories.first_out_of_range() {
            return Err(StoreError::malformed(format!(
                "{} must be rated {} to {}",
                category,
                CategoryScores::MIN,
                CategoryScores::MAX
            )));
        }

        let mut record = to_record(&new)?;
        record.insert("score".into(), new.categories.overall().into());
        record.insert("evaluation_date".into(), self.clock().now_rfc3339().into());

        let stored = self
            .from(Collection::Evaluations)
            .insert(Value::Object(record))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::StorageUnavailable("evaluation was not stored".into()))?;
        from_record(stored)
    }

    /// Evaluations of one employee, newest first.
    pub fn evaluations_for(&self, employee_id: &str) -> StoreResult<Vec<Evaluation>> {
        self.from(Collection::Evaluations)
            .select("*")
            .eq("employee_id", employee_id)
            .order("evaluation_date", false)
            .execute_as()
    }
}

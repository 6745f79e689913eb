use anyhow::{Context, Result};
use serde_json::Value;

use super::ExperimentRecord;

/// The external experimentation runtime, as seen by the rewriter
///
/// Implementations hand back whatever the runtime reports; the shape is
/// checked by [`lookup_experiment`](super::lookup_experiment), not trusted.
pub trait ExperimentProvider: Send + Sync {
    /// Lists the currently active experiments.
    ///
    /// Expected to be a JSON array of objects carrying `experiment_name`,
    /// `variation_name` and `visitor_id`. `None` means the runtime does not
    /// offer this query at all.
    fn active_experiments(&self) -> Option<Value>;
}

impl<F> ExperimentProvider for F
where
    F: Fn() -> Option<Value> + Send + Sync,
{
    fn active_experiments(&self) -> Option<Value> {
        self()
    }
}

/// Provider answering with a fixed payload
#[derive(Debug, Clone)]
pub struct StaticProvider {
    experiments: Value,
}

impl StaticProvider {
    pub fn new(experiments: Value) -> Self {
        StaticProvider { experiments }
    }

    pub fn from_records(records: &[ExperimentRecord]) -> Result<Self> {
        let experiments =
            serde_json::to_value(records).context("Failed to serialize experiment records")?;
        Ok(StaticProvider { experiments })
    }

    /// Builds a provider from raw JSON, e.g. a snapshot of the runtime's state
    pub fn from_json_str(json: &str) -> Result<Self> {
        let experiments: Value =
            serde_json::from_str(json).context("Failed to parse experiments JSON")?;
        Ok(StaticProvider { experiments })
    }
}

impl ExperimentProvider for StaticProvider {
    fn active_experiments(&self) -> Option<Value> {
        Some(self.experiments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_records_produces_array() {
        let record = ExperimentRecord::new("exp1", "varA", "v123").unwrap();
        let provider = StaticProvider::from_records(&[record]).unwrap();
        assert_eq!(
            provider.active_experiments(),
            Some(json!([{
                "experiment_name": "exp1",
                "variation_name": "varA",
                "visitor_id": "v123"
            }]))
        );
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let err = StaticProvider::from_json_str("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse experiments JSON"));
    }

    #[test]
    fn test_closure_provider() {
        let provider = || Some(json!([]));
        assert_eq!(provider.active_experiments(), Some(json!([])));
    }
}

pub mod provider;
pub mod registry;
pub mod source;

use serde::{Deserialize, Deserializer, Serialize};

use crate::url_parser::RewriteError;

pub use provider::{ExperimentProvider, StaticProvider};
pub use registry::{clear_provider, install_provider, installed_provider};
pub use source::{current_experiment, lookup_experiment};

/// One active A/B test assignment
///
/// All three fields are non-empty; [`ExperimentRecord::new`] and the source
/// adapter enforce this, so a record in hand is always usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentRecord {
    experiment_name: String,
    variation_name: String,
    visitor_id: String,
}

impl ExperimentRecord {
    pub fn new(
        experiment_name: impl Into<String>,
        variation_name: impl Into<String>,
        visitor_id: impl Into<String>,
    ) -> Result<Self, RewriteError> {
        let record = ExperimentRecord {
            experiment_name: experiment_name.into(),
            variation_name: variation_name.into(),
            visitor_id: visitor_id.into(),
        };

        for (name, value) in record.params() {
            if value.is_empty() {
                return Err(RewriteError::IncompleteExperimentData(format!("{} is empty", name)));
            }
        }
        Ok(record)
    }

    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    pub fn variation_name(&self) -> &str {
        &self.variation_name
    }

    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    /// The reserved query parameters for this record, in append order
    pub fn params(&self) -> [(&'static str, &str); 3] {
        [
            ("experiment_name", self.experiment_name.as_str()),
            ("variation_name", self.variation_name.as_str()),
            ("visitor_id", self.visitor_id.as_str()),
        ]
    }
}

/// Record as reported by the runtime. Every field may be missing; wrong
/// types fail deserialization outright.
#[derive(Debug, Deserialize)]
struct RawExperiment {
    experiment_name: Option<String>,
    variation_name: Option<String>,
    visitor_id: Option<String>,
}

impl RawExperiment {
    fn into_record(self) -> Result<ExperimentRecord, RewriteError> {
        ExperimentRecord::new(
            required(self.experiment_name, "experiment_name")?,
            required(self.variation_name, "variation_name")?,
            required(self.visitor_id, "visitor_id")?,
        )
    }
}

impl<'de> Deserialize<'de> for ExperimentRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawExperiment::deserialize(deserializer)?
            .into_record()
            .map_err(serde::de::Error::custom)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, RewriteError> {
    value.ok_or_else(|| RewriteError::IncompleteExperimentData(format!("{} is missing", field)))
}

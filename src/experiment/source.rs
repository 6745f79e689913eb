use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::url_parser::RewriteError;
use crate::utils::panic_message;

use super::{ExperimentProvider, ExperimentRecord};

/// Looks up the experiment to tag URLs with
///
/// The first listed experiment wins; concurrent experiments are not merged.
/// Provider panics are caught here and reported as
/// [`RewriteError::UnexpectedFailure`].
///
/// # Arguments
/// * `provider` - The experimentation runtime, if one is available
///
/// # Returns
/// * `Result<ExperimentRecord, RewriteError>` - The active record, or why there is none
pub fn lookup_experiment(
    provider: Option<&dyn ExperimentProvider>,
) -> Result<ExperimentRecord, RewriteError> {
    let provider = provider.ok_or(RewriteError::ProviderUnavailable)?;

    let reported = panic::catch_unwind(AssertUnwindSafe(|| provider.active_experiments()))
        .map_err(|payload| RewriteError::UnexpectedFailure(panic_message(payload.as_ref())))?
        .ok_or(RewriteError::ProviderUnavailable)?;

    let first = match reported {
        Value::Array(mut experiments) if !experiments.is_empty() => {
            if experiments.len() > 1 {
                debug!("{} active experiments, using the first", experiments.len());
            }
            experiments.swap_remove(0)
        }
        _ => return Err(RewriteError::NoActiveExperiment),
    };

    serde_json::from_value(first).map_err(|e| RewriteError::IncompleteExperimentData(e.to_string()))
}

/// Returns the active experiment, or `None` when there is nothing usable
///
/// Every failure is logged and folded into `None`. This is the adapter for
/// hosts that only want the record; the rewrite pipeline calls
/// [`lookup_experiment`] so it can report why it left a URL alone.
pub fn current_experiment(provider: Option<&dyn ExperimentProvider>) -> Option<ExperimentRecord> {
    match lookup_experiment(provider) {
        Ok(record) => {
            debug!(
                experiment = record.experiment_name(),
                variation = record.variation_name(),
                "Active experiment found"
            );
            Some(record)
        }
        Err(e) if e.is_missing_experiment() => {
            info!(kind = e.kind(), "No experiment to apply: {}", e);
            None
        }
        Err(e @ RewriteError::UnexpectedFailure(_)) => {
            error!(kind = e.kind(), "Experiment provider failed: {}", e);
            None
        }
        Err(e) => {
            warn!(kind = e.kind(), "Ignoring experiment: {}", e);
            None
        }
    }
}

use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use tracing::{error, info, instrument, trace, warn};

use crate::experiment::{installed_provider, lookup_experiment, ExperimentProvider};
use crate::utils::panic_message;

use super::error::RewriteError;
use super::url_reconstructor::merge;
use super::url_validator::validate;

/// Tags a URL with the active experiment from the process-wide provider
///
/// Returns the input unchanged if it is not an acceptable http(s) URL, if no
/// provider is installed, or if the provider has no usable experiment.
/// Never panics.
pub fn append_experiment_params(input: &str) -> String {
    let provider = installed_provider();
    append_experiment_params_with(input, provider.as_deref())
}

/// Same as [`append_experiment_params`] with an explicit provider
pub fn append_experiment_params_with(
    input: &str,
    provider: Option<&dyn ExperimentProvider>,
) -> String {
    match try_append_experiment_params(input, provider) {
        Ok(tagged) => tagged,
        Err(e) => {
            log_fallback(&e);
            input.to_string()
        }
    }
}

/// Loosely-typed entry point for hosts passing arbitrary JSON values
///
/// Strings go through [`append_experiment_params`]; anything else is
/// returned as is.
pub fn append_experiment_params_value(input: &Value) -> Value {
    match input {
        Value::String(url) => Value::String(append_experiment_params(url)),
        other => {
            log_fallback(&RewriteError::TypeMismatch);
            other.clone()
        }
    }
}

/// Runs the validate, lookup, merge pipeline and reports why it gave up
///
/// Panics raised anywhere in the pipeline are caught and returned as
/// [`RewriteError::UnexpectedFailure`].
///
/// # Arguments
/// * `input` - The candidate URL
/// * `provider` - The experimentation runtime, if one is available
///
/// # Returns
/// * `Result<String, RewriteError>` - The tagged URL, or the reason it was left alone
#[instrument(level = "debug", skip_all, fields(url = %input))]
pub fn try_append_experiment_params(
    input: &str,
    provider: Option<&dyn ExperimentProvider>,
) -> Result<String, RewriteError> {
    trace!("Starting experiment parameter rewrite");

    panic::catch_unwind(AssertUnwindSafe(|| -> Result<String, RewriteError> {
        let validated = validate(input)?;
        let experiment = lookup_experiment(provider)?;
        let tagged = merge(&validated, &experiment);
        info!(
            experiment = experiment.experiment_name(),
            variation = experiment.variation_name(),
            "Tagged URL with experiment parameters"
        );
        Ok(tagged)
    }))
    .unwrap_or_else(|payload| Err(RewriteError::UnexpectedFailure(panic_message(payload.as_ref()))))
}

/// Records why a URL was returned untouched
fn log_fallback(e: &RewriteError) {
    match e {
        RewriteError::UnexpectedFailure(_) => {
            error!(kind = e.kind(), "Returning URL unchanged after failure: {}", e)
        }
        e if e.is_missing_experiment() => {
            info!(kind = e.kind(), "Returning URL unchanged: {}", e)
        }
        _ => warn!(kind = e.kind(), "Returning URL unchanged: {}", e),
    }
}

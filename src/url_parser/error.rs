use thiserror::Error;

/// Reasons a URL is handed back untouched.
///
/// None of these ever reach the caller of
/// [`append_experiment_params`](super::append_experiment_params); they exist
/// so every fallback point can log what happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("input is not a string")]
    TypeMismatch,

    #[error("malformed URL syntax: {0}")]
    MalformedSyntax(String),

    #[error("failed to parse URL: {0}")]
    UnparsableUrl(String),

    #[error("unsupported scheme '{0}', only http and https are allowed")]
    UnsupportedScheme(String),

    #[error("invalid hostname '{0}'")]
    InvalidHostname(String),

    #[error("no experiment provider is installed")]
    ProviderUnavailable,

    #[error("no active experiment")]
    NoActiveExperiment,

    #[error("incomplete experiment data: {0}")]
    IncompleteExperimentData(String),

    #[error("unexpected failure: {0}")]
    UnexpectedFailure(String),
}

impl RewriteError {
    /// Short stable label, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            RewriteError::TypeMismatch => "type_mismatch",
            RewriteError::MalformedSyntax(_) => "malformed_syntax",
            RewriteError::UnparsableUrl(_) => "unparsable_url",
            RewriteError::UnsupportedScheme(_) => "unsupported_scheme",
            RewriteError::InvalidHostname(_) => "invalid_hostname",
            RewriteError::ProviderUnavailable => "provider_unavailable",
            RewriteError::NoActiveExperiment => "no_active_experiment",
            RewriteError::IncompleteExperimentData(_) => "incomplete_experiment_data",
            RewriteError::UnexpectedFailure(_) => "unexpected_failure",
        }
    }

    /// True for the kinds that mean "there was simply nothing to add".
    pub fn is_missing_experiment(&self) -> bool {
        matches!(
            self,
            RewriteError::ProviderUnavailable | RewriteError::NoActiveExperiment
        )
    }
}

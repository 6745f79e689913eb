//! Experiment tagging for URLs.
//!
//! The pipeline validates a candidate URL, asks the experiment provider for
//! the active assignment, and merges the reserved query parameters into the
//! URL. Any failure hands the caller's input back untouched.

pub mod error;
pub mod parser;
pub mod url_processor;
pub mod url_reconstructor;
pub mod url_validator;


pub use error::RewriteError;
pub use parser::{
    append_experiment_params, append_experiment_params_value, append_experiment_params_with,
    try_append_experiment_params,
};
pub use url_processor::RESERVED_PARAMS;
pub use url_reconstructor::merge;
pub use url_validator::{validate, ValidatedUrl};

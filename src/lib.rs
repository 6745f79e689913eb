pub mod experiment;
pub mod settings;
pub mod url_parser;
pub mod utils;

pub use experiment::{ExperimentProvider, ExperimentRecord, StaticProvider};
pub use url_parser::{
    append_experiment_params, append_experiment_params_value, append_experiment_params_with,
    RewriteError,
};

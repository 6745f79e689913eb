use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use tracing::info;

use super::ExperimentProvider;

type SharedProvider = Arc<dyn ExperimentProvider>;

// Process-wide slot for the experimentation runtime. The rewriter only reads it.
static PROVIDER: Lazy<RwLock<Option<SharedProvider>>> = Lazy::new(|| RwLock::new(None));

/// Installs the process-wide provider, replacing any previous one
pub fn install_provider(provider: SharedProvider) {
    let mut slot = PROVIDER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(provider);
    info!("Experiment provider installed");
}

/// Removes the process-wide provider
pub fn clear_provider() {
    let mut slot = PROVIDER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    if slot.take().is_some() {
        info!("Experiment provider cleared");
    }
}

/// Returns the installed provider, if any
pub fn installed_provider() -> Option<SharedProvider> {
    PROVIDER
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

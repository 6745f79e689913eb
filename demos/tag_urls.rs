use anyhow::{anyhow, Result};
use experiment_url::append_experiment_params;
use experiment_url::experiment::{current_experiment, install_provider, installed_provider};
use experiment_url::settings::RewriterConfig;
use experiment_url::utils::logger::init_logger;
use std::env;
use std::sync::Arc;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <config file> <url>...", args[0]);
        return Err(anyhow!("Missing arguments"));
    }

    let config = RewriterConfig::load(&args[1])?;
    init_logger(&config.logging)?;

    match config.static_provider()? {
        Some(provider) => install_provider(Arc::new(provider)),
        None => eprintln!("No experiments configured, URLs will be left unchanged"),
    }

    let provider = installed_provider();
    if let Some(record) = current_experiment(provider.as_deref()) {
        println!(
            "Active experiment: {} / {} for visitor {}",
            record.experiment_name(),
            record.variation_name(),
            record.visitor_id()
        );
    }

    for url in &args[2..] {
        println!("{} -> {}", url, append_experiment_params(url));
    }

    Ok(())
}

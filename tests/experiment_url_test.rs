use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use experiment_url::experiment::{clear_provider, install_provider, installed_provider};
use experiment_url::{
    append_experiment_params, append_experiment_params_value, ExperimentRecord, StaticProvider,
};
use serde_json::json;

// Tests in this file share the process-wide provider slot
static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

fn lock_registry() -> MutexGuard<'static, ()> {
    let guard = REGISTRY_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    clear_provider();
    guard
}

fn install_exp1() -> Result<()> {
    let record = ExperimentRecord::new("exp1", "varA", "v123")?;
    install_provider(Arc::new(StaticProvider::from_records(&[record])?));
    Ok(())
}

#[test]
fn test_without_provider_input_is_returned() {
    let _guard = lock_registry();

    assert!(installed_provider().is_none());
    assert_eq!(append_experiment_params("example.com/offer"), "example.com/offer");
}

#[test]
fn test_installed_provider_is_used() -> Result<()> {
    let _guard = lock_registry();
    install_exp1()?;

    assert_eq!(
        append_experiment_params("https://example.com/offer?foo=bar"),
        "https://example.com/offer?foo=bar&experiment_name=exp1&variation_name=varA&visitor_id=v123"
    );

    clear_provider();
    assert_eq!(
        append_experiment_params("https://example.com/offer?foo=bar"),
        "https://example.com/offer?foo=bar"
    );
    Ok(())
}

#[test]
fn test_installing_again_replaces_provider() -> Result<()> {
    let _guard = lock_registry();
    install_exp1()?;
    install_provider(Arc::new(StaticProvider::from_json_str(
        r#"[{"experiment_name":"exp2","variation_name":"varB","visitor_id":"v9"}]"#,
    )?));

    assert_eq!(
        append_experiment_params("example.com"),
        "example.com?experiment_name=exp2&variation_name=varB&visitor_id=v9"
    );

    clear_provider();
    Ok(())
}

#[test]
fn test_json_entry_point() -> Result<()> {
    let _guard = lock_registry();
    install_exp1()?;

    let non_strings = [
        json!(null),
        json!(42),
        json!(true),
        json!(["example.com"]),
        json!({"url": "example.com"}),
    ];
    for value in non_strings {
        assert_eq!(append_experiment_params_value(&value), value);
    }

    assert_eq!(
        append_experiment_params_value(&json!("example.com/offer")),
        json!("example.com/offer?experiment_name=exp1&variation_name=varA&visitor_id=v123")
    );
    assert_eq!(append_experiment_params_value(&json!("not a url")), json!("not a url"));

    clear_provider();
    Ok(())
}

#[test]
fn test_concurrent_callers_share_provider() -> Result<()> {
    let _guard = lock_registry();
    install_exp1()?;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || append_experiment_params(&format!("example.com/item/{}", i)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let tagged = handle.join().expect("rewrite thread panicked");
        assert_eq!(
            tagged,
            format!(
                "example.com/item/{}?experiment_name=exp1&variation_name=varA&visitor_id=v123",
                i
            )
        );
    }

    clear_provider();
    Ok(())
}

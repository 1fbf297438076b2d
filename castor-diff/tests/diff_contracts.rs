use castor_diff::{DiffPolicy, Mismatch, SettingsDiffer};
use serde_json::json;

fn snapshot_differ() -> SettingsDiffer {
    SettingsDiffer::new(
        DiffPolicy::new()
            .with_sensitive(["api_key", "password", "wallet_password"])
            .with_skipped_path("client_settings.client"),
    )
}

#[test]
fn password_omitted_by_uploader_is_inherited() {
    let differ = snapshot_differ();
    let current = json!({"a": 1, "password": "p1"});
    let mut uploaded = json!({"a": 2});

    let report = differ.diff(&current, &mut uploaded);

    assert_eq!(report.value_mismatch.len(), 1);
    assert_eq!(
        report.value_mismatch["a"],
        Mismatch {
            current: json!(1),
            uploaded: json!(2)
        }
    );
    assert!(report.missing_in_uploaded.is_empty());
    assert!(report.missing_in_current.is_empty());
    assert!(report.override_on_upload.is_empty());
    assert_eq!(uploaded["password"], json!("p1"));
}

#[test]
fn exported_snapshot_without_secrets_reimports_cleanly() {
    let differ = snapshot_differ();
    let current = json!({
        "client_settings": {"client": "default", "ll_model": {"model": "openai/gpt-4o-mini"}},
        "model_configs": [
            {"id": "gpt-4o-mini", "type": "ll", "provider": "openai", "api_key": "sk-live"}
        ],
        "database_configs": [
            {"alias": "DEFAULT", "user": "scott", "password": "tiger", "wallet_password": "w"}
        ]
    });

    let mut exported = current.clone();
    differ.policy().strip_sensitive(&mut exported);
    exported["client_settings"]["client"] = json!("someone-else");

    let report = differ.diff(&current, &mut exported);

    assert!(report.is_empty(), "unexpected diff: {report:?}");
    assert_eq!(exported["model_configs"][0]["api_key"], json!("sk-live"));
    assert_eq!(exported["database_configs"][0]["wallet_password"], json!("w"));
}

#[test]
fn report_serializes_with_bucket_names() {
    let differ = snapshot_differ();
    let current = json!({"vector_search": {"top_k": 4}, "model_configs": []});
    let mut uploaded = json!({
        "vector_search": {"top_k": 8},
        "model_configs": [{"id": "x", "api_key": "k"}]
    });

    let report = differ.diff(&current, &mut uploaded);
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(
        value,
        json!({
            "Value Mismatch": {"vector_search.top_k": {"current": 4, "uploaded": 8}},
            "Missing in Current": {"model_configs[0]": {"id": "x", "api_key": "k"}}
        })
    );
}

#[test]
fn reordered_array_inherits_secrets_by_position() {
    let differ = snapshot_differ();
    let current = json!({"model_configs": [
        {"id": "a", "api_key": "ka"},
        {"id": "b", "api_key": "kb"}
    ]});
    let mut uploaded = json!({"model_configs": [{"id": "b"}, {"id": "a"}]});

    let report = differ.diff(&current, &mut uploaded);

    // Elements are matched by index, not identity.
    assert_eq!(uploaded["model_configs"][0]["api_key"], json!("ka"));
    assert_eq!(uploaded["model_configs"][1]["api_key"], json!("kb"));
    assert_eq!(report.len(), 2);
    assert_eq!(
        report.value_mismatch["model_configs[0].id"],
        Mismatch {
            current: json!("a"),
            uploaded: json!("b")
        }
    );
    assert!(report.value_mismatch.contains_key("model_configs[1].id"));
}

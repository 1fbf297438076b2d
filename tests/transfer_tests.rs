use castor::config::{BootstrapConfig, PersistenceConfig};
use castor::db::PersistenceGateway;
use castor::{AppContext, CastorError, ImportOutcome};
use castor_diff::REDACTED_MARKER;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_sqlite_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "castor-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

fn no_host_oci() -> BootstrapConfig {
    BootstrapConfig {
        oci_config_file: Some(PathBuf::from("/nonexistent/castor/oci/config")),
    }
}

async fn context_with_key(gateway: PersistenceGateway) -> AppContext {
    let env: HashMap<String, String> =
        [("OPENAI_API_KEY".to_string(), "sk-current".to_string())].into();
    AppContext::bootstrap(gateway, &no_host_oci(), &env).await
}

#[tokio::test]
async fn compare_reports_uploaded_secret_as_redacted_override() {
    let ctx = context_with_key(PersistenceGateway::disabled()).await;
    let mut uploaded = ctx.export_snapshot("default", false).unwrap();
    uploaded["database_configs"][0]["password"] = json!("uploaded-secret");

    let report = ctx.compare_snapshot("default", &uploaded).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(
        report.override_on_upload["database_configs[0].password"],
        json!(REDACTED_MARKER)
    );
    let rendered = serde_json::to_string(&report).unwrap();
    assert!(!rendered.contains("uploaded-secret"));
    assert!(rendered.contains("Override on Upload"));
    assert!(!rendered.contains("Value Mismatch"));
}

#[tokio::test]
async fn import_applies_to_target_client_only_and_persists() {
    let cfg = PersistenceConfig {
        database_url: format!("sqlite:{}", unique_sqlite_path("import").display()),
        ..Default::default()
    };
    let ctx = context_with_key(PersistenceGateway::connect(&cfg).await).await;
    ctx.settings.create("abc").unwrap();

    let mut uploaded = ctx.export_snapshot("abc", false).unwrap();
    uploaded["client_settings"]["ll_model"]["temperature"] = json!(0.2);
    uploaded["client_settings"]["client"] = json!("someone-else");

    let outcome = ctx.import_snapshot("abc", uploaded).await.unwrap();

    let ImportOutcome::Applied { report, persisted } = outcome else {
        panic!("expected an applied import");
    };
    assert!(persisted);
    assert_eq!(
        report
            .value_mismatch
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        vec!["client_settings.ll_model.temperature"]
    );
    let abc = ctx.settings.get("abc").unwrap();
    assert_eq!(abc.client, "abc");
    assert!((abc.ll_model.temperature - 0.2).abs() < f64::EPSILON);
    let default = ctx.settings.get("default").unwrap();
    assert!((default.ll_model.temperature - 1.0).abs() < f64::EPSILON);

    // Secrets omitted from the export were inherited, not wiped
    let openai = ctx.models.get_by_model_key("openai/gpt-4o-mini").unwrap();
    assert_eq!(openai.api_key.as_deref(), Some("sk-current"));
    ctx.shutdown().await;
}

#[tokio::test]
async fn import_for_unknown_client_is_not_found() {
    let ctx = context_with_key(PersistenceGateway::disabled()).await;
    let uploaded = ctx.export_snapshot("default", false).unwrap();

    assert!(matches!(
        ctx.import_snapshot("ghost", uploaded).await,
        Err(CastorError::NotFound { .. })
    ));
}

#[tokio::test]
async fn malformed_upload_is_rejected_before_applying() {
    let ctx = context_with_key(PersistenceGateway::disabled()).await;
    let before = ctx.models.list();
    let mut uploaded = ctx.export_snapshot("default", false).unwrap();
    uploaded["model_configs"][0]["type"] = json!("hologram");

    assert!(matches!(
        ctx.import_snapshot("default", uploaded).await,
        Err(CastorError::JsonError(_))
    ));
    assert_eq!(ctx.models.list(), before);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn import_debug_log_never_contains_secret_values() {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let ctx = context_with_key(PersistenceGateway::disabled()).await;
    let mut uploaded = ctx.export_snapshot("default", true).unwrap();
    uploaded["model_configs"][0]["api_key"] = json!("sk-uploaded-secret");
    uploaded["model_configs"].as_array_mut().unwrap().push(json!({
        "id": "extra-model",
        "type": "ll",
        "provider": "openai",
        "api_key": "sk-tail-secret"
    }));

    ctx.import_snapshot("default", uploaded).await.unwrap();

    let logs = buffer.contents();
    assert!(logs.contains("Snapshot diff"), "diff was not logged: {logs}");
    assert!(logs.contains("extra-model"));
    for secret in ["sk-current", "sk-uploaded-secret", "sk-tail-secret"] {
        assert!(!logs.contains(secret), "{secret} leaked into logs");
    }
}

#[tokio::test]
async fn import_keeps_registry_liveness_flags() {
    let ctx = context_with_key(PersistenceGateway::disabled()).await;
    let mut uploaded = ctx.export_snapshot("default", false).unwrap();
    uploaded["database_configs"][0]["usable"] = json!(true);
    uploaded["oci_configs"][0]["usable"] = json!(true);
    uploaded["database_configs"][0]["dsn"] = json!("db.example.com:1521/FREEPDB1");

    ctx.import_snapshot("default", uploaded).await.unwrap();

    let db = ctx.databases.list().remove(0);
    assert_eq!(db.dsn.as_deref(), Some("db.example.com:1521/FREEPDB1"));
    assert!(!db.usable);
    assert!(!ctx.oci.list()[0].usable);
}

#[tokio::test]
async fn upload_without_client_identity_imports() {
    let ctx = context_with_key(PersistenceGateway::disabled()).await;
    ctx.settings.create("abc").unwrap();
    let mut uploaded = ctx.export_snapshot("abc", false).unwrap();
    uploaded["client_settings"]
        .as_object_mut()
        .unwrap()
        .remove("client");

    assert!(ctx.compare_snapshot("abc", &uploaded).unwrap().is_empty());

    uploaded["client_settings"]["ll_model"]["max_tokens"] = json!(777);
    let outcome = ctx.import_snapshot("abc", uploaded).await.unwrap();

    assert!(matches!(outcome, ImportOutcome::Applied { .. }));
    let abc = ctx.settings.get("abc").unwrap();
    assert_eq!(abc.client, "abc");
    assert_eq!(abc.ll_model.max_tokens, 777);
}

#[tokio::test]
async fn host_oci_profile_accepted_at_boot_does_not_block_import() {
    let env: HashMap<String, String> =
        [("OCI_CLI_AUTH".to_string(), "security_token".to_string())].into();
    let ctx = AppContext::bootstrap(PersistenceGateway::disabled(), &no_host_oci(), &env).await;

    let mut uploaded = ctx.export_snapshot("default", false).unwrap();
    uploaded["client_settings"]["ll_model"]["max_tokens"] = json!(512);
    let outcome = ctx.import_snapshot("default", uploaded.clone()).await.unwrap();
    assert!(matches!(outcome, ImportOutcome::Applied { .. }));
    assert_eq!(ctx.settings.get("default").unwrap().ll_model.max_tokens, 512);

    // Editing that profile still has to produce a valid one
    uploaded["oci_configs"][0]["region"] = json!("us-phoenix-1");
    assert!(matches!(
        ctx.import_snapshot("default", uploaded).await,
        Err(CastorError::Validation(_))
    ));
}

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use yummy::api::HttpBackend;
use yummy::session::{MemorySessionStore, Session, SessionContext};

#[allow(dead_code)]
pub fn memory_session(access: Option<&str>) -> Arc<SessionContext> {
    let ctx = SessionContext::new(Arc::new(MemorySessionStore::new()));
    if let Some(access) = access {
        ctx.establish(&Session::new(access).with_refresh("refresh-token"))
            .expect("failed to establish session");
    }
    Arc::new(ctx)
}

#[allow(dead_code)]
pub fn http_backend(base_url: &str) -> Arc<HttpBackend> {
    Arc::new(
        HttpBackend::new(
            url::Url::parse(base_url).expect("valid url"),
            Duration::from_secs(5),
        )
        .expect("failed to build backend"),
    )
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn profile_json(first_name: &str, image: &str) -> serde_json::Value {
    serde_json::json!({
        "first_name": first_name,
        "last_name": "Rossi",
        "phone_number": "0912",
        "image": image,
    })
}

#[allow(dead_code)]
pub fn reservation_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "date": "2024-05-17",
        "time": "19:30:00",
        "people": 4,
        "created_date": "2024-05-01T12:05:09.123456Z",
        "email": "ana@example.com",
        "phone": "09120000000",
    })
}

//! Test utilities for Yummy
//!
//! Fixtures shared by the unit tests: temporary directories, in-memory
//! sessions, backend payloads, and error assertions.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime};
use tempfile::TempDir;

use crate::api::{ProfileResponse, Reservation};
use crate::config::Config;
use crate::session::{MemorySessionStore, Session, SessionContext};

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a session context backed by memory
///
/// # Arguments
///
/// * `access` - Access credential to store, or `None` for a visitor
pub fn memory_session(access: Option<&str>) -> Arc<SessionContext> {
    let ctx = SessionContext::new(Arc::new(MemorySessionStore::new()));
    if let Some(access) = access {
        ctx.establish(&Session::new(access).with_refresh("refresh-token"))
            .expect("Failed to establish test session");
    }
    Arc::new(ctx)
}

/// Create a reservation with fixed contents and the given id
pub fn reservation(id: i64) -> Reservation {
    Reservation {
        id,
        date: NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date"),
        time: NaiveTime::from_hms_opt(19, 30, 0).expect("valid time"),
        people: 4,
        created_date: DateTime::parse_from_rfc3339("2024-05-01T12:05:09+00:00")
            .expect("valid timestamp"),
        email: "ana@example.com".to_string(),
        phone: Some("09120000000".to_string()),
    }
}

/// Create a profile response with the given first name and image
pub fn profile_response(first_name: &str, image: Option<&str>) -> ProfileResponse {
    ProfileResponse {
        first_name: first_name.to_string(),
        last_name: "Rossi".to_string(),
        phone_number: "0912".to_string(),
        image: image.map(str::to_string),
    }
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
api:
  base_url: http://127.0.0.1:9000
  timeout_seconds: 10

session:
  backend: memory

profile:
  default_image_sentinel: default.png

verification:
  redirect_seconds: 3
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::YummyError;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_memory_session() {
        assert!(memory_session(Some("tok")).is_authenticated());
        assert!(!memory_session(None).is_authenticated());
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(YummyError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_yaml() {
        let config: Config = serde_yaml::from_str(&test_config_yaml()).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert!(config.validate().is_ok());
        assert!(test_config().validate().is_ok());
    }
}

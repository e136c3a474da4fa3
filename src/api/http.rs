//! HTTP implementation of [`Backend`]
//!
//! Every request carries `Authorization: Bearer <access>`. Responses are
//! classified before decoding:
//!
//! - `2xx` -- body decoded as JSON
//! - `401`/`403` -- [`YummyError::Unauthorized`]
//! - anything else -- [`YummyError::Api`] with the (truncated) body
//!
//! Transport failures surface as [`YummyError::Http`]. No request is
//! retried; profile updates resend the file on every call.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    AccountProfile, Backend, ProfileResponse, ProfileUpdate, Reservation, ACCOUNT_PROFILE_PATH,
    MY_PROFILE_PATH, USER_RESERVATIONS_PATH,
};
use crate::config::ApiConfig;
use crate::error::{Result, YummyError};

/// Longest error body kept in [`YummyError::Api`].
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed client for a Yummy server.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use url::Url;
/// use yummy::api::HttpBackend;
///
/// let backend = HttpBackend::new(
///     Url::parse("http://127.0.0.1:8000").unwrap(),
///     Duration::from_secs(30),
/// )
/// .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url`.
    ///
    /// A trailing slash is added to the base path so endpoint paths join
    /// under it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`YummyError::Http`] if the TLS backend fails to initialize.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(YummyError::Http)?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Creates a client from the `api` section of the configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| YummyError::Config(format!("Invalid api.base_url: {}", e)))?;
        Self::new(base_url, Duration::from_secs(config.timeout_seconds))
    }

    /// Backend origin (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| YummyError::Config(format!("Invalid endpoint {}: {}", path, e)).into())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, access: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(method = "GET", url = %url, "Backend request");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(access)
            .send()
            .await
            .map_err(YummyError::Http)?;

        decode(response).await
    }
}

/// Classifies the status and decodes a JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        tracing::warn!(status = status.as_u16(), "Backend rejected access credential");
        return Err(YummyError::Unauthorized(status.as_u16()).into());
    }

    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(YummyError::Api {
            status: status.as_u16(),
            body,
        }
        .into());
    }

    let value = response.json::<T>().await.map_err(YummyError::Http)?;
    Ok(value)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_profile(&self, access: &str) -> Result<ProfileResponse> {
        self.get_json(MY_PROFILE_PATH, access).await
    }

    async fn update_profile(&self, access: &str, update: ProfileUpdate) -> Result<ProfileResponse> {
        let url = self.endpoint(MY_PROFILE_PATH)?;
        tracing::debug!(
            method = "PATCH",
            url = %url,
            parts = ?update.part_names(),
            "Backend request"
        );

        let form = update.into_form()?;
        let response = self
            .http_client
            .patch(url)
            .bearer_auth(access)
            .multipart(form)
            .send()
            .await
            .map_err(YummyError::Http)?;

        decode(response).await
    }

    async fn list_reservations(&self, access: &str) -> Result<Vec<Reservation>> {
        self.get_json(USER_RESERVATIONS_PATH, access).await
    }

    async fn fetch_account(&self, access: &str) -> Result<AccountProfile> {
        self.get_json(ACCOUNT_PROFILE_PATH, access).await
    }
}

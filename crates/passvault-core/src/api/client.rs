//! API client for the vault backend.
//!
//! Every request reads the shared [`Credential`] at send time, so a token
//! detached by the session layer is never sent again, even by clones held
//! in background tasks.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::password::Credentials;
use crate::models::{LoginResponse, NewPasswordEntry, PasswordEntry, PasswordUpdate, UserResponse};

use super::{ApiError, Credential};

// ============================================================================
// Constants
// ============================================================================

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the vault backend.
/// Clone is cheap - reqwest::Client and the credential slot are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credential: Credential,
}

impl ApiClient {
    /// Create a new API client that attaches `credential` to its requests
    pub fn new(base_url: &str, credential: Credential) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request, attaching the current credential when `authed`.
    fn request(&self, method: Method, path: &str, authed: bool) -> Result<RequestBuilder, ApiError> {
        let builder = self
            .client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json");

        if !authed {
            return Ok(builder);
        }

        match self.credential.bearer() {
            Some(bearer) => Ok(builder.header(header::AUTHORIZATION, bearer)),
            None => {
                debug!(path, "No credential attached, refusing authenticated request");
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check_response(builder.send().await?).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        builder: RequestBuilder,
        body: &B,
    ) -> Result<T, ApiError> {
        Self::send(builder.json(body)).await
    }

    // ===== Account =====

    /// Exchange username and password for a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let builder = self.request(Method::POST, "/login", false)?;
        let response: LoginResponse =
            Self::send_json(builder, &Credentials { username, password }).await?;
        Ok(response.token)
    }

    /// Create a new account
    pub async fn register(&self, username: &str, password: &str) -> Result<UserResponse, ApiError> {
        let builder = self.request(Method::POST, "/register", false)?;
        Self::send_json(builder, &Credentials { username, password }).await
    }

    // ===== Password entries =====

    pub async fn list_passwords(&self) -> Result<Vec<PasswordEntry>, ApiError> {
        let builder = self.request(Method::GET, "/passwords", true)?;
        Self::send(builder).await
    }

    pub async fn create_password(&self, entry: &NewPasswordEntry) -> Result<PasswordEntry, ApiError> {
        let builder = self.request(Method::POST, "/passwords", true)?;
        Self::send_json(builder, entry).await
    }

    pub async fn update_password(
        &self,
        id: &str,
        update: &PasswordUpdate,
    ) -> Result<PasswordEntry, ApiError> {
        let builder = self.request(Method::PUT, &format!("/passwords/{}", id), true)?;
        Self::send_json(builder, update).await
    }

    pub async fn delete_password(&self, id: &str) -> Result<PasswordEntry, ApiError> {
        let builder = self.request(Method::DELETE, &format!("/passwords/{}", id), true)?;
        Self::send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(credential: &Credential) -> ApiClient {
        ApiClient::new("http://127.0.0.1:3000/", credential.clone()).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = client(&Credential::new());
        assert_eq!(api.base_url(), "http://127.0.0.1:3000");
        assert_eq!(api.url("/passwords"), "http://127.0.0.1:3000/passwords");
    }

    #[test]
    fn test_authenticated_request_carries_current_token() {
        let credential = Credential::new();
        let api = client(&credential);
        credential.attach("abc");

        let request = api
            .request(Method::GET, "/passwords", true)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn test_detached_credential_refuses_authenticated_request() {
        let credential = Credential::new();
        let api = client(&credential);
        let background_clone = api.clone();
        credential.attach("abc");
        credential.detach();

        assert!(matches!(
            background_clone.request(Method::GET, "/passwords", true),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_login_request_has_no_authorization_header() {
        let credential = Credential::new();
        let api = client(&credential);
        credential.attach("stale");

        let request = api
            .request(Method::POST, "/login", false)
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
    }
}

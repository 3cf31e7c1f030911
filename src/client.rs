//! Snyk API client.
//!
//! Low-level HTTP client that handles authentication and raw requests
//! against both Snyk API surfaces: the v1 API (project detail, settings,
//! org listing) and the cursor-paginated REST API (targets, projects).
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::error::{Result, SnykError};

const DEFAULT_V1_URL: &str = "https://api.snyk.io/v1/";
const DEFAULT_REST_URL: &str = "https://api.snyk.io/rest/";
const USER_AGENT: &str = concat!("snyk-export/", env!("CARGO_PKG_VERSION"));

/// REST API version sent with every cursor-paginated request.
pub const REST_VERSION: &str = "2024-10-15";

/// The token shipped in example_secrets.sh; treated the same as no token.
const PLACEHOLDER_TOKEN: &str = "BD832F91-A742-49E9-BC1E-411E0C8743EA";

/// Attempts per request (1 initial + retries) for transport and 5xx failures.
const DEFAULT_ATTEMPTS: u32 = 2;

/// Low-level Snyk API client.
///
/// Holds the API token and both base URLs. Entity-specific operations are
/// implemented via the `Get` and `List` traits on model types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use snyk_export::SnykClient;
///
/// # fn example() -> snyk_export::Result<()> {
/// // Create from environment variables
/// let client = SnykClient::from_env()?;
///
/// // Or configure manually
/// let client = SnykClient::new(
///     "your-api-token",
///     "https://api.snyk.io/v1/",
///     "https://api.snyk.io/rest/",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SnykClient {
    http: Client,
    v1_base: Arc<Url>,
    rest_base: Arc<Url>,
    token: String,
    attempts: u32,
}

impl std::fmt::Debug for SnykClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnykClient")
            .field("v1_base", &self.v1_base.as_str())
            .field("rest_base", &self.rest_base.as_str())
            .finish_non_exhaustive()
    }
}

impl SnykClient {
    /// Create a client from environment variables.
    ///
    /// Uses `SNYK_TOKEN` for authentication and optionally `SNYK_API_V1_URL`
    /// and `SNYK_API_REST_URL` for the base URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if `SNYK_TOKEN` is not set, empty, or still the
    /// placeholder value from example_secrets.sh.
    pub fn from_env() -> Result<Self> {
        let token = env::var("SNYK_TOKEN").map_err(|_| {
            SnykError::ConfigMissing("SNYK_TOKEN environment variable not set".to_string())
        })?;

        let v1_base = env::var("SNYK_API_V1_URL").unwrap_or_else(|_| DEFAULT_V1_URL.to_string());
        let rest_base =
            env::var("SNYK_API_REST_URL").unwrap_or_else(|_| DEFAULT_REST_URL.to_string());

        Self::new(&token, &v1_base, &rest_base)
    }

    /// Create a new client with the provided token and base URLs.
    ///
    /// The token is validated here so that a missing or placeholder
    /// credential fails before any network call.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the placeholder, or if a
    /// base URL is invalid.
    pub fn new(token: &str, v1_base: &str, rest_base: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(SnykError::ConfigMissing("SNYK_TOKEN is empty".to_string()));
        }
        if token == PLACEHOLDER_TOKEN {
            return Err(SnykError::ConfigMissing(
                "SNYK_TOKEN is still the placeholder from example_secrets.sh".to_string(),
            ));
        }

        let v1_base = Url::parse(&ensure_trailing_slash(v1_base))?;
        let rest_base = Url::parse(&ensure_trailing_slash(rest_base))?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(SnykError::HttpError)?;

        Ok(Self {
            http,
            v1_base: Arc::new(v1_base),
            rest_base: Arc::new(rest_base),
            token: token.to_string(),
            attempts: DEFAULT_ATTEMPTS,
        })
    }

    /// Get the v1 API base URL.
    pub fn v1_base(&self) -> &Url {
        &self.v1_base
    }

    /// Get the REST API base URL.
    pub fn rest_base(&self) -> &Url {
        &self.rest_base
    }

    /// Make a GET request against the v1 API.
    #[tracing::instrument(skip(self))]
    pub async fn get_v1(&self, path: &str) -> Result<Response> {
        let url = self.v1_base.join(path)?;
        let request = self.http.get(url).header(AUTHORIZATION, self.auth_header());

        let response = self.execute(request).await?;
        Self::check_response(response).await
    }

    /// Make a GET request against the REST API with query parameters.
    ///
    /// The REST `version` parameter is appended automatically.
    #[tracing::instrument(skip(self, params))]
    pub async fn get_rest(&self, path: &str, params: &[(&str, String)]) -> Result<Response> {
        let url = self.rest_base.join(path)?;
        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.auth_header())
            .query(params)
            .query(&[("version", REST_VERSION)]);

        let response = self.execute(request).await?;
        Self::check_response(response).await
    }

    /// Follow a pagination link from a REST response verbatim.
    ///
    /// Links are relative to the REST base even when they lead with `/`,
    /// and already carry the `version` and cursor parameters, so nothing
    /// is appended.
    #[tracing::instrument(skip(self))]
    pub async fn get_rest_link(&self, link: &str) -> Result<Response> {
        let url = self.rest_base.join(link.strip_prefix('/').unwrap_or(link))?;
        let request = self.http.get(url).header(AUTHORIZATION, self.auth_header());

        let response = self.execute(request).await?;
        Self::check_response(response).await
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.token)
    }

    /// Send a request, retrying transport errors and 5xx responses up to
    /// the configured attempt count.
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut attempt = 1;
        loop {
            let cloned = request.try_clone();
            let result = match cloned {
                Some(req) => req.send().await,
                // Non-cloneable requests (streaming bodies) get one shot.
                None => return request.send().await.map_err(SnykError::HttpError),
            };

            match result {
                Ok(response) if response.status().is_server_error() && attempt < self.attempts => {
                    tracing::warn!(
                        status = %response.status(),
                        attempt,
                        "server error, retrying"
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.attempts => {
                    tracing::warn!(error = %e, attempt, "transport error, retrying");
                }
                Err(e) => return Err(SnykError::HttpError(e)),
            }
            attempt += 1;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(SnykError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(SnykError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Try to parse as JSON and extract message field
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        body
    }
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug_redacts_token() {
        let client = SnykClient::new(
            "test-token",
            "https://api.snyk.io/v1",
            "https://api.snyk.io/rest",
        )
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("SnykClient"));
        assert!(debug.contains("v1_base"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 =
            SnykClient::new("token", "https://api.snyk.io/v1", "https://api.snyk.io/rest").unwrap();
        let client2 = SnykClient::new(
            "token",
            "https://api.snyk.io/v1/",
            "https://api.snyk.io/rest/",
        )
        .unwrap();
        assert_eq!(client1.v1_base().as_str(), client2.v1_base().as_str());
        assert_eq!(client1.rest_base().as_str(), client2.rest_base().as_str());
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = SnykClient::new("", DEFAULT_V1_URL, DEFAULT_REST_URL).unwrap_err();
        assert!(matches!(err, SnykError::ConfigMissing(_)));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = SnykClient::new(PLACEHOLDER_TOKEN, DEFAULT_V1_URL, DEFAULT_REST_URL).unwrap_err();
        assert!(matches!(err, SnykError::ConfigMissing(_)));
        assert!(err.to_string().contains("placeholder"));
    }
}

pub mod types;

pub use types::{PrState, PullRequestSummary, StatsResponse, UserData};

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Malformed profile payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No profile for {0}")]
    NotFound(String),
}

/// Read access to the backend's per-user stats endpoint.
/// Implementations must be Send + Sync so fetches can run on spawned tasks.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Fetch `{ user, stats }` for `username`. Any transport failure or
    /// non-success status is an error; the error payload is not inspected.
    async fn user_stats(&self, username: &str) -> Result<StatsResponse, ApiError>;
}

/// Fetch and merge a user's profile into [`UserData`].
pub async fn fetch_user_data<A>(api: &A, username: &str) -> Result<UserData, ApiError>
where
    A: StatsApi + ?Sized,
{
    let response = api.user_stats(username).await?;
    let data = response.into_user_data()?;
    debug!(username = %username, prs = data.prs.len(), "merged profile payload");
    Ok(data)
}

/// [`StatsApi`] backed by `reqwest` against a live backend.
#[derive(Debug, Clone)]
pub struct HttpStatsApi {
    client: reqwest::Client,
    base_url: reqwest::Url,
    token: Option<String>,
}

impl HttpStatsApi {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        token: Option<String>,
    ) -> Result<Self, ApiError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// `{base}/users/stats/{username}`, with the username encoded as one path segment.
    pub fn stats_url(&self, username: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["users", "stats", username]);
        Ok(url)
    }
}

#[async_trait]
impl StatsApi for HttpStatsApi {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn user_stats(&self, username: &str) -> Result<StatsResponse, ApiError> {
        let url = self.stats_url(username)?;
        debug!(url = %url, "requesting user stats");

        let mut request = self
            .client
            .get(url)
            .header("User-Agent", "profile-view")
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        debug!(status = %response.status(), "received user stats");

        let payload = response.json::<StatsResponse>().await?;
        Ok(payload)
    }
}

/// [`StatsApi`] serving canned profiles from an in-memory table.
/// Backs the `--mock` demo mode; unknown usernames fail like a 404.
#[derive(Debug, Clone, Default)]
pub struct FixtureStatsApi {
    profiles: HashMap<String, Value>,
}

impl FixtureStatsApi {
    /// Parse a JSON object of `username -> { user, stats }`.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        let profiles: Map<String, Value> = serde_json::from_str(raw)?;
        Ok(Self {
            profiles: profiles.into_iter().collect(),
        })
    }

    /// The built-in demo profiles.
    pub fn demo() -> Result<Self, ApiError> {
        Self::from_json(include_str!("../../tests/fixtures/demo_profiles.json"))
    }
}

#[async_trait]
impl StatsApi for FixtureStatsApi {
    async fn user_stats(&self, username: &str) -> Result<StatsResponse, ApiError> {
        let profile = self
            .profiles
            .get(username)
            .ok_or_else(|| ApiError::NotFound(username.to_string()))?;
        Ok(serde_json::from_value(profile.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on a loopback port.
    /// Returns the base URL and a handle resolving to the request line received.
    async fn one_shot_server(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    const ALICE: &str = r#"{"user":{"name":"Alice","username":"alice","avatar":"a.png","bio":"hi"},"stats":{"points":10,"mergedPRs":2,"repositories":3,"followers":4,"following":5,"prs":[{"title":"Fix bug","url":"/pr/1","state":"merged"}]}}"#;

    #[test]
    fn test_stats_url() {
        let api = HttpStatsApi::new(reqwest::Client::new(), "https://backend.example/api/", None)
            .unwrap();
        assert_eq!(
            api.stats_url("alice").unwrap().as_str(),
            "https://backend.example/api/users/stats/alice"
        );
    }

    #[test]
    fn test_stats_url_encodes_username() {
        let api =
            HttpStatsApi::new(reqwest::Client::new(), "https://backend.example", None).unwrap();
        let url = api.stats_url("a/b c").unwrap();
        assert_eq!(url.path(), "/users/stats/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpStatsApi::new(reqwest::Client::new(), "nope", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_http_fetch_success() {
        let (base, server) = one_shot_server("200 OK", ALICE).await;
        let api = HttpStatsApi::new(reqwest::Client::new(), &base, None).unwrap();

        let data = fetch_user_data(&api, "alice").await.unwrap();
        assert_eq!(data.name, "Alice");
        assert_eq!(data.points, serde_json::json!(10));

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /users/stats/alice "));
    }

    #[tokio::test]
    async fn test_http_fetch_not_found_is_error() {
        let (base, server) = one_shot_server("404 Not Found", r#"{"message":"no such user"}"#).await;
        let api = HttpStatsApi::new(reqwest::Client::new(), &base, None).unwrap();

        let err = fetch_user_data(&api, "ghost").await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_fetch_malformed_is_error() {
        let (base, server) = one_shot_server("200 OK", r#"{"user":{"name":"Bob"},"stats":{}}"#).await;
        let api = HttpStatsApi::new(reqwest::Client::new(), &base, None).unwrap();

        let err = fetch_user_data(&api, "bob").await.unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fixture_api() {
        let api = FixtureStatsApi::demo().unwrap();
        let data = fetch_user_data(&api, "alice").await.unwrap();
        assert_eq!(data.name, "Alice");
        assert!(matches!(
            api.user_stats("ghost").await,
            Err(ApiError::NotFound(_))
        ));
    }
}

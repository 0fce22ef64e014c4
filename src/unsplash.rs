//! Thin client for the Unsplash HTTP API.
//!
//! Covers the four calls the bot needs: photo search, like, unlike and the
//! OAuth code-for-token exchange, plus building the authorize URL users are
//! sent to. Search is the only call that gets retried; authorization codes
//! are single-use, so the token exchange is issued exactly once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::{header, Client, Method, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BotError;

const API_BASE: &str = "https://api.unsplash.com";
const OAUTH_BASE: &str = "https://unsplash.com";

/// Out-of-band redirect target: Unsplash shows the code on a page for the
/// user to copy instead of redirecting anywhere.
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const AUTH_SCOPE: &str = "public+write_likes+write_followers";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Extra attempts after the first failed search request.
const SEARCH_RETRIES: u32 = 2;
const RETRY_BASE_DELAY_MS: u64 = 250;

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: u32,
    pub total_pages: u32,
    pub results: Vec<Photo>,
}

/// A photo as served by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub color: Option<String>,
    #[serde(default)]
    pub likes: u32,
    /// Only accurate at fetch time; like/unlike presses update the button
    /// row optimistically without re-fetching.
    #[serde(default)]
    pub liked_by_user: bool,
    pub description: Option<String>,
    pub user: PhotoAuthor,
    pub urls: PhotoUrls,
    #[serde(default)]
    pub links: PhotoLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAuthor {
    pub name: String,
    pub username: String,
    pub links: AuthorLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorLinks {
    /// Profile page, e.g. `https://unsplash.com/@username`.
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoLinks {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub download: String,
}

/// Returned by the OAuth token endpoint on a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub created_at: i64,
}

/// Error envelopes the service uses: `{"errors": […]}` from the API,
/// `{"error", "error_description"}` from the OAuth endpoint.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        self.errors
            .into_iter()
            .next()
            .or(self.error_description)
            .or(self.error)
    }
}

/// HTTP client plus application credentials.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: Client,
    access_key: String,
    secret_key: String,
    api_base: String,
    oauth_base: String,
}

impl UnsplashClient {
    pub fn new(access_key: String, secret_key: String) -> Result<Self, BotError> {
        Self::with_endpoints(access_key, secret_key, API_BASE, OAUTH_BASE)
    }

    /// Builds a client against custom base URLs. Tests point this at a local
    /// mock server.
    pub fn with_endpoints(
        access_key: String,
        secret_key: String,
        api_base: impl Into<String>,
        oauth_base: impl Into<String>,
    ) -> Result<Self, BotError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            access_key,
            secret_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            oauth_base: oauth_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// The URL a user opens to grant the bot access to their account.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.oauth_base, self.access_key, REDIRECT_URI, AUTH_SCOPE
        )
    }

    /// Searches photos for a query. Transient transport failures are retried
    /// with exponential backoff and jitter; HTTP error statuses are not.
    pub async fn search_photos(&self, query: &str) -> Result<SearchResult, BotError> {
        let url = format!("{}/search/photos", self.api_base);
        let mut attempt = 0u32;
        loop {
            let sent = self
                .http
                .get(&url)
                .query(&[("query", query), ("client_id", self.access_key.as_str())])
                .header(header::ACCEPT, "application/json")
                .send()
                .await;

            match sent {
                Ok(resp) => {
                    let resp = check_status(resp).await?;
                    let result: SearchResult = resp.json().await?;
                    debug!(query = %query, total = result.total, "Search completed");
                    return Ok(result);
                }
                Err(err) if attempt < SEARCH_RETRIES && is_transient(&err) => {
                    attempt += 1;
                    let delay = retry_delay(attempt);
                    warn!(
                        query = %query,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Search request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Likes a photo on behalf of the user owning `access_token`.
    pub async fn like_photo(&self, photo_id: &str, access_token: &str) -> Result<(), BotError> {
        self.send_like_request(Method::POST, photo_id, access_token)
            .await
    }

    /// Removes the user's like from a photo.
    pub async fn unlike_photo(&self, photo_id: &str, access_token: &str) -> Result<(), BotError> {
        self.send_like_request(Method::DELETE, photo_id, access_token)
            .await
    }

    async fn send_like_request(
        &self,
        method: Method,
        photo_id: &str,
        access_token: &str,
    ) -> Result<(), BotError> {
        let url = format!("{}/photos/{}/like", self.api_base, photo_id);
        let resp = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await?;
        check_status(resp).await?;
        debug!(photo_id = %photo_id, method = %method, "Like state updated");
        Ok(())
    }

    /// Exchanges a pasted authorization code for an access token. Never
    /// retried: codes are single-use and a replay would fail anyway.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, BotError> {
        let url = format!("{}/oauth/token", self.oauth_base);
        let resp = self
            .http
            .post(&url)
            .query(&[
                ("client_id", self.access_key.as_str()),
                ("client_secret", self.secret_key.as_str()),
                ("redirect_uri", REDIRECT_URI),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

/// Maps non-success statuses to `RemoteApi`, extracting the service's own
/// message when the body carries one.
async fn check_status(resp: Response) -> Result<Response, BotError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(ApiErrorBody::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    Err(BotError::RemoteApi {
        status: status.as_u16(),
        message,
    })
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Exponential backoff with random jitter so a burst of failing searches
/// does not all retry in lockstep.
fn retry_delay(attempt: u32) -> Duration {
    let backoff = RETRY_BASE_DELAY_MS * 2u64.pow(attempt.saturating_sub(1));
    let jitter = rand::thread_rng().gen_range(0..RETRY_BASE_DELAY_MS);
    Duration::from_millis(backoff + jitter)
}

//! HTTP client for authenticated crawling with rate limiting.
//!
//! Wraps a single `reqwest` client carrying the session cookie jar, so the
//! paginator and the batch fetcher share one connection pool and one rate
//! limiter.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client, Response,
    cookie::Jar,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;
use url::Url;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("exfav-sync/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 30,
            max_requests_per_second: 2,
        }
    }
}

/// Rate-limited HTTP client with a session cookie jar.
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a client without session cookies.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        Self::with_session(config, "", &[])
    }

    /// Create a client whose cookie jar carries the given session cookies,
    /// scoped to `site_url`.
    pub fn with_session(
        config: HttpClientConfig,
        site_url: &str,
        session: &[(String, String)],
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let jar = Arc::new(Jar::default());
        if !session.is_empty() {
            let url = Url::parse(site_url)
                .with_context(|| format!("Invalid site URL for session cookies: {site_url}"))?;
            for (name, value) in session {
                jar.add_cookie_str(&format!("{name}={value}"), &url);
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// GET a URL, failing on any non-success status.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        Ok(response)
    }

    /// GET a URL and return the body text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        Ok(text)
    }

    /// POST a JSON payload and parse the JSON response.
    pub async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to POST to: {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "HTTP request failed with status {}: {}",
                response.status(),
                url
            );
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from: {url}"))
    }

    /// Get the configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = HttpClient::new(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn session_cookies_require_a_valid_site_url() {
        let session = [("ipb_member_id".to_string(), "1234".to_string())];
        let result =
            HttpClient::with_session(HttpClientConfig::default(), "not a url", &session);
        assert!(result.is_err());

        let result = HttpClient::with_session(
            HttpClientConfig::default(),
            "https://exhentai.org/favorites.php",
            &session,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let config = HttpClientConfig {
            max_requests_per_second: 0,
            ..Default::default()
        };
        assert!(HttpClient::new(config).is_err());
    }
}

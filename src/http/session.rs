use std::time::Duration;

use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{seconds_to_duration, ApiPath, RateLimitHeaders, RateLimiter, DEFAULT_API_BASE};
use crate::error::{DispairError, DispairResult};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Body Discord sends with errors and 429s.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    retry_after: Option<f64>,
}

/// Authenticated Discord REST session with per-bucket rate limits.
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    api_base: String,
    rate_limiter: RateLimiter,
    max_attempts: u32,
}

impl HttpSession {
    pub fn new(bot_token: &str) -> DispairResult<Self> {
        Self::with_api_base(bot_token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(bot_token: &str, api_base: &str) -> DispairResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let token = bot_token.strip_prefix("Bot ").unwrap_or(bot_token);
        if !token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
                .map_err(|e| DispairError::Config(format!("bot token: {e}")))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(format!(
                "DiscordBot (https://github.com/GDWR/dispair, {})",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub async fn get(&self, path: &ApiPath) -> DispairResult<Option<Value>> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &ApiPath, body: &Value) -> DispairResult<Option<Value>> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Make a request, waiting out Discord's rate limits.
    ///
    /// The request holds its bucket for its whole duration. When Discord
    /// reports the bucket as exhausted it stays locked until the reset.
    /// Success bodies that are not JSON (204 callbacks) yield `None`.
    pub async fn request(
        &self,
        method: Method,
        path: &ApiPath,
        body: Option<&Value>,
    ) -> DispairResult<Option<Value>> {
        let url = path.url(&self.api_base);
        let bucket = path.bucket();
        let guard = self.rate_limiter.acquire(&bucket).await;

        let mut attempts = 0;
        let (status, limits, is_json, bytes) = loop {
            attempts += 1;
            debug!("{method} {url} (attempt {attempts})");

            let mut req = self.client.request(method.clone(), &url);
            if let Some(body) = body {
                req = req.json(body);
            }
            let resp = req.send().await?;

            let status = resp.status();
            let limits = RateLimitHeaders::parse(resp.headers());
            let is_json = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json"));
            let bytes = resp.bytes().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = serde_json::from_slice::<ApiErrorBody>(&bytes)
                    .ok()
                    .and_then(|b| b.retry_after)
                    .filter(|v| v.is_finite())
                    .or(limits.retry_after)
                    .unwrap_or(1.0);

                if attempts < self.max_attempts {
                    warn!("<{bucket}> rate limited, retrying in {retry_after}s");
                    tokio::time::sleep(seconds_to_duration(retry_after)).await;
                    continue;
                }
                return Err(DispairError::RateLimited { retry_after });
            }

            break (status, limits, is_json, bytes);
        };

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            error!("{method} {url} failed with {status}: {message}");
            return Err(DispairError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if limits.exhausted() {
            guard.release_after(limits.reset_delay());
        }

        if !is_json || bytes.is_empty() {
            debug!("{method} {url} returned no JSON body");
            return Ok(None);
        }

        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

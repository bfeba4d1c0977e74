#![cfg(test)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json,
};
use dispair::http::{seconds_to_duration, ApiPath, HttpSession, RateLimitHeaders, RateLimiter};
use dispair::DispairError;
use reqwest::header::{HeaderMap as ReqwestHeaders, HeaderValue};
use serde_json::{json, Value};
use tokio::time::Instant;

#[test]
fn test_api_path_formats_params() {
    let path = ApiPath::new("/interactions/{interaction_id}/{interaction_token}/callback")
        .param("interaction_id", 123)
        .param("interaction_token", "abc");

    assert_eq!(path.path(), "/interactions/123/abc/callback");
    assert_eq!(
        path.url("https://discord.com/api/v10/"),
        "https://discord.com/api/v10/interactions/123/abc/callback"
    );
}

#[test]
fn test_api_path_bucket() {
    let path = ApiPath::new("/interactions/{interaction_id}/{interaction_token}/callback")
        .param("interaction_id", 123)
        .param("interaction_token", "abc");
    assert_eq!(
        path.bucket(),
        "0-0-0-123-abc::/interactions/{interaction_id}/{interaction_token}/callback"
    );

    let path = ApiPath::new("/applications/{application_id}/guilds/{guild_id}/commands")
        .param("application_id", 1)
        .param("guild_id", 2);
    assert_eq!(
        path.bucket(),
        "2-0-0-0-0::/applications/{application_id}/guilds/{guild_id}/commands"
    );

    assert_eq!(ApiPath::new("/gateway/bot").bucket(), "0-0-0-0-0::/gateway/bot");
}

#[test]
fn test_rate_limit_headers() {
    let mut headers = ReqwestHeaders::new();
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    headers.insert("x-ratelimit-reset-after", HeaderValue::from_static("1.5"));

    let limits = RateLimitHeaders::parse(&headers);
    assert!(limits.exhausted());
    assert_eq!(limits.reset_delay(), Duration::from_millis(1500));

    let limits = RateLimitHeaders::parse(&ReqwestHeaders::new());
    assert!(!limits.exhausted());
    assert_eq!(limits.reset_delay(), Duration::ZERO);
}

#[test]
fn test_rate_limit_reset_in_the_past() {
    let mut headers = ReqwestHeaders::new();
    headers.insert("x-ratelimit-reset", HeaderValue::from_static("1000.5"));

    assert_eq!(RateLimitHeaders::parse(&headers).reset_delay(), Duration::ZERO);
}

#[test]
fn test_rate_limit_headers_ignore_non_finite_values() {
    let mut headers = ReqwestHeaders::new();
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    headers.insert("x-ratelimit-reset-after", HeaderValue::from_static("NaN"));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static("inf"));
    headers.insert("retry-after", HeaderValue::from_static("-inf"));

    let limits = RateLimitHeaders::parse(&headers);
    assert!(limits.exhausted());
    assert_eq!(limits.reset_after, None);
    assert_eq!(limits.reset_at, None);
    assert_eq!(limits.retry_after, None);
    assert_eq!(limits.reset_delay(), Duration::ZERO);
}

#[test]
fn test_seconds_to_duration() {
    assert_eq!(seconds_to_duration(1.5), Duration::from_millis(1500));
    assert_eq!(seconds_to_duration(-2.0), Duration::ZERO);
    assert_eq!(seconds_to_duration(f64::NAN), Duration::ZERO);
    assert_eq!(seconds_to_duration(f64::INFINITY), Duration::from_secs(3600));
    assert_eq!(
        DispairError::RateLimited { retry_after: f64::NAN }.retry_after(),
        Some(Duration::ZERO)
    );
}

#[tokio::test]
async fn test_bucket_held_until_release() {
    let limiter = RateLimiter::new();

    let start = Instant::now();
    limiter
        .acquire("bucket")
        .await
        .release_after(Duration::from_millis(200));
    let _second = limiter.acquire("bucket").await;

    assert!(start.elapsed() >= Duration::from_millis(150));
    assert_eq!(limiter.bucket_count(), 1);
}

#[tokio::test]
async fn test_buckets_are_independent() {
    let limiter = RateLimiter::new();

    let _held = limiter.acquire("a").await;
    let start = Instant::now();
    let _other = limiter.acquire("b").await;

    assert!(start.elapsed() < Duration::from_millis(100));
    assert_eq!(limiter.bucket_count(), 2);
}

#[tokio::test]
async fn test_finished_buckets_are_dropped() {
    let limiter = RateLimiter::new();

    for id in 0..1000 {
        let path = ApiPath::new("/interactions/{interaction_id}/{interaction_token}/callback")
            .param("interaction_id", id)
            .param("interaction_token", "t");
        drop(limiter.acquire(&path.bucket()).await);
    }
    assert_eq!(limiter.bucket_count(), 0);

    limiter
        .acquire("delayed")
        .await
        .release_after(Duration::from_millis(20));
    assert_eq!(limiter.bucket_count(), 1);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(limiter.bucket_count(), 0);
}

#[tokio::test]
async fn test_bucket_kept_while_waited_on() {
    let limiter = Arc::new(RateLimiter::new());

    let held = limiter.acquire("busy").await;
    let waiter = {
        let limiter = Arc::clone(&limiter);
        tokio::spawn(async move {
            let _guard = limiter.acquire("busy").await;
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    drop(held);
    assert_eq!(limiter.bucket_count(), 1);

    waiter.await.unwrap();
    assert_eq!(limiter.bucket_count(), 0);
}

#[tokio::test]
async fn test_session_sends_bot_authorization() {
    let app = axum::Router::new().route(
        "/users/@me",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "authorization": auth }))
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("test-token", &base).unwrap();
    let body = session.get(&ApiPath::new("/users/@me")).await.unwrap();

    assert_eq!(body, Some(json!({ "authorization": "Bot test-token" })));
}

#[tokio::test]
async fn test_session_no_content() {
    let app = axum::Router::new().route(
        "/interactions/{id}/{token}/callback",
        post(|| async { StatusCode::NO_CONTENT }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base).unwrap();
    let path = ApiPath::new("/interactions/{interaction_id}/{interaction_token}/callback")
        .param("interaction_id", 1)
        .param("interaction_token", "t");

    assert_eq!(session.post(&path, &json!({"type": 4})).await.unwrap(), None);
}

#[tokio::test]
async fn test_session_retries_after_429() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let app = axum::Router::new().route(
        "/gateway/bot",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        Json(json!({"message": "You are being rate limited.", "retry_after": 0.05, "global": false})),
                    )
                        .into_response()
                } else {
                    Json(json!({"url": "wss://gateway.discord.gg"})).into_response()
                }
            }
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base).unwrap();
    let body = session.get(&ApiPath::new("/gateway/bot")).await.unwrap();

    assert_eq!(body, Some(json!({"url": "wss://gateway.discord.gg"})));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_session_gives_up_when_still_limited() {
    let app = axum::Router::new().route(
        "/gateway/bot",
        get(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"message": "slow down", "retry_after": 0.01})),
            )
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base)
        .unwrap()
        .max_attempts(2);
    let err = session.get(&ApiPath::new("/gateway/bot")).await.unwrap_err();

    assert!(matches!(err, DispairError::RateLimited { .. }));
}

#[tokio::test]
async fn test_session_api_error() {
    let app = axum::Router::new().route(
        "/guilds/{guild_id}",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"message": "Unknown Guild", "code": 10004})),
            )
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base).unwrap();
    let err = session
        .get(&ApiPath::new("/guilds/{guild_id}").param("guild_id", 1))
        .await
        .unwrap_err();

    match err {
        DispairError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Unknown Guild");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_session_waits_for_exhausted_bucket() {
    let app = axum::Router::new().route(
        "/channels/{channel_id}/messages",
        post(|| async {
            (
                [
                    ("x-ratelimit-remaining", "0"),
                    ("x-ratelimit-reset-after", "0.3"),
                ],
                Json(json!({"id": "1"})),
            )
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base).unwrap();
    let path = ApiPath::new("/channels/{channel_id}/messages").param("channel_id", 5);
    let body: Value = json!({"content": "hi"});

    let start = Instant::now();
    session.post(&path, &body).await.unwrap();
    session.post(&path, &body).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_session_survives_nan_reset_header() {
    let app = axum::Router::new().route(
        "/channels/{channel_id}/messages",
        post(|| async {
            (
                [
                    ("x-ratelimit-remaining", "0"),
                    ("x-ratelimit-reset-after", "NaN"),
                    ("x-ratelimit-reset", "NaN"),
                ],
                Json(json!({"id": "1"})),
            )
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base).unwrap();
    let path = ApiPath::new("/channels/{channel_id}/messages").param("channel_id", 5);
    let body: Value = json!({"content": "hi"});

    assert_eq!(
        session.post(&path, &body).await.unwrap(),
        Some(json!({"id": "1"}))
    );
    assert_eq!(
        session.post(&path, &body).await.unwrap(),
        Some(json!({"id": "1"}))
    );
}

#[tokio::test]
async fn test_session_retries_after_nan_retry_after() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let app = axum::Router::new().route(
        "/gateway/bot",
        get(move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        [("retry-after", "NaN")],
                        Json(json!({"message": "You are being rate limited."})),
                    )
                        .into_response()
                } else {
                    Json(json!({"url": "wss://gateway.discord.gg"})).into_response()
                }
            }
        }),
    );
    let base = common::spawn_app(app).await;

    let session = HttpSession::with_api_base("token", &base).unwrap();
    let body = session.get(&ApiPath::new("/gateway/bot")).await.unwrap();

    assert_eq!(body, Some(json!({"url": "wss://gateway.discord.gg"})));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

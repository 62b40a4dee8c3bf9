//! Fixed-window request limiting, one window per caller.
//!
//! Callers presenting a live bearer token are keyed by the token digest,
//! everyone else (unknown tokens included) by peer address. Windows live in a moka cache that expires them one
//! minute after the first request.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use moka::future::Cache;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use service::AccountService;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use crate::auth::bearer_token;
use crate::error::ApiError;
use crate::schemas::AppState;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Window {
    started: Instant,
    hits: AtomicU32,
}

/// Outcome of registering one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

#[derive(Clone, Debug)]
pub struct RateLimiter {
    windows: Cache<String, Arc<Window>>,
    limit: u32,
}

impl RateLimiter {
    pub fn new(limit: u32) -> Self {
        let windows = Cache::builder()
            .max_capacity(100_000)
            .time_to_live(WINDOW)
            .build();
        Self { windows, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub async fn check(&self, key: &str) -> Decision {
        let window = self
            .windows
            .get_with(key.to_string(), async {
                Arc::new(Window {
                    started: Instant::now(),
                    hits: AtomicU32::new(0),
                })
            })
            .await;

        let hits = window.hits.fetch_add(1, Ordering::SeqCst) + 1;
        if hits <= self.limit {
            Decision::Allowed {
                remaining: self.limit - hits,
            }
        } else {
            let left = WINDOW.saturating_sub(window.started.elapsed());
            Decision::Limited {
                retry_after_secs: left.as_secs().max(1),
            }
        }
    }
}

/// Rate-limit key of a request. A bearer token only selects its own window
/// once it resolves to a user.
pub fn request_key<'a>(
    state: &'a AppState,
    request: &Request,
) -> impl std::future::Future<Output = String> + Send + 'a {
    // Values are read from the request up front: `Request` is not `Sync`, so
    // borrowing it across an await would make the middleware future `!Send`.
    let token = bearer_token(request.headers()).map(str::to_owned);
    let peer = peer_key(request);
    async move {
        if let Some(token) = token.as_deref() {
            let accounts = AccountService::new(state.db.clone(), state.config.token_bytes);
            match accounts.token_owner(token).await {
                Ok(Some(user_id)) => {
                    trace!(user_id, "Rate limiting by token");
                    return format!("token:{}", service::credentials::hash_token(token));
                }
                Ok(None) => debug!("Unknown bearer token, rate limiting by address"),
                Err(e) => warn!("Token lookup failed, rate limiting by address: {}", e),
            }
        }
        peer
    }
}

fn peer_key(request: &Request) -> String {
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("ip:{}", addr.ip()),
        None => "ip:unknown".to_string(),
    }
}

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = request_key(&state, &request).await;
    match state.rate_limiter.check(&key).await {
        Decision::Allowed { remaining } => {
            trace!(%key, remaining, "Request within rate limit");
            let mut response = next.run(request).await;
            response.headers_mut().insert(
                "x-ratelimit-limit",
                HeaderValue::from(state.rate_limiter.limit()),
            );
            response
                .headers_mut()
                .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after_secs } => {
            warn!(%key, retry_after_secs, "Rate limit exceeded");
            let mut response = ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_REQUESTS",
                "Too Many Attempts.",
            )
            .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limits_each_key_separately() {
        let limiter = RateLimiter::new(2);
        assert_eq!(limiter.check("a").await, Decision::Allowed { remaining: 1 });
        assert_eq!(limiter.check("a").await, Decision::Allowed { remaining: 0 });
        assert!(matches!(limiter.check("a").await, Decision::Limited { .. }));
        assert_eq!(limiter.check("b").await, Decision::Allowed { remaining: 1 });
    }

    #[tokio::test]
    async fn test_retry_after_is_within_window() {
        let limiter = RateLimiter::new(0);
        match limiter.check("ip:127.0.0.1").await {
            Decision::Limited { retry_after_secs } => {
                assert!((1..=60).contains(&retry_after_secs));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }
}

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tracing::debug;

use crate::service::TitleError;

/// Expired windows are swept from the store once every this many hits.
const PURGE_EVERY: u64 = 1024;

/// Fixed-window request counter per client IP. Every title request costs a
/// page fetch and a model call, so the endpoint is limited per caller.
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    hits: Arc<AtomicU64>,
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            hits: Arc::new(AtomicU64::new(0)),
            max_requests,
            window_seconds,
        }
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, 60)
    }

    /// Record a hit for `key` at `now`; returns whether it is within the limit.
    fn check(&self, key: String, now: DateTime<Utc>) -> bool {
        // Must run before `entry` takes a shard lock.
        if (self.hits.fetch_add(1, Ordering::Relaxed) + 1) % PURGE_EVERY == 0 {
            self.purge_expired(now);
        }

        let mut entry = self.store.entry(key).or_insert_with(|| RateLimitData {
            count: 0,
            window_start: now,
        });
        let data = entry.value_mut();

        if now.signed_duration_since(data.window_start) >= Duration::seconds(self.window_seconds) {
            data.count = 0;
            data.window_start = now;
        }

        data.count += 1;
        data.count <= self.max_requests
    }

    /// Drop callers whose window has already closed.
    fn purge_expired(&self, now: DateTime<Utc>) {
        let window = Duration::seconds(self.window_seconds);
        let before = self.store.len();
        self.store
            .retain(|_, data| now.signed_duration_since(data.window_start) < window);
        debug!(
            removed = before.saturating_sub(self.store.len()),
            "purged expired rate limit windows"
        );
    }

    #[cfg(test)]
    fn tracked_callers(&self) -> usize {
        self.store.len()
    }
}

/// IP-based rate limiting middleware.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();

    if !rate_limit.check(ip.clone(), Utc::now()) {
        debug!(%ip, "rate limit exceeded");
        return TitleError::RateLimited.into_response();
    }

    next.run(req).await
}

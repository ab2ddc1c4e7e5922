//! Access control for the optimizer relay: bearer API key and per-IP rate limit.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Requests per minute allowed when rate limiting is on and no limit is configured.
const DEFAULT_RATE_LIMIT: u32 = 100;

/// Security settings for the HTTP API.
#[derive(Clone, Debug, Default)]
pub struct SecurityConfig {
    /// Bearer key required on `/optim` routes (from FROG_API_KEY).
    pub api_key: Option<String>,
    /// Allowed CORS origins (from FROG_CORS_ORIGINS, comma-separated). `None` allows any.
    pub cors_origins: Option<Vec<String>>,
    pub rate_limiter: Option<RateLimiter>,
}

impl SecurityConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// Rate limiting (FROG_RATE_LIMIT per minute) only applies once an API key is set.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = var("FROG_API_KEY").filter(|k| !k.is_empty());
        let cors_origins = var("FROG_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        });
        let rate_limiter = api_key.as_ref().map(|_| {
            let limit = var("FROG_RATE_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT);
            RateLimiter::per_minute(limit)
        });

        Self {
            api_key,
            cors_origins,
            rate_limiter,
        }
    }

    /// No authentication, any origin, no rate limit.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_rate_limit(mut self, max_requests: u32) -> Self {
        self.rate_limiter = Some(RateLimiter::per_minute(max_requests));
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Configured origins that parse as header values.
    pub fn allowed_origins(&self) -> Option<Vec<HeaderValue>> {
        self.cors_origins.as_ref().map(|origins| {
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect()
        })
    }
}

/// Sliding-window request counter keyed by client IP.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Record a request from `ip`; false if it is over the limit.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());

        // Drop windows that have gone quiet so the map stays bounded.
        hits.retain(|_, times| times.last().is_some_and(|t| now.duration_since(*t) < self.window));

        let times = hits.entry(ip).or_default();
        times.retain(|t| now.duration_since(*t) < self.window);
        if times.len() >= self.max_requests {
            return false;
        }
        times.push(now);
        true
    }
}

pub async fn auth_middleware(
    State(config): State<SecurityConfig>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = config.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match provided {
        Some(key) if key == expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API key provided");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing or malformed Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let ip = client_ip(&request);
    if limiter.check(ip) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Rate limit exceeded for {}", ip);
        Err(StatusCode::TOO_MANY_REQUESTS)
    }
}

/// Client address from proxy headers, defaulting to loopback.
fn client_ip(request: &Request<Body>) -> IpAddr {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse().ok())
    };
    header("X-Forwarded-For")
        .or_else(|| header("X-Real-IP"))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn limiter_blocks_after_max_requests() {
        let limiter = RateLimiter::per_minute(2);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(ip));
        assert!(limiter.check(ip));
        assert!(!limiter.check(ip));
    }

    #[test]
    fn limiter_counts_each_ip_separately() {
        let limiter = RateLimiter::per_minute(1);
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(a));
        assert!(!limiter.check(a));
        assert!(limiter.check(b));
    }

    #[test]
    fn limiter_forgets_requests_outside_window() {
        let limiter = RateLimiter::new(1, Duration::ZERO);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        assert!(limiter.check(ip));
        assert!(limiter.check(ip));
    }

    #[test]
    fn rate_limit_requires_api_key() {
        let env: HashMap<&str, &str> = [("FROG_RATE_LIMIT", "5")].into_iter().collect();
        let config = SecurityConfig::from_vars(|k| env.get(k).map(|v| v.to_string()));
        assert!(config.api_key.is_none());
        assert!(config.rate_limiter.is_none());
    }

    #[test]
    fn reads_key_and_origins() {
        let env: HashMap<&str, &str> = [
            ("FROG_API_KEY", "secret"),
            ("FROG_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]
        .into_iter()
        .collect();
        let config = SecurityConfig::from_vars(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.cors_origins,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
        assert!(config.rate_limiter.is_some());
    }
}

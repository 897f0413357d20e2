use actix_web::{web, HttpRequest, HttpResponse, Scope};
use log::warn;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::AppState;

/// Rate limiter for login attempts by IP
struct RateLimiter {
    attempts: HashMap<String, Vec<Instant>>,
    max_attempts: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_attempts: usize, window_secs: u64) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            window: Duration::from_secs(window_secs),
        }
    }

    fn is_allowed(&mut self, ip: &str) -> bool {
        let now = Instant::now();
        let attempts = self.attempts.entry(ip.to_string()).or_default();

        // Remove expired attempts
        attempts.retain(|t| now.duration_since(*t) < self.window);

        if attempts.len() >= self.max_attempts {
            false
        } else {
            attempts.push(now);
            true
        }
    }
}

static LOGIN_LIMITER: Lazy<Mutex<RateLimiter>> =
    Lazy::new(|| Mutex::new(RateLimiter::new(3, 60))); // 3 attempts per 60 seconds

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn get_client_ip(req: &HttpRequest) -> String {
    // Try X-Forwarded-For header first (for reverse proxy)
    if let Some(forwarded) = req.headers().get("X-Forwarded-For") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(ip) = s.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    // Try X-Real-IP header
    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(s) = real_ip.to_str() {
            return s.trim().to_string();
        }
    }

    // Fall back to peer address
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let ip = get_client_ip(&req);
    if !LOGIN_LIMITER.lock().is_allowed(&ip) {
        warn!("login rate limited for {}", ip);
        return HttpResponse::TooManyRequests().json(ErrorResponse {
            error: "too many login attempts, try again later".to_string(),
        });
    }

    match state
        .auth_service()
        .login(&body.username, &body.password)
        .await
    {
        Ok(token) => HttpResponse::Ok().json(LoginResponse { token }),
        Err(e) => {
            warn!("login failed for '{}': {}", body.username, e);
            HttpResponse::Unauthorized().json(ErrorResponse {
                error: "invalid username or password".to_string(),
            })
        }
    }
}

/// 用旧令牌换发新令牌
pub async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string());

    let Some(token) = token else {
        return HttpResponse::Unauthorized().json(ErrorResponse {
            error: "missing bearer token".to_string(),
        });
    };

    match state.auth_service().authenticate(&token).await {
        Ok(token) => HttpResponse::Ok().json(LoginResponse { token }),
        Err(e) => {
            warn!("token refresh rejected: {}", e);
            HttpResponse::Unauthorized().json(ErrorResponse {
                error: "invalid token".to_string(),
            })
        }
    }
}

pub fn configure_service() -> Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login))
        .route("/refresh", web::post().to(refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_window() {
        let mut limiter = RateLimiter::new(2, 60);
        assert!(limiter.is_allowed("1.2.3.4"));
        assert!(limiter.is_allowed("1.2.3.4"));
        assert!(!limiter.is_allowed("1.2.3.4"));
        // 其他来源不受影响
        assert!(limiter.is_allowed("5.6.7.8"));
    }
}

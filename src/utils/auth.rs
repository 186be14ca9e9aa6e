// src/utils/auth.rs

use std::fmt;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

/// Name of the cookie the communities API issues its session token in.
pub const AUTH_COOKIE: &str = "auth_token";

/// The caller's upstream session token, forwarded untouched.
///
/// The gateway never inspects it: issuing, validating and expiring tokens is
/// the communities API's job.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the token from an `Authorization: Bearer` header, falling back
    /// to the `auth_token` cookie.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        if let Some(token) = bearer {
            return Some(Self::new(token));
        }

        CookieJar::from_headers(headers)
            .get(AUTH_COOKIE)
            .map(|cookie| cookie.value_trimmed())
            .filter(|value| !value.is_empty())
            .map(Self::new)
    }
}

// Keep tokens out of logs.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Axum Middleware: Authentication.
///
/// Requires a session token on the request and injects it as `AuthToken`
/// into the request extensions. Returns 401 Unauthorized when none is present.
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let token = AuthToken::from_headers(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(token);
    Ok(next.run(req).await)
}

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    conf::settings,
    pkg::internal::auth::AdminClaims,
    prelude::{AppError, Result},
};

pub async fn authenticate(headers: HeaderMap, mut request: Request, next: Next) -> Result<Response> {
    let Some(token) = session_token(&headers, &settings.cookie_name) else {
        tracing::warn!("token missing, authentication denied");
        return Err(AppError::Unauthorized);
    };
    let claims = AdminClaims::decode(&token, &settings.jwt_secret)?;
    tracing::debug!("authenticated admin {}", claims.sub);
    request.extensions_mut().insert(Arc::new(claims));
    Ok(next.run(request).await)
}

/// The session cookie, falling back to an `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header::COOKIE};

    use super::*;

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; admin_token=abc"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers, "admin_token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_bearer_fallback_and_blanks() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("admin_token="));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers, "admin_token").as_deref(), Some("xyz"));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert_eq!(session_token(&headers, "admin_token"), None);
        assert_eq!(session_token(&HeaderMap::new(), "admin_token"), None);
    }
}

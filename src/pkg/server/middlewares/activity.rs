use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::pkg::{
    internal::{
        adaptors::activity::{mutators::ActivityMutator, spec::NewActivity},
        auth::AdminClaims,
    },
    server::state::AppState,
};

const ADMIN_PREFIX: &str = "/api/admin/";

/// What an admin write touched, read off the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub action: &'static str,
    pub resource_type: String,
    pub resource_id: Option<i64>,
}

pub fn describe(method: &Method, path: &str) -> Option<Target> {
    let action = match *method {
        Method::POST => "create",
        Method::PUT | Method::PATCH => "update",
        Method::DELETE => "delete",
        _ => return None,
    };
    let mut segments = path
        .strip_prefix(ADMIN_PREFIX)?
        .split('/')
        .filter(|s| !s.is_empty());
    let resource_type = segments.next()?.to_string();
    let resource_id = segments.next().and_then(|s| s.parse::<i64>().ok());
    Some(Target {
        action,
        resource_type,
        resource_id,
    })
}

pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// Appends an activity row for every admin write once the handler has answered.
pub async fn record_activity(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let admin = request.extensions().get::<Arc<AdminClaims>>().map(|c| c.sub);
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip_address = client_ip(request.headers(), peer);

    let response = next.run(request).await;

    if let Some(target) = describe(&method, &path) {
        let activity = NewActivity {
            admin_id: admin,
            action: target.action.to_string(),
            resource_type: target.resource_type,
            resource_id: target.resource_id,
            details: json!({
                "method": method.as_str(),
                "path": &path,
                "status": response.status().as_u16(),
            }),
            ip_address,
        };
        if let Err(e) = ActivityMutator::new(&*state.db_pool).record(activity).await {
            tracing::warn!("activity log write failed for {} {}: {}", &method, &path, e);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_describe_admin_writes() {
        assert_eq!(
            describe(&Method::PATCH, "/api/admin/applications/12/status"),
            Some(Target {
                action: "update",
                resource_type: "applications".into(),
                resource_id: Some(12),
            })
        );
        assert_eq!(
            describe(&Method::POST, "/api/admin/jobs"),
            Some(Target {
                action: "create",
                resource_type: "jobs".into(),
                resource_id: None,
            })
        );
        assert_eq!(
            describe(&Method::DELETE, "/api/admin/newsletter/3"),
            Some(Target {
                action: "delete",
                resource_type: "newsletter".into(),
                resource_id: Some(3),
            })
        );
    }

    #[test]
    fn test_reads_and_foreign_paths_are_skipped() {
        assert_eq!(describe(&Method::GET, "/api/admin/jobs"), None);
        assert_eq!(describe(&Method::OPTIONS, "/api/admin/jobs"), None);
        assert_eq!(describe(&Method::POST, "/api/contact"), None);
        assert_eq!(describe(&Method::POST, "/api/admin/"), None);
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let peer: SocketAddr = "10.0.0.5:41000".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("10.0.0.5"));
        assert_eq!(client_ip(&headers, None), None);

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, Some(peer)).as_deref(), Some("203.0.113.7"));
    }
}

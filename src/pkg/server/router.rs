use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    activity as activity_logs, applications, auth, careers, contacts, dashboard, jobs, newsletter,
    probes::{healthz, livez},
};
use super::middlewares::{activity, authn};
use super::state::AppState;
use crate::conf::settings;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/api/admin/jobs/{id}",
            get(jobs::get).put(jobs::update).delete(jobs::delete),
        )
        .route("/api/admin/applications", get(applications::list))
        .route(
            "/api/admin/applications/{id}",
            get(applications::get).delete(applications::delete),
        )
        .route("/api/admin/applications/{id}/status", patch(applications::update_status))
        .route("/api/admin/applications/{id}/notes", patch(applications::update_notes))
        .route("/api/admin/applications/{id}/resume", get(applications::resume))
        .route(
            "/api/admin/applications/{id}/resume/preview",
            get(applications::resume_preview),
        )
        .route("/api/admin/applications/{id}/cover-letter", get(applications::cover_letter))
        .route("/api/admin/contacts", get(contacts::list))
        .route(
            "/api/admin/contacts/{id}",
            get(contacts::get).delete(contacts::delete),
        )
        .route("/api/admin/contacts/{id}/status", patch(contacts::update_status))
        .route("/api/admin/newsletter", get(newsletter::list))
        .route("/api/admin/newsletter/{id}", axum::routing::delete(newsletter::delete))
        .route("/api/admin/dashboard/stats", get(dashboard::stats))
        .route("/api/admin/activity", get(activity_logs::list))
        .layer(from_fn_with_state(state.clone(), activity::record_activity))
        .route("/api/admin/me", get(auth::me))
        .route("/api/admin/logout", post(auth::logout))
        .layer(from_fn(authn::authenticate))
        .route("/api/admin/login", post(auth::login))
        .route("/api/jobs", get(careers::list))
        .route("/api/jobs/{id}", get(careers::get))
        .route("/api/applications", post(applications::submit))
        .route("/api/contact", post(contacts::submit))
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/newsletter/unsubscribe", post(newsletter::unsubscribe))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(DefaultBodyLimit::max(state.uploads.max_bytes().saturating_mul(3)))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

fn cors() -> CorsLayer {
    if settings.cors_origin.is_empty() {
        return CorsLayer::new();
    }
    match settings.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
        Err(e) => {
            tracing::warn!("ignoring CORS_ORIGIN {}: {}", &settings.cors_origin, e);
            CorsLayer::new()
        }
    }
}

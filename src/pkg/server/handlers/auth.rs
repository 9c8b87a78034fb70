use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    conf::settings,
    pkg::{
        internal::{
            adaptors::admins::{selectors::AdminSelector, spec::AdminProfile},
            auth::{AdminClaims, verify_password},
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Wrong email and wrong password answer alike.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<Value>)> {
    let admin = AdminSelector::new(&*state.db_pool)
        .get_by_email(&input.email)
        .await?
        .filter(|admin| verify_password(&input.password, &admin.password_hash));
    let Some(admin) = admin else {
        tracing::warn!("failed login for {}", input.email.trim());
        return Err(AppError::Unauthorized);
    };

    let token = AdminClaims::for_admin(&admin, settings.jwt_ttl_hours).encode(&settings.jwt_secret)?;
    let cookie = Cookie::build((settings.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.cookie_secure);
    tracing::info!("admin {} logged in", admin.id);
    Ok((
        jar.add(cookie),
        Json(json!({"success": true, "admin": AdminProfile::from(&admin)})),
    ))
}

pub async fn logout(
    jar: CookieJar,
    Extension(admin): Extension<Arc<AdminClaims>>,
) -> (CookieJar, Json<Value>) {
    tracing::info!("admin {} logged out", admin.sub);
    let cookie = Cookie::build(settings.cookie_name.clone()).path("/");
    (
        jar.remove(cookie),
        Json(json!({"success": true, "message": "Logged out"})),
    )
}

pub async fn me(Extension(admin): Extension<Arc<AdminClaims>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "admin": AdminProfile {
            id: admin.sub,
            email: admin.email.clone(),
            name: admin.name.clone(),
        },
    }))
}

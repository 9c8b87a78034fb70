use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    pkg::internal::adaptors::admins::spec::AdminEntry,
    prelude::{AppError, Result},
};

/// Session claims carried in the admin cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: i64,
    pub email: String,
    pub name: String,
    pub exp: i64,
}

impl AdminClaims {
    pub fn for_admin(admin: &AdminEntry, ttl_hours: i64) -> Self {
        AdminClaims {
            sub: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    pub fn encode(&self, secret: &str) -> Result<String> {
        let token = encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Rejects bad signatures and expired tokens as [`AppError::Unauthorized`].
    pub fn decode(token: &str, secret: &str) -> Result<Self> {
        let data = decode::<AdminClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("unreadable password hash: {}", e);
            false
        }
    }
}

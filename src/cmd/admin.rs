use sqlx::postgres::PgPoolOptions;

use crate::{
    conf::settings,
    pkg::internal::{adaptors::admins::mutators::AdminMutator, auth::hash_password},
    prelude::{AppError, Result},
};

pub async fn create(email: &str, name: &str, password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::invalid("password", "Password must be at least 8 characters"));
    }
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&settings.database_url)
        .await?;
    let hash = hash_password(password)?;
    let admin = AdminMutator::new(&pool).upsert(email, name, &hash).await?;
    pool.close().await;
    tracing::info!("admin {} ready as {}", admin.id, &admin.email);
    Ok(())
}

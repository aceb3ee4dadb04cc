use anyhow::{Context as _, Result};
use rocket::tokio::task::spawn_blocking;

/// Hashes a password with bcrypt off the async executor.
pub(crate) async fn hash_password(password: String) -> Result<String> {
    hash_password_with_cost(password, bcrypt::DEFAULT_COST).await
}

pub(crate) async fn hash_password_with_cost(password: String, cost: u32) -> Result<String> {
    spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Checks a password against a stored bcrypt hash.
/// Malformed hashes count as a mismatch.
pub(crate) async fn verify_password(password: String, hash: String) -> Result<bool> {
    let matches = spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or_default())
        .await
        .context("password verification task failed")?;
    Ok(matches)
}

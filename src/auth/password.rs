//! Password hashing. Bcrypt is CPU-intensive by design, so both
//! operations run on the blocking thread pool instead of the async
//! workers. Verification inside the bcrypt crate is a constant-time
//! comparison.

use anyhow::Context;

/// Default bcrypt cost factor. Overridable via config; tests use a low
/// cost to stay fast.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a plaintext password. Output embeds the salt, so two hashes of
/// the same password differ.
pub async fn hash(password: &str, cost: u32) -> anyhow::Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("hashing task panicked")?
        .context("bcrypt hash failed")
}

/// Verify a plaintext password against a stored bcrypt hash.
pub async fn verify(password: &str, hashed: &str) -> anyhow::Result<bool> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
        .await
        .context("verification task panicked")?
        .context("bcrypt verify failed")
}

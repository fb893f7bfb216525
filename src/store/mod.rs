pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::files::Row;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// A registered account. `username` is the identity; records are never
/// mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
}

/// An uploaded file after decoding: the original filename plus the ordered
/// row records. Immutable once inserted; looked up only by exact id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub filename: String,
    pub data: Vec<Row>,
}

/// Persistence contract for accounts. Implementations must be safe under
/// concurrent inserts: `insert_user` is the uniqueness check.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Returns `false` (without modifying anything) if
    /// the username is already taken.
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Persistence contract for uploaded files: insert and find-by-id only.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn insert_file(&self, record: &FileRecord) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError>;
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{FileRecord, FileStore, StoreError, User, UserStore};
use crate::files::Row;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        // ON CONFLICT makes the uniqueness check atomic under concurrent
        // signups for the same name.
        let result = sqlx::query(
            "INSERT INTO users (username, hashed_password) VALUES ($1, $2)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(&user.username)
        .bind(&user.hashed_password)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT username, hashed_password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(username, hashed_password)| User {
            username,
            hashed_password,
        }))
    }
}

#[async_trait]
impl FileStore for PgStore {
    async fn insert_file(&self, record: &FileRecord) -> Result<(), StoreError> {
        let data = serde_json::to_value(&record.data)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        sqlx::query("INSERT INTO files (id, filename, data) VALUES ($1, $2, $3)")
            .bind(record.id)
            .bind(&record.filename)
            .bind(data)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError> {
        let row = sqlx::query_as::<_, (String, serde_json::Value)>(
            "SELECT filename, data FROM files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((filename, data)) => {
                let data: Vec<Row> = serde_json::from_value(data)
                    .map_err(|e| StoreError::Corrupt(e.to_string()))?;
                Ok(Some(FileRecord { id, filename, data }))
            }
            None => Ok(None),
        }
    }
}

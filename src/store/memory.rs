//! In-memory store backend. Used by the integration tests and handy for
//! local runs without Postgres; satisfies the same visibility contract
//! (an insert is observable by every later lookup).

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{FileRecord, FileStore, StoreError, User, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    files: DashMap<Uuid, FileRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<bool, StoreError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(true)
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn insert_file(&self, record: &FileRecord) -> Result<(), StoreError> {
        self.files.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, StoreError> {
        Ok(self.files.get(&id).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            username: name.to_string(),
            hashed_password: "$2b$04$fakehashfakehashfakehash".to_string(),
        }
    }

    #[tokio::test]
    async fn second_insert_for_same_username_is_rejected() {
        let store = MemoryStore::new();
        assert!(store.insert_user(&user("alice")).await.unwrap());
        assert!(!store.insert_user(&user("alice")).await.unwrap());

        // The original record survives the rejected insert.
        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn file_lookup_is_exact_id_match() {
        let store = MemoryStore::new();
        let record = FileRecord {
            id: Uuid::new_v4(),
            filename: "x.csv".to_string(),
            data: vec![],
        };
        store.insert_file(&record).await.unwrap();

        assert!(store.find_by_id(record.id).await.unwrap().is_some());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}

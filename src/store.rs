//! Persistence boundary: `save` one entity durably or fail.

use std::path::Path;

use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::model::User;

/// Store-level failure for a single `save` call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Destination for imported users. Each call persists one entity and
/// returns it with identity assigned, or fails; there are no batching or
/// transactional guarantees beyond that.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    async fn save(&mut self, user: User) -> Result<User, StoreError>;
}

/// In-memory store with sequential ids. Used by tests and by the CLI when
/// no output file is given.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Vec<User>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for MemoryStore {
    async fn save(&mut self, mut user: User) -> Result<User, StoreError> {
        self.next_id += 1;
        user.id = Some(self.next_id);
        self.users.push(user.clone());
        Ok(user)
    }
}

/// JSON-lines store: one serialized [`User`] per line.
pub struct JsonlStore {
    file: File,
    next_id: u64,
}

impl JsonlStore {
    /// Open the output file, truncating any previous contents. Ids are
    /// scoped to one store: they restart at 1, so the file only ever holds
    /// the rows of a single commit.
    pub async fn create(path: &Path) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await?;
        Ok(Self { file, next_id: 0 })
    }

    /// Flush buffered writes to disk.
    pub async fn sync(&mut self) -> Result<(), StoreError> {
        self.file.flush().await?;
        self.file.sync_all().await?;
        Ok(())
    }
}

impl UserStore for JsonlStore {
    async fn save(&mut self, mut user: User) -> Result<User, StoreError> {
        self.next_id += 1;
        user.id = Some(self.next_id);
        let mut line = serde_json::to_vec(&user)?;
        line.push(b'\n');
        self.file.write_all(&line).await?;
        Ok(user)
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};

use crate::domain::repositories::{RepositoryError, UserRepository, UserStore, UserTransaction};
use crate::domain::user::{User, FIRST_USER_ID};

#[derive(Debug, Clone)]
struct Table {
    users: BTreeMap<i32, User>,
    next_id: i64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: i64::from(FIRST_USER_ID),
        }
    }
}

impl Table {
    fn find_by_id(&self, id: i32) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn find_all(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    fn save(&mut self, mut user: User) -> Result<User, RepositoryError> {
        let id = match user.id {
            Some(id) => id,
            None => i32::try_from(self.next_id).map_err(|_| RepositoryError::IdSpaceExhausted)?,
        };
        self.next_id = self.next_id.max(i64::from(id) + 1);

        user.id = Some(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    fn delete_by_id(&mut self, id: i32) {
        self.users.remove(&id);
    }

    fn exists_by_email(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }
}

/// Process-local implementation of UserStore
///
/// Backs the test suites and `STORAGE=memory`. Clones share one table.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryUserStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.table.read().await.find_by_id(id))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.table.read().await.find_all())
    }

    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        self.table.write().await.save(user)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError> {
        self.table.write().await.delete_by_id(id);
        Ok(())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.table.read().await.exists_by_email(email))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    type Transaction = InMemoryUserTransaction;

    async fn begin(&self) -> Result<Self::Transaction, RepositoryError> {
        let guard = Arc::clone(&self.table).write_owned().await;
        let staged = (*guard).clone();
        Ok(InMemoryUserTransaction {
            guard,
            staged: Mutex::new(staged),
        })
    }
}

/// Exclusive unit of work over an in-memory table
///
/// Holds the table's write lock and works on a staged copy that replaces the
/// table on `commit`. Dropping it discards the copy.
pub struct InMemoryUserTransaction {
    guard: OwnedRwLockWriteGuard<Table>,
    staged: Mutex<Table>,
}

#[async_trait]
impl UserRepository for InMemoryUserTransaction {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.staged.lock().await.find_by_id(id))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.staged.lock().await.find_all())
    }

    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        self.staged.lock().await.save(user)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError> {
        self.staged.lock().await.delete_by_id(id);
        Ok(())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.staged.lock().await.exists_by_email(email))
    }
}

#[async_trait]
impl UserTransaction for InMemoryUserTransaction {
    async fn commit(self) -> Result<(), RepositoryError> {
        let Self { mut guard, staged } = self;
        *guard = staged.into_inner();
        Ok(())
    }
}

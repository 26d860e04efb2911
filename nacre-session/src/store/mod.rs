//! Local Identity Store
//!
//! Durable records for users, employees and branches over an embedded
//! SurrealDB. Read/write only; reconciliation logic lives in
//! [`crate::session`].

pub mod branch;
pub mod employee;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use branch::BranchRepository;
pub use employee::EmployeeRepository;
pub use user::UserRepository;

use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Handle to the local identity store and its repositories
#[derive(Clone)]
pub struct IdentityStore {
    employees: EmployeeRepository,
    users: UserRepository,
    branches: BranchRepository,
}

impl IdentityStore {
    /// Open (or create) the on-disk store under `path`
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let db = Surreal::new::<RocksDb>(path.to_string_lossy().into_owned()).await?;
        Self::with_db(db).await
    }

    /// In-memory store, used in tests
    pub async fn open_in_memory() -> StoreResult<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        Self::with_db(db).await
    }

    async fn with_db(db: Surreal<Db>) -> StoreResult<Self> {
        db.use_ns("nacre").use_db("identity").await?;
        Ok(Self {
            employees: EmployeeRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            branches: BranchRepository::new(db),
        })
    }

    pub fn employees(&self) -> &EmployeeRepository {
        &self.employees
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn branches(&self) -> &BranchRepository {
        &self.branches
    }
}

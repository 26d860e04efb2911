//! User (credential) Repository

use super::{BaseRepository, StoreError, StoreResult, serde_helpers};
use serde::{Deserialize, Serialize};
use shared::models::{PermissionSet, Role, User, UserCreate};
use std::collections::BTreeMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// User row matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub username: String,
    #[serde(default)]
    pub secret_hash: Option<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    pub role: Role,
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub permissions_by_branch: BTreeMap<String, PermissionSet>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl UserRecord {
    pub fn into_model(self) -> User {
        User {
            id: self.id.map(|t| t.to_string()).unwrap_or_default(),
            username: self.username,
            secret_hash: self.secret_hash,
            employee_id: self.employee.to_string(),
            role: self.role,
            permissions: self.permissions,
            permissions_by_branch: self.permissions_by_branch,
            active: self.is_active,
        }
    }
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by username (case-insensitive)
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let username = username.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM user \
                 WHERE string::lowercase(username) = string::lowercase($username) \
                 LIMIT 1",
            )
            .bind(("username", username))
            .await?;
        let records: Vec<UserRecord> = result.take(0)?;
        Ok(records.into_iter().next().map(UserRecord::into_model))
    }

    /// Find the credential record bound to an employee
    pub async fn find_by_employee(&self, employee_id: &str) -> StoreResult<Option<User>> {
        let employee: RecordId = employee_id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", employee_id)))?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE employee = $employee LIMIT 1")
            .bind(("employee", employee))
            .await?;
        let records: Vec<UserRecord> = result.take(0)?;
        Ok(records.into_iter().next().map(UserRecord::into_model))
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> StoreResult<User> {
        // Usernames are unique, case-insensitively
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(StoreError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let employee: RecordId = data
            .employee_id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", data.employee_id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    secret_hash = $secret_hash,
                    employee = $employee,
                    role = $role,
                    permissions = $permissions,
                    permissions_by_branch = $permissions_by_branch,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("secret_hash", data.secret_hash))
            .bind(("employee", employee))
            .bind(("role", data.role))
            .bind(("permissions", data.permissions))
            .bind(("permissions_by_branch", data.permissions_by_branch))
            .await?;

        let created: Option<UserRecord> = result.take(0)?;
        created
            .map(UserRecord::into_model)
            .ok_or_else(|| StoreError::Database("Failed to create user".to_string()))
    }

    /// Persist a secret digest for a user
    pub async fn set_secret_hash(&self, id: &str, digest: &str) -> StoreResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET secret_hash = $digest")
            .bind(("thing", thing))
            .bind(("digest", digest.to_string()))
            .await?;
        Ok(())
    }

    /// Set the active flag
    pub async fn set_active(&self, id: &str, active: bool) -> StoreResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = $active")
            .bind(("thing", thing))
            .bind(("active", active))
            .await?;
        Ok(())
    }

    /// Replace a user's stored permission grant
    pub async fn update_permissions(&self, id: &str, permissions: &PermissionSet) -> StoreResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| StoreError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET permissions = $permissions")
            .bind(("thing", thing))
            .bind(("permissions", permissions.clone()))
            .await?;
        Ok(())
    }
}

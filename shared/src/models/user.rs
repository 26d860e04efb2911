//! User (credential) Model

use super::{PermissionSet, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An authentication principal bound to exactly one employee.
///
/// `secret_hash` is nullable: a record without one cannot authenticate
/// except through the master-admin default-secret bootstrap. Persisted
/// `permissions` are never null; absence normalizes to the empty set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Unique, matched case-insensitively
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_hash: Option<String>,
    pub employee_id: String,
    /// Mirrors or overrides the employee's role for authorization
    pub role: Role,
    #[serde(default)]
    pub permissions: PermissionSet,
    /// Branch-scoped permission subsets, keyed by branch id
    #[serde(default)]
    pub permissions_by_branch: BTreeMap<String, PermissionSet>,
    pub active: bool,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    #[serde(default)]
    pub secret_hash: Option<String>,
    pub employee_id: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub permissions_by_branch: BTreeMap<String, PermissionSet>,
}

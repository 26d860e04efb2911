//! Client-related types shared between the session core and the remote
//! identity service.
//!
//! Common request/response types used in API communication.

use crate::models::{PermissionSet, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Token verification response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user: UserInfo,
}

/// User information as reported by the remote identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: Role,
    /// Explicit override; the master admin role implies this regardless
    #[serde(default)]
    pub is_master_admin: bool,
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub permissions_by_branch: BTreeMap<String, PermissionSet>,
    pub employee: EmployeeInfo,
}

/// Employee projection carried alongside the remote user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInfo {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub branch_ids: Option<Vec<String>>,
}

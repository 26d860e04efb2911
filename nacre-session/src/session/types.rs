//! Session Types

use serde::{Deserialize, Serialize};
use shared::models::{PermissionSet, Role};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Which identity source produced the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOrigin {
    /// Remote credential login
    Remote,
    /// Local (offline) credential login
    Local,
    /// Process-start restore of a remote token
    RestoredRemote,
    /// Process-start restore of the cached local descriptor
    RestoredLocal,
}

/// Authorization-relevant projection of the logged-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub is_master_admin: bool,
    pub permissions: PermissionSet,
    #[serde(default)]
    pub permissions_by_branch: BTreeMap<String, PermissionSet>,
}

/// Employee projection carried on the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub branch_ids: Option<Vec<String>>,
}

/// The resolved outcome of reconciliation.
///
/// Exactly one is live at a time; establishing a new one fully replaces
/// the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSession {
    pub user: SessionUser,
    pub employee: EmployeeSummary,
    /// Present only when a remote source authenticated
    #[serde(default)]
    pub remote_token: Option<String>,
    pub origin: SessionOrigin,
    /// Distinguishes login attempts; the background token fetch refuses
    /// to touch a session from a different attempt
    pub attempt_id: Uuid,
    pub logged_in_at: i64,
}

impl ActiveSession {
    pub fn has_permission(&self, token: &str) -> bool {
        self.user.permissions.allows(token)
    }
}

//! Employee Model

use super::Role;
use serde::{Deserialize, Serialize};

/// A person who may work at the business.
///
/// `branch_id` is a denormalized convenience field: for multi-branch roles
/// it mirrors the first entry of `branch_ids`, which is the authoritative
/// list. Writers keep the two in sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub branch_ids: Option<Vec<String>>,
    /// Short staff code, scannable at the login surface
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    pub active: bool,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub branch_ids: Option<Vec<String>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
}

//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Employee role (RBAC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Seller,
    Manager,
    Admin,
    MasterAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Seller => "seller",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::MasterAdmin => "master_admin",
        }
    }

    /// Roles that may be assigned to several branches at once.
    /// All other roles carry at most a single branch assignment.
    pub fn is_multi_branch(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin | Role::MasterAdmin)
    }

    pub fn is_master_admin(&self) -> bool {
        matches!(self, Role::MasterAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

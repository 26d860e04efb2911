//! Permission Resolver
//!
//! Role-to-permission defaults. `resolve` yields the canonical grant for a
//! role; `is_customized` reports whether a stored grant drifted from that
//! default. Customization detection is for presentation and audit only;
//! authorization always consults the user's own stored permissions.

use shared::models::{PermissionSet, Role};

/// Configurable permission list
///
/// Does not include "all", which is the system-level grant reserved for
/// admin and master admin.
pub const ALL_PERMISSIONS: &[&str] = &[
    // === Module permissions ===
    "catalog:manage",   // agencies, sellers, guides, products
    "branches:manage",  // business locations
    "printers:manage",  // printer and ticket configuration
    "settings:manage",  // system settings
    "backups:manage",   // backup import/export
    "reports:view",     // sales reports
    // === Sensitive operations ===
    "orders:void",
    "orders:discount",
    "orders:refund",
    "orders:modify_price",
    "cash_drawer:open",
];

/// Manager default: every configurable permission
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = ALL_PERMISSIONS;

/// Seller default
pub const DEFAULT_SELLER_PERMISSIONS: &[&str] = &["reports:view", "cash_drawer:open"];

/// Plain employee default: basic POS operation only, no extra grants
pub const DEFAULT_EMPLOYEE_PERMISSIONS: &[&str] = &[];

/// Canonical permission set for a role
pub fn resolve(role: Role) -> PermissionSet {
    match role {
        Role::Admin | Role::MasterAdmin => PermissionSet::All,
        Role::Manager => PermissionSet::from_tokens(DEFAULT_MANAGER_PERMISSIONS.iter().copied()),
        Role::Seller => PermissionSet::from_tokens(DEFAULT_SELLER_PERMISSIONS.iter().copied()),
        Role::Employee => PermissionSet::from_tokens(DEFAULT_EMPLOYEE_PERMISSIONS.iter().copied()),
    }
}

/// Whether a stored grant differs from the role default
pub fn is_customized(role: Role, permissions: &PermissionSet) -> bool {
    resolve(role) != *permissions
}

/// Validate a permission string
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || permission == shared::models::permission_set::ALL_SENTINEL
        || permission.ends_with(":*")
}

//! Domain Models

pub mod branch;
pub mod employee;
pub mod permission_set;
pub mod role;
pub mod user;

// Re-exports
pub use branch::{Branch, BranchCreate};
pub use employee::{Employee, EmployeeCreate};
pub use permission_set::PermissionSet;
pub use role::Role;
pub use user::{User, UserCreate};

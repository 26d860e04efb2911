//! Shared types for the Nacre POS suite
//!
//! Domain models and API DTOs used across the session core and the
//! remote identity service client.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

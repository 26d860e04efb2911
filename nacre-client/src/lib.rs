//! Remote identity service client for the Nacre POS suite
//!
//! Thin HTTP adapter over the backoffice authentication API. The
//! [`RemoteIdentity`] trait is the seam the session core programs
//! against; [`HttpRemoteClient`] is the production implementation.

pub mod error;
pub mod http;
pub mod remote;

pub use error::{ClientError, ClientResult};
pub use http::HttpRemoteClient;
pub use remote::RemoteIdentity;

//! Core Components
//!
//! HTTP transport, query encoding and OIDC discovery.

pub mod discovery;
pub mod query;
pub mod transport;

pub use discovery::*;
pub use query::*;
pub use transport::*;

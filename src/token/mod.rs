//! Token Management
//!
//! Access-token cache, issuance and resolution.

pub mod cache;
pub mod issuer;
pub mod manager;

pub use cache::*;
pub use issuer::*;
pub use manager::*;

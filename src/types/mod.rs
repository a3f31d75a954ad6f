//! Hubstaff Types
//!
//! Configuration, credentials and wire types.

pub mod config;
pub mod request;
pub mod token;

pub use config::*;
pub use request::*;
pub use token::*;

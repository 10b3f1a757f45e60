//! Common types for the ESP workflow demo
//!
//! Holds the pieces every other crate needs: the redacting `Secret` wrapper,
//! the two-tier credential context, and the configuration error type.

mod credentials;
mod error;
mod secret;

pub use credentials::{Credentials, Scope, is_placeholder};
pub use error::{Error, Result};
pub use secret::Secret;

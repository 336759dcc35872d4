//! Repository implementations module.
//!
//! Currently a single backend:
//! - `local`: In-memory implementation for unit testing and local development
pub mod local;

pub use local::LocalRepository;

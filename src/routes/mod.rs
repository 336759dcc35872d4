//! Route-specific response types.
//!
//! Each submodule defines the output shapes for one endpoint family plus a
//! route-name constant, forming the typed contract re-exported through
//! [`crate::api`]. Handlers in [`crate::http`] and the service layer both
//! build against these definitions, so a shape change is a compile error on
//! both sides.

pub mod analytics;
pub mod reports;
pub mod scholarship;
pub mod trends;

//! Business logic services.
//!
//! Pure computation lives here, separated from the repository and HTTP
//! layers: scholarship evaluation, analytics aggregation, trend series,
//! report export, the face-matching stub and the session store.

pub mod analytics;
pub mod face_match;
pub mod reports;
pub mod scholarship;
pub mod sessions;
pub mod trends;

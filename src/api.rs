//! Public API surface for the backend.
//!
//! This file consolidates the typed contract of the HTTP API: the identifier
//! newtypes and the response shapes defined per endpoint family under
//! [`crate::routes`]. All types derive Serialize/Deserialize so the same
//! definitions describe both the server output and the client input.

pub use crate::routes::analytics::DashboardAnalytics;
pub use crate::routes::analytics::DistrictSummary;
pub use crate::routes::analytics::SchoolSummary;
pub use crate::routes::analytics::ShortageRow;
pub use crate::routes::reports::ComplaintReportRow;
pub use crate::routes::reports::ReportFormat;
pub use crate::routes::reports::ReportType;
pub use crate::routes::reports::StudentReportRow;
pub use crate::routes::reports::TeacherReportRow;
pub use crate::routes::scholarship::EvaluationResult;
pub use crate::routes::trends::MonthPoint;
pub use crate::routes::trends::StudentTrends;
pub use crate::routes::trends::TermPoint;

use serde::{Deserialize, Serialize};

/// User identifier (document primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// School identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchoolId(pub i64);

/// Student identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub i64);

/// Teacher identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeacherId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

impl_id!(UserId);
impl_id!(SchoolId);
impl_id!(StudentId);
impl_id!(TeacherId);

use serde::{Deserialize, Serialize};

use crate::api::SchoolId;

// =========================================================
// Analytics types + routes
// =========================================================

/// One school with its complaint count attached.
///
/// Rows are sorted by school id ascending; schools with no complaints get an
/// explicit `complaints: 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSummary {
    pub id: SchoolId,
    pub name: String,
    pub district: Option<String>,
    pub performance_score: f64,
    pub teacher_shortage: bool,
    pub complaints: u64,
}

/// Teacher shortage for one `(district, subject)` pair, summed across schools.
///
/// Schools without a district surface as `district: null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageRow {
    pub district: Option<String>,
    pub subject: String,
    pub count: i64,
}

/// Rollup of all schools sharing one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSummary {
    pub district: String,
    pub schools: u64,
    /// Mean performance score, rounded to one decimal.
    pub avg_performance: f64,
    pub teacher_shortages: u64,
}

/// Top-level dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub total_schools: u64,
    pub total_students: u64,
    pub total_teachers: u64,
    pub average_attendance: f64,
    pub teacher_shortage_count: u64,
    pub recent_complaints: u64,
    pub by_district: Vec<DistrictSummary>,
}

/// Route name constants for the analytics endpoints.
pub const GET_SCHOOLS_SUMMARY: &str = "schools_summary";
pub const GET_TEACHER_SHORTAGES: &str = "teacher_shortages_by_district";
pub const GET_DISTRICT_SUMMARY: &str = "district_summary";
pub const GET_DASHBOARD_ANALYTICS: &str = "dashboard_analytics";

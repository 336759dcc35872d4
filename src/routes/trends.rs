use serde::{Deserialize, Serialize};

// =========================================================
// Student trends types + route
// =========================================================

/// Academic average for one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermPoint {
    pub term: String,
    pub avg_marks: f64,
}

/// Attendance average for one `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPoint {
    pub month: String,
    pub avg_attendance: f64,
}

/// Complete student trends dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTrends {
    pub academic_by_term: Vec<TermPoint>,
    pub attendance_by_month: Vec<MonthPoint>,
}

/// Route name constant for student trends.
pub const GET_STUDENT_TRENDS: &str = "get_student_trends";

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::{SchoolId, StudentId, UserId};
use crate::models::{ComplaintStatus, ComplaintType};

// =========================================================
// Report export types + route
// =========================================================

/// Collections that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Schools,
    Teachers,
    Students,
    Complaints,
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "schools" => Ok(Self::Schools),
            "teachers" => Ok(Self::Teachers),
            "students" => Ok(Self::Students),
            "complaints" => Ok(Self::Complaints),
            other => Err(format!("Unknown report type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

/// Teacher columns included in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherReportRow {
    pub id: i64,
    pub user_id: UserId,
    pub school_id: SchoolId,
    pub subject: String,
    pub assigned_classes: Vec<String>,
}

/// Student columns included in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportRow {
    pub id: StudentId,
    pub user_id: UserId,
    pub school_id: SchoolId,
    pub grade: String,
    pub marks: f64,
    pub attendance_rate: f64,
    pub scholarship_eligible: bool,
}

/// Complaint columns included in exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintReportRow {
    pub id: i64,
    pub school_id: Option<SchoolId>,
    pub title: String,
    pub status: ComplaintStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub classification: Option<ComplaintType>,
}

/// Route name constant for report export.
pub const EXPORT_REPORT: &str = "export_report";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_parsing() {
        assert_eq!("schools".parse::<ReportType>().unwrap(), ReportType::Schools);
        assert_eq!("complaints".parse::<ReportType>().unwrap(), ReportType::Complaints);
        assert!("grades".parse::<ReportType>().is_err());
    }

    #[test]
    fn test_report_format_default_is_csv() {
        assert_eq!(ReportFormat::default(), ReportFormat::Csv);
    }

    #[test]
    fn test_student_row_column_order() {
        let row = StudentReportRow {
            id: StudentId::new(1),
            user_id: UserId::new(2),
            school_id: SchoolId::new(3),
            grade: "4th".to_string(),
            marks: 70.0,
            attendance_rate: 85.0,
            scholarship_eligible: false,
        };
        let value = serde_json::to_value(&row).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        // CSV headers come from this order
        assert_eq!(
            keys,
            ["id", "userId", "schoolId", "grade", "marks", "attendanceRate", "scholarshipEligible"]
        );
    }
}

//! Domain entities and insert payloads.
//!
//! Every persisted document type lives here, together with the `New*` insert
//! payloads and the `*Patch` partial-update payloads accepted by the API.
//! Field names serialize as camelCase to match the JSON wire contract used
//! by the web frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{SchoolId, StudentId, TeacherId, UserId};

/// Account role. Determines which parts of the API a session may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    GovAdmin,
    SchoolAdmin,
    Teacher,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Daily attendance outcome for one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Pending,
    Resolved,
}

/// Coarse complaint category assigned at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintType {
    Harassment,
    Infrastructure,
    Academic,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// One understaffed subject within a school.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortageDetail {
    pub subject: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub district: Option<String>,
    pub performance_score: f64,
    pub teacher_shortage: bool,
    #[serde(default)]
    pub shortage_details: Vec<ShortageDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    pub school_id: SchoolId,
    pub registration_no: String,
    pub father_name: String,
    pub mother_name: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub address: String,
    pub permanent_address: String,
    pub gender: Gender,
    pub age: i64,
    pub parent_mobile_number: String,
    pub grade: String,
    /// Attendance percentage in [0,100] (by convention, not enforced).
    pub attendance_rate: f64,
    /// Marks percentage in [0,100] (by convention, not enforced).
    pub marks: f64,
    /// Cached flag only; the evaluator recomputes eligibility on demand.
    pub scholarship_eligible: bool,
    #[serde(default)]
    pub performance_summary: Option<String>,
    #[serde(default)]
    pub face_image_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub user_id: UserId,
    pub school_id: SchoolId,
    pub subject: String,
    #[serde(default)]
    pub assigned_classes: Vec<String>,
    #[serde(default)]
    pub face_image_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub student_id: StudentId,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub face_verified: bool,
    #[serde(default)]
    pub marked_by_teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: i64,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    #[serde(default)]
    pub student_id: Option<StudentId>,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    #[serde(default)]
    pub classification: Option<ComplaintType>,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Hash-anchored term report used for credential verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: i64,
    pub student_id: StudentId,
    pub term: String,
    pub report_hash: String,
    pub is_verified: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-district exception to the global scholarship thresholds.
///
/// A missing field falls back to the global value for that field only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictOverride {
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_marks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_attendance: Option<f64>,
}

/// Singleton scholarship threshold configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRule {
    pub id: i64,
    pub min_marks: f64,
    pub min_attendance: f64,
    #[serde(default)]
    pub district_overrides: Vec<DistrictOverride>,
    pub updated_at: DateTime<Utc>,
}

impl ScholarshipRule {
    pub const DEFAULT_MIN_MARKS: f64 = 85.0;
    pub const DEFAULT_MIN_ATTENDANCE: f64 = 90.0;

    /// Default rule created lazily on first read.
    pub fn default_rule(now: DateTime<Utc>) -> Self {
        Self {
            id: 1,
            min_marks: Self::DEFAULT_MIN_MARKS,
            min_attendance: Self::DEFAULT_MIN_ATTENDANCE,
            district_overrides: Vec::new(),
            updated_at: now,
        }
    }
}

/// Partial update for the scholarship rule. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRulePatch {
    #[serde(default)]
    pub min_marks: Option<f64>,
    #[serde(default)]
    pub min_attendance: Option<f64>,
    #[serde(default)]
    pub district_overrides: Option<Vec<DistrictOverride>>,
}

// ==================== Insert payloads ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// User payload embedded in student/teacher creation; the role is implied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLinkedUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl NewLinkedUser {
    pub fn with_role(self, role: Role) -> NewUser {
        NewUser {
            username: self.username,
            password: self.password,
            role,
            school_id: self.school_id,
            name: self.name,
            avatar_url: self.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchool {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub teacher_shortage: Option<bool>,
    #[serde(default)]
    pub shortage_details: Option<Vec<ShortageDetail>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub teacher_shortage: Option<bool>,
    #[serde(default)]
    pub shortage_details: Option<Vec<ShortageDetail>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub user_id: UserId,
    pub school_id: SchoolId,
    pub registration_no: String,
    pub father_name: String,
    pub mother_name: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub address: String,
    pub permanent_address: String,
    pub gender: Gender,
    pub age: i64,
    pub parent_mobile_number: String,
    pub grade: String,
    #[serde(default)]
    pub attendance_rate: Option<f64>,
    #[serde(default)]
    pub marks: Option<f64>,
    #[serde(default)]
    pub scholarship_eligible: Option<bool>,
    #[serde(default)]
    pub performance_summary: Option<String>,
    #[serde(default)]
    pub face_image_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacher {
    pub user_id: UserId,
    pub school_id: SchoolId,
    pub subject: String,
    #[serde(default)]
    pub assigned_classes: Option<Vec<String>>,
    #[serde(default)]
    pub face_image_base64: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatch {
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub assigned_classes: Option<Vec<String>>,
    #[serde(default)]
    pub face_image_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub face_verified: Option<bool>,
    #[serde(default)]
    pub marked_by_teacher_id: Option<TeacherId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    #[serde(default)]
    pub school_id: Option<SchoolId>,
    #[serde(default)]
    pub student_id: Option<StudentId>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub classification: Option<ComplaintType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredentialRecord {
    pub student_id: StudentId,
    pub term: String,
    pub report_hash: String,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub explanation: Option<String>,
}

// ==================== Joined views ====================

/// Student record with its linked account attached, as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentWithUser {
    #[serde(flatten)]
    pub student: Student,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Teacher record with its linked account attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherWithUser {
    #[serde(flatten)]
    pub teacher: Teacher,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::GovAdmin).unwrap(), "\"gov_admin\"");
        assert_eq!(serde_json::to_string(&Role::SchoolAdmin).unwrap(), "\"school_admin\"");
    }

    #[test]
    fn test_school_serializes_camel_case() {
        let school = School {
            id: crate::api::SchoolId::new(1),
            name: "Springfield High".to_string(),
            location: "Springfield".to_string(),
            district: Some("Central".to_string()),
            performance_score: 85.0,
            teacher_shortage: true,
            shortage_details: vec![ShortageDetail { subject: "Math".to_string(), count: 2 }],
        };
        let json = serde_json::to_value(&school).unwrap();
        assert_eq!(json["performanceScore"], 85.0);
        assert_eq!(json["teacherShortage"], true);
        assert_eq!(json["shortageDetails"][0]["subject"], "Math");
    }

    #[test]
    fn test_district_override_omits_absent_fields() {
        let o = DistrictOverride {
            district: "Central".to_string(),
            min_marks: Some(70.0),
            min_attendance: None,
        };
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["minMarks"], 70.0);
        assert!(json.get("minAttendance").is_none());
    }

    #[test]
    fn test_rule_patch_deserializes_partial_body() {
        let patch: ScholarshipRulePatch =
            serde_json::from_str(r#"{"minAttendance": 95}"#).unwrap();
        assert_eq!(patch.min_attendance, Some(95.0));
        assert!(patch.min_marks.is_none());
        assert!(patch.district_overrides.is_none());
    }

    #[test]
    fn test_default_rule_thresholds() {
        let rule = ScholarshipRule::default_rule(chrono::Utc::now());
        assert_eq!(rule.id, 1);
        assert_eq!(rule.min_marks, 85.0);
        assert_eq!(rule.min_attendance, 90.0);
        assert!(rule.district_overrides.is_empty());
    }

    #[test]
    fn test_student_with_user_flattens() {
        let student = Student {
            id: crate::api::StudentId::new(1),
            user_id: crate::api::UserId::new(2),
            school_id: crate::api::SchoolId::new(3),
            registration_no: "R-100".to_string(),
            father_name: "Homer".to_string(),
            mother_name: "Marge".to_string(),
            mobile_number: None,
            address: "742 Evergreen Terrace".to_string(),
            permanent_address: "742 Evergreen Terrace".to_string(),
            gender: Gender::Male,
            age: 10,
            parent_mobile_number: "555-0100".to_string(),
            grade: "4th".to_string(),
            attendance_rate: 85.0,
            marks: 70.0,
            scholarship_eligible: false,
            performance_summary: None,
            face_image_base64: None,
        };
        let json = serde_json::to_value(StudentWithUser { student, user: None }).unwrap();
        // flattened: student fields at the top level, no user key when absent
        assert_eq!(json["registrationNo"], "R-100");
        assert!(json.get("user").is_none());
    }
}

//! Request and response DTOs for the HTTP API.
//!
//! Domain entities serialize directly where the wire shape matches; the
//! types here cover request bodies, query strings and the few response
//! envelopes that are not entities.

use serde::{Deserialize, Serialize};

use crate::api::{SchoolId, StudentId};
use crate::models::{CredentialRecord, NewLinkedUser, NewStudent, NewTeacher, Role};
use crate::routes::reports::ReportFormat;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: "ok".to_string(),
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Students / Teachers
// =============================================================================

/// Student creation body; `user` optionally creates the linked account in
/// the same request (its id then overrides `userId`).
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(flatten)]
    pub student: NewStudent,
    #[serde(default)]
    pub user: Option<NewLinkedUser>,
}

/// Teacher creation body, same embedding rule as students.
#[derive(Debug, Deserialize)]
pub struct CreateTeacherRequest {
    #[serde(flatten)]
    pub teacher: NewTeacher,
    #[serde(default)]
    pub user: Option<NewLinkedUser>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceDataRequest {
    pub image_base64: String,
}

// =============================================================================
// Attendance / face verification
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceVerifyRequest {
    pub student_id: StudentId,
    pub image_base64: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceVerifyResponse {
    pub success: bool,
    pub match_confidence: f64,
    pub student_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceCompareRequest {
    pub stored_image: String,
    pub test_image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaceCompareResponse {
    #[serde(rename = "match")]
    pub matched: bool,
    pub confidence: f64,
}

// =============================================================================
// Credentials
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyCredentialRequest {
    pub hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCredentialResponse {
    pub is_valid: bool,
    pub details: CredentialRecord,
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

// =============================================================================
// Scholarship
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub student_id: StudentId,
}

// =============================================================================
// Query strings
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DistrictQuery {
    pub district: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolScopedQuery {
    pub school_id: Option<SchoolId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub student_id: Option<StudentId>,
    pub school_id: Option<SchoolId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    pub role: Option<Role>,
    pub q: Option<String>,
    pub school_id: Option<SchoolId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsQuery {
    pub student_id: Option<StudentId>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Report type name; unknown values yield an empty report.
    #[serde(rename = "type", default = "default_report_type")]
    pub report_type: String,
    #[serde(default)]
    pub format: ReportFormat,
    #[serde(default)]
    pub district: Option<String>,
}

fn default_report_type() -> String {
    "schools".to_string()
}

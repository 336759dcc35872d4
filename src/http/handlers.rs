//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. Session-gated endpoints read the `session`
//! cookie and resolve it through the in-memory session store.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    AttendanceQuery, CreateStudentRequest, CreateTeacherRequest, CredentialsQuery, DistrictQuery,
    EvaluateRequest, FaceCompareRequest, FaceCompareResponse, FaceDataRequest, FaceVerifyRequest,
    FaceVerifyResponse, HealthResponse, LoginRequest, MessageResponse, ReportQuery,
    SchoolScopedQuery, UpdateRoleRequest, UsersQuery, VerifyCredentialRequest,
    VerifyCredentialResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{SchoolId, StudentId, TeacherId, UserId};
use crate::db::repository::UserFilter;
use crate::db::services as db_services;
use crate::models::{
    Attendance, AttendanceStatus, Complaint, Course, CredentialRecord, NewAttendance,
    NewComplaint, NewSchool, NewUser, Role, ScholarshipRule, ScholarshipRulePatch, School,
    SchoolPatch, StudentWithUser, TeacherPatch, TeacherWithUser, User,
};
use crate::routes::analytics::{DashboardAnalytics, SchoolSummary, ShortageRow};
use crate::routes::reports::ReportFormat;
use crate::routes::scholarship::EvaluationResult;
use crate::routes::trends::StudentTrends;
use crate::services::{analytics, face_match, reports, scholarship, trends};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Session helpers
// =============================================================================

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == "session").then(|| value.to_string())
    })
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Unauthorized".to_string())
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = session_token(headers).ok_or_else(unauthorized)?;
    let user_id = state.sessions.get(&token).ok_or_else(unauthorized)?;
    state
        .repository
        .get_user(user_id)
        .await?
        .ok_or_else(unauthorized)
}

/// Resolve the session and require the `gov_admin` role.
async fn require_gov(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let user = current_user(state, headers).await?;
    if user.role != Role::GovAdmin {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }
    Ok(user)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Auth
// =============================================================================

/// POST /api/auth/login
///
/// Open a session. Unknown usernames auto-create an account with a role
/// inferred from the username, which keeps demo flows friction-free.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = state
        .repository
        .get_user_by_username(&request.username)
        .await?;
    let user = match existing {
        Some(user) => user,
        None => {
            let role = match request.username.as_str() {
                "teacher" => Role::Teacher,
                "student" => Role::Student,
                "school_admin" => Role::SchoolAdmin,
                _ => Role::GovAdmin,
            };
            state
                .repository
                .create_user(NewUser {
                    username: request.username.clone(),
                    password: request.password,
                    role,
                    school_id: None,
                    name: request.username,
                    avatar_url: None,
                })
                .await?
        }
    };

    let token = state.sessions.create(user.id);
    let cookie = format!("session={}; Path=/; HttpOnly; SameSite=Lax", token);
    Ok(([(header::SET_COOKIE, cookie)], Json(user)))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult<User> {
    Ok(Json(current_user(&state, &headers).await?))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    let cookie = "session=; Path=/; HttpOnly; Max-Age=0".to_string();
    Ok(([(header::SET_COOKIE, cookie)], Json(MessageResponse::ok())))
}

// =============================================================================
// Schools
// =============================================================================

/// GET /api/schools
pub async fn list_schools(State(state): State<AppState>) -> HandlerResult<Vec<School>> {
    Ok(Json(state.repository.get_schools().await?))
}

/// GET /api/schools/{id}
pub async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<School> {
    let school = state
        .repository
        .get_school(SchoolId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(school))
}

/// POST /api/schools
pub async fn create_school(
    State(state): State<AppState>,
    Json(request): Json<NewSchool>,
) -> Result<(StatusCode, Json<School>), AppError> {
    let school = state.repository.create_school(request).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

/// PUT /api/schools/{id}
pub async fn update_school(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<SchoolPatch>,
) -> HandlerResult<School> {
    let updated = state
        .repository
        .update_school(SchoolId::new(id), patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(updated))
}

/// DELETE /api/schools/{id}
pub async fn delete_school(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<MessageResponse> {
    if !state.repository.delete_school(SchoolId::new(id)).await? {
        return Err(AppError::NotFound("Not found".to_string()));
    }
    Ok(Json(MessageResponse {
        message: "deleted".to_string(),
    }))
}

// =============================================================================
// Students
// =============================================================================

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<SchoolScopedQuery>,
) -> HandlerResult<Vec<StudentWithUser>> {
    let students =
        db_services::students_with_users(state.repository.as_ref(), query.school_id).await?;
    Ok(Json(students))
}

/// GET /api/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<StudentWithUser> {
    let student = db_services::student_with_user(state.repository.as_ref(), StudentId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(student))
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentWithUser>), AppError> {
    let created = db_services::create_student_with_account(
        state.repository.as_ref(),
        request.student,
        request.user,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/students/{id}/face-data
pub async fn set_student_face_data(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<FaceDataRequest>,
) -> HandlerResult<MessageResponse> {
    let updated = state
        .repository
        .set_student_face_data(StudentId::new(id), request.image_base64)
        .await?;
    if !updated {
        return Err(AppError::NotFound("Not found".to_string()));
    }
    Ok(Json(MessageResponse::ok()))
}

// =============================================================================
// Teachers
// =============================================================================

/// GET /api/teachers
pub async fn list_teachers(
    State(state): State<AppState>,
    Query(query): Query<SchoolScopedQuery>,
) -> HandlerResult<Vec<TeacherWithUser>> {
    let teachers =
        db_services::teachers_with_users(state.repository.as_ref(), query.school_id).await?;
    Ok(Json(teachers))
}

/// GET /api/teachers/{id}
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<TeacherWithUser> {
    let teacher = db_services::teacher_with_user(state.repository.as_ref(), TeacherId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(teacher))
}

/// POST /api/teachers
pub async fn create_teacher(
    State(state): State<AppState>,
    Json(request): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherWithUser>), AppError> {
    let created = db_services::create_teacher_with_account(
        state.repository.as_ref(),
        request.teacher,
        request.user,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/teachers/{id}
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TeacherPatch>,
) -> HandlerResult<crate::models::Teacher> {
    let updated = state
        .repository
        .update_teacher(TeacherId::new(id), patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(updated))
}

/// DELETE /api/teachers/{id}
///
/// Deletes the teacher and its linked account.
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<MessageResponse> {
    if !state.repository.delete_teacher(TeacherId::new(id)).await? {
        return Err(AppError::NotFound("Not found".to_string()));
    }
    Ok(Json(MessageResponse {
        message: "deleted".to_string(),
    }))
}

/// POST /api/teachers/{id}/face-data
pub async fn set_teacher_face_data(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<FaceDataRequest>,
) -> HandlerResult<MessageResponse> {
    let updated = state
        .repository
        .set_teacher_face_data(TeacherId::new(id), request.image_base64)
        .await?;
    if !updated {
        return Err(AppError::NotFound("Not found".to_string()));
    }
    Ok(Json(MessageResponse::ok()))
}

// =============================================================================
// Attendance
// =============================================================================

/// GET /api/attendance
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> HandlerResult<Vec<Attendance>> {
    let records = state
        .repository
        .get_attendance(query.student_id, query.school_id)
        .await?;
    Ok(Json(records))
}

/// POST /api/attendance
pub async fn create_attendance(
    State(state): State<AppState>,
    Json(request): Json<NewAttendance>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let record = state.repository.create_attendance(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/attendance/face-verify
///
/// Verify a captured face against the student's stored reference image; on
/// a match a face-verified `present` attendance record is created.
pub async fn face_verify_attendance(
    State(state): State<AppState>,
    Json(request): Json<FaceVerifyRequest>,
) -> HandlerResult<FaceVerifyResponse> {
    let student = db_services::student_with_user(state.repository.as_ref(), request.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let Some(stored) = student.student.face_image_base64.as_deref() else {
        return Err(AppError::BadRequest(
            "No face data registered for this student".to_string(),
        ));
    };

    face_match::validate_face_image(&request.image_base64).map_err(AppError::BadRequest)?;

    let result = face_match::compare_faces(stored, &request.image_base64);
    if result.matched {
        state
            .repository
            .create_attendance(NewAttendance {
                student_id: request.student_id,
                status: AttendanceStatus::Present,
                face_verified: Some(true),
                marked_by_teacher_id: None,
            })
            .await?;
    }

    let student_name = student
        .user
        .map(|u| u.name)
        .unwrap_or_else(|| "Unknown".to_string());
    Ok(Json(FaceVerifyResponse {
        success: result.matched,
        match_confidence: result.confidence,
        student_name,
    }))
}

/// POST /api/face-test/compare
///
/// Manual comparison endpoint for testing face capture quality.
pub async fn face_test_compare(
    Json(request): Json<FaceCompareRequest>,
) -> HandlerResult<FaceCompareResponse> {
    if request.stored_image.is_empty() || request.test_image.is_empty() {
        return Err(AppError::BadRequest(
            "Both images are required".to_string(),
        ));
    }
    let result = face_match::compare_faces(&request.stored_image, &request.test_image);
    Ok(Json(FaceCompareResponse {
        matched: result.matched,
        confidence: result.confidence,
    }))
}

// =============================================================================
// Complaints / Courses / Credentials
// =============================================================================

/// GET /api/complaints
pub async fn list_complaints(State(state): State<AppState>) -> HandlerResult<Vec<Complaint>> {
    Ok(Json(state.repository.get_complaints().await?))
}

/// POST /api/complaints
pub async fn create_complaint(
    State(state): State<AppState>,
    Json(request): Json<NewComplaint>,
) -> Result<(StatusCode, Json<Complaint>), AppError> {
    let complaint = state.repository.create_complaint(request).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

/// GET /api/courses
pub async fn list_courses(State(state): State<AppState>) -> HandlerResult<Vec<Course>> {
    Ok(Json(state.repository.get_courses().await?))
}

/// GET /api/credentials
pub async fn list_credentials(
    State(state): State<AppState>,
    Query(query): Query<CredentialsQuery>,
) -> HandlerResult<Vec<CredentialRecord>> {
    let records = state
        .repository
        .get_credential_records(query.student_id)
        .await?;
    Ok(Json(records))
}

/// POST /api/credentials/verify
pub async fn verify_credential(
    State(state): State<AppState>,
    Json(request): Json<VerifyCredentialRequest>,
) -> HandlerResult<VerifyCredentialResponse> {
    let record = state
        .repository
        .find_credential_by_hash(&request.hash)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(VerifyCredentialResponse {
        is_valid: true,
        details: record,
    }))
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /api/dashboard/analytics
pub async fn dashboard_analytics(
    State(state): State<AppState>,
) -> HandlerResult<DashboardAnalytics> {
    let data = analytics::dashboard_analytics(state.repository.as_ref()).await?;
    Ok(Json(data))
}

/// GET /api/analytics/schools
pub async fn analytics_schools(
    State(state): State<AppState>,
    Query(query): Query<DistrictQuery>,
) -> HandlerResult<Vec<SchoolSummary>> {
    let data =
        analytics::schools_summary(state.repository.as_ref(), query.district.as_deref()).await?;
    Ok(Json(data))
}

/// GET /api/analytics/teachers/shortages
pub async fn analytics_teacher_shortages(
    State(state): State<AppState>,
    Query(query): Query<DistrictQuery>,
) -> HandlerResult<Vec<ShortageRow>> {
    let data = analytics::teacher_shortages_by_district(
        state.repository.as_ref(),
        query.district.as_deref(),
    )
    .await?;
    Ok(Json(data))
}

/// GET /api/analytics/trends/students
pub async fn analytics_student_trends(
    State(state): State<AppState>,
) -> HandlerResult<StudentTrends> {
    let data = trends::student_trends(state.repository.as_ref()).await?;
    Ok(Json(data))
}

// =============================================================================
// Scholarship
// =============================================================================

/// GET /api/scholarship/rules
pub async fn get_scholarship_rule(
    State(state): State<AppState>,
) -> HandlerResult<ScholarshipRule> {
    Ok(Json(state.repository.get_scholarship_rule().await?))
}

/// PUT /api/scholarship/rules
pub async fn update_scholarship_rule(
    State(state): State<AppState>,
    Json(patch): Json<ScholarshipRulePatch>,
) -> HandlerResult<ScholarshipRule> {
    let rule = scholarship::update_rule(state.repository.as_ref(), patch).await?;
    Ok(Json(rule))
}

/// POST /api/scholarship/evaluate
///
/// Always answers 200; an unknown student is reported through the result
/// body, not the status code.
pub async fn evaluate_scholarship(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> HandlerResult<EvaluationResult> {
    let result =
        scholarship::evaluate_student(state.repository.as_ref(), request.student_id).await?;
    Ok(Json(result))
}

// =============================================================================
// Admin (gov_admin only)
// =============================================================================

/// GET /api/admin/users
pub async fn admin_list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UsersQuery>,
) -> HandlerResult<Vec<User>> {
    require_gov(&state, &headers).await?;
    let users = state
        .repository
        .list_users(UserFilter {
            role: query.role,
            query: query.q,
            school_id: query.school_id,
        })
        .await?;
    Ok(Json(users))
}

/// PUT /api/admin/users/{id}/role
pub async fn admin_update_user_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRoleRequest>,
) -> HandlerResult<User> {
    require_gov(&state, &headers).await?;
    let user = state
        .repository
        .update_user_role(UserId::new(id), request.role)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;
    Ok(Json(user))
}

// =============================================================================
// Reports (gov_admin only)
// =============================================================================

/// GET /api/reports
///
/// Export one collection as CSV (default) or JSON. Unknown report types
/// yield an empty row set.
pub async fn export_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    require_gov(&state, &headers).await?;

    let rows = match query.report_type.parse() {
        Ok(report_type) => {
            reports::export_report(
                state.repository.as_ref(),
                report_type,
                query.district.as_deref(),
            )
            .await?
        }
        Err(_) => Vec::new(),
    };

    match query.format {
        ReportFormat::Json => Ok(Json(rows).into_response()),
        ReportFormat::Csv => {
            let csv = reports::to_csv(&rows);
            let response_headers = [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.csv\"", query.report_type),
                ),
            ];
            Ok((response_headers, csv).into_response())
        }
    }
}

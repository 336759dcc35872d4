//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Auth
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        .route("/auth/logout", post(handlers::logout))
        // Schools
        .route("/schools", get(handlers::list_schools))
        .route("/schools", post(handlers::create_school))
        .route("/schools/{id}", get(handlers::get_school))
        .route("/schools/{id}", put(handlers::update_school))
        .route("/schools/{id}", delete(handlers::delete_school))
        // Students
        .route("/students", get(handlers::list_students))
        .route("/students", post(handlers::create_student))
        .route("/students/{id}", get(handlers::get_student))
        .route("/students/{id}/face-data", post(handlers::set_student_face_data))
        // Teachers
        .route("/teachers", get(handlers::list_teachers))
        .route("/teachers", post(handlers::create_teacher))
        .route("/teachers/{id}", get(handlers::get_teacher))
        .route("/teachers/{id}", put(handlers::update_teacher))
        .route("/teachers/{id}", delete(handlers::delete_teacher))
        .route("/teachers/{id}/face-data", post(handlers::set_teacher_face_data))
        // Attendance
        .route("/attendance", get(handlers::list_attendance))
        .route("/attendance", post(handlers::create_attendance))
        .route("/attendance/face-verify", post(handlers::face_verify_attendance))
        .route("/face-test/compare", post(handlers::face_test_compare))
        // Complaints / courses / credentials
        .route("/complaints", get(handlers::list_complaints))
        .route("/complaints", post(handlers::create_complaint))
        .route("/courses", get(handlers::list_courses))
        .route("/credentials", get(handlers::list_credentials))
        .route("/credentials/verify", post(handlers::verify_credential))
        // Analytics
        .route("/dashboard/analytics", get(handlers::dashboard_analytics))
        .route("/analytics/schools", get(handlers::analytics_schools))
        .route("/analytics/teachers/shortages", get(handlers::analytics_teacher_shortages))
        .route("/analytics/trends/students", get(handlers::analytics_student_trends))
        // Scholarship
        .route("/scholarship/rules", get(handlers::get_scholarship_rule))
        .route("/scholarship/rules", put(handlers::update_scholarship_rule))
        .route("/scholarship/evaluate", post(handlers::evaluate_scholarship))
        // Admin (gov_admin only)
        .route("/admin/users", get(handlers::admin_list_users))
        .route("/admin/users/{id}/role", put(handlers::admin_update_user_role))
        // Reports (gov_admin only)
        .route("/reports", get(handlers::export_report));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        // Face images arrive as base64 JSON payloads.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}

//! Service-layer integration tests: full flows over a seeded in-memory
//! repository, without going through HTTP.

use std::sync::Arc;

use edusys_rust::api::StudentId;
use edusys_rust::db::repositories::LocalRepository;
use edusys_rust::db::repository::{
    SchoolRepository, StudentRepository, TeacherRepository, UserRepository,
};
use edusys_rust::db::seed_demo_data;
use edusys_rust::models::{DistrictOverride, NewLinkedUser, NewTeacher, ScholarshipRulePatch};
use edusys_rust::routes::reports::ReportType;
use edusys_rust::services::{reports, scholarship, trends};

async fn seeded_repo() -> Arc<LocalRepository> {
    let repo = Arc::new(LocalRepository::new());
    seed_demo_data(repo.as_ref()).await.unwrap();
    repo
}

#[tokio::test]
async fn test_district_override_flips_eligibility() {
    let repo = seeded_repo().await;

    // seeded student: marks 70, attendance 85, school in Central
    let before = scholarship::evaluate_student(repo.as_ref(), StudentId::new(1))
        .await
        .unwrap();
    assert!(!before.eligible);

    scholarship::update_rule(
        repo.as_ref(),
        ScholarshipRulePatch {
            district_overrides: Some(vec![DistrictOverride {
                district: "Central".to_string(),
                min_marks: Some(65.0),
                min_attendance: Some(80.0),
            }]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let after = scholarship::evaluate_student(repo.as_ref(), StudentId::new(1))
        .await
        .unwrap();
    assert!(after.eligible);
    assert_eq!(after.reason, "Meets thresholds (marks>=65, attendance>=80)");

    // evaluation never writes the cached flag back
    let student = repo
        .get_student(StudentId::new(1))
        .await
        .unwrap()
        .expect("seeded student");
    assert!(!student.scholarship_eligible);
}

#[tokio::test]
async fn test_rule_merge_keeps_overrides_across_updates() {
    let repo = seeded_repo().await;

    scholarship::update_rule(
        repo.as_ref(),
        ScholarshipRulePatch {
            district_overrides: Some(vec![DistrictOverride {
                district: "Central".to_string(),
                min_marks: Some(65.0),
                min_attendance: None,
            }]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // a later patch touching only the base thresholds leaves overrides alone
    let rule = scholarship::update_rule(
        repo.as_ref(),
        ScholarshipRulePatch {
            min_attendance: Some(92.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(rule.min_attendance, 92.0);
    assert_eq!(rule.district_overrides.len(), 1);
    assert_eq!(rule.district_overrides[0].district, "Central");
}

#[tokio::test]
async fn test_trends_over_seeded_store() {
    let repo = seeded_repo().await;
    let trends = trends::student_trends(repo.as_ref()).await.unwrap();

    // one seeded credential record for Fall 2023
    assert_eq!(trends.academic_by_term.len(), 1);
    assert_eq!(trends.academic_by_term[0].term, "Fall 2023");
    assert_eq!(trends.academic_by_term[0].avg_marks, 71.0);

    // no attendance is seeded
    assert!(trends.attendance_by_month.is_empty());
}

#[tokio::test]
async fn test_complaints_report_renders_as_csv() {
    let repo = seeded_repo().await;
    let rows = reports::export_report(repo.as_ref(), ReportType::Complaints, None)
        .await
        .unwrap();
    let csv = reports::to_csv(&rows);

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,schoolId,title,status,createdAt,classification")
    );
    let row = lines.next().expect("seeded complaint row");
    assert!(row.contains("\"Broken AC\""));
    assert!(row.contains("\"pending\""));
    assert!(row.contains("\"infrastructure\""));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_teacher_lifecycle_via_services() {
    let repo = seeded_repo().await;
    let school = repo.get_schools().await.unwrap()[0].clone();

    let created = edusys_rust::db::create_teacher_with_account(
        repo.as_ref(),
        NewTeacher {
            user_id: edusys_rust::api::UserId::new(0),
            school_id: school.id,
            subject: "Science".to_string(),
            assigned_classes: Some(vec!["6A".to_string()]),
            face_image_base64: None,
        },
        Some(NewLinkedUser {
            username: "skinner".to_string(),
            password: "pw".to_string(),
            school_id: Some(school.id),
            name: "Seymour Skinner".to_string(),
            avatar_url: None,
        }),
    )
    .await
    .unwrap();

    let teachers = edusys_rust::db::teachers_with_users(repo.as_ref(), None)
        .await
        .unwrap();
    assert_eq!(teachers.len(), 2);

    // deleting the teacher removes the linked account too
    assert!(repo.delete_teacher(created.teacher.id).await.unwrap());
    let user = repo
        .get_user(created.teacher.user_id)
        .await
        .unwrap();
    assert!(user.is_none());
}

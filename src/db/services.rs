//! Service layer: business logic on top of the repository traits.
//!
//! These functions work with any [`FullRepository`] implementation and cover
//! the cross-entity operations the HTTP handlers need: joined student/teacher
//! views, account-embedding creation, demo seeding and health checks.

use tracing::info;

use super::checksum::calculate_report_hash;
use super::repository::{FullRepository, RepositoryResult};
use crate::api::{SchoolId, StudentId, TeacherId};
use crate::models::{
    Gender, NewComplaint, NewCourse, NewCredentialRecord, NewLinkedUser, NewSchool, NewStudent,
    NewTeacher, NewUser, Role, ShortageDetail, StudentWithUser, TeacherWithUser,
};

/// Check that the backing store is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// All students (optionally one school), each with its linked account.
pub async fn students_with_users(
    repo: &dyn FullRepository,
    school_id: Option<SchoolId>,
) -> RepositoryResult<Vec<StudentWithUser>> {
    let students = repo.get_students(school_id).await?;
    let mut out = Vec::with_capacity(students.len());
    for student in students {
        let user = repo.get_user(student.user_id).await?;
        out.push(StudentWithUser { student, user });
    }
    Ok(out)
}

/// One student with its linked account, if it exists.
pub async fn student_with_user(
    repo: &dyn FullRepository,
    id: StudentId,
) -> RepositoryResult<Option<StudentWithUser>> {
    let Some(student) = repo.get_student(id).await? else {
        return Ok(None);
    };
    let user = repo.get_user(student.user_id).await?;
    Ok(Some(StudentWithUser { student, user }))
}

/// All teachers (optionally one school), each with its linked account.
pub async fn teachers_with_users(
    repo: &dyn FullRepository,
    school_id: Option<SchoolId>,
) -> RepositoryResult<Vec<TeacherWithUser>> {
    let teachers = repo.get_teachers(school_id).await?;
    let mut out = Vec::with_capacity(teachers.len());
    for teacher in teachers {
        let user = repo.get_user(teacher.user_id).await?;
        out.push(TeacherWithUser { teacher, user });
    }
    Ok(out)
}

/// One teacher with its linked account, if it exists.
pub async fn teacher_with_user(
    repo: &dyn FullRepository,
    id: TeacherId,
) -> RepositoryResult<Option<TeacherWithUser>> {
    let Some(teacher) = repo.get_teacher(id).await? else {
        return Ok(None);
    };
    let user = repo.get_user(teacher.user_id).await?;
    Ok(Some(TeacherWithUser { teacher, user }))
}

/// Create a student, optionally creating its account in the same call.
///
/// When `account` is given, a `student`-role user is created first and its id
/// overrides `student.user_id`.
pub async fn create_student_with_account(
    repo: &dyn FullRepository,
    mut student: NewStudent,
    account: Option<NewLinkedUser>,
) -> RepositoryResult<StudentWithUser> {
    let mut created_user = None;
    if let Some(account) = account {
        let user = repo.create_user(account.with_role(Role::Student)).await?;
        student.user_id = user.id;
        created_user = Some(user);
    }
    let student = repo.create_student(student).await?;
    Ok(StudentWithUser {
        student,
        user: created_user,
    })
}

/// Create a teacher, optionally creating its account in the same call.
pub async fn create_teacher_with_account(
    repo: &dyn FullRepository,
    mut teacher: NewTeacher,
    account: Option<NewLinkedUser>,
) -> RepositoryResult<TeacherWithUser> {
    let mut created_user = None;
    if let Some(account) = account {
        let user = repo.create_user(account.with_role(Role::Teacher)).await?;
        teacher.user_id = user.id;
        created_user = Some(user);
    }
    let teacher = repo.create_teacher(teacher).await?;
    Ok(TeacherWithUser {
        teacher,
        user: created_user,
    })
}

/// Seed demo data when the store is empty.
///
/// Idempotent: does nothing unless the school collection is empty. Returns
/// whether anything was written.
pub async fn seed_demo_data(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    if !repo.get_schools().await?.is_empty() {
        return Ok(false);
    }

    let school = repo
        .create_school(NewSchool {
            name: "Springfield High".to_string(),
            location: "Springfield".to_string(),
            district: Some("Central".to_string()),
            performance_score: Some(85.0),
            teacher_shortage: Some(true),
            shortage_details: Some(vec![
                ShortageDetail {
                    subject: "Math".to_string(),
                    count: 2,
                },
                ShortageDetail {
                    subject: "Science".to_string(),
                    count: 1,
                },
            ]),
        })
        .await?;

    let _gov = repo
        .create_user(NewUser {
            username: "admin".to_string(),
            password: "password".to_string(),
            role: Role::GovAdmin,
            school_id: None,
            name: "Government Official".to_string(),
            avatar_url: None,
        })
        .await?;

    let teacher_user = repo
        .create_user(NewUser {
            username: "teacher".to_string(),
            password: "password".to_string(),
            role: Role::Teacher,
            school_id: Some(school.id),
            name: "Edna Krabappel".to_string(),
            avatar_url: None,
        })
        .await?;

    let _teacher = repo
        .create_teacher(NewTeacher {
            user_id: teacher_user.id,
            school_id: school.id,
            subject: "Math".to_string(),
            assigned_classes: None,
            face_image_base64: None,
        })
        .await?;

    let student_user = repo
        .create_user(NewUser {
            username: "student".to_string(),
            password: "password".to_string(),
            role: Role::Student,
            school_id: Some(school.id),
            name: "Bart Simpson".to_string(),
            avatar_url: None,
        })
        .await?;

    let student = repo
        .create_student(NewStudent {
            user_id: student_user.id,
            school_id: school.id,
            registration_no: "SPR-0001".to_string(),
            father_name: "Homer Simpson".to_string(),
            mother_name: "Marge Simpson".to_string(),
            mobile_number: None,
            address: "742 Evergreen Terrace".to_string(),
            permanent_address: "742 Evergreen Terrace".to_string(),
            gender: Gender::Male,
            age: 10,
            parent_mobile_number: "555-0113".to_string(),
            grade: "4th".to_string(),
            attendance_rate: Some(85.0),
            marks: Some(70.0),
            scholarship_eligible: Some(false),
            performance_summary: Some(
                "Needs improvement in focus and behavior. Academic performance is slightly below average."
                    .to_string(),
            ),
            face_image_base64: None,
        })
        .await?;

    let _complaint = repo
        .create_complaint(NewComplaint {
            school_id: Some(school.id),
            student_id: None,
            title: "Broken AC".to_string(),
            content: "The AC in room 104 is broken.".to_string(),
            is_anonymous: Some(true),
            classification: Some(crate::models::ComplaintType::Infrastructure),
        })
        .await?;

    let _course = repo
        .create_course(NewCourse {
            title: "Introduction to Algebra".to_string(),
            description: "Learn the basics of algebra in this interactive course.".to_string(),
            thumbnail_url: None,
            video_url: None,
        })
        .await?;

    let report_hash = calculate_report_hash(&format!("{}:Fall 2023", student.id));
    let _credential = repo
        .create_credential_record(NewCredentialRecord {
            student_id: student.id,
            term: "Fall 2023".to_string(),
            report_hash,
            is_verified: Some(true),
            explanation: Some(
                "The student has shown strong foundational skills but needs to focus more during class hours."
                    .to_string(),
            ),
        })
        .await?;

    info!("Seeded demo data for school '{}'", school.name);
    Ok(true)
}

//! Repository traits: the abstract storage interface.
//!
//! Each entity family gets its own trait so alternative backends can be
//! implemented piecemeal; [`FullRepository`] bundles them for the
//! application. All traits must be `Send + Sync` to work with async Rust.

pub mod analytics;
pub mod error;

use async_trait::async_trait;

pub use analytics::{AnalyticsRepository, EntityCounts};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::api::{SchoolId, StudentId, TeacherId, UserId};
use crate::models::{
    Attendance, Complaint, Course, CredentialRecord, NewAttendance, NewComplaint, NewCourse,
    NewCredentialRecord, NewSchool, NewStudent, NewTeacher, NewUser, Role, ScholarshipRule,
    ScholarshipRulePatch, School, SchoolPatch, Student, Teacher, TeacherPatch, User,
};

/// Filter for admin user listings. All fields are optional and combined
/// with AND; `query` is a case-insensitive substring match on username or
/// display name.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub query: Option<String>,
    pub school_id: Option<SchoolId>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: UserId) -> RepositoryResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    async fn create_user(&self, new: NewUser) -> RepositoryResult<User>;
    async fn list_users(&self, filter: UserFilter) -> RepositoryResult<Vec<User>>;
    async fn update_user_role(&self, id: UserId, role: Role) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// All schools, ordered by id ascending.
    async fn get_schools(&self) -> RepositoryResult<Vec<School>>;
    async fn get_school(&self, id: SchoolId) -> RepositoryResult<Option<School>>;
    async fn create_school(&self, new: NewSchool) -> RepositoryResult<School>;
    async fn update_school(
        &self,
        id: SchoolId,
        patch: SchoolPatch,
    ) -> RepositoryResult<Option<School>>;
    /// Returns false if no school with that id existed.
    async fn delete_school(&self, id: SchoolId) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Students ordered by id ascending, optionally restricted to a school.
    async fn get_students(&self, school_id: Option<SchoolId>) -> RepositoryResult<Vec<Student>>;
    async fn get_student(&self, id: StudentId) -> RepositoryResult<Option<Student>>;
    async fn create_student(&self, new: NewStudent) -> RepositoryResult<Student>;
    async fn set_student_face_data(
        &self,
        id: StudentId,
        image_base64: String,
    ) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait TeacherRepository: Send + Sync {
    async fn get_teachers(&self, school_id: Option<SchoolId>) -> RepositoryResult<Vec<Teacher>>;
    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Option<Teacher>>;
    async fn create_teacher(&self, new: NewTeacher) -> RepositoryResult<Teacher>;
    async fn update_teacher(
        &self,
        id: TeacherId,
        patch: TeacherPatch,
    ) -> RepositoryResult<Option<Teacher>>;
    /// Deletes the teacher and its linked user account.
    async fn delete_teacher(&self, id: TeacherId) -> RepositoryResult<bool>;
    async fn set_teacher_face_data(
        &self,
        id: TeacherId,
        image_base64: String,
    ) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Attendance records newest first. `student_id` takes precedence over
    /// `school_id` when both are given.
    async fn get_attendance(
        &self,
        student_id: Option<StudentId>,
        school_id: Option<SchoolId>,
    ) -> RepositoryResult<Vec<Attendance>>;
    async fn create_attendance(&self, new: NewAttendance) -> RepositoryResult<Attendance>;
}

#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Complaints newest first.
    async fn get_complaints(&self) -> RepositoryResult<Vec<Complaint>>;
    async fn create_complaint(&self, new: NewComplaint) -> RepositoryResult<Complaint>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn get_courses(&self) -> RepositoryResult<Vec<Course>>;
    async fn create_course(&self, new: NewCourse) -> RepositoryResult<Course>;
}

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Credential records newest first, optionally for one student.
    async fn get_credential_records(
        &self,
        student_id: Option<StudentId>,
    ) -> RepositoryResult<Vec<CredentialRecord>>;
    async fn create_credential_record(
        &self,
        new: NewCredentialRecord,
    ) -> RepositoryResult<CredentialRecord>;
    async fn find_credential_by_hash(
        &self,
        hash: &str,
    ) -> RepositoryResult<Option<CredentialRecord>>;
}

#[async_trait]
pub trait ScholarshipRuleRepository: Send + Sync {
    /// The singleton rule, created with defaults on first access.
    async fn get_scholarship_rule(&self) -> RepositoryResult<ScholarshipRule>;
    /// Merge the provided fields into the singleton and stamp `updated_at`.
    ///
    /// Concurrent updates are last-write-wins; there is no compare-and-swap.
    async fn update_scholarship_rule(
        &self,
        patch: ScholarshipRulePatch,
    ) -> RepositoryResult<ScholarshipRule>;
}

/// Complete storage interface used by the application layer.
#[async_trait]
pub trait FullRepository:
    UserRepository
    + SchoolRepository
    + StudentRepository
    + TeacherRepository
    + AttendanceRepository
    + ComplaintRepository
    + CourseRepository
    + CredentialRepository
    + ScholarshipRuleRepository
    + AnalyticsRepository
{
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

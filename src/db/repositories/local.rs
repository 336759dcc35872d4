//! In-memory repository implementation.
//!
//! `LocalRepository` keeps every collection in a `BTreeMap` behind a single
//! `parking_lot::RwLock`, which gives id-ascending iteration for free and
//! makes the whole store cheap to stand up in unit tests and local
//! development. Ids are assigned the same way the production store does it:
//! highest existing id plus one.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::api::{SchoolId, StudentId, TeacherId, UserId};
use crate::db::repository::{
    AnalyticsRepository, AttendanceRepository, ComplaintRepository, CourseRepository,
    CredentialRepository, EntityCounts, FullRepository, RepositoryResult, ScholarshipRuleRepository,
    SchoolRepository, StudentRepository, TeacherRepository, UserFilter, UserRepository,
};
use crate::models::{
    Attendance, Complaint, ComplaintStatus, Course, CredentialRecord, NewAttendance, NewComplaint,
    NewCourse, NewCredentialRecord, NewSchool, NewStudent, NewTeacher, NewUser, Role,
    ScholarshipRule, ScholarshipRulePatch, School, SchoolPatch, Student, Teacher, TeacherPatch,
    User,
};

#[derive(Default)]
struct Store {
    users: std::collections::BTreeMap<i64, User>,
    schools: std::collections::BTreeMap<i64, School>,
    students: std::collections::BTreeMap<i64, Student>,
    teachers: std::collections::BTreeMap<i64, Teacher>,
    attendance: std::collections::BTreeMap<i64, Attendance>,
    complaints: std::collections::BTreeMap<i64, Complaint>,
    courses: std::collections::BTreeMap<i64, Course>,
    credentials: std::collections::BTreeMap<i64, CredentialRecord>,
    scholarship_rule: Option<ScholarshipRule>,
}

fn next_id<V>(map: &std::collections::BTreeMap<i64, V>) -> i64 {
    map.keys().next_back().copied().unwrap_or(0) + 1
}

/// In-memory implementation of [`FullRepository`].
#[derive(Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn get_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.store.read().users.get(&id.value()).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .store
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, new: NewUser) -> RepositoryResult<User> {
        let mut store = self.store.write();
        let id = next_id(&store.users);
        let user = User {
            id: UserId::new(id),
            username: new.username,
            password: new.password,
            role: new.role,
            school_id: new.school_id,
            name: new.name,
            avatar_url: new.avatar_url,
        };
        store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_users(&self, filter: UserFilter) -> RepositoryResult<Vec<User>> {
        let store = self.store.read();
        let needle = filter.query.as_deref().map(str::to_lowercase);
        Ok(store
            .users
            .values()
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .filter(|u| filter.school_id.is_none_or(|s| u.school_id == Some(s)))
            .filter(|u| {
                needle.as_deref().is_none_or(|q| {
                    u.username.to_lowercase().contains(q) || u.name.to_lowercase().contains(q)
                })
            })
            .cloned()
            .collect())
    }

    async fn update_user_role(&self, id: UserId, role: Role) -> RepositoryResult<Option<User>> {
        let mut store = self.store.write();
        Ok(store.users.get_mut(&id.value()).map(|u| {
            u.role = role;
            u.clone()
        }))
    }
}

#[async_trait]
impl SchoolRepository for LocalRepository {
    async fn get_schools(&self) -> RepositoryResult<Vec<School>> {
        Ok(self.store.read().schools.values().cloned().collect())
    }

    async fn get_school(&self, id: SchoolId) -> RepositoryResult<Option<School>> {
        Ok(self.store.read().schools.get(&id.value()).cloned())
    }

    async fn create_school(&self, new: NewSchool) -> RepositoryResult<School> {
        let mut store = self.store.write();
        let id = next_id(&store.schools);
        let school = School {
            id: SchoolId::new(id),
            name: new.name,
            location: new.location,
            district: new.district,
            performance_score: new.performance_score.unwrap_or(0.0),
            teacher_shortage: new.teacher_shortage.unwrap_or(false),
            shortage_details: new.shortage_details.unwrap_or_default(),
        };
        store.schools.insert(id, school.clone());
        Ok(school)
    }

    async fn update_school(
        &self,
        id: SchoolId,
        patch: SchoolPatch,
    ) -> RepositoryResult<Option<School>> {
        let mut store = self.store.write();
        Ok(store.schools.get_mut(&id.value()).map(|school| {
            if let Some(name) = patch.name {
                school.name = name;
            }
            if let Some(location) = patch.location {
                school.location = location;
            }
            if let Some(district) = patch.district {
                school.district = Some(district);
            }
            if let Some(score) = patch.performance_score {
                school.performance_score = score;
            }
            if let Some(shortage) = patch.teacher_shortage {
                school.teacher_shortage = shortage;
            }
            if let Some(details) = patch.shortage_details {
                school.shortage_details = details;
            }
            school.clone()
        }))
    }

    async fn delete_school(&self, id: SchoolId) -> RepositoryResult<bool> {
        Ok(self.store.write().schools.remove(&id.value()).is_some())
    }
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn get_students(&self, school_id: Option<SchoolId>) -> RepositoryResult<Vec<Student>> {
        Ok(self
            .store
            .read()
            .students
            .values()
            .filter(|s| school_id.is_none_or(|id| s.school_id == id))
            .cloned()
            .collect())
    }

    async fn get_student(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        Ok(self.store.read().students.get(&id.value()).cloned())
    }

    async fn create_student(&self, new: NewStudent) -> RepositoryResult<Student> {
        let mut store = self.store.write();
        let id = next_id(&store.students);
        let student = Student {
            id: StudentId::new(id),
            user_id: new.user_id,
            school_id: new.school_id,
            registration_no: new.registration_no,
            father_name: new.father_name,
            mother_name: new.mother_name,
            mobile_number: new.mobile_number,
            address: new.address,
            permanent_address: new.permanent_address,
            gender: new.gender,
            age: new.age,
            parent_mobile_number: new.parent_mobile_number,
            grade: new.grade,
            attendance_rate: new.attendance_rate.unwrap_or(100.0),
            marks: new.marks.unwrap_or(0.0),
            scholarship_eligible: new.scholarship_eligible.unwrap_or(false),
            performance_summary: new.performance_summary,
            face_image_base64: new.face_image_base64,
        };
        store.students.insert(id, student.clone());
        Ok(student)
    }

    async fn set_student_face_data(
        &self,
        id: StudentId,
        image_base64: String,
    ) -> RepositoryResult<bool> {
        let mut store = self.store.write();
        Ok(store.students.get_mut(&id.value()).map_or(false, |s| {
            s.face_image_base64 = Some(image_base64);
            true
        }))
    }
}

#[async_trait]
impl TeacherRepository for LocalRepository {
    async fn get_teachers(&self, school_id: Option<SchoolId>) -> RepositoryResult<Vec<Teacher>> {
        Ok(self
            .store
            .read()
            .teachers
            .values()
            .filter(|t| school_id.is_none_or(|id| t.school_id == id))
            .cloned()
            .collect())
    }

    async fn get_teacher(&self, id: TeacherId) -> RepositoryResult<Option<Teacher>> {
        Ok(self.store.read().teachers.get(&id.value()).cloned())
    }

    async fn create_teacher(&self, new: NewTeacher) -> RepositoryResult<Teacher> {
        let mut store = self.store.write();
        let id = next_id(&store.teachers);
        let teacher = Teacher {
            id: TeacherId::new(id),
            user_id: new.user_id,
            school_id: new.school_id,
            subject: new.subject,
            assigned_classes: new.assigned_classes.unwrap_or_default(),
            face_image_base64: new.face_image_base64,
        };
        store.teachers.insert(id, teacher.clone());
        Ok(teacher)
    }

    async fn update_teacher(
        &self,
        id: TeacherId,
        patch: TeacherPatch,
    ) -> RepositoryResult<Option<Teacher>> {
        let mut store = self.store.write();
        Ok(store.teachers.get_mut(&id.value()).map(|teacher| {
            if let Some(school_id) = patch.school_id {
                teacher.school_id = school_id;
            }
            if let Some(subject) = patch.subject {
                teacher.subject = subject;
            }
            if let Some(classes) = patch.assigned_classes {
                teacher.assigned_classes = classes;
            }
            if let Some(face) = patch.face_image_base64 {
                teacher.face_image_base64 = Some(face);
            }
            teacher.clone()
        }))
    }

    async fn delete_teacher(&self, id: TeacherId) -> RepositoryResult<bool> {
        let mut store = self.store.write();
        let Some(teacher) = store.teachers.remove(&id.value()) else {
            return Ok(false);
        };
        // The linked account goes with the teacher record.
        store.users.remove(&teacher.user_id.value());
        Ok(true)
    }

    async fn set_teacher_face_data(
        &self,
        id: TeacherId,
        image_base64: String,
    ) -> RepositoryResult<bool> {
        let mut store = self.store.write();
        Ok(store.teachers.get_mut(&id.value()).map_or(false, |t| {
            t.face_image_base64 = Some(image_base64);
            true
        }))
    }
}

#[async_trait]
impl AttendanceRepository for LocalRepository {
    async fn get_attendance(
        &self,
        student_id: Option<StudentId>,
        school_id: Option<SchoolId>,
    ) -> RepositoryResult<Vec<Attendance>> {
        let store = self.store.read();
        let mut records: Vec<Attendance> = if let Some(student_id) = student_id {
            store
                .attendance
                .values()
                .filter(|a| a.student_id == student_id)
                .cloned()
                .collect()
        } else if let Some(school_id) = school_id {
            let student_ids: std::collections::HashSet<StudentId> = store
                .students
                .values()
                .filter(|s| s.school_id == school_id)
                .map(|s| s.id)
                .collect();
            store
                .attendance
                .values()
                .filter(|a| student_ids.contains(&a.student_id))
                .cloned()
                .collect()
        } else {
            store.attendance.values().cloned().collect()
        };
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn create_attendance(&self, new: NewAttendance) -> RepositoryResult<Attendance> {
        let mut store = self.store.write();
        let id = next_id(&store.attendance);
        let record = Attendance {
            id,
            student_id: new.student_id,
            date: Utc::now(),
            status: new.status,
            face_verified: new.face_verified.unwrap_or(false),
            marked_by_teacher_id: new.marked_by_teacher_id,
        };
        store.attendance.insert(id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl ComplaintRepository for LocalRepository {
    async fn get_complaints(&self) -> RepositoryResult<Vec<Complaint>> {
        let mut complaints: Vec<Complaint> =
            self.store.read().complaints.values().cloned().collect();
        complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(complaints)
    }

    async fn create_complaint(&self, new: NewComplaint) -> RepositoryResult<Complaint> {
        let mut store = self.store.write();
        let id = next_id(&store.complaints);
        let complaint = Complaint {
            id,
            school_id: new.school_id,
            student_id: new.student_id,
            title: new.title,
            content: new.content,
            is_anonymous: new.is_anonymous.unwrap_or(false),
            classification: new.classification,
            status: ComplaintStatus::Pending,
            created_at: Utc::now(),
        };
        store.complaints.insert(id, complaint.clone());
        Ok(complaint)
    }
}

#[async_trait]
impl CourseRepository for LocalRepository {
    async fn get_courses(&self) -> RepositoryResult<Vec<Course>> {
        Ok(self.store.read().courses.values().cloned().collect())
    }

    async fn create_course(&self, new: NewCourse) -> RepositoryResult<Course> {
        let mut store = self.store.write();
        let id = next_id(&store.courses);
        let course = Course {
            id,
            title: new.title,
            description: new.description,
            thumbnail_url: new.thumbnail_url,
            video_url: new.video_url,
        };
        store.courses.insert(id, course.clone());
        Ok(course)
    }
}

#[async_trait]
impl CredentialRepository for LocalRepository {
    async fn get_credential_records(
        &self,
        student_id: Option<StudentId>,
    ) -> RepositoryResult<Vec<CredentialRecord>> {
        let mut records: Vec<CredentialRecord> = self
            .store
            .read()
            .credentials
            .values()
            .filter(|r| student_id.is_none_or(|id| r.student_id == id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn create_credential_record(
        &self,
        new: NewCredentialRecord,
    ) -> RepositoryResult<CredentialRecord> {
        let mut store = self.store.write();
        let id = next_id(&store.credentials);
        let record = CredentialRecord {
            id,
            student_id: new.student_id,
            term: new.term,
            report_hash: new.report_hash,
            is_verified: new.is_verified.unwrap_or(true),
            explanation: new.explanation,
            created_at: Utc::now(),
        };
        store.credentials.insert(id, record.clone());
        Ok(record)
    }

    async fn find_credential_by_hash(
        &self,
        hash: &str,
    ) -> RepositoryResult<Option<CredentialRecord>> {
        Ok(self
            .store
            .read()
            .credentials
            .values()
            .find(|r| r.report_hash == hash)
            .cloned())
    }
}

#[async_trait]
impl ScholarshipRuleRepository for LocalRepository {
    async fn get_scholarship_rule(&self) -> RepositoryResult<ScholarshipRule> {
        {
            let store = self.store.read();
            if let Some(rule) = &store.scholarship_rule {
                return Ok(rule.clone());
            }
        }
        let mut store = self.store.write();
        // Lazy singleton: created with defaults on first read.
        let rule = store
            .scholarship_rule
            .get_or_insert_with(|| ScholarshipRule::default_rule(Utc::now()));
        Ok(rule.clone())
    }

    async fn update_scholarship_rule(
        &self,
        patch: ScholarshipRulePatch,
    ) -> RepositoryResult<ScholarshipRule> {
        let mut store = self.store.write();
        let rule = store
            .scholarship_rule
            .get_or_insert_with(|| ScholarshipRule::default_rule(Utc::now()));
        if let Some(min_marks) = patch.min_marks {
            rule.min_marks = min_marks;
        }
        if let Some(min_attendance) = patch.min_attendance {
            rule.min_attendance = min_attendance;
        }
        if let Some(overrides) = patch.district_overrides {
            rule.district_overrides = overrides;
        }
        rule.updated_at = Utc::now();
        Ok(rule.clone())
    }
}

#[async_trait]
impl AnalyticsRepository for LocalRepository {
    async fn count_entities(&self) -> RepositoryResult<EntityCounts> {
        let store = self.store.read();
        Ok(EntityCounts {
            schools: store.schools.len() as u64,
            students: store.students.len() as u64,
            teachers: store.teachers.len() as u64,
            complaints: store.complaints.len() as u64,
        })
    }

    async fn complaint_counts_by_school(
        &self,
    ) -> RepositoryResult<HashMap<Option<SchoolId>, u64>> {
        let store = self.store.read();
        let mut counts: HashMap<Option<SchoolId>, u64> = HashMap::new();
        for complaint in store.complaints.values() {
            *counts.entry(complaint.school_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn new_school(name: &str, district: Option<&str>) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            location: "Somewhere".to_string(),
            district: district.map(str::to_string),
            performance_score: None,
            teacher_shortage: None,
            shortage_details: None,
        }
    }

    fn new_student(user_id: i64, school_id: i64) -> NewStudent {
        NewStudent {
            user_id: UserId::new(user_id),
            school_id: SchoolId::new(school_id),
            registration_no: "R-1".to_string(),
            father_name: "F".to_string(),
            mother_name: "M".to_string(),
            mobile_number: None,
            address: "A".to_string(),
            permanent_address: "A".to_string(),
            gender: Gender::Other,
            age: 12,
            parent_mobile_number: "555".to_string(),
            grade: "6th".to_string(),
            attendance_rate: None,
            marks: None,
            scholarship_eligible: None,
            performance_summary: None,
            face_image_base64: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = LocalRepository::new();
        let first = repo.create_school(new_school("One", None)).await.unwrap();
        let second = repo.create_school(new_school("Two", None)).await.unwrap();
        assert_eq!(first.id.value(), 1);
        assert_eq!(second.id.value(), 2);
    }

    #[tokio::test]
    async fn test_ids_resume_after_delete() {
        let repo = LocalRepository::new();
        let _ = repo.create_school(new_school("One", None)).await.unwrap();
        let second = repo.create_school(new_school("Two", None)).await.unwrap();
        assert!(repo.delete_school(second.id).await.unwrap());
        let third = repo.create_school(new_school("Three", None)).await.unwrap();
        // next id follows the highest remaining id
        assert_eq!(third.id.value(), 2);
    }

    #[tokio::test]
    async fn test_student_defaults_applied() {
        let repo = LocalRepository::new();
        let student = repo.create_student(new_student(1, 1)).await.unwrap();
        assert_eq!(student.attendance_rate, 100.0);
        assert_eq!(student.marks, 0.0);
        assert!(!student.scholarship_eligible);
    }

    #[tokio::test]
    async fn test_school_filter_on_students() {
        let repo = LocalRepository::new();
        let _ = repo.create_student(new_student(1, 1)).await.unwrap();
        let _ = repo.create_student(new_student(2, 2)).await.unwrap();
        let all = repo.get_students(None).await.unwrap();
        let filtered = repo.get_students(Some(SchoolId::new(2))).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].school_id.value(), 2);
    }

    #[tokio::test]
    async fn test_rule_lazy_default_then_merge() {
        let repo = LocalRepository::new();
        let rule = repo.get_scholarship_rule().await.unwrap();
        assert_eq!(rule.min_marks, 85.0);
        assert_eq!(rule.min_attendance, 90.0);

        let updated = repo
            .update_scholarship_rule(ScholarshipRulePatch {
                min_attendance: Some(95.0),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.min_marks, 85.0);
        assert_eq!(updated.min_attendance, 95.0);
        assert!(updated.district_overrides.is_empty());
        assert!(updated.updated_at >= rule.updated_at);
    }

    #[tokio::test]
    async fn test_delete_teacher_removes_linked_user() {
        let repo = LocalRepository::new();
        let user = repo
            .create_user(NewUser {
                username: "t1".to_string(),
                password: "pw".to_string(),
                role: Role::Teacher,
                school_id: None,
                name: "Teacher One".to_string(),
                avatar_url: None,
            })
            .await
            .unwrap();
        let teacher = repo
            .create_teacher(NewTeacher {
                user_id: user.id,
                school_id: SchoolId::new(1),
                subject: "Math".to_string(),
                assigned_classes: None,
                face_image_base64: None,
            })
            .await
            .unwrap();

        assert!(repo.delete_teacher(teacher.id).await.unwrap());
        assert!(repo.get_user(user.id).await.unwrap().is_none());
        assert!(!repo.delete_teacher(teacher.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_complaint_group_count_includes_unassigned() {
        let repo = LocalRepository::new();
        let school = repo.create_school(new_school("One", None)).await.unwrap();
        for school_id in [Some(school.id), Some(school.id), None] {
            let _ = repo
                .create_complaint(NewComplaint {
                    school_id,
                    student_id: None,
                    title: "t".to_string(),
                    content: "c".to_string(),
                    is_anonymous: None,
                    classification: None,
                })
                .await
                .unwrap();
        }
        let counts = repo.complaint_counts_by_school().await.unwrap();
        assert_eq!(counts.get(&Some(school.id)), Some(&2));
        assert_eq!(counts.get(&None), Some(&1));
    }

    #[tokio::test]
    async fn test_user_filter_matching() {
        let repo = LocalRepository::new();
        for (username, name, role) in [
            ("admin", "Government Official", Role::GovAdmin),
            ("edna", "Edna Krabappel", Role::Teacher),
        ] {
            let _ = repo
                .create_user(NewUser {
                    username: username.to_string(),
                    password: "pw".to_string(),
                    role,
                    school_id: None,
                    name: name.to_string(),
                    avatar_url: None,
                })
                .await
                .unwrap();
        }

        let by_role = repo
            .list_users(UserFilter {
                role: Some(Role::Teacher),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_role.len(), 1);
        assert_eq!(by_role[0].username, "edna");

        let by_query = repo
            .list_users(UserFilter {
                query: Some("KRABAPPEL".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_query.len(), 1);
    }
}

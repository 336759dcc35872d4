//! Student trend series for the analytics dashboard.

use std::collections::BTreeMap;

use super::analytics::round1;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::AttendanceStatus;
use crate::routes::trends::{MonthPoint, StudentTrends, TermPoint};

fn attendance_score(status: AttendanceStatus) -> f64 {
    match status {
        AttendanceStatus::Present => 100.0,
        AttendanceStatus::Late => 80.0,
        AttendanceStatus::Absent => 0.0,
    }
}

/// Build the academic-by-term and attendance-by-month series.
///
/// Terms come from credential records; per-term marks are synthesized from
/// the record count until term-level marks are stored.
/// TODO: replace the synthetic per-term average once credential records
/// carry the term's actual marks.
pub async fn student_trends(repo: &dyn FullRepository) -> RepositoryResult<StudentTrends> {
    let records = repo.get_credential_records(None).await?;
    let mut by_term: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *by_term.entry(record.term).or_insert(0) += 1;
    }
    let academic_by_term = by_term
        .into_iter()
        .map(|(term, count)| TermPoint {
            term,
            avg_marks: 70.0 + (count % 20) as f64,
        })
        .collect();

    let attendance = repo.get_attendance(None, None).await?;
    let mut by_month: BTreeMap<String, (f64, u64)> = BTreeMap::new();
    for record in attendance {
        let key = record.date.format("%Y-%m").to_string();
        let entry = by_month.entry(key).or_insert((0.0, 0));
        entry.0 += attendance_score(record.status);
        entry.1 += 1;
    }
    let attendance_by_month = by_month
        .into_iter()
        .map(|(month, (sum, count))| MonthPoint {
            month,
            avg_attendance: round1(sum / count as f64),
        })
        .collect();

    Ok(StudentTrends {
        academic_by_term,
        attendance_by_month,
    })
}

//! Report export: typed row sets and CSV rendering.
//!
//! CSV output takes its header from the first row's field order (row structs
//! keep declaration order through serialization) and renders every cell as a
//! JSON literal, so strings are always quoted and embedded commas or quotes
//! survive. `null` renders as an empty quoted string.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::routes::reports::{ComplaintReportRow, ReportType, StudentReportRow, TeacherReportRow};

use super::analytics::schools_summary;

/// Render rows as CSV. Empty input renders as an empty string.
pub fn to_csv(rows: &[Map<String, Value>]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                let value = row.get(*h).unwrap_or(&Value::Null);
                if value.is_null() {
                    "\"\"".to_string()
                } else {
                    // a JSON literal per cell; serializing a Value cannot fail
                    serde_json::to_string(value).unwrap_or_default()
                }
            })
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

fn rows_to_maps<T: Serialize>(rows: Vec<T>) -> RepositoryResult<Vec<Map<String, Value>>> {
    rows.into_iter()
        .map(|row| match serde_json::to_value(row) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(RepositoryError::internal("report row is not an object")),
            Err(e) => Err(RepositoryError::internal(format!(
                "report serialization failed: {}",
                e
            ))),
        })
        .collect()
}

/// Fetch the row set for one report type.
pub async fn export_report(
    repo: &dyn FullRepository,
    report_type: ReportType,
    district: Option<&str>,
) -> RepositoryResult<Vec<Map<String, Value>>> {
    match report_type {
        ReportType::Schools => rows_to_maps(schools_summary(repo, district).await?),
        ReportType::Teachers => {
            let rows: Vec<TeacherReportRow> = repo
                .get_teachers(None)
                .await?
                .into_iter()
                .map(|t| TeacherReportRow {
                    id: t.id.value(),
                    user_id: t.user_id,
                    school_id: t.school_id,
                    subject: t.subject,
                    assigned_classes: t.assigned_classes,
                })
                .collect();
            rows_to_maps(rows)
        }
        ReportType::Students => {
            let rows: Vec<StudentReportRow> = repo
                .get_students(None)
                .await?
                .into_iter()
                .map(|s| StudentReportRow {
                    id: s.id,
                    user_id: s.user_id,
                    school_id: s.school_id,
                    grade: s.grade,
                    marks: s.marks,
                    attendance_rate: s.attendance_rate,
                    scholarship_eligible: s.scholarship_eligible,
                })
                .collect();
            rows_to_maps(rows)
        }
        ReportType::Complaints => {
            let rows: Vec<ComplaintReportRow> = repo
                .get_complaints()
                .await?
                .into_iter()
                .map(|c| ComplaintReportRow {
                    id: c.id,
                    school_id: c.school_id,
                    title: c.title,
                    status: c.status,
                    created_at: c.created_at,
                    classification: c.classification,
                })
                .collect();
            rows_to_maps(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::seed_demo_data;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_rows_render_empty_string() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn test_csv_quotes_embedded_commas_and_quotes() {
        let rows = vec![map(json!({
            "name": "Springfield, \"High\"",
            "score": 85.5,
        }))];
        let csv = to_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,score"));
        assert_eq!(
            lines.next(),
            Some(r#""Springfield, \"High\"",85.5"#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_null_cells_render_empty_quoted() {
        let rows = vec![
            map(json!({"a": 1, "b": "x"})),
            map(json!({"a": 2, "b": null})),
        ];
        let csv = to_csv(&rows);
        assert_eq!(csv, "a,b\n1,\"x\"\n2,\"\"");
    }

    #[test]
    fn test_missing_keys_fall_back_to_empty() {
        let rows = vec![map(json!({"a": 1, "b": true})), map(json!({"a": 2}))];
        let csv = to_csv(&rows);
        assert_eq!(csv, "a,b\n1,true\n2,\"\"");
    }

    #[tokio::test]
    async fn test_export_students_columns() {
        let repo = LocalRepository::new();
        seed_demo_data(&repo).await.unwrap();
        let rows = export_report(&repo, ReportType::Students, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(
            keys,
            [
                "id",
                "userId",
                "schoolId",
                "grade",
                "marks",
                "attendanceRate",
                "scholarshipEligible"
            ]
        );
    }

    #[tokio::test]
    async fn test_export_schools_respects_district_filter() {
        let repo = LocalRepository::new();
        seed_demo_data(&repo).await.unwrap();
        let all = export_report(&repo, ReportType::Schools, None).await.unwrap();
        assert_eq!(all.len(), 1);
        let none = export_report(&repo, ReportType::Schools, Some("North"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}

//! Aggregation reporter: school summaries, shortage and district rollups,
//! dashboard totals.
//!
//! All aggregation happens in memory over repository listings; outputs are
//! deterministic (school summaries follow id order, grouped rows follow
//! first-occurrence order of that listing).

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::routes::analytics::{
    DashboardAnalytics, DistrictSummary, SchoolSummary, ShortageRow,
};

/// Round to one decimal place, half away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Per-school summary rows with complaint counts, optionally filtered to one
/// district. Schools with no complaints report `complaints: 0`.
pub async fn schools_summary(
    repo: &dyn FullRepository,
    district: Option<&str>,
) -> RepositoryResult<Vec<SchoolSummary>> {
    let schools = repo.get_schools().await?;
    let counts = repo.complaint_counts_by_school().await?;
    Ok(schools
        .into_iter()
        .filter(|s| district.is_none_or(|d| s.district.as_deref() == Some(d)))
        .map(|s| {
            let complaints = counts.get(&Some(s.id)).copied().unwrap_or(0);
            SchoolSummary {
                id: s.id,
                name: s.name,
                district: s.district,
                performance_score: s.performance_score,
                teacher_shortage: s.teacher_shortage,
                complaints,
            }
        })
        .collect())
}

/// Teacher shortage rows summed per `(district, subject)` pair.
///
/// Schools without a district bucket together and surface `district: null`.
pub async fn teacher_shortages_by_district(
    repo: &dyn FullRepository,
    district: Option<&str>,
) -> RepositoryResult<Vec<ShortageRow>> {
    let schools = repo.get_schools().await?;
    let mut rows: Vec<ShortageRow> = Vec::new();
    for school in schools
        .iter()
        .filter(|s| district.is_none_or(|d| s.district.as_deref() == Some(d)))
    {
        for detail in &school.shortage_details {
            match rows
                .iter_mut()
                .find(|r| r.district == school.district && r.subject == detail.subject)
            {
                Some(row) => row.count += detail.count,
                None => rows.push(ShortageRow {
                    district: school.district.clone(),
                    subject: detail.subject.clone(),
                    count: detail.count,
                }),
            }
        }
    }
    Ok(rows)
}

/// Per-district rollup: school count, mean performance score (1 decimal
/// place) and number of schools flagged with a teacher shortage. Schools
/// without a district land in the `"Unknown"` bucket.
pub async fn district_summary(repo: &dyn FullRepository) -> RepositoryResult<Vec<DistrictSummary>> {
    let schools = repo.get_schools().await?;
    let mut summaries: Vec<DistrictSummary> = Vec::new();
    let mut perf_sums: Vec<f64> = Vec::new();
    for school in &schools {
        let district = school.district.as_deref().unwrap_or("Unknown");
        let idx = match summaries.iter().position(|s| s.district == district) {
            Some(idx) => idx,
            None => {
                summaries.push(DistrictSummary {
                    district: district.to_string(),
                    schools: 0,
                    avg_performance: 0.0,
                    teacher_shortages: 0,
                });
                perf_sums.push(0.0);
                summaries.len() - 1
            }
        };
        summaries[idx].schools += 1;
        perf_sums[idx] += school.performance_score;
        if school.teacher_shortage {
            summaries[idx].teacher_shortages += 1;
        }
    }
    for (summary, perf_sum) in summaries.iter_mut().zip(perf_sums) {
        if summary.schools > 0 {
            summary.avg_performance = round1(perf_sum / summary.schools as f64);
        }
    }
    Ok(summaries)
}

/// Dashboard totals: entity counts, mean attendance rate and the district
/// rollup.
pub async fn dashboard_analytics(
    repo: &dyn FullRepository,
) -> RepositoryResult<DashboardAnalytics> {
    let counts = repo.count_entities().await?;
    let by_district = district_summary(repo).await?;

    let mut average_attendance = 0.0;
    if counts.students > 0 {
        let students = repo.get_students(None).await?;
        let sum: f64 = students.iter().map(|s| s.attendance_rate).sum();
        average_attendance = round1(sum / students.len() as f64);
    }

    Ok(DashboardAnalytics {
        total_schools: counts.schools,
        total_students: counts.students,
        total_teachers: counts.teachers,
        average_attendance,
        teacher_shortage_count: by_district.iter().map(|d| d.teacher_shortages).sum(),
        recent_complaints: counts.complaints,
        by_district,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::{ComplaintRepository, SchoolRepository};
    use crate::models::{NewComplaint, NewSchool, ShortageDetail};

    fn school(name: &str, district: Option<&str>, score: f64, shortage: bool) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            location: "L".to_string(),
            district: district.map(str::to_string),
            performance_score: Some(score),
            teacher_shortage: Some(shortage),
            shortage_details: None,
        }
    }

    #[tokio::test]
    async fn test_zero_complaint_schools_report_zero() {
        let repo = LocalRepository::new();
        let a = repo
            .create_school(school("A", Some("Central"), 80.0, false))
            .await
            .unwrap();
        let _b = repo
            .create_school(school("B", Some("Central"), 70.0, false))
            .await
            .unwrap();
        repo.create_complaint(NewComplaint {
            school_id: Some(a.id),
            student_id: None,
            title: "t".to_string(),
            content: "c".to_string(),
            is_anonymous: None,
            classification: None,
        })
        .await
        .unwrap();

        let summary = schools_summary(&repo, None).await.unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].complaints, 1);
        assert_eq!(summary[1].complaints, 0);
        // id ordering
        assert!(summary[0].id < summary[1].id);
    }

    #[tokio::test]
    async fn test_district_filter_on_summary() {
        let repo = LocalRepository::new();
        repo.create_school(school("A", Some("Central"), 80.0, false))
            .await
            .unwrap();
        repo.create_school(school("B", Some("North"), 70.0, false))
            .await
            .unwrap();
        repo.create_school(school("C", None, 60.0, false))
            .await
            .unwrap();

        let filtered = schools_summary(&repo, Some("Central")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "A");
    }

    #[tokio::test]
    async fn test_shortages_grouped_and_null_district_surfaced() {
        let repo = LocalRepository::new();
        let mut a = school("A", Some("Central"), 80.0, true);
        a.shortage_details = Some(vec![
            ShortageDetail {
                subject: "Math".to_string(),
                count: 2,
            },
            ShortageDetail {
                subject: "Science".to_string(),
                count: 1,
            },
        ]);
        let mut b = school("B", Some("Central"), 75.0, true);
        b.shortage_details = Some(vec![ShortageDetail {
            subject: "Math".to_string(),
            count: 3,
        }]);
        let mut c = school("C", None, 60.0, true);
        c.shortage_details = Some(vec![ShortageDetail {
            subject: "Art".to_string(),
            count: 1,
        }]);
        for s in [a, b, c] {
            repo.create_school(s).await.unwrap();
        }

        let rows = teacher_shortages_by_district(&repo, None).await.unwrap();
        assert_eq!(rows.len(), 3);
        let math = rows
            .iter()
            .find(|r| r.subject == "Math")
            .expect("math row");
        assert_eq!(math.count, 5);
        assert_eq!(math.district.as_deref(), Some("Central"));
        let art = rows.iter().find(|r| r.subject == "Art").expect("art row");
        assert_eq!(art.district, None);
    }

    #[tokio::test]
    async fn test_district_buckets_partition_all_schools() {
        let repo = LocalRepository::new();
        repo.create_school(school("A", Some("Central"), 80.0, true))
            .await
            .unwrap();
        repo.create_school(school("B", Some("Central"), 70.0, false))
            .await
            .unwrap();
        repo.create_school(school("C", None, 61.0, true))
            .await
            .unwrap();

        let summary = district_summary(&repo).await.unwrap();
        let total: u64 = summary.iter().map(|d| d.schools).sum();
        assert_eq!(total, 3);

        let central = summary
            .iter()
            .find(|d| d.district == "Central")
            .expect("central bucket");
        assert_eq!(central.avg_performance, 75.0);
        assert_eq!(central.teacher_shortages, 1);
        let unknown = summary
            .iter()
            .find(|d| d.district == "Unknown")
            .expect("unknown bucket");
        assert_eq!(unknown.schools, 1);
        assert_eq!(unknown.avg_performance, 61.0);
    }

    #[tokio::test]
    async fn test_dashboard_totals_empty_store() {
        let repo = LocalRepository::new();
        let dash = dashboard_analytics(&repo).await.unwrap();
        assert_eq!(dash.total_schools, 0);
        assert_eq!(dash.average_attendance, 0.0);
        assert!(dash.by_district.is_empty());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(75.0), 75.0);
        assert_eq!(round1(76.666), 76.7);
        assert_eq!(round1(76.64), 76.6);
    }
}

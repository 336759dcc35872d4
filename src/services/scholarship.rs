//! Scholarship eligibility evaluation and rule updates.
//!
//! The evaluator core is pure: thresholds come from the singleton rule, a
//! student's district can override either threshold independently, and
//! eligibility requires meeting both. Reason strings are part of the API
//! contract; clients display them verbatim.

use crate::api::StudentId;
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{ScholarshipRule, ScholarshipRulePatch};
use crate::routes::scholarship::EvaluationResult;

/// Resolve the thresholds that apply to a district.
///
/// The first override whose district matches wins; each field falls back to
/// the base rule independently when the override leaves it unset.
pub fn effective_thresholds(rule: &ScholarshipRule, district: Option<&str>) -> (f64, f64) {
    let mut min_marks = rule.min_marks;
    let mut min_attendance = rule.min_attendance;
    if let Some(district) = district {
        if let Some(o) = rule
            .district_overrides
            .iter()
            .find(|o| o.district == district)
        {
            if let Some(marks) = o.min_marks {
                min_marks = marks;
            }
            if let Some(attendance) = o.min_attendance {
                min_attendance = attendance;
            }
        }
    }
    (min_marks, min_attendance)
}

/// Evaluate a student's figures against the rule.
///
/// Eligible iff `marks >= min_marks && attendance >= min_attendance` after
/// district overrides. Boundary equality passes.
pub fn evaluate(
    rule: &ScholarshipRule,
    marks: f64,
    attendance: f64,
    district: Option<&str>,
) -> EvaluationResult {
    let (min_marks, min_attendance) = effective_thresholds(rule, district);
    let eligible = marks >= min_marks && attendance >= min_attendance;
    let reason = if eligible {
        format!(
            "Meets thresholds (marks>={}, attendance>={})",
            min_marks, min_attendance
        )
    } else {
        format!(
            "Below thresholds (marks {}/{}, attendance {}/{})",
            marks, min_marks, attendance, min_attendance
        )
    };
    EvaluationResult { eligible, reason }
}

/// Evaluate a stored student.
///
/// An unknown student is a soft failure, not an error: the result carries
/// `eligible: false` with a "Student not found" reason and the endpoint
/// still answers 200. Evaluation never writes `scholarship_eligible` back.
pub async fn evaluate_student(
    repo: &dyn FullRepository,
    student_id: StudentId,
) -> RepositoryResult<EvaluationResult> {
    let Some(student) = repo.get_student(student_id).await? else {
        return Ok(EvaluationResult::not_found());
    };
    let rule = repo.get_scholarship_rule().await?;
    let district = repo
        .get_school(student.school_id)
        .await?
        .and_then(|s| s.district);
    Ok(evaluate(
        &rule,
        student.marks,
        student.attendance_rate,
        district.as_deref(),
    ))
}

fn in_percent_range(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Apply a partial rule update after range-checking every threshold.
///
/// All thresholds, base and per-district, must lie in `[0, 100]`. Fields
/// absent from the patch keep their current value; `updated_at` is stamped.
pub async fn update_rule(
    repo: &dyn FullRepository,
    patch: ScholarshipRulePatch,
) -> RepositoryResult<ScholarshipRule> {
    for (name, value) in [
        ("minMarks", patch.min_marks),
        ("minAttendance", patch.min_attendance),
    ] {
        if let Some(value) = value {
            if !in_percent_range(value) {
                return Err(RepositoryError::validation(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
    }
    if let Some(overrides) = &patch.district_overrides {
        for o in overrides {
            for value in [o.min_marks, o.min_attendance].into_iter().flatten() {
                if !in_percent_range(value) {
                    return Err(RepositoryError::validation(format!(
                        "override for district '{}' out of range: {}",
                        o.district, value
                    )));
                }
            }
        }
    }
    repo.update_scholarship_rule(patch).await
}

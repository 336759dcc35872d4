use serde::{Deserialize, Serialize};

// =========================================================
// Scholarship types + routes
// =========================================================

/// Outcome of a scholarship evaluation.
///
/// Always returned with HTTP 200; an unknown student is reported as a soft
/// failure (`eligible: false` with reason `"Student not found"`) rather than
/// an error, so callers can distinguish it from evaluated-and-ineligible by
/// the reason text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub eligible: bool,
    pub reason: String,
}

impl EvaluationResult {
    pub fn not_found() -> Self {
        Self {
            eligible: false,
            reason: "Student not found".to_string(),
        }
    }
}

/// Route name constants for the scholarship endpoints.
pub const GET_SCHOLARSHIP_RULE: &str = "get_scholarship_rule";
pub const UPDATE_SCHOLARSHIP_RULE: &str = "update_scholarship_rule";
pub const EVALUATE_SCHOLARSHIP: &str = "evaluate_scholarship";

//! Typed trainer result records.
//!
//! The chat model's reply is untrusted input: deserialization is permissive
//! (unknown fields ignored, missing branches defaulted) and numeric scores
//! are clamped into range after parsing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::DocId;
use crate::error::{EduragError, Result};

/// Grading mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainerMode {
    /// Full feedback including an improved answer
    Coach,
    /// Hints and pointed corrections only, no rewritten answer
    Examiner,
    /// Comparison against the solutions bank
    ExamRetry,
}

impl fmt::Display for TrainerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerMode::Coach => f.write_str("coach"),
            TrainerMode::Examiner => f.write_str("examiner"),
            TrainerMode::ExamRetry => f.write_str("exam_retry"),
        }
    }
}

/// Diagnostic severity. Unknown values from the model map to `Unspecified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unspecified,
}

/// A source reference produced by the model.
///
/// `verified` is filled in by the citation verification pass; it is `None`
/// until that pass runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub doc_id: DocId,

    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub quote: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Total score with rubric breakdown, 0-100.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Score {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBreakdown {
    pub issue_spotting: f64,
    pub rule_statement: f64,
    pub application: f64,
    pub conclusion: f64,
    pub style_precision: f64,
}

/// Suggested fix for a diagnosed error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fix {
    pub rewrite_suggestion: Option<String>,
    pub micro_steps: Vec<String>,
}

/// A single diagnosed problem in the student answer.
///
/// `category` and `error_type` carry the model's vocabulary verbatim
/// (terminology/doctrine/structure/application/comparison and friends);
/// they are advisory labels, not a closed set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnostic {
    pub category: String,
    pub error_type: String,
    pub symptom_in_answer: String,
    pub why_wrong: String,
    pub correct_rule_or_term: String,
    pub fix: Fix,
    pub evidence: Vec<Citation>,
    pub severity: Severity,
}

/// Upgraded answer, only returned in coach mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovedAnswer {
    pub full_text: Option<String>,
    pub delta: Vec<serde_json::Value>,
}

/// One sharpening paragraph per grading round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpeningParagraph {
    pub title: Option<String>,
    pub explanation: Option<String>,
    pub memory_hook: Option<String>,
    pub one_check_question: Option<String>,
}

/// Comparison against a model solution (exam-retry mode).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonToSolution {
    pub solution_id: Option<String>,

    /// 0-100 coverage of the model solution's key points
    pub coverage_score: Option<f64>,

    pub missing_points: Vec<String>,
    pub extra_points: Vec<String>,
    pub style_gap_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NextDrill {
    pub one_question: Option<String>,
    pub expected_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryUpdates {
    pub topic_miss: Vec<String>,
    pub repeat_miss: Vec<String>,
    pub confidence_delta: HashMap<String, serde_json::Value>,
}

/// Validated grading result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerResult {
    pub mode: Option<TrainerMode>,
    pub score: Score,
    pub diagnostics: Vec<Diagnostic>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub improved_answer: Option<ImprovedAnswer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpening_paragraph: Option<SharpeningParagraph>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_to_solution: Option<ComparisonToSolution>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_drill: Option<NextDrill>,

    pub telemetry_updates: TelemetryUpdates,
}

impl TrainerResult {
    /// Validate a raw model reply into a typed result, clamping scores.
    pub fn from_model_reply(value: serde_json::Value) -> Result<Self> {
        let mut result: TrainerResult =
            serde_json::from_value(value).map_err(|e| EduragError::MalformedReply {
                reason: format!("trainer_result does not match schema: {}", e),
            })?;
        result.clamp_scores();
        Ok(result)
    }

    /// Clamp total and coverage scores into 0-100.
    pub fn clamp_scores(&mut self) {
        self.score.total = clamp_percent(self.score.total);
        if let Some(comparison) = &mut self.comparison_to_solution {
            if let Some(coverage) = comparison.coverage_score {
                comparison.coverage_score = Some(clamp_percent(coverage));
            }
        }
    }

    /// All citations carried by this result, for verification.
    pub fn citations_mut(&mut self) -> impl Iterator<Item = &mut Citation> {
        self.diagnostics.iter_mut().flat_map(|d| d.evidence.iter_mut())
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_model_reply_minimal() {
        let result = TrainerResult::from_model_reply(json!({
            "score": {"total": 72},
            "diagnostics": []
        }))
        .unwrap();

        assert_eq!(result.score.total, 72.0);
        assert!(result.diagnostics.is_empty());
        assert!(result.improved_answer.is_none());
    }

    #[test]
    fn test_from_model_reply_clamps_scores() {
        let result = TrainerResult::from_model_reply(json!({
            "score": {"total": 140},
            "comparison_to_solution": {"coverage_score": -5}
        }))
        .unwrap();

        assert_eq!(result.score.total, 100.0);
        assert_eq!(result.comparison_to_solution.unwrap().coverage_score, Some(0.0));
    }

    #[test]
    fn test_from_model_reply_ignores_unknown_fields() {
        let result = TrainerResult::from_model_reply(json!({
            "score": {"total": 50, "curve": "unknown"},
            "hallucinated_branch": {"x": 1}
        }))
        .unwrap();

        assert_eq!(result.score.total, 50.0);
    }

    #[test]
    fn test_from_model_reply_rejects_wrong_shape() {
        let err = TrainerResult::from_model_reply(json!({
            "diagnostics": "none"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_severity_maps_to_unspecified() {
        let diag: Diagnostic = serde_json::from_value(json!({
            "category": "terminology",
            "severity": "catastrophic"
        }))
        .unwrap();
        assert_eq!(diag.severity, Severity::Unspecified);
    }

    #[test]
    fn test_mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TrainerMode::ExamRetry).unwrap(),
            "\"exam_retry\""
        );
        assert_eq!(TrainerMode::ExamRetry.to_string(), "exam_retry");
    }
}

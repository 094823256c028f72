//! Course profile and bundle records.
//!
//! The model is asked to return a `course_profile` JSON object; every branch
//! here defaults so a partial reply merges over a well-formed skeleton
//! instead of failing. The profile is immutable once the bundle is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use super::result::{Citation, TrainerResult};
use super::{Chunk, DocEntry, DocId};

/// Schema version stamped on generated profiles.
pub const PROFILE_VERSION: &str = "2.2";

/// Bundle format version.
pub const BUNDLE_VERSION: &str = "1.2";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMeta {
    pub course_id: String,

    /// Generation date, `YYYY-MM-DD`
    pub generated_at: String,

    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBrain {
    pub doctrines: Vec<Value>,
    pub statutes: Vec<Value>,
    pub precedents: Vec<Value>,
    pub topic_map: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSignature {
    pub mandatory_phrasing: Vec<String>,
    pub preferred_terms: Vec<String>,
    pub avoid_terms: Vec<String>,
    pub must_write_exactly: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingRubric {
    pub weights: HashMap<String, Value>,
    pub penalty_triggers: Vec<Value>,
    pub bonus_triggers: Vec<Value>,
}

/// A model solution extracted from style documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Solution {
    pub solution_id: String,
    pub label: String,
    pub question_hint: Option<String>,
    pub answer_text: String,
    pub sources: Vec<Citation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolutionsBank {
    pub enabled: bool,
    pub solutions: Vec<Solution>,
}

impl Default for SolutionsBank {
    fn default() -> Self {
        Self { enabled: true, solutions: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleBrain {
    pub structure: Value,
    pub voice_signature: VoiceSignature,
    pub grading_rubric: GradingRubric,
    pub style_sources: Vec<Value>,
    pub solutions_bank: SolutionsBank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Terminology {
    /// Extraction pipeline settings handed to the model. Constructed once,
    /// never mutated.
    pub extraction_pipeline: Value,

    pub canonical_terms: Vec<Value>,

    pub style_preferences: Value,
}

impl Default for Terminology {
    fn default() -> Self {
        Self {
            extraction_pipeline: default_extraction_pipeline(),
            canonical_terms: Vec::new(),
            style_preferences: default_style_preferences(),
        }
    }
}

/// Default terminology extraction settings (mirrors the profile schema).
pub fn default_extraction_pipeline() -> Value {
    json!({
        "enabled": true,
        "max_terms": 200,
        "sources_priority": ["style", "knowledge"],
        "candidate_rules": {
            "ngram_range": [1, 4],
            "min_frequency_knowledge": 3,
            "min_frequency_style": 2,
            "prefer_headings": true,
        },
        "cluster_rules": {"merge_threshold": 0.82, "allow_aliases": true},
        "quality_gates": {"must_have_source_quote": true, "min_reliability": 0.55},
    })
}

/// Default style preferences for terminology usage.
pub fn default_style_preferences() -> Value {
    json!({
        "prefer_canonical_over_alias": true,
        "penalize_wrong_term_if_changes_meaning": true,
        "warn_on_noncanonical_if_equivalent": true,
    })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentModel {
    pub weak_topics: Vec<String>,
    pub repeat_misses: Vec<String>,
    pub confidence_by_topic: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerState {
    pub student_model: StudentModel,
}

/// Course profile: knowledge + style + pedagogy, produced by the model and
/// merged over these defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseProfile {
    pub meta: ProfileMeta,
    pub doc_registry: Vec<DocEntry>,
    pub knowledge_brain: KnowledgeBrain,
    pub style_brain: StyleBrain,
    pub terminology: Terminology,
    pub trainer_state: TrainerState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleMeta {
    pub course_id: String,
    pub bundle_version: String,
    pub language: String,
    pub built_at: Option<DateTime<Utc>>,
}

/// Everything a course needs at grading time: the profile, the normalized
/// document texts, and the derived chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseBundle {
    pub meta: BundleMeta,

    pub profile: CourseProfile,

    /// Normalized full texts by registry id
    pub doc_texts: HashMap<DocId, String>,

    /// Chunks derived deterministically from the documents at build time
    pub chunks: Vec<Chunk>,

    /// Most recent grading result, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<TrainerResult>,
}

impl CourseBundle {
    /// Solutions extracted from the style documents.
    pub fn solutions(&self) -> &[Solution] {
        &self.profile.style_brain.solutions_bank.solutions
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn doc_count(&self) -> usize {
        self.profile.doc_registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_merges_partial_reply_over_defaults() {
        // A sparse model reply still deserializes into a full skeleton.
        let profile: CourseProfile = serde_json::from_value(json!({
            "meta": {"course_id": "contracts_2026a"},
            "knowledge_brain": {"doctrines": [{"name": "הצעה וקיבול"}]}
        }))
        .unwrap();

        assert_eq!(profile.meta.course_id, "contracts_2026a");
        assert_eq!(profile.knowledge_brain.doctrines.len(), 1);
        assert!(profile.style_brain.solutions_bank.enabled);
        assert!(profile.terminology.canonical_terms.is_empty());
        assert_eq!(
            profile.terminology.extraction_pipeline["max_terms"],
            json!(200)
        );
    }

    #[test]
    fn test_solutions_bank_defaults_enabled() {
        let bank = SolutionsBank::default();
        assert!(bank.enabled);
        assert!(bank.solutions.is_empty());
    }

    #[test]
    fn test_bundle_round_trip() {
        let bundle = CourseBundle {
            meta: BundleMeta {
                course_id: "c1".into(),
                bundle_version: BUNDLE_VERSION.into(),
                language: "he".into(),
                built_at: None,
            },
            profile: CourseProfile::default(),
            doc_texts: HashMap::new(),
            chunks: Vec::new(),
            last_result: None,
        };

        let text = serde_json::to_string(&bundle).unwrap();
        let parsed: CourseBundle = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.meta.course_id, "c1");
        assert_eq!(parsed.chunk_count(), 0);
    }
}

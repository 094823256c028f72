//! Trainer pipeline orchestrating corpus building, the chat model, and
//! retrieval-grounded grading.

use chrono::Utc;
use edurag_core::error::{EduragError, Result};
use edurag_core::models::{
    BundleMeta, CourseBundle, CourseProfile, SolutionsBank, Terminology, TrainerMode,
    TrainerResult, BUNDLE_VERSION, PROFILE_VERSION,
};
use edurag_core::processing::Chunker;
use edurag_core::verify::{verify_citation, verify_result};
use edurag_llm::ports::{ChatModel, ChatRequest};
use edurag_llm::prompts::{
    self, GroundingSnippet, TEMP_EXTRACTION, TEMP_GRADING,
};
use edurag_llm::reply::extract_json_object;
use serde_json::Value;

use crate::corpus::CorpusBuilder;
use crate::retriever;

/// Pipeline tying the corpus, retriever, and chat model together
pub struct TrainerPipeline<M>
where
    M: ChatModel,
{
    model: M,
    chunker: Chunker,
    top_k: usize,
}

impl<M> TrainerPipeline<M>
where
    M: ChatModel,
{
    /// Create a new trainer pipeline
    pub fn new(model: M, chunker: Chunker, top_k: usize) -> Self {
        Self { model, chunker, top_k }
    }

    /// Build a course bundle: register documents, chunk them, and run the
    /// three profile-building model calls in sequence.
    pub async fn build_bundle(
        &self,
        course_id: &str,
        knowledge: &[edurag_core::models::DocumentSource],
        style: &[edurag_core::models::DocumentSource],
    ) -> Result<CourseBundle> {
        if course_id.trim().is_empty() {
            return Err(EduragError::InvalidCourseId);
        }

        let corpus = CorpusBuilder::new(self.chunker.clone()).build(knowledge, style)?;

        // Call 1: course profile over all documents.
        let all_docs_payload = prompts::pack_documents(&corpus.documents, false);
        let profile_reply = self
            .model
            .complete(&ChatRequest::new(
                prompts::profile_system_prompt(),
                &all_docs_payload,
                TEMP_EXTRACTION,
            ))
            .await?;
        let mut profile = parse_profile(&profile_reply)?;

        // Call 2: terminology.
        let terminology_reply = self
            .model
            .complete(&ChatRequest::new(
                prompts::terminology_system_prompt(),
                &all_docs_payload,
                TEMP_EXTRACTION,
            ))
            .await?;
        profile.terminology = parse_terminology(&terminology_reply)?;

        // Call 3: solutions bank, style text only.
        let style_payload = prompts::pack_documents(&corpus.documents, true);
        let solutions_reply = self
            .model
            .complete(&ChatRequest::new(
                prompts::solutions_system_prompt(),
                &style_payload,
                TEMP_EXTRACTION,
            ))
            .await?;
        profile.style_brain.solutions_bank = parse_solutions(&solutions_reply)?;

        if profile.style_brain.solutions_bank.solutions.is_empty() {
            tracing::warn!(course_id, "style documents yielded no solutions");
        }

        // Stamp metadata the model must not control.
        profile.meta.course_id = course_id.to_string();
        profile.meta.generated_at = Utc::now().format("%Y-%m-%d").to_string();
        profile.meta.version = PROFILE_VERSION.to_string();
        profile.doc_registry = corpus.doc_entries.clone();

        // Tag every solution source against the normalized texts.
        for solution in &mut profile.style_brain.solutions_bank.solutions {
            for citation in &mut solution.sources {
                verify_citation(citation, &corpus.doc_texts);
            }
        }

        Ok(CourseBundle {
            meta: BundleMeta {
                course_id: course_id.to_string(),
                bundle_version: BUNDLE_VERSION.to_string(),
                language: "he".to_string(),
                built_at: Some(Utc::now()),
            },
            profile,
            doc_texts: corpus.doc_texts,
            chunks: corpus.chunks,
            last_result: None,
        })
    }

    /// Grade a student answer in the given mode.
    pub async fn grade(
        &self,
        bundle: &CourseBundle,
        mode: TrainerMode,
        question: &str,
        student_answer: &str,
    ) -> Result<TrainerResult> {
        if mode == TrainerMode::ExamRetry && bundle.solutions().is_empty() {
            return Err(EduragError::SolutionsBankEmpty);
        }

        // Ground the grading call on chunks matching question and answer.
        let query = format!("{} {}", question, student_answer);
        let outcome = retriever::retrieve(&query, &bundle.chunks, self.top_k)?;
        if outcome.snippets.is_empty() {
            tracing::debug!("no grounding snippets matched; grading from profile only");
        }

        let grounding: Vec<GroundingSnippet> = outcome
            .snippets
            .iter()
            .map(|s| GroundingSnippet {
                doc_id: s.doc_id.0.clone(),
                page: s.page,
                topic: s.topic.clone(),
                text: s.text.clone(),
            })
            .collect();

        let solutions = match mode {
            TrainerMode::ExamRetry => bundle.solutions(),
            _ => &[],
        };

        let profile_json = serde_json::to_string_pretty(&bundle.profile)
            .map_err(|e| EduragError::Serialization(e.to_string()))?;

        let payload = prompts::grading_user_payload(
            &profile_json,
            question,
            student_answer,
            solutions,
            &grounding,
        );

        let reply = self
            .model
            .complete(&ChatRequest::new(
                prompts::grading_system_prompt(mode),
                &payload,
                TEMP_GRADING,
            ))
            .await?;

        let value = extract_json_object(&reply)?;
        let result_value = match value.get("trainer_result") {
            Some(inner) => inner.clone(),
            None => value,
        };

        let mut result = TrainerResult::from_model_reply(result_value)?;
        if result.mode.is_none() {
            result.mode = Some(mode);
        }

        let (verified, total) = verify_result(&mut result, &bundle.doc_texts);
        tracing::info!(%mode, score = result.score.total, verified, total, "graded answer");

        Ok(result)
    }

    /// Name of the underlying chat model
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }
}

fn parse_profile(reply: &str) -> Result<CourseProfile> {
    let value = extract_json_object(reply)?;
    let profile_value = match value.get("course_profile") {
        Some(inner) => inner.clone(),
        None => value,
    };
    serde_json::from_value(profile_value).map_err(|e| EduragError::MalformedReply {
        reason: format!("course_profile does not match schema: {}", e),
    })
}

fn parse_terminology(reply: &str) -> Result<Terminology> {
    let value = extract_json_object(reply)?;
    let terms_value = match value.get("terminology") {
        Some(inner) => inner.clone(),
        None => value,
    };
    serde_json::from_value(terms_value).map_err(|e| EduragError::MalformedReply {
        reason: format!("terminology does not match schema: {}", e),
    })
}

fn parse_solutions(reply: &str) -> Result<SolutionsBank> {
    let value = extract_json_object(reply)?;
    let bank_value = match value.get("solutions_bank") {
        Some(inner) => inner.clone(),
        None => value,
    };
    // Some replies nest the bank under style_brain; accept that shape too.
    let bank_value = match bank_value.get("style_brain") {
        Some(Value::Object(style)) => {
            style.get("solutions_bank").cloned().unwrap_or(Value::Object(style.clone()))
        }
        _ => bank_value,
    };
    serde_json::from_value(bank_value).map_err(|e| EduragError::MalformedReply {
        reason: format!("solutions_bank does not match schema: {}", e),
    })
}

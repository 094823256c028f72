use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use edurag_core::models::{CourseBundle, DocumentSource, TrainerMode, TrainerResult};
use edurag_core::processing::Chunker;
use edurag_llm::OpenAiChatModel;
use edurag_retrieval::{RetrievalOutcome, TrainerPipeline};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DocPayload {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildCourseRequest {
    pub course_id: String,
    pub knowledge: Vec<DocPayload>,
    pub style: Vec<DocPayload>,
}

#[derive(Debug, Serialize)]
pub struct BuildCourseResponse {
    pub course_id: String,
    pub documents: usize,
    pub chunks: usize,
    pub solutions: usize,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub mode: GradeRequestMode,
    pub question: String,
    pub answer: String,
}

/// Grading mode accepted over HTTP. Exam retry has its own endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeRequestMode {
    #[default]
    Coach,
    Examiner,
}

#[derive(Debug, Deserialize)]
pub struct RetryRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CourseInfo {
    pub course_id: String,
    pub built_at: Option<DateTime<Utc>>,
    pub documents: usize,
    pub chunks: usize,
    pub solutions: usize,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/courses", get(handle_list_courses).post(handle_build_course))
        .route("/api/v1/courses/{course_id}/status", get(handle_course_status))
        .route("/api/v1/courses/{course_id}/grade", post(handle_grade))
        .route("/api/v1/courses/{course_id}/retry", post(handle_retry))
        .route("/api/v1/courses/{course_id}/retrieve", post(handle_retrieve))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "edurag-api"
    }))
}

async fn handle_build_course(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BuildCourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        course_id = %request.course_id,
        knowledge = request.knowledge.len(),
        style = request.style.len(),
        "Building course bundle"
    );

    let knowledge = to_sources(request.knowledge);
    let style = to_sources(request.style);

    let pipeline = build_pipeline(&state)?;
    let bundle = pipeline.build_bundle(&request.course_id, &knowledge, &style).await?;

    let response = BuildCourseResponse {
        course_id: bundle.meta.course_id.clone(),
        documents: bundle.doc_count(),
        chunks: bundle.chunk_count(),
        solutions: bundle.solutions().len(),
        model: pipeline.model_name().to_string(),
    };

    state.bundle_store.put_bundle(bundle).await?;

    Ok(Json(response))
}

async fn handle_list_courses(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let course_ids = state.bundle_store.list_courses().await?;

    let mut courses = Vec::with_capacity(course_ids.len());
    for course_id in course_ids {
        if let Some(bundle) = state.bundle_store.get_bundle(&course_id).await? {
            courses.push(course_info(&bundle));
        }
    }

    Ok(Json(courses))
}

async fn handle_course_status(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bundle = load_bundle(&state, &course_id).await?;

    Ok(Json(serde_json::json!({
        "course_id": bundle.meta.course_id,
        "bundle_version": bundle.meta.bundle_version,
        "profile_version": bundle.profile.meta.version,
        "built_at": bundle.meta.built_at,
        "documents": bundle.doc_count(),
        "chunks": bundle.chunk_count(),
        "solutions": bundle.solutions().len(),
        "last_score": bundle.last_result.as_ref().map(|r| r.score.total),
    })))
}

async fn handle_grade(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(request): Json<GradeRequest>,
) -> Result<Json<TrainerResult>, ApiError> {
    let mode = match request.mode {
        GradeRequestMode::Coach => TrainerMode::Coach,
        GradeRequestMode::Examiner => TrainerMode::Examiner,
    };
    grade(&state, &course_id, mode, &request.question, &request.answer).await
}

async fn handle_retry(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(request): Json<RetryRequest>,
) -> Result<Json<TrainerResult>, ApiError> {
    grade(&state, &course_id, TrainerMode::ExamRetry, &request.question, &request.answer).await
}

async fn handle_retrieve(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
    Json(request): Json<RetrieveRequest>,
) -> Result<Json<RetrievalOutcome>, ApiError> {
    let bundle = load_bundle(&state, &course_id).await?;
    let top_k = request.top_k.unwrap_or(state.config.top_k.value);

    let outcome = edurag_retrieval::retriever::retrieve(&request.query, &bundle.chunks, top_k)?;
    Ok(Json(outcome))
}

async fn grade(
    state: &AppState,
    course_id: &str,
    mode: TrainerMode,
    question: &str,
    answer: &str,
) -> Result<Json<TrainerResult>, ApiError> {
    tracing::info!(course_id, %mode, "Grading student answer");

    let bundle = load_bundle(state, course_id).await?;
    let pipeline = build_pipeline(state)?;

    let result = pipeline.grade(&bundle, mode, question, answer).await?;
    state.bundle_store.set_last_result(course_id, result.clone()).await?;

    Ok(Json(result))
}

async fn load_bundle(state: &AppState, course_id: &str) -> Result<CourseBundle, ApiError> {
    match state.bundle_store.get_bundle(course_id).await? {
        Some(bundle) => Ok(bundle),
        None => Err(ApiError::not_found(format!("No course bundle for '{}'", course_id))),
    }
}

/// Build the trainer pipeline from the server configuration.
fn build_pipeline(state: &AppState) -> Result<TrainerPipeline<OpenAiChatModel>, ApiError> {
    let config = &state.config;
    let chunker = Chunker::new(config.chunk_size.value, config.chunk_overlap.value)?
        .with_citation_style(config.citation_style.value);

    let model = OpenAiChatModel::from_env(
        config.model.value.clone(),
        Duration::from_secs(config.timeout_secs.value),
    )?;

    Ok(TrainerPipeline::new(model, chunker, config.top_k.value))
}

fn to_sources(docs: Vec<DocPayload>) -> Vec<DocumentSource> {
    docs.into_iter()
        .map(|d| DocumentSource {
            name: d.name,
            text: d.text,
        })
        .collect()
}

fn course_info(bundle: &CourseBundle) -> CourseInfo {
    CourseInfo {
        course_id: bundle.meta.course_id.clone(),
        built_at: bundle.meta.built_at,
        documents: bundle.doc_count(),
        chunks: bundle.chunk_count(),
        solutions: bundle.solutions().len(),
    }
}

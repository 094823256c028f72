pub mod document;
pub mod profile;
pub mod result;

pub use document::{
    Chunk, ChunkAnchor, ChunkId, CitationStyle, DocEntry, DocId, DocType, Document,
    DocumentSource,
};
pub use profile::{
    BundleMeta, CourseBundle, CourseProfile, GradingRubric, KnowledgeBrain, ProfileMeta,
    Solution, SolutionsBank, StudentModel, StyleBrain, Terminology, TrainerState,
    VoiceSignature, BUNDLE_VERSION, PROFILE_VERSION,
};
pub use result::{
    Citation, ComparisonToSolution, Diagnostic, Fix, ImprovedAnswer, NextDrill, Score,
    ScoreBreakdown, Severity, SharpeningParagraph, TelemetryUpdates, TrainerMode,
    TrainerResult,
};

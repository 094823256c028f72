use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EduRAG - Course-grounded exam trainer
#[derive(Parser, Debug)]
#[command(name = "edurag")]
#[command(about = "Course-grounded exam trainer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Course directory holding materials and the built bundle
    #[arg(long, global = true, default_value = ".")]
    pub course_dir: PathBuf,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest course documents and build the course bundle
    Ingest(IngestArgs),

    /// Grade a student answer against the course bundle
    Grade(GradeArgs),

    /// Grade an exam-retry answer against the solutions bank
    Retry(RetryArgs),

    /// Retrieve grounding snippets for a query
    Retrieve(RetrieveArgs),

    /// Show bundle status and information
    Status(StatusArgs),

    /// Inspect effective configuration and its sources
    Inspect(InspectArgs),
}

/// Grading mode exposed on the command line
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum GradeMode {
    /// Full feedback with an improved answer
    Coach,
    /// Hints and corrections only
    Examiner,
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Course identifier (e.g., "contracts_2026a")
    pub course_id: String,

    /// Directory of knowledge documents, relative to the course directory
    #[arg(long, default_value = "knowledge")]
    pub knowledge_dir: PathBuf,

    /// Directory of style documents (solved exams), relative to the course directory
    #[arg(long, default_value = "style")]
    pub style_dir: PathBuf,

    /// Chunk size in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Chunk overlap in characters
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Citation style (page or topic)
    #[arg(long)]
    pub citation_style: Option<String>,

    /// Chat model name
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GradeArgs {
    /// Grading mode
    #[arg(long, value_enum, default_value = "coach")]
    pub mode: GradeMode,

    /// Question text
    #[arg(long, conflicts_with = "question_file")]
    pub question: Option<String>,

    /// File containing the question text
    #[arg(long)]
    pub question_file: Option<PathBuf>,

    /// Student answer text
    #[arg(long, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    /// File containing the student answer
    #[arg(long)]
    pub answer_file: Option<PathBuf>,

    /// Number of grounding snippets to retrieve
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct RetryArgs {
    /// Question text
    #[arg(long, conflicts_with = "question_file")]
    pub question: Option<String>,

    /// File containing the question text
    #[arg(long)]
    pub question_file: Option<PathBuf>,

    /// Student answer text
    #[arg(long, conflicts_with = "answer_file")]
    pub answer: Option<String>,

    /// File containing the student answer
    #[arg(long)]
    pub answer_file: Option<PathBuf>,

    /// Number of grounding snippets to retrieve
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct RetrieveArgs {
    /// The query text
    pub query: String,

    /// Number of snippets to return
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Show detailed status including the document registry
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {}

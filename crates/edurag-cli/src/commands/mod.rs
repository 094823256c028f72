//! Command implementations

mod grade;
mod ingest;
mod inspect;
mod retrieve;
mod status;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use edurag_core::config::LayeredConfig;
use edurag_core::models::CourseBundle;
use edurag_core::processing::Chunker;
use edurag_llm::OpenAiChatModel;
use edurag_retrieval::TrainerPipeline;
use edurag_store::persist;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let course_dir = cli.course_dir.clone();
    let config_path = cli.config.clone();

    match cli.command {
        Commands::Ingest(args) => {
            ingest::execute(args, &course_dir, config_path.as_ref(), &output).await
        }
        Commands::Grade(args) => {
            grade::execute_grade(args, &course_dir, config_path.as_ref(), &output).await
        }
        Commands::Retry(args) => {
            grade::execute_retry(args, &course_dir, config_path.as_ref(), &output).await
        }
        Commands::Retrieve(args) => {
            retrieve::execute(args, &course_dir, config_path.as_ref(), &output)
        }
        Commands::Status(args) => status::execute(args, &course_dir, &output),
        Commands::Inspect(args) => {
            inspect::execute(args, &course_dir, config_path.as_ref(), &output)
        }
    }
}

/// Build the trainer pipeline from the effective configuration.
pub(crate) fn build_pipeline(config: &LayeredConfig) -> Result<TrainerPipeline<OpenAiChatModel>> {
    let chunker = Chunker::new(config.chunk_size.value, config.chunk_overlap.value)?
        .with_citation_style(config.citation_style.value);

    let model = OpenAiChatModel::from_env(
        config.model.value.clone(),
        Duration::from_secs(config.timeout_secs.value),
    )?;

    Ok(TrainerPipeline::new(model, chunker, config.top_k.value))
}

/// Load the course bundle from disk, failing with a pointed message.
pub(crate) fn load_bundle(course_dir: &Path) -> Result<CourseBundle> {
    match persist::load_bundle(course_dir)? {
        Some(bundle) => Ok(bundle),
        None => bail!(
            "No course bundle found in {}. Run 'edurag ingest' first",
            course_dir.display()
        ),
    }
}

/// Resolve a text argument that may be inline or a file path.
pub(crate) fn read_text_input(
    inline: Option<String>,
    file: Option<PathBuf>,
    what: &str,
) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {} file {}", what, path.display())),
        (None, None) => bail!("Provide --{0} or --{0}-file", what),
    }
}

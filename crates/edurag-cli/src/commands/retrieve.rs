use std::path::{Path, PathBuf};

use anyhow::Result;
use edurag_core::config::CliConfigOverrides;
use edurag_retrieval::retriever;
use tabled::Tabled;

use crate::cli::RetrieveArgs;
use crate::commands::load_bundle;
use crate::config_loader::load_config;
use crate::output::OutputWriter;

#[derive(Tabled, serde::Serialize)]
struct SnippetRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Doc")]
    doc: String,
    #[tabled(rename = "Anchor")]
    anchor: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Text")]
    text: String,
}

pub fn execute(
    args: RetrieveArgs,
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config(
        course_dir,
        config_path,
        CliConfigOverrides { top_k: args.top_k, ..Default::default() },
    )?;

    let bundle = load_bundle(course_dir)?;
    let outcome = retriever::retrieve(&args.query, &bundle.chunks, config.top_k.value)?;

    if output.is_json() {
        output.result(&outcome)?;
        return Ok(());
    }

    output.kv("Query tokens", outcome.query_tokens.join(", "));
    output.kv("Chunks considered", outcome.chunks_considered);

    if outcome.snippets.is_empty() {
        output.info("No matching chunks");
        return Ok(());
    }

    let rows: Vec<SnippetRow> = outcome
        .snippets
        .iter()
        .enumerate()
        .map(|(i, s)| SnippetRow {
            rank: i + 1,
            doc: s.doc_id.to_string(),
            anchor: match (&s.page, &s.topic) {
                (Some(page), _) => format!("p.{}", page),
                (None, Some(topic)) => topic.clone(),
                (None, None) => "-".to_string(),
            },
            score: format!("{:.2}", s.score),
            text: preview(&s.text, 60),
        })
        .collect();

    output.table(rows);
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}

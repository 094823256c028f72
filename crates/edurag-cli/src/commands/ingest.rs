use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use edurag_core::models::DocumentSource;
use edurag_store::persist;
use serde_json::json;

use crate::cli::IngestArgs;
use crate::commands::{build_pipeline, load_bundle};
use crate::config_loader::{load_config, overrides_from_args};
use crate::output::OutputWriter;
use crate::progress::{create_spinner, finish_error, finish_success};

pub async fn execute(
    args: IngestArgs,
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let overrides = overrides_from_args(
        args.chunk_size,
        args.chunk_overlap,
        args.citation_style.as_deref(),
        args.model.clone(),
        None,
    )?;
    let config = load_config(course_dir, config_path, overrides)?;

    let knowledge = read_documents(&course_dir.join(&args.knowledge_dir))?;
    let style = read_documents(&course_dir.join(&args.style_dir))?;

    output.info(format!(
        "Ingesting {} knowledge and {} style documents for '{}'",
        knowledge.len(),
        style.len(),
        args.course_id
    ));

    let pipeline = build_pipeline(&config)?;

    let spinner = create_spinner("Building course bundle (3 model calls)...");
    let bundle = match pipeline.build_bundle(&args.course_id, &knowledge, &style).await {
        Ok(bundle) => {
            finish_success(&spinner, "Course bundle built");
            bundle
        }
        Err(e) => {
            finish_error(&spinner, "Bundle build failed");
            return Err(e.into());
        }
    };

    if bundle.solutions().is_empty() {
        output.warning("Solutions bank is empty; exam-retry grading will be unavailable");
    }

    let bundle_path = persist::save_bundle(course_dir, &bundle)?;

    // Full materials sidecar: registry plus normalized texts, for audits.
    let materials = json!({
        "course_id": bundle.meta.course_id,
        "doc_registry": bundle.profile.doc_registry,
        "doc_texts": bundle.doc_texts,
    });
    persist::save_json(&course_dir.join("course_materials_full.json"), &materials)?;

    if output.is_json() {
        output.result(json!({
            "course_id": bundle.meta.course_id,
            "documents": bundle.doc_count(),
            "chunks": bundle.chunk_count(),
            "solutions": bundle.solutions().len(),
            "bundle_path": bundle_path,
        }))?;
    } else {
        output.success(format!(
            "Bundle for '{}' saved to {}",
            bundle.meta.course_id,
            bundle_path.display()
        ));
        output.kv("Documents", bundle.doc_count());
        output.kv("Chunks", bundle.chunk_count());
        output.kv("Solutions", bundle.solutions().len());
    }

    // Round-trip check so a corrupt write surfaces now, not at grading time.
    load_bundle(course_dir)?;

    Ok(())
}

/// Read all `.txt` files in a directory, sorted by file name.
fn read_documents(dir: &Path) -> Result<Vec<DocumentSource>> {
    if !dir.is_dir() {
        bail!("Document directory {} does not exist", dir.display());
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sources.push(DocumentSource { name, text });
    }

    Ok(sources)
}

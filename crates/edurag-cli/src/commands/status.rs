use std::path::Path;

use anyhow::Result;
use tabled::Tabled;

use crate::cli::StatusArgs;
use crate::commands::load_bundle;
use crate::output::OutputWriter;

#[derive(Tabled, serde::Serialize)]
struct DocRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Type")]
    doc_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pages")]
    pages: String,
}

pub fn execute(args: StatusArgs, course_dir: &Path, output: &OutputWriter) -> Result<()> {
    let bundle = load_bundle(course_dir)?;

    if output.is_json() {
        output.result(serde_json::json!({
            "course_id": bundle.meta.course_id,
            "bundle_version": bundle.meta.bundle_version,
            "built_at": bundle.meta.built_at,
            "documents": bundle.doc_count(),
            "chunks": bundle.chunk_count(),
            "solutions": bundle.solutions().len(),
            "last_score": bundle.last_result.as_ref().map(|r| r.score.total),
        }))?;
        return Ok(());
    }

    output.section("Course bundle");
    output.kv("Course", &bundle.meta.course_id);
    output.kv("Bundle version", &bundle.meta.bundle_version);
    output.kv("Profile version", &bundle.profile.meta.version);
    if let Some(built_at) = bundle.meta.built_at {
        output.kv("Built", built_at.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    output.kv("Documents", bundle.doc_count());
    output.kv("Chunks", bundle.chunk_count());
    output.kv("Solutions", bundle.solutions().len());

    if let Some(result) = &bundle.last_result {
        output.kv("Last score", format!("{:.0}/100", result.score.total));
    }

    if args.verbose {
        output.section("Document registry");
        let rows: Vec<DocRow> = bundle
            .profile
            .doc_registry
            .iter()
            .map(|e| DocRow {
                id: e.doc_id.to_string(),
                doc_type: e.doc_type.to_string(),
                name: e.name.clone(),
                pages: e.pages.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        output.table(rows);
    }

    Ok(())
}

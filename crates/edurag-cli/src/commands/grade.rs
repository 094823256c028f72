use std::path::{Path, PathBuf};

use anyhow::Result;
use edurag_core::config::CliConfigOverrides;
use edurag_core::models::{Severity, TrainerMode, TrainerResult};
use edurag_store::persist;
use tabled::Tabled;

use crate::cli::{GradeArgs, GradeMode, RetryArgs};
use crate::commands::{build_pipeline, load_bundle, read_text_input};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::progress::{create_spinner, finish_error, finish_success};

pub async fn execute_grade(
    args: GradeArgs,
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let mode = match args.mode {
        GradeMode::Coach => TrainerMode::Coach,
        GradeMode::Examiner => TrainerMode::Examiner,
    };
    run(
        mode,
        args.question,
        args.question_file,
        args.answer,
        args.answer_file,
        args.top_k,
        course_dir,
        config_path,
        output,
    )
    .await
}

pub async fn execute_retry(
    args: RetryArgs,
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    run(
        TrainerMode::ExamRetry,
        args.question,
        args.question_file,
        args.answer,
        args.answer_file,
        args.top_k,
        course_dir,
        config_path,
        output,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn run(
    mode: TrainerMode,
    question: Option<String>,
    question_file: Option<PathBuf>,
    answer: Option<String>,
    answer_file: Option<PathBuf>,
    top_k: Option<usize>,
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config(
        course_dir,
        config_path,
        CliConfigOverrides { top_k, ..Default::default() },
    )?;

    let question = read_text_input(question, question_file, "question")?;
    let answer = read_text_input(answer, answer_file, "answer")?;

    let mut bundle = load_bundle(course_dir)?;
    let pipeline = build_pipeline(&config)?;

    let spinner = create_spinner(&format!("Grading in {} mode...", mode));
    let result = match pipeline.grade(&bundle, mode, &question, &answer).await {
        Ok(result) => {
            finish_success(&spinner, "Graded");
            result
        }
        Err(e) => {
            finish_error(&spinner, "Grading failed");
            return Err(e.into());
        }
    };

    if output.is_json() {
        output.result(&result)?;
    } else {
        print_result(&result, output);
    }

    // Persist the latest result alongside the bundle.
    bundle.last_result = Some(result);
    persist::save_bundle(course_dir, &bundle)?;

    Ok(())
}

#[derive(Tabled, serde::Serialize)]
struct DiagnosticRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Symptom")]
    symptom: String,
}

fn print_result(result: &TrainerResult, output: &OutputWriter) {
    output.section("Score");
    output.kv("Total", format!("{:.0}/100", result.score.total));
    output.kv("Issue spotting", format!("{:.0}", result.score.breakdown.issue_spotting));
    output.kv("Rule statement", format!("{:.0}", result.score.breakdown.rule_statement));
    output.kv("Application", format!("{:.0}", result.score.breakdown.application));
    output.kv("Conclusion", format!("{:.0}", result.score.breakdown.conclusion));
    output.kv("Style precision", format!("{:.0}", result.score.breakdown.style_precision));

    if !result.diagnostics.is_empty() {
        output.section("Diagnostics");
        let rows: Vec<DiagnosticRow> = result
            .diagnostics
            .iter()
            .map(|d| DiagnosticRow {
                category: d.category.clone(),
                severity: severity_label(d.severity).to_string(),
                symptom: truncate(&d.symptom_in_answer, 60),
            })
            .collect();
        output.table(rows);

        let unverified = result
            .diagnostics
            .iter()
            .flat_map(|d| &d.evidence)
            .filter(|c| c.verified == Some(false))
            .count();
        if unverified > 0 {
            output.warning(format!("{} citations could not be verified against sources", unverified));
        }
    }

    if let Some(comparison) = &result.comparison_to_solution {
        output.section("Comparison to solution");
        if let Some(id) = &comparison.solution_id {
            output.kv("Solution", id);
        }
        if let Some(coverage) = comparison.coverage_score {
            output.kv("Coverage", format!("{:.0}/100", coverage));
        }
        for point in &comparison.missing_points {
            output.info(format!("missing: {}", point));
        }
    }

    if let Some(sharpening) = &result.sharpening_paragraph {
        output.section("Sharpening");
        if let Some(title) = &sharpening.title {
            output.kv("Topic", title);
        }
        if let Some(explanation) = &sharpening.explanation {
            output.info(explanation);
        }
    }

    if let Some(improved) = &result.improved_answer {
        if let Some(text) = &improved.full_text {
            output.section("Improved answer");
            output.info(text);
        }
    }

    if let Some(drill) = &result.next_drill {
        if let Some(question) = &drill.one_question {
            output.section("Next drill");
            output.info(question);
        }
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Unspecified => "-",
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}

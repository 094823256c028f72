use std::path::{Path, PathBuf};

use anyhow::Result;
use edurag_core::config::{CliConfigOverrides, ConfigSource};
use tabled::Tabled;

use crate::cli::InspectArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;

#[derive(Tabled, serde::Serialize)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(
    _args: InspectArgs,
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    output: &OutputWriter,
) -> Result<()> {
    let config = load_config(course_dir, config_path, CliConfigOverrides::default())?;

    let mut rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow {
            key,
            value,
            source: source_label(source).to_string(),
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.section("Effective configuration");
    output.table(rows);
    Ok(())
}

fn source_label(source: ConfigSource) -> &'static str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "environment",
        ConfigSource::Cli => "cli",
    }
}

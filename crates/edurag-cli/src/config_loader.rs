//! Layered configuration assembly for CLI commands.

use anyhow::{Context, Result};
use edurag_core::config::{parse_citation_style, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Default config file name looked up in the course directory.
pub const CONFIG_FILE: &str = "edurag.toml";

/// Build the effective configuration: defaults, then file, then environment,
/// then CLI overrides.
pub fn load_config(
    course_dir: &Path,
    config_path: Option<&PathBuf>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path {
        config = config.load_from_file(path).context("Failed to load config file")?;
    } else {
        let default_path = course_dir.join(CONFIG_FILE);
        if default_path.exists() {
            config = config.load_from_file(&default_path).context("Failed to load config file")?;
        }
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    config.validate()?;

    Ok(config)
}

/// Translate raw CLI option strings into typed overrides.
pub fn overrides_from_args(
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    citation_style: Option<&str>,
    model: Option<String>,
    top_k: Option<usize>,
) -> Result<CliConfigOverrides> {
    let citation_style = citation_style.map(parse_citation_style).transpose()?;

    Ok(CliConfigOverrides { chunk_size, chunk_overlap, top_k, citation_style, model })
}

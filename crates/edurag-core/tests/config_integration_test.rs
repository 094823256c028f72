//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use edurag_core::config::{parse_citation_style, CliConfigOverrides, ConfigSource, LayeredConfig};
use edurag_core::models::CitationStyle;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_configuration() {
    let config = LayeredConfig::with_defaults();

    assert_eq!(config.chunk_size.value, 1200);
    assert_eq!(config.chunk_size.source, ConfigSource::Default);
    assert_eq!(config.chunk_overlap.value, 200);
    assert_eq!(config.top_k.value, 8);
    assert_eq!(config.citation_style.value, CitationStyle::Page);
    assert_eq!(config.model.value, "qwen-plus-latest");
    assert_eq!(config.timeout_secs.value, 180);
}

#[test]
fn test_file_overrides_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
chunk_size = 800
chunk_overlap = 100
top_k = 5
citation_style = "topic"
model = "qwen-max"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.chunk_size.value, 800);
    assert_eq!(config.chunk_size.source, ConfigSource::File);
    assert_eq!(config.chunk_overlap.value, 100);
    assert_eq!(config.top_k.value, 5);
    assert_eq!(config.citation_style.value, CitationStyle::Topic);
    assert_eq!(config.citation_style.source, ConfigSource::File);
    assert_eq!(config.model.value, "qwen-max");
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
top_k = 12
# Only override top_k, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.top_k.value, 12);
    assert_eq!(config.top_k.source, ConfigSource::File);
    // These should still be defaults
    assert_eq!(config.chunk_size.value, 1200);
    assert_eq!(config.chunk_size.source, ConfigSource::Default);
    assert_eq!(config.model.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    env::remove_var("EDURAG_CHUNK_SIZE");
    env::remove_var("EDURAG_TOP_K");
    env::remove_var("EDURAG_MODEL");

    env::set_var("EDURAG_CHUNK_SIZE", "600");
    env::set_var("EDURAG_TOP_K", "3");
    env::set_var("EDURAG_MODEL", "env-model");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
chunk_size = 800
top_k = 5
model = "file-model"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Environment should override file
    assert_eq!(config.chunk_size.value, 600);
    assert_eq!(config.chunk_size.source, ConfigSource::Environment);
    assert_eq!(config.top_k.value, 3);
    assert_eq!(config.top_k.source, ConfigSource::Environment);
    assert_eq!(config.model.value, "env-model");

    env::remove_var("EDURAG_CHUNK_SIZE");
    env::remove_var("EDURAG_TOP_K");
    env::remove_var("EDURAG_MODEL");
}

#[test]
#[serial]
fn test_cli_overrides_all() {
    env::remove_var("EDURAG_CHUNK_SIZE");
    env::set_var("EDURAG_CHUNK_SIZE", "600");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
chunk_size = 800
top_k = 5
"#
    )
    .unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    config.update_from_cli(CliConfigOverrides {
        chunk_size: Some(1000),
        top_k: Some(10),
        model: Some("cli-model".to_string()),
        ..Default::default()
    });

    assert_eq!(config.chunk_size.value, 1000);
    assert_eq!(config.chunk_size.source, ConfigSource::Cli);
    assert_eq!(config.top_k.value, 10);
    assert_eq!(config.top_k.source, ConfigSource::Cli);
    assert_eq!(config.model.value, "cli-model");
    assert_eq!(config.model.source, ConfigSource::Cli);

    env::remove_var("EDURAG_CHUNK_SIZE");
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    env::remove_var("EDURAG_CHUNK_SIZE");
    env::set_var("EDURAG_CHUNK_SIZE", "600");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "chunk_size = 800").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.chunk_size.value, 600);
    assert_eq!(config.chunk_size.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        chunk_size: Some(1000),
        ..Default::default()
    });

    assert_eq!(config.chunk_size.value, 1000);
    assert_eq!(config.chunk_size.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    env::remove_var("EDURAG_CHUNK_SIZE");
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "chunk_size = 800\ntop_k = 5").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    let inspection_map = config.to_inspection_map();

    assert!(inspection_map.contains_key("chunk_size"));
    assert!(inspection_map.contains_key("chunk_overlap"));
    assert!(inspection_map.contains_key("top_k"));
    assert!(inspection_map.contains_key("citation_style"));
    assert!(inspection_map.contains_key("model"));

    let (chunk_size_value, chunk_size_source) = &inspection_map["chunk_size"];
    assert_eq!(chunk_size_value, "800");
    assert_eq!(*chunk_size_source, ConfigSource::File);

    let (model_value, model_source) = &inspection_map["model"];
    assert_eq!(model_value, "qwen-plus-latest");
    assert_eq!(*model_source, ConfigSource::Default);
}

#[test]
fn test_parse_citation_style_variations() {
    assert_eq!(parse_citation_style("page").unwrap(), CitationStyle::Page);
    assert_eq!(parse_citation_style("PAGE").unwrap(), CitationStyle::Page);
    assert_eq!(parse_citation_style("topic").unwrap(), CitationStyle::Topic);
    assert_eq!(parse_citation_style("Topic").unwrap(), CitationStyle::Topic);
    assert!(parse_citation_style("chapter").is_err());
}

#[test]
fn test_validate_rejects_bad_chunking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "chunk_size = 100\nchunk_overlap = 100").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "invalid toml content [[[").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let non_existent = temp_dir.path().join("does_not_exist.toml");

    let result = LayeredConfig::with_defaults().load_from_file(&non_existent);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_full_configuration_workflow() {
    // 1. Defaults, 2. file, 3. environment, 4. CLI.
    env::remove_var("EDURAG_TOP_K");
    env::remove_var("EDURAG_MODEL");

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("edurag.toml");
    fs::write(
        &config_path,
        r#"
chunk_size = 900
chunk_overlap = 150
top_k = 6
model = "file-model"
"#,
    )
    .unwrap();

    env::set_var("EDURAG_TOP_K", "4");
    env::set_var("EDURAG_MODEL", "env-model");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(&config_path)
        .unwrap()
        .load_from_env();

    assert_eq!(config.chunk_size.value, 900); // From file
    assert_eq!(config.chunk_size.source, ConfigSource::File);
    assert_eq!(config.top_k.value, 4); // From env
    assert_eq!(config.top_k.source, ConfigSource::Environment);
    assert_eq!(config.model.value, "env-model"); // From env

    config.update_from_cli(CliConfigOverrides {
        top_k: Some(9),
        model: Some("cli-model".to_string()),
        ..Default::default()
    });

    assert_eq!(config.top_k.value, 9);
    assert_eq!(config.top_k.source, ConfigSource::Cli);
    assert_eq!(config.model.value, "cli-model");
    assert_eq!(config.chunk_size.value, 900); // Still from file

    env::remove_var("EDURAG_TOP_K");
    env::remove_var("EDURAG_MODEL");
}

/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::path::PathBuf;

use locmem::app_config::{Config, Formality, LogLevel};
use locmem::errors::ConfigError;
use crate::common;

#[test]
fn test_loadOrDefault_fullFile_shouldReadEverySection() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "locmem.json",
        r#"{
            "app": {
                "app_name": "LotoFuel",
                "app_description": "Fuel tracking",
                "domain": "automotive",
                "tone": "professional",
                "formality": "formal",
                "project_path": "ios",
                "enable_usage_analysis": false
            },
            "memory": {"path": "tm.json", "min_similarity": 0.85, "max_matches": 3},
            "glossary": {
                "path": "terms.json",
                "terms": [{"term": "LotoFuel", "doNotTranslate": true}]
            },
            "usage": {"extensions": ["swift"], "exclude_dirs": ["Pods"]},
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_default(&path)?;
    assert_eq!(config.app.formality, Formality::Formal);
    assert_eq!(config.app.project_path, Some(PathBuf::from("ios")));
    assert!(!config.app.enable_usage_analysis);
    assert!(config.app.enable_glossary);
    assert_eq!(config.memory.options().min_similarity, 0.85);
    assert_eq!(config.memory.options().max_matches, 3);
    assert_eq!(config.glossary.path, PathBuf::from("terms.json"));
    assert_eq!(config.glossary.terms.len(), 1);
    assert_eq!(config.usage.extensions, vec!["swift"]);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_loadOrDefault_malformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "locmem.json", "{ not json")?;

    assert!(Config::load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_emptyAppName_shouldFail() {
    let mut config = Config::default();
    config.app.app_name = "  ".to_string();

    assert_eq!(config.validate(), Err(ConfigError::MissingValue("app.app_name")));
}

#[test]
fn test_memoryResolvedPath_withoutPath_shouldUseSharedLocation() {
    let config = Config::default();
    let path = config.memory.resolved_path();

    assert!(path.ends_with("locmem/translation-memory.json") || path.ends_with(".locmem/translation-memory.json"));
}

#[test]
fn test_formality_display_shouldBeLowercase() {
    assert_eq!(Formality::Informal.to_string(), "informal");
    assert!(Formality::Formal.description().starts_with("formal"));
}

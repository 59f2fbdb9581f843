/*!
 * Integration tests for store persistence
 */

use anyhow::Result;
use std::fs;

use locmem::errors::StoreError;
use locmem::translation::glossary::{GlossaryEntry, GlossaryStore};
use locmem::translation::memory::{MemoryOptions, TranslationMemoryStore, TranslationQuality};
use crate::common;

#[test]
fn test_memory_saveThenLoad_shouldRoundTrip() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let memory = common::create_seeded_memory(temp_dir.path());
    assert!(memory.save()?);

    let reloaded = TranslationMemoryStore::open(temp_dir.path().join("tm.json"), MemoryOptions::default())?;
    assert_eq!(reloaded.len(), 3);
    for source in ["Save Changes", "Cancel", "Delete Account"] {
        assert_eq!(reloaded.entry(source), memory.entry(source));
    }
    assert_eq!(reloaded.entry("Cancel").unwrap().quality, TranslationQuality::HumanReviewed);
    assert!(!reloaded.is_dirty());
    Ok(())
}

#[test]
fn test_memory_fileFormat_shouldBeSortedVersionedJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let memory = common::create_seeded_memory(temp_dir.path());
    memory.save()?;

    let content = fs::read_to_string(temp_dir.path().join("tm.json"))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(value["version"], "1.0");

    let entry = &value["entries"]["Save Changes"];
    assert_eq!(entry["sourceText"], "Save Changes");
    assert_eq!(entry["translations"]["fr"]["value"], "Enregistrer les modifications");
    assert_eq!(entry["translations"]["fr"]["provider"], "openai");
    assert_eq!(entry["translations"]["fr"]["reviewedByHuman"], false);
    assert_eq!(entry["quality"], "machineTranslated");
    assert!(entry["lastUsed"].is_string());

    // Keys are written in sorted order
    let cancel = content.find("\"Cancel\"").unwrap();
    let delete = content.find("\"Delete Account\"").unwrap();
    let save = content.find("\"Save Changes\"").unwrap();
    assert!(cancel < delete && delete < save);
    assert!(content.find("\"context\"").unwrap() < content.find("\"lastUsed\"").unwrap());
    Ok(())
}

#[test]
fn test_memory_saveTwiceWithoutChange_shouldWriteOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("tm.json");
    let memory = common::create_seeded_memory(temp_dir.path());

    assert!(memory.save()?);
    fs::remove_file(&path)?;
    assert!(!memory.save()?);
    assert!(!path.exists());

    memory.force_save()?;
    assert!(path.exists());
    Ok(())
}

#[test]
fn test_memory_missingFile_shouldLoadEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let memory = TranslationMemoryStore::open(temp_dir.path().join("absent.json"), MemoryOptions::default())?;

    assert!(memory.is_empty());
    Ok(())
}

#[test]
fn test_memory_corruptFile_shouldFailAndKeepEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let memory = common::create_seeded_memory(temp_dir.path());
    common::create_test_file(temp_dir.path(), "tm.json", "{\"version\": \"1.0\", \"entries\": [")?;

    let result = memory.load();
    assert!(matches!(result, Err(StoreError::Decode { .. })));
    assert_eq!(memory.len(), 3);
    Ok(())
}

#[test]
fn test_memory_unsupportedVersion_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "tm.json", r#"{"version": "2.0", "entries": {}}"#)?;

    let result = TranslationMemoryStore::open(&path, MemoryOptions::default());
    assert!(matches!(result, Err(StoreError::UnsupportedVersion { .. })));
    Ok(())
}

#[test]
fn test_memory_saveIntoMissingDirectory_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("dir").join("tm.json");
    let memory = TranslationMemoryStore::new(&path, MemoryOptions::default());
    memory.store("Hello", "Bonjour", "fr", "p", None, false);

    memory.save()?;
    assert!(path.exists());
    Ok(())
}

#[test]
fn test_glossary_saveThenLoad_shouldRoundTripSortedTerms() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("glossary.json");
    let glossary = GlossaryStore::new(&path);
    glossary.add_terms(vec![
        GlossaryEntry::new("Widget").with_translation("fr", "Gadget"),
        GlossaryEntry::new("api").case_sensitive(true),
        GlossaryEntry::new("LotoFuel").do_not_translate(true).with_part_of_speech("noun"),
    ]);
    glossary.save()?;

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(value["version"], "1.0");
    let terms: Vec<&str> = value["terms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["term"].as_str().unwrap())
        .collect();
    assert_eq!(terms, vec!["api", "LotoFuel", "Widget"]);
    assert_eq!(value["terms"][1]["doNotTranslate"], true);

    let reloaded = GlossaryStore::open(&path)?;
    assert_eq!(reloaded.all_terms(), glossary.all_terms());
    Ok(())
}

#[test]
fn test_glossary_corruptFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "glossary.json", "[]")?;

    assert!(matches!(GlossaryStore::open(&path), Err(StoreError::Decode { .. })));
    Ok(())
}

#[test]
fn test_inMemoryStores_save_shouldSucceedWithoutFile() -> Result<()> {
    let memory = TranslationMemoryStore::in_memory(MemoryOptions::default());
    memory.store("Hello", "Bonjour", "fr", "p", None, false);
    assert!(memory.save()?);
    assert!(!memory.is_dirty());

    let glossary = GlossaryStore::in_memory();
    glossary.add_term(GlossaryEntry::new("Widget"));
    assert!(glossary.save()?);
    Ok(())
}

/*!
 * Tests for translation memory store functionality
 */

use locmem::translation::fuzzy::{levenshtein_distance, similarity};
use locmem::translation::memory::{MemoryOptions, TranslationMemoryStore, TranslationQuality};

fn store() -> TranslationMemoryStore {
    TranslationMemoryStore::in_memory(MemoryOptions::default())
}

#[test]
fn test_findExact_afterStore_shouldReturnTranslation() {
    let memory = store();
    memory.store("Hello", "Bonjour", "fr", "p", None, false);

    assert_eq!(memory.find_exact("Hello", "fr"), Some("Bonjour".to_string()));
    assert_eq!(memory.find_exact("Hello", "de"), None);
    assert_eq!(memory.find_exact("hello", "fr"), None);
}

#[test]
fn test_levenshtein_referencePairs_shouldMatch() {
    assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    assert_eq!(levenshtein_distance("", "abc"), 3);
    assert_eq!(levenshtein_distance("abc", "abc"), 0);
}

#[test]
fn test_similarity_nonEmptyPairs_shouldStayInRangeAndBeOneOnlyWhenEqual() {
    let samples = ["a", "ab", "Save", "Save Changes", "save changes", "Ünïcödé", "日本語"];
    for a in samples {
        for b in samples {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{} vs {} = {}", a, b, score);
            assert_eq!(score == 1.0, a == b, "{} vs {}", a, b);
        }
    }
}

#[test]
fn test_findSimilar_saveChangesScenario_shouldReturnEntry() {
    let memory = store();
    memory.store("Save Changes", "Enregistrer les modifications", "fr", "p", None, false);

    let matches = memory.find_similar("Save Change", "fr", None);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].translation, "Enregistrer les modifications");
    assert!((matches[0].similarity - 11.0 / 12.0).abs() < 1e-9);
}

#[test]
fn test_findSimilar_belowThreshold_shouldNeverAppear() {
    let memory = store();
    for source in ["Save", "Save Changes", "Discard Changes", "Saved", "Settings", "Sav"] {
        memory.store(source, "x", "fr", "p", None, false);
    }

    for query in ["Save!", "Save Change", "Changes", "Set"] {
        for m in memory.find_similar(query, "fr", Some(10)) {
            assert!(m.similarity >= 0.7);
            assert!(similarity(query, &m.source_text) >= 0.7);
        }
    }
}

#[test]
fn test_findSimilar_exactHit_shouldShortCircuit() {
    let memory = store();
    memory.store("Save", "Enregistrer", "fr", "p", None, false);
    memory.store("Saved", "Enregistré", "fr", "p", None, false);

    let matches = memory.find_similar("Save", "fr", None);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].similarity, 1.0);
    assert_eq!(matches[0].source_text, "Save");
}

#[test]
fn test_findSimilar_equalScores_shouldOrderBySourceText() {
    let memory = store();
    memory.store("Save Changez", "c", "fr", "p", None, false);
    memory.store("Save Changea", "a", "fr", "p", None, false);
    memory.store("Save Changeb", "b", "fr", "p", None, false);

    let sources: Vec<String> = memory
        .find_similar("Save Changes", "fr", None)
        .into_iter()
        .map(|m| m.source_text)
        .collect();
    assert_eq!(sources, vec!["Save Changea", "Save Changeb", "Save Changez"]);
}

#[test]
fn test_findSimilar_otherLanguageOnly_shouldBeEmpty() {
    let memory = store();
    memory.store("Save Changes", "Änderungen speichern", "de", "p", None, false);

    assert!(memory.find_similar("Save Change", "fr", None).is_empty());
}

#[test]
fn test_store_reviewedWrite_shouldUpgradeButNeverDowngrade() {
    let memory = store();
    memory.store("Hello", "Salut", "fr", "p", None, false);
    assert_eq!(memory.entry("Hello").unwrap().quality, TranslationQuality::MachineTranslated);

    memory.store("Hello", "Bonjour", "fr", "p", None, true);
    let entry = memory.entry("Hello").unwrap();
    assert_eq!(entry.quality, TranslationQuality::HumanReviewed);
    assert_eq!(entry.translations["fr"].confidence, 1.0);

    memory.store("Hello", "Allô", "fr", "p", None, false);
    let entry = memory.entry("Hello").unwrap();
    assert_eq!(entry.quality, TranslationQuality::HumanReviewed);
    assert_eq!(entry.translations["fr"].value, "Allô");
    assert_eq!(entry.translations["fr"].confidence, 0.9);
}

#[test]
fn test_markReviewed_missingPair_shouldBeNoOp() {
    let memory = store();
    memory.store("Hello", "Bonjour", "fr", "p", None, false);
    memory.save().unwrap();

    assert!(!memory.mark_reviewed("Hello", "de"));
    assert!(!memory.mark_reviewed("Bye", "fr"));
    assert!(!memory.is_dirty());

    assert!(memory.mark_reviewed("Hello", "fr"));
    let entry = memory.entry("Hello").unwrap();
    assert!(entry.translations["fr"].reviewed_by_human);
    assert_eq!(entry.quality, TranslationQuality::HumanReviewed);
}

#[test]
fn test_storeBatch_shouldStoreEveryTriple() {
    let memory = store();
    let items = vec![
        ("Yes".to_string(), "Oui".to_string(), "fr".to_string()),
        ("No".to_string(), "Non".to_string(), "fr".to_string()),
        ("Yes".to_string(), "Ja".to_string(), "de".to_string()),
    ];
    memory.store_batch(&items, "openai");

    assert_eq!(memory.len(), 2);
    assert_eq!(memory.find_exact("Yes", "de"), Some("Ja".to_string()));

    let stats = memory.statistics();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.translations_by_language["fr"], 2);
    assert_eq!(stats.by_provider["openai"], 3);
    assert_eq!(stats.human_reviewed, 0);
}

#[test]
fn test_removeAndClear_shouldDropEntries() {
    let memory = store();
    memory.store("A", "a", "fr", "p", None, false);
    memory.store("B", "b", "fr", "p", None, false);

    assert!(memory.remove("A"));
    assert!(!memory.remove("A"));
    assert_eq!(memory.len(), 1);

    memory.clear();
    assert!(memory.is_empty());
}

#[test]
fn test_clones_shouldShareEntries() {
    let memory = store();
    let handle = memory.clone();
    handle.store("Hello", "Bonjour", "fr", "p", None, false);

    assert_eq!(memory.find_exact("Hello", "fr"), Some("Bonjour".to_string()));
}

#[test]
fn test_concurrentWriters_shouldAllLand() {
    let memory = store();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let memory = memory.clone();
            std::thread::spawn(move || {
                for j in 0..25 {
                    memory.store(&format!("Source {} {}", i, j), "t", "fr", "p", None, false);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(memory.len(), 200);
}

/*!
 * Common test utilities for the locmem test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use locmem::translation::memory::{MemoryOptions, TranslationMemoryStore};

// Re-export the mock analyzer module
pub mod mock_analyzer;

/// Install a test logger once; repeated calls are ignored
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a small SwiftUI project using a few localization keys
pub fn create_test_project(dir: &Path) -> Result<PathBuf> {
    let root = dir.join("project");
    create_test_file(
        &root,
        "Sources/SettingsView.swift",
        r#"import SwiftUI

struct SettingsView: View {
    var body: some View {
        VStack {
            Text("settings.title")
                .font(.headline)
            Button("settings.save") {
                save()
            }
            Toggle("settings.notifications", isOn: $enabled)
        }
        .navigationTitle("settings.nav")
    }
}
"#,
    )?;
    create_test_file(
        &root,
        "Sources/HomeView.swift",
        r#"struct HomeView: View {
    var body: some View {
        Text("home.track")
            .foregroundColor(.secondary)
    }
}
"#,
    )?;
    create_test_file(&root, "build/Generated.swift", r#"Button("settings.save") {}"#)?;
    Ok(root)
}

/// A memory store in `dir` seeded with a few French translations
pub fn create_seeded_memory(dir: &Path) -> TranslationMemoryStore {
    let store = TranslationMemoryStore::new(dir.join("tm.json"), MemoryOptions::default());
    store.store("Save Changes", "Enregistrer les modifications", "fr", "openai", None, false);
    store.store("Cancel", "Annuler", "fr", "openai", None, true);
    store.store("Delete Account", "Supprimer le compte", "fr", "anthropic", Some("Danger zone"), false);
    store
}

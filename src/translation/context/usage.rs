/*!
 * Source-code usage context for localization keys.
 *
 * A usage analyzer reports how each key is used in the app's source: which
 * UI element displays it, a few code snippets, the modifiers applied and
 * where it occurs. The default analyzer walks the project once per call and
 * never writes to it.
 */

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// Maximum number of code snippets kept per key
pub const MAX_CODE_SNIPPETS: usize = 3;

/// Number of lines after an occurrence searched for chained modifiers
const MODIFIER_LOOKAHEAD: usize = 3;

/// Kind of UI element a string is displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UiElementType {
    Button,
    Text,
    Label,
    TextField,
    Toggle,
    Alert,
    NavigationTitle,
    Menu,
    TabItem,
    Placeholder,
}

impl UiElementType {
    /// Short guidance for translators
    pub fn description(&self) -> &'static str {
        match self {
            Self::Button => "button label (short, action-oriented)",
            Self::Text => "body text",
            Self::Label => "label next to an icon (short)",
            Self::TextField => "text field title",
            Self::Toggle => "toggle/switch label",
            Self::Alert => "alert title or message",
            Self::NavigationTitle => "navigation title (very short)",
            Self::Menu => "menu item",
            Self::TabItem => "tab bar item (one or two words)",
            Self::Placeholder => "input placeholder",
        }
    }
}

/// How one localization key is used in source code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringUsageContext {
    /// Localization key
    pub key: String,

    /// UI elements displaying the string
    #[serde(default)]
    pub element_types: BTreeSet<UiElementType>,

    /// Up to [`MAX_CODE_SNIPPETS`] snippets showing the usage
    #[serde(default)]
    pub code_snippets: Vec<String>,

    /// View modifiers applied at the usage sites, e.g. `font`
    #[serde(default)]
    pub modifiers: Vec<String>,

    /// `path:line` of each occurrence
    #[serde(default)]
    pub file_locations: Vec<String>,
}

impl StringUsageContext {
    /// Create an empty usage context for `key`
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    /// Add a snippet unless the cap is reached or it is already present
    pub fn add_snippet(&mut self, snippet: &str) {
        if self.code_snippets.len() < MAX_CODE_SNIPPETS
            && !self.code_snippets.iter().any(|s| s == snippet)
        {
            self.code_snippets.push(snippet.to_string());
        }
    }

    /// Add a modifier name once
    pub fn add_modifier(&mut self, modifier: &str) {
        if !self.modifiers.iter().any(|m| m == modifier) {
            self.modifiers.push(modifier.to_string());
        }
    }

    /// One-line UI description for prompts; `None` without element types
    pub fn describe(&self) -> Option<String> {
        if self.element_types.is_empty() {
            return None;
        }

        let elements: Vec<&str> = self.element_types.iter().map(|e| e.description()).collect();
        let mut description = elements.join("; ");
        if !self.modifiers.is_empty() {
            description.push_str(&format!(" [modifiers: {}]", self.modifiers.join(", ")));
        }
        Some(description)
    }
}

/// Resolves usage context for a batch of keys in one pass
#[async_trait]
pub trait UsageAnalyzer: Send + Sync + Debug {
    /// Usage context for each key found under `project_root`.
    ///
    /// Keys that are not found are absent from the result. An empty key list
    /// yields an empty map. Implementations must not write to the filesystem.
    async fn analyze_usage(
        &self,
        keys: &[String],
        project_root: &Path,
    ) -> HashMap<String, StringUsageContext>;
}

static ELEMENT_PATTERNS: Lazy<Vec<(Regex, UiElementType)>> = Lazy::new(|| {
    [
        (r"\bButton\s*\(", UiElementType::Button),
        (r"\b(?:Text|Secure)Field\s*\(", UiElementType::TextField),
        (r"\bToggle\s*\(", UiElementType::Toggle),
        (r"\.alert\s*\(|\bAlert\s*\(", UiElementType::Alert),
        (r"\.navigation(?:Bar)?Title\s*\(", UiElementType::NavigationTitle),
        (r"\bMenu\s*\(", UiElementType::Menu),
        (r"\.tabItem\b", UiElementType::TabItem),
        (r"\bprompt\s*:|\bplaceholder\b", UiElementType::Placeholder),
        (r"\bLabel\s*\(", UiElementType::Label),
        (r"\bText\s*\(", UiElementType::Text),
    ]
    .into_iter()
    .map(|(pattern, element)| (Regex::new(pattern).expect("valid element pattern"), element))
    .collect()
});

static MODIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([a-z][A-Za-z]*)\s*\(").expect("valid modifier pattern"));

/// Modifiers already reported as element types
const ELEMENT_MODIFIERS: &[&str] = &["alert", "navigationTitle", "navigationBarTitle", "tabItem"];

/// Usage analyzer that scans source files for quoted key literals
#[derive(Debug, Clone)]
pub struct SourceUsageAnalyzer {
    /// File extensions to scan, without dot
    extensions: Vec<String>,

    /// Directory names never descended into
    exclude_dirs: Vec<String>,
}

impl Default for SourceUsageAnalyzer {
    fn default() -> Self {
        Self {
            extensions: vec!["swift".to_string(), "m".to_string(), "mm".to_string()],
            exclude_dirs: vec![
                "build".to_string(),
                "DerivedData".to_string(),
                "Pods".to_string(),
                "Carthage".to_string(),
                "node_modules".to_string(),
            ],
        }
    }
}

impl SourceUsageAnalyzer {
    /// Create an analyzer for the given extensions and excluded directories
    pub fn new(extensions: Vec<String>, exclude_dirs: Vec<String>) -> Self {
        Self {
            extensions,
            exclude_dirs,
        }
    }

    /// Walk `project_root` once and collect usage for every key
    pub fn scan(&self, keys: &[String], project_root: &Path) -> HashMap<String, StringUsageContext> {
        let mut result: HashMap<String, StringUsageContext> = HashMap::new();
        if keys.is_empty() {
            return result;
        }

        let needles: Vec<(&String, String)> = keys.iter().map(|k| (k, format!("\"{}\"", k))).collect();
        let files = FileManager::find_source_files(project_root, &self.extensions, &self.exclude_dirs);
        debug!("Scanning {} source files for {} keys", files.len(), keys.len());

        for file in &files {
            let content = match std::fs::read_to_string(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable source file {:?}: {}", file, e);
                    continue;
                }
            };
            let display_path = relative_display(file, project_root);
            let lines: Vec<&str> = content.lines().collect();

            for (index, line) in lines.iter().enumerate() {
                for (key, needle) in &needles {
                    if !line.contains(needle.as_str()) {
                        continue;
                    }
                    let usage = result
                        .entry((*key).clone())
                        .or_insert_with(|| StringUsageContext::new(key));
                    record_occurrence(usage, &lines, index, &display_path);
                }
            }
        }

        result
    }
}

#[async_trait]
impl UsageAnalyzer for SourceUsageAnalyzer {
    async fn analyze_usage(
        &self,
        keys: &[String],
        project_root: &Path,
    ) -> HashMap<String, StringUsageContext> {
        if keys.is_empty() {
            return HashMap::new();
        }

        let analyzer = self.clone();
        let keys = keys.to_vec();
        let root = project_root.to_path_buf();
        match tokio::task::spawn_blocking(move || analyzer.scan(&keys, &root)).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Usage analysis task failed: {}", e);
                HashMap::new()
            }
        }
    }
}

/// Record one occurrence found on `lines[index]`
fn record_occurrence(usage: &mut StringUsageContext, lines: &[&str], index: usize, path: &str) {
    let line = lines[index];
    usage.file_locations.push(format!("{}:{}", path, index + 1));

    for (pattern, element) in ELEMENT_PATTERNS.iter() {
        if pattern.is_match(line) {
            usage.element_types.insert(*element);
        }
    }

    // Chained modifiers continue on following lines starting with '.'
    let mut snippet_lines = vec![line.trim()];
    let chained = lines
        .iter()
        .skip(index + 1)
        .take(MODIFIER_LOOKAHEAD)
        .map(|l| l.trim())
        .take_while(|l| l.starts_with('.'));
    snippet_lines.extend(chained);

    for snippet_line in &snippet_lines {
        for cap in MODIFIER_PATTERN.captures_iter(snippet_line) {
            let name = &cap[1];
            if ELEMENT_MODIFIERS.contains(&name) {
                // .alert / .navigationTitle on a chained line still name the element
                for (pattern, element) in ELEMENT_PATTERNS.iter() {
                    if pattern.is_match(snippet_line) {
                        usage.element_types.insert(*element);
                    }
                }
            } else {
                usage.add_modifier(name);
            }
        }
    }

    usage.add_snippet(&snippet_lines.join("\n"));
}

fn relative_display(file: &Path, root: &Path) -> String {
    file.strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_else(|_| file.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

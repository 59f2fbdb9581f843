/*!
 * Mock usage analyzer for testing
 *
 * Returns predetermined usage contexts and records every call so tests can
 * check that a batch is analyzed in a single pass.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use locmem::translation::context::{StringUsageContext, UiElementType, UsageAnalyzer};

/// Usage analyzer answering from a fixed table
#[derive(Debug, Default)]
pub struct MockUsageAnalyzer {
    /// Usage returned per key
    pub usage: HashMap<String, StringUsageContext>,
    /// Keys and root of every call, in order
    pub calls: Mutex<Vec<(Vec<String>, PathBuf)>>,
}

impl MockUsageAnalyzer {
    /// Create an analyzer that knows no keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `key` as shown in `element`
    pub fn with_element(mut self, key: &str, element: UiElementType) -> Self {
        let usage = self
            .usage
            .entry(key.to_string())
            .or_insert_with(|| StringUsageContext::new(key));
        usage.element_types.insert(element);
        self
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl UsageAnalyzer for MockUsageAnalyzer {
    async fn analyze_usage(&self, keys: &[String], project_root: &Path) -> HashMap<String, StringUsageContext> {
        self.calls.lock().push((keys.to_vec(), project_root.to_path_buf()));
        keys.iter()
            .filter_map(|k| self.usage.get(k).map(|u| (k.clone(), u.clone())))
            .collect()
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::{DirEntry, WalkDir};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to a string, mapping a missing file to `None`.
    ///
    /// Every other I/O failure is returned unchanged.
    pub fn read_optional<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
        match fs::read_to_string(path.as_ref()) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write a string to a file atomically.
    ///
    /// The content goes to a temporary file in the target directory which is
    /// then renamed over the destination, so readers never observe a partial
    /// document.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::write_atomic(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Find source files below `dir` whose extension is in `extensions`.
    ///
    /// Directories named in `exclude_dirs` (and hidden directories) are not
    /// descended into. Unreadable entries are skipped with a warning.
    pub fn find_source_files<P: AsRef<Path>>(
        dir: P,
        extensions: &[String],
        exclude_dirs: &[String],
    ) -> Vec<PathBuf> {
        let is_excluded = |entry: &DirEntry| -> bool {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return false;
            }
            let name = entry.file_name().to_string_lossy();
            name.starts_with('.') || exclude_dirs.iter().any(|d| d.as_str() == name)
        };

        let mut result = Vec::new();
        for entry in WalkDir::new(dir.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_excluded(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy();
                if extensions.iter().any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(&ext)) {
                    result.push(path.to_path_buf());
                }
            }
        }

        result
    }
}

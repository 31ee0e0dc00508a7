//! Local filesystem storage for cached search indexes.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/sources/<alias>/search_index.json   normalized record collection
//! <root>/sources/<alias>/metadata.json       fetch metadata
//! <root>/sources/<alias>/.index/             tantivy index
//! ```
//!
//! The root resolves from `SIDX_DATA_DIR`, then the configured
//! `paths.root` (`XDG_DATA_HOME/sidx` by default, else `~/.sidx`).
//! Writes go through a tmp file and rename so a crashed process never
//! leaves a half-written index behind.

use crate::{Config, Error, Result, SearchIndexFile, Source};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum allowed alias length, matching the CLI constraint.
const MAX_ALIAS_LEN: usize = 64;

/// Local filesystem storage for cached search indexes.
pub struct Storage {
    root_dir: PathBuf,
}

impl Storage {
    /// Create a storage instance rooted at the default data directory.
    ///
    /// `SIDX_DATA_DIR` overrides everything; otherwise the configured
    /// `paths.root` decides.
    pub fn new() -> Result<Self> {
        if let Ok(dir) = std::env::var("SIDX_DATA_DIR") {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Self::with_root(PathBuf::from(trimmed));
            }
        }

        let config = Config::load()?;
        Self::with_root(config.paths.root)
    }

    /// Create a storage instance rooted at an explicit directory.
    pub fn with_root(root_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root_dir)
            .map_err(|e| Error::Storage(format!("failed to create data root: {e}")))?;
        Ok(Self { root_dir })
    }

    /// The data root directory.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Directory for a source's cached files.
    pub fn source_dir(&self, alias: &str) -> Result<PathBuf> {
        validate_alias(alias)?;
        Ok(self.root_dir.join("sources").join(alias))
    }

    /// Whether a source is present in the cache.
    #[must_use]
    pub fn exists(&self, alias: &str) -> bool {
        self.source_dir(alias)
            .map(|dir| dir.join("metadata.json").exists())
            .unwrap_or(false)
    }

    /// All cached source aliases, sorted.
    pub fn list_sources(&self) -> Result<Vec<String>> {
        let sources_dir = self.root_dir.join("sources");
        if !sources_dir.exists() {
            return Ok(Vec::new());
        }

        let mut aliases = Vec::new();
        for entry in fs::read_dir(&sources_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    if self.exists(name) {
                        aliases.push(name.to_string());
                    }
                }
            }
        }
        aliases.sort();
        Ok(aliases)
    }

    /// Path of the normalized record collection for a source.
    pub fn index_file_path(&self, alias: &str) -> Result<PathBuf> {
        Ok(self.source_dir(alias)?.join("search_index.json"))
    }

    /// Path of the tantivy index directory for a source.
    pub fn index_dir(&self, alias: &str) -> Result<PathBuf> {
        Ok(self.source_dir(alias)?.join(".index"))
    }

    /// Path of the fetch metadata file for a source.
    pub fn metadata_path(&self, alias: &str) -> Result<PathBuf> {
        Ok(self.source_dir(alias)?.join("metadata.json"))
    }

    /// Save the normalized record collection for a source.
    pub fn save_index_file(&self, alias: &str, index: &SearchIndexFile) -> Result<()> {
        let path = self.index_file_path(alias)?;
        let json = crate::format::write_search_index_json(index)?;
        self.write_atomic(&path, &json)?;
        debug!("saved search_index.json for {}", alias);
        Ok(())
    }

    /// Load the normalized record collection for a source.
    pub fn load_index_file(&self, alias: &str) -> Result<SearchIndexFile> {
        let path = self.index_file_path(alias)?;
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "no cached index for source '{alias}'"
            )));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("failed to read search_index.json: {e}")))?;
        crate::format::parse_search_index(&json)
    }

    /// Save fetch metadata for a source.
    pub fn save_metadata(&self, alias: &str, metadata: &Source) -> Result<()> {
        let path = self.metadata_path(alias)?;
        let json = serde_json::to_string_pretty(metadata)?;
        self.write_atomic(&path, &json)?;
        debug!("saved metadata.json for {}", alias);
        Ok(())
    }

    /// Load fetch metadata for a source.
    pub fn load_metadata(&self, alias: &str) -> Result<Source> {
        let path = self.metadata_path(alias)?;
        if !path.exists() {
            return Err(Error::NotFound(format!("source '{alias}' is not cached")));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| Error::Storage(format!("failed to read metadata.json: {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Storage(format!("failed to parse metadata.json: {e}")))
    }

    /// Remove a source's cached files entirely.
    pub fn remove_source(&self, alias: &str) -> Result<()> {
        let dir = self.source_dir(alias)?;
        if !dir.exists() {
            return Err(Error::NotFound(format!("source '{alias}' is not cached")));
        }
        fs::remove_dir_all(&dir)
            .map_err(|e| Error::Storage(format!("failed to remove source: {e}")))?;
        Ok(())
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("failed to create source dir: {e}")))?;
        }

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)
            .map_err(|e| Error::Storage(format!("failed to write {}: {e}", path.display())))?;
        fs::rename(&tmp_path, path)
            .map_err(|e| Error::Storage(format!("failed to commit {}: {e}", path.display())))?;
        Ok(())
    }
}

/// Validate that an alias is safe to use as a directory name.
pub fn validate_alias(alias: &str) -> Result<()> {
    if alias.is_empty() {
        return Err(Error::Storage("alias cannot be empty".into()));
    }
    if alias.starts_with('-') {
        return Err(Error::Storage(format!(
            "invalid alias '{alias}': cannot start with '-'"
        )));
    }
    if alias.len() > MAX_ALIAS_LEN {
        return Err(Error::Storage(format!(
            "invalid alias '{alias}': exceeds maximum length of {MAX_ALIAS_LEN}"
        )));
    }
    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::Storage(format!(
            "invalid alias '{alias}': only [A-Za-z0-9_-] are allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Category, DocRecord};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_index() -> SearchIndexFile {
        SearchIndexFile {
            docs: vec![DocRecord {
                location: "guide/".into(),
                page: "Guide".into(),
                title: "Guide".into(),
                text: "Whitened models.".into(),
                category: Category::Page,
            }],
        }
    }

    fn sample_metadata() -> Source {
        Source {
            url: "https://example.com/search_index.js".into(),
            etag: Some("\"abc\"".into()),
            last_modified: None,
            fetched_at: Utc::now(),
            sha256: "digest".into(),
            record_count: 1,
        }
    }

    #[test]
    fn index_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::with_root(temp.path().to_path_buf()).unwrap();

        let index = sample_index();
        storage.save_index_file("rbm", &index).unwrap();
        let loaded = storage.load_index_file("rbm").unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn metadata_round_trip_marks_existence() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::with_root(temp.path().to_path_buf()).unwrap();

        assert!(!storage.exists("rbm"));
        storage.save_metadata("rbm", &sample_metadata()).unwrap();
        assert!(storage.exists("rbm"));

        let loaded = storage.load_metadata("rbm").unwrap();
        assert_eq!(loaded.etag.as_deref(), Some("\"abc\""));
        assert_eq!(loaded.record_count, 1);
    }

    #[test]
    fn list_sources_is_sorted() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::with_root(temp.path().to_path_buf()).unwrap();

        for alias in ["zeta", "alpha", "mid"] {
            storage.save_metadata(alias, &sample_metadata()).unwrap();
        }

        assert_eq!(storage.list_sources().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn remove_source_deletes_everything() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::with_root(temp.path().to_path_buf()).unwrap();

        storage.save_index_file("rbm", &sample_index()).unwrap();
        storage.save_metadata("rbm", &sample_metadata()).unwrap();
        storage.remove_source("rbm").unwrap();

        assert!(!storage.exists("rbm"));
        assert!(matches!(
            storage.load_index_file("rbm"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn remove_missing_source_is_not_found() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::with_root(temp.path().to_path_buf()).unwrap();
        assert!(matches!(
            storage.remove_source("ghost"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn alias_validation_rejects_traversal() {
        for bad in ["", "-lead", "a/b", "a\\b", "..", "dot.dot", "x".repeat(65).as_str()] {
            assert!(validate_alias(bad).is_err(), "'{bad}' should be rejected");
        }
        for good in ["rbm", "whitened-rbms", "docs_2024"] {
            assert!(validate_alias(good).is_ok());
        }
    }
}

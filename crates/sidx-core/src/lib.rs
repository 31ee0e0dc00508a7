//! # sidx-core
//!
//! Core functionality for sidx - a local search tool for Documenter-style
//! documentation search indexes.
//!
//! Documentation generators ship a `search_index.js` file next to their
//! HTML output: a flat, denormalized collection of records (location,
//! page, title, text, category) that a browser widget filters at page
//! load. This crate handles that artifact's whole lifecycle offline:
//!
//! - **Format**: reading and writing the JS-wrapped and bare JSON forms
//! - **Validation**: structural diagnostics over record collections
//! - **Building**: deterministic regeneration from a markdown tree
//! - **Fetching**: conditional HTTP downloads of remote indexes
//! - **Storage**: a per-source local cache layout
//! - **Search**: a tantivy index with scored, snippeted hits
//!
//! ## Quick start
//!
//! ```rust
//! use sidx_core::{parse_search_index, validate, is_valid};
//!
//! let index = parse_search_index(r#"{"docs":[
//!     {"location":"guide/","page":"Guide","title":"","text":"Whitened models.","category":"page"}
//! ]}"#)?;
//!
//! let diagnostics = validate(&index);
//! assert!(is_valid(&diagnostics));
//! # Ok::<(), sidx_core::Error>(())
//! ```

/// Regenerating indexes from markdown documentation trees.
pub mod builder;
/// Global TOML configuration.
pub mod config;
/// Error types and result alias.
pub mod error;
/// HTTP fetching with conditional request support.
pub mod fetcher;
/// On-disk search index format (JS wrapper and bare JSON).
pub mod format;
/// Tantivy search index.
pub mod index;
/// Local filesystem cache for sources.
pub mod storage;
/// Core data types.
pub mod types;
/// Structural validation of record collections.
pub mod validate;

pub use builder::{BuildResult, IndexBuilder, PageBuild};
pub use config::{Config, DefaultsConfig, PathsConfig};
pub use error::{Error, Result};
pub use fetcher::{FetchResult, Fetcher};
pub use format::{parse_search_index, write_search_index_js, write_search_index_json};
pub use index::SearchIndex;
pub use storage::{Storage, validate_alias};
pub use types::{
    Category, Diagnostic, DiagnosticSeverity, DocRecord, SearchHit, SearchIndexFile, Source,
};
pub use validate::{is_valid, validate};

//! Command implementations for the sidx CLI.

mod add;
mod build;
mod list;
mod remove;
mod search;
mod update;
mod validate;

pub use add::add_source;
pub use build::build_index;
pub use list::list_sources;
pub use remove::remove_source;
pub use search::search;
pub use update::{update_all, update_source};
pub use validate::validate_target;

use anyhow::Result;
use sidx_core::{SearchIndex, Storage};

/// Create an empty index directory for a source, discarding any previous
/// one. Indexing is always a full rebuild; there is no incremental path.
pub(crate) fn fresh_index(storage: &Storage, alias: &str) -> Result<SearchIndex> {
    let index_dir = storage.index_dir(alias)?;
    if index_dir.exists() {
        std::fs::remove_dir_all(&index_dir)?;
    }
    Ok(SearchIndex::create(&index_dir)?)
}

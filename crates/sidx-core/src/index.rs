//! Tantivy-backed search over documentation records.
//!
//! Each cached source gets its own index directory. Indexing a source
//! replaces all of its documents (the record collection is regenerated
//! wholesale upstream, so there is nothing to merge), then commits and
//! reloads the reader so searches observe the new state.

use crate::{Category, DocRecord, Error, Result, SearchHit};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, STORED, STRING, Schema, TEXT, Value};
use tantivy::{Index, IndexReader, doc};
use tracing::{debug, info};

/// Heap budget handed to the tantivy writer.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// A persistent full-text index over documentation records.
pub struct SearchIndex {
    index: Index,
    location_field: Field,
    page_field: Field,
    title_field: Field,
    text_field: Field,
    category_field: Field,
    source_field: Field,
    reader: IndexReader,
}

impl SearchIndex {
    /// Create a fresh index at `index_path`.
    pub fn create(index_path: &Path) -> Result<Self> {
        let mut schema_builder = Schema::builder();
        let location_field = schema_builder.add_text_field("location", STRING | STORED);
        let page_field = schema_builder.add_text_field("page", TEXT | STORED);
        let title_field = schema_builder.add_text_field("title", TEXT | STORED);
        let text_field = schema_builder.add_text_field("text", TEXT | STORED);
        let category_field = schema_builder.add_text_field("category", STRING | STORED);
        let source_field = schema_builder.add_text_field("source", STRING | STORED);
        let schema = schema_builder.build();

        std::fs::create_dir_all(index_path)
            .map_err(|e| Error::Index(format!("failed to create index directory: {e}")))?;

        let index = Index::create_in_dir(index_path, schema)
            .map_err(|e| Error::Index(format!("failed to create index: {e}")))?;
        let reader = Self::reader_for(&index)?;

        Ok(Self {
            index,
            location_field,
            page_field,
            title_field,
            text_field,
            category_field,
            source_field,
            reader,
        })
    }

    /// Open an existing index at `index_path`.
    pub fn open(index_path: &Path) -> Result<Self> {
        let index = Index::open_in_dir(index_path)
            .map_err(|e| Error::Index(format!("failed to open index: {e}")))?;
        let schema = index.schema();

        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| Error::Index(format!("missing '{name}' field in schema")))
        };
        let location_field = field("location")?;
        let page_field = field("page")?;
        let title_field = field("title")?;
        let text_field = field("text")?;
        let category_field = field("category")?;
        let source_field = field("source")?;

        let reader = Self::reader_for(&index)?;

        Ok(Self {
            index,
            location_field,
            page_field,
            title_field,
            text_field,
            category_field,
            source_field,
            reader,
        })
    }

    fn reader_for(index: &Index) -> Result<IndexReader> {
        index
            .reader_builder()
            .reload_policy(tantivy::ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| Error::Index(format!("failed to create reader: {e}")))
    }

    /// Replace all documents for `source` with `records`.
    pub fn index_records(&mut self, source: &str, records: &[DocRecord]) -> Result<()> {
        let mut writer = self
            .index
            .writer(WRITER_HEAP_BYTES)
            .map_err(|e| Error::Index(format!("failed to create writer: {e}")))?;

        writer.delete_term(tantivy::Term::from_field_text(self.source_field, source));

        let mut total_text_bytes = 0usize;
        for record in records {
            total_text_bytes += record.text.len();
            writer
                .add_document(doc!(
                    self.location_field => record.location.as_str(),
                    self.page_field => record.page.as_str(),
                    self.title_field => record.title.as_str(),
                    self.text_field => record.text.as_str(),
                    self.category_field => record.category.as_str(),
                    self.source_field => source,
                ))
                .map_err(|e| Error::Index(format!("failed to add document: {e}")))?;
        }

        writer
            .commit()
            .map_err(|e| Error::Index(format!("failed to commit: {e}")))?;
        self.reader
            .reload()
            .map_err(|e| Error::Index(format!("failed to reload reader: {e}")))?;

        info!(
            "indexed {} records ({} text bytes) for {}",
            records.len(),
            total_text_bytes,
            source
        );
        Ok(())
    }

    /// Search the index, optionally filtered by source alias and category.
    ///
    /// Hits are ordered by descending score. Matching considers section
    /// titles, page titles, and record text.
    pub fn search(
        &self,
        query_str: &str,
        source: Option<&str>,
        category: Option<&Category>,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        // tantivy's TopDocs collector rejects a zero limit outright.
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sanitized = sanitize_query(query_str);
        if sanitized.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();
        let query_parser = QueryParser::for_index(
            &self.index,
            vec![self.text_field, self.title_field, self.page_field],
        );

        let mut full_query = sanitized;
        if let Some(source) = source {
            full_query = format!("source:{source} AND ({full_query})");
        }
        if let Some(category) = category {
            full_query = format!("category:{} AND ({full_query})", category.as_str());
        }

        let query = query_parser
            .parse_query(&full_query)
            .map_err(|e| Error::Index(format!("failed to parse query: {e}")))?;

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| Error::Index(format!("search failed: {e}")))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: tantivy::TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| Error::Index(format!("failed to retrieve doc: {e}")))?;

            let text = self.field_text(&doc, self.text_field)?;
            let title = self.field_text(&doc, self.title_field)?;
            let snippet_base = if text.is_empty() { &title } else { &text };
            let snippet = extract_snippet(snippet_base, query_str, 100);

            hits.push(SearchHit {
                source: self.field_text(&doc, self.source_field)?,
                location: self.field_text(&doc, self.location_field)?,
                page: self.field_text(&doc, self.page_field)?,
                title,
                snippet,
                score,
                category: Category::from(self.field_text(&doc, self.category_field)?),
            });
        }

        debug!("found {} hits for query '{}'", hits.len(), query_str);
        Ok(hits)
    }

    fn field_text(&self, doc: &tantivy::TantivyDocument, field: Field) -> Result<String> {
        doc.get_first(field)
            .and_then(|v| v.as_str())
            .map(std::string::ToString::to_string)
            .ok_or_else(|| Error::Index("field not found in document".into()))
    }
}

/// Neutralize characters the tantivy query grammar treats specially.
///
/// Code-like queries (`whiten(rbm, data)`, `x[1]`) must search as plain
/// terms; the grammar does not accept backslash escapes, so the special
/// characters become term separators instead.
fn sanitize_query(query_str: &str) -> String {
    query_str
        .chars()
        .map(|c| {
            if matches!(
                c,
                '\\' | '"' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '~' | ':'
            ) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Extract a snippet of `content` around the first case-insensitive match
/// of `query`, honoring UTF-8 character boundaries.
fn extract_snippet(content: &str, query: &str, max_len: usize) -> String {
    let query_lower = query.to_lowercase();

    // Case folding can change byte lengths (e.g. 'İ'), so offsets found
    // in the lowered text are mapped back to the original bytes.
    let mut lowered = String::with_capacity(content.len());
    let mut origins = Vec::with_capacity(content.len());
    for (i, c) in content.char_indices() {
        for lc in c.to_lowercase() {
            for _ in 0..lc.len_utf8() {
                origins.push(i);
            }
            lowered.push(lc);
        }
    }

    if let Some(pos) = lowered.find(&query_lower) {
        let match_start = origins.get(pos).copied().unwrap_or(0);
        let match_end = origins
            .get(pos + query_lower.len())
            .copied()
            .unwrap_or(content.len());
        let byte_start = match_start.saturating_sub(50);
        let byte_end = (match_end + 50).min(content.len());

        let start = if byte_start == 0 {
            0
        } else {
            content
                .char_indices()
                .take_while(|(i, _)| *i <= byte_start)
                .last()
                .map_or(0, |(i, _)| i)
        };
        let end = content
            .char_indices()
            .find(|(i, _)| *i >= byte_end)
            .map_or(content.len(), |(i, _)| i);

        let mut snippet = String::with_capacity(end - start + 6);
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.push_str(&content[start..end]);
        if end < content.len() {
            snippet.push_str("...");
        }
        return snippet;
    }

    if content.len() <= max_len {
        return content.to_string();
    }
    let boundary = content
        .char_indices()
        .take_while(|(i, _)| *i < max_len)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    if boundary == 0 {
        String::from("...")
    } else {
        format!("{}...", &content[..boundary])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_records() -> Vec<DocRecord> {
        vec![
            DocRecord {
                location: "guide/#Whitening".into(),
                page: "Guide".into(),
                title: "Whitening".into(),
                text: String::new(),
                category: Category::Section,
            },
            DocRecord {
                location: "guide/".into(),
                page: "Guide".into(),
                title: "Guide".into(),
                text: "Whitening rescales visible units to zero mean and unit variance.".into(),
                category: Category::Page,
            },
            DocRecord {
                location: "ref/#whiten".into(),
                page: "Reference".into(),
                title: "whiten".into(),
                text: "whiten(rbm, data) returns a whitened copy of the model.".into(),
                category: Category::Method,
            },
        ]
    }

    #[test]
    fn create_and_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index");

        let mut index = SearchIndex::create(&path).expect("create");
        index.index_records("rbm", &sample_records()).unwrap();
        drop(index);

        let reopened = SearchIndex::open(&path).expect("open");
        let hits = reopened.search("whitening", None, None, 10).unwrap();
        assert!(!hits.is_empty());
    }

    #[test]
    fn open_nonexistent_fails() {
        let temp = TempDir::new().unwrap();
        assert!(SearchIndex::open(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn search_returns_scored_hits_in_order() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        let hits = index.search("whitening", Some("rbm"), None, 10).unwrap();
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(hits.iter().all(|h| h.source == "rbm"));
    }

    #[test]
    fn category_filter_narrows_results() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        let hits = index
            .search("whiten", Some("rbm"), Some(&Category::Method), 10)
            .unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.category == Category::Method));
    }

    #[test]
    fn section_hits_fall_back_to_title_snippets() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        let hits = index
            .search("whitening", Some("rbm"), Some(&Category::Section), 10)
            .unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].snippet, "Whitening");
    }

    #[test]
    fn reindexing_replaces_prior_documents() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        let replacement = vec![DocRecord {
            location: "changelog/".into(),
            page: "Changelog".into(),
            title: "Changelog".into(),
            text: "Centered gradients everywhere.".into(),
            category: Category::Page,
        }];
        index.index_records("rbm", &replacement).unwrap();

        let stale = index.search("whitening", Some("rbm"), None, 10).unwrap();
        assert!(stale.is_empty(), "old records should be gone");
        let fresh = index.search("centered", Some("rbm"), None, 10).unwrap();
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn limit_is_respected() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();

        let records: Vec<DocRecord> = (0..20)
            .map(|i| DocRecord {
                location: format!("page{i}/"),
                page: format!("Page {i}"),
                title: format!("Page {i}"),
                text: "persistent contrastive divergence".into(),
                category: Category::Page,
            })
            .collect();
        index.index_records("rbm", &records).unwrap();

        let hits = index.search("persistent", Some("rbm"), None, 5).unwrap();
        assert_eq!(hits.len(), 5);
    }

    #[test]
    fn queries_with_special_characters_do_not_error() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        for query in ["whiten(rbm, data)", "a:b", "x[1]", "\"quoted\"", "tilde~"] {
            let result = index.search(query, Some("rbm"), None, 10);
            assert!(result.is_ok(), "query '{query}' should not error");
        }

        // Code-like queries still match on their plain terms.
        let hits = index
            .search("whiten(rbm, data)", Some("rbm"), None, 10)
            .unwrap();
        assert!(hits.iter().any(|h| h.location == "ref/#whiten"));
    }

    #[test]
    fn punctuation_only_query_returns_no_hits() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        let hits = index.search("()[]{}", Some("rbm"), None, 10).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn zero_limit_returns_no_hits() {
        let temp = TempDir::new().unwrap();
        let mut index = SearchIndex::create(&temp.path().join("index")).unwrap();
        index.index_records("rbm", &sample_records()).unwrap();

        let hits = index.search("whitening", Some("rbm"), None, 0).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn snippet_respects_utf8_boundaries() {
        let content = "é".repeat(200);
        let snippet = extract_snippet(&content, "zzz", 100);
        assert!(snippet.is_char_boundary(0));
        assert!(snippet.ends_with("..."));

        let hit = extract_snippet("αβγ match δεζ", "match", 100);
        assert!(hit.contains("match"));
    }

    #[test]
    fn snippet_survives_length_changing_case_folds() {
        // 'İ' lowercases to two chars, shifting lowered byte offsets.
        let content = format!("{} match", "İ".repeat(200));
        let snippet = extract_snippet(&content, "match", 100);
        assert!(snippet.contains("match"));

        let mixed = extract_snippet("İstanbul whitening notes", "WHITENING", 100);
        assert!(mixed.contains("whitening"));
    }
}

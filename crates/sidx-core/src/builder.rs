//! Regenerating a search index from a markdown documentation tree.
//!
//! This mirrors what the documentation generator does on every build: walk
//! the source pages in a stable order, split each page into prose blocks
//! and heading anchors, and emit one flat record per block. The whole
//! index is rebuilt from scratch each run; there is no incremental path.
//! Two builds over identical trees produce identical record collections.
//!
//! Pages contribute two record kinds:
//! - a `page` record per prose block, located at the page itself;
//! - a `section` record per heading, located at the page plus an anchor
//!   slug derived from the heading text.
//!
//! Docstring categories (`function`, `method`, ...) require evaluating the
//! documented package and are outside what a markdown walk can produce;
//! they are preserved by the parser and validator but never synthesized
//! here.

use crate::{
    Category, Diagnostic, DiagnosticSeverity, DocRecord, Error, Result, SearchIndexFile,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Outcome of a full index build.
#[derive(Debug)]
pub struct BuildResult {
    /// The regenerated index.
    pub index: SearchIndexFile,
    /// Per-page findings (parse fallbacks, heading-free pages).
    pub diagnostics: Vec<Diagnostic>,
    /// Number of markdown pages walked.
    pub page_count: usize,
}

/// Builds search indexes from markdown documentation trees.
pub struct IndexBuilder {
    parser: Parser,
}

impl IndexBuilder {
    /// Create a builder with the markdown grammar loaded.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("failed to load markdown grammar: {e}")))?;
        Ok(Self { parser })
    }

    /// Build an index from every `*.md` file under `root`.
    ///
    /// Pages are visited in sorted relative-path order so regeneration is
    /// deterministic. Hidden directories are skipped.
    pub fn build_from_dir(&mut self, root: &Path) -> Result<BuildResult> {
        if !root.is_dir() {
            return Err(Error::NotFound(format!(
                "documentation directory '{}' does not exist",
                root.display()
            )));
        }

        let mut pages = Vec::new();
        collect_markdown_files(root, root, &mut pages)?;
        pages.sort();

        let mut index = SearchIndexFile::default();
        let mut diagnostics = Vec::new();
        let page_count = pages.len();

        for rel_path in &pages {
            let content = fs::read_to_string(root.join(rel_path))?;
            let location = location_for_page(rel_path);
            let mut page = self.build_page(&location, &content)?;
            debug!(
                "built {} records from {}",
                page.records.len(),
                rel_path.display()
            );
            index.docs.append(&mut page.records);
            diagnostics.append(&mut page.diagnostics);
        }

        Ok(BuildResult {
            index,
            diagnostics,
            page_count,
        })
    }

    /// Build the records for a single page.
    ///
    /// `location` is the page's relative URL fragment ending in `/`.
    pub fn build_page(&mut self, location: &str, text: &str) -> Result<PageBuild> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| Error::Parse("markdown parser returned no tree".to_string()))?;

        let root = tree.root_node();
        let mut diagnostics = Vec::new();
        if root.has_error() {
            diagnostics.push(Diagnostic {
                severity: DiagnosticSeverity::Warn,
                message: format!("parse tree for '{location}' contains errors"),
                record: None,
            });
        }

        let mut events = Vec::new();
        collect_events(root, text, &mut events);

        let page_title = events
            .iter()
            .find_map(|event| match event {
                PageEvent::Heading { level: 1, text } => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| title_from_location(location));

        let mut records = Vec::new();
        let mut anchors = AnchorSlugs::default();
        let mut saw_heading = false;

        for event in events {
            match event {
                PageEvent::Heading { text, .. } => {
                    saw_heading = true;
                    let anchor = anchors.slug(&text);
                    records.push(DocRecord {
                        location: format!("{location}#{anchor}"),
                        page: page_title.clone(),
                        title: text,
                        text: String::new(),
                        category: Category::Section,
                    });
                },
                PageEvent::Block(block) => {
                    records.push(DocRecord {
                        location: location.to_string(),
                        page: page_title.clone(),
                        title: page_title.clone(),
                        text: block,
                        category: Category::Page,
                    });
                },
            }
        }

        if !saw_heading && !records.is_empty() {
            diagnostics.push(Diagnostic {
                severity: DiagnosticSeverity::Warn,
                message: format!("page '{location}' has no headings"),
                record: None,
            });
        }

        Ok(PageBuild {
            records,
            diagnostics,
        })
    }
}

/// Records and findings for one page.
#[derive(Debug)]
pub struct PageBuild {
    /// Records in source order: headings and prose blocks interleaved.
    pub records: Vec<DocRecord>,
    /// Findings for this page.
    pub diagnostics: Vec<Diagnostic>,
}

enum PageEvent {
    Heading { level: usize, text: String },
    Block(String),
}

/// Block-level node kinds that become `page` records.
const BLOCK_KINDS: [&str; 7] = [
    "paragraph",
    "fenced_code_block",
    "indented_code_block",
    "list",
    "block_quote",
    "pipe_table",
    "html_block",
];

fn collect_events(node: Node, text: &str, events: &mut Vec<PageEvent>) {
    let kind = node.kind();

    if kind == "atx_heading" || kind == "setext_heading" {
        events.push(PageEvent::Heading {
            level: heading_level(node),
            text: heading_text(node, text),
        });
        return;
    }

    if BLOCK_KINDS.contains(&kind) {
        let block = text[node.byte_range()].trim();
        if !block.is_empty() {
            events.push(PageEvent::Block(block.to_string()));
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_events(child, text, events);
    }
}

fn heading_level(node: Node) -> usize {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "atx_h1_marker" => return 1,
            "atx_h2_marker" => return 2,
            "atx_h3_marker" => return 3,
            "atx_h4_marker" => return 4,
            "atx_h5_marker" => return 5,
            "atx_h6_marker" => return 6,
            "setext_h1_underline" => return 1,
            "setext_h2_underline" => return 2,
            _ => {},
        }
    }
    1
}

fn heading_text(node: Node, text: &str) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "inline" {
            return text[child.byte_range()].trim().to_string();
        }
    }
    text[node.byte_range()]
        .trim_start_matches('#')
        .trim()
        .to_string()
}

/// Allocates anchor slugs, deduplicating repeats with numeric suffixes.
#[derive(Default)]
struct AnchorSlugs {
    seen: HashMap<String, usize>,
}

impl AnchorSlugs {
    fn slug(&mut self, heading: &str) -> String {
        let mut base = String::with_capacity(heading.len());
        let mut last_dash = true;
        for c in heading.chars() {
            if c.is_alphanumeric() || matches!(c, '_' | '.' | ':') {
                base.push(c);
                last_dash = false;
            } else if !last_dash {
                base.push('-');
                last_dash = true;
            }
        }
        let base = base.trim_end_matches('-').to_string();
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };

        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}

/// Map a page's relative path to its location fragment.
///
/// `guide/intro.md` becomes `guide/intro/`; `index.md` files map to their
/// directory, so `guide/index.md` becomes `guide/` and a top-level
/// `index.md` becomes the empty root location.
fn location_for_page(rel_path: &Path) -> String {
    let mut parts: Vec<String> = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = parts.last_mut() {
        if let Some(stem) = last.strip_suffix(".md") {
            *last = stem.to_string();
        }
        if last == "index" {
            parts.pop();
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}/", parts.join("/"))
    }
}

fn title_from_location(location: &str) -> String {
    let stem = location.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    if stem.is_empty() {
        "Home".to_string()
    } else {
        stem.replace(['-', '_'], " ")
    }
}

fn collect_markdown_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        // Symlinks are skipped entirely; following them could cycle.
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            if !name.starts_with('.') {
                collect_markdown_files(root, &path, out)?;
            }
        } else if file_type.is_file() && name.ends_with(".md") {
            let rel = path
                .strip_prefix(root)
                .map_err(|e| Error::Other(format!("path outside build root: {e}")))?;
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}

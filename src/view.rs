//! In-memory page model the renderer writes into.
//!
//! A `PageView` has three regions: the entity metadata panel, the pager
//! bar and the content area. The content area holds one `RowSlot` per
//! listing row, addressed by row index. Row writers receive a `RowHandle`
//! stamped with the page generation current at the time it was issued.
//! Starting a new page bumps the generation, so a late response from an
//! older page finds its handle stale and the write is dropped.

use crate::models::EntityKind;
use crate::templates::{
    collapsed_mentions_html, fetching_html, placeholder_panel_html, row_panel_html,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Number of mentions shown inline per document before collapsing.
pub const INLINE_MENTIONS: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct RowSlot {
    /// Document line (software listings) or software summary (person listings).
    pub header: Option<String>,
    /// Rendered mentions keyed by their position in the row's mention list.
    pub mentions: BTreeMap<usize, String>,
    pub mention_count: usize,
    pub errors: Vec<String>,
}

impl RowSlot {
    pub fn inline_mentions(&self) -> impl Iterator<Item = &String> {
        self.mentions.range(..INLINE_MENTIONS).map(|(_, html)| html)
    }

    pub fn collapsed_mentions(&self) -> impl Iterator<Item = &String> {
        self.mentions.range(INLINE_MENTIONS..).map(|(_, html)| html)
    }

    fn render(&self, index: usize) -> String {
        let mut html = String::new();
        if let Some(header) = &self.header {
            html.push_str(&format!(r#"<div class="row" id="document-{}">{}</div>"#, index, header));
        }

        html.push_str(&format!(r#"<div id="best-two-{}">"#, index));
        for mention in self.inline_mentions() {
            html.push_str(mention);
        }
        html.push_str("</div>");

        if self.mention_count > INLINE_MENTIONS {
            let inner: String = self.collapsed_mentions().map(String::as_str).collect();
            html.push_str(&collapsed_mentions_html(
                index,
                self.mention_count - INLINE_MENTIONS,
                &inner,
            ));
        }

        for error in &self.errors {
            html.push_str(error);
        }
        html
    }
}

#[derive(Debug, Clone)]
enum Content {
    Fetching,
    Placeholder(String),
    Error(String),
    Rows { kind: EntityKind, rows: Vec<RowSlot> },
}

#[derive(Debug, Clone)]
pub struct PageView {
    pub entity_info: String,
    pub pager: String,
    generation: u64,
    content: Content,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            entity_info: String::new(),
            pager: String::new(),
            generation: 0,
            content: Content::Fetching,
        }
    }
}

impl PageView {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate every outstanding row handle and show the fetching notice.
    pub fn begin_page(&mut self) -> u64 {
        self.generation += 1;
        self.content = Content::Fetching;
        self.pager.clear();
        self.generation
    }

    /// Lay out `count` empty row containers for the current generation.
    pub fn set_rows(&mut self, kind: EntityKind, count: usize) {
        self.content = Content::Rows {
            kind,
            rows: vec![RowSlot::default(); count],
        };
    }

    pub fn set_placeholder(&mut self, text: &str) {
        self.content = Content::Placeholder(text.to_string());
    }

    pub fn set_error(&mut self, html: String) {
        self.content = Content::Error(html);
    }

    pub fn row(&self, index: usize) -> Option<&RowSlot> {
        match &self.content {
            Content::Rows { rows, .. } => rows.get(index),
            _ => None,
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.content {
            Content::Rows { rows, .. } => rows.len(),
            _ => 0,
        }
    }

    fn row_mut(&mut self, index: usize) -> Option<&mut RowSlot> {
        match &mut self.content {
            Content::Rows { rows, .. } => rows.get_mut(index),
            _ => None,
        }
    }

    pub fn content_html(&self) -> String {
        match &self.content {
            Content::Fetching => fetching_html().to_string(),
            Content::Placeholder(text) => placeholder_panel_html(text),
            Content::Error(html) => html.clone(),
            Content::Rows { kind, rows } => {
                let prefix = match kind {
                    EntityKind::Software => "mention",
                    EntityKind::Persons => "software",
                };
                rows.iter()
                    .enumerate()
                    .map(|(i, row)| row_panel_html(&format!("{}-{}", prefix, i), &row.render(i)))
                    .collect()
            }
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div id="software-info">{}</div><div id="facetview_metadata">{}</div><div id="mentions-content">{}</div>"#,
            self.entity_info,
            self.pager,
            self.content_html()
        )
    }
}

// ============================================================================
// Shared View
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<Mutex<PageView>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, PageView> {
        // A panicked writer leaves at most a half-filled row behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn row_handle(&self, generation: u64, index: usize) -> RowHandle {
        RowHandle {
            view: self.clone(),
            generation,
            index,
        }
    }

    pub fn snapshot(&self) -> PageView {
        self.lock().clone()
    }
}

/// Write access to one row container for one page generation.
#[derive(Debug, Clone)]
pub struct RowHandle {
    view: SharedView,
    generation: u64,
    index: usize,
}

impl RowHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Apply `f` to the row if this handle's page is still current.
    /// Returns `false` when the write was dropped as stale.
    pub fn write(&self, f: impl FnOnce(&mut RowSlot)) -> bool {
        let mut view = self.view.lock();
        if view.generation != self.generation {
            debug!(
                row = self.index,
                stale = self.generation,
                current = view.generation,
                "dropping stale row write"
            );
            return false;
        }
        match view.row_mut(self.index) {
            Some(row) => {
                f(row);
                true
            }
            None => false,
        }
    }
}

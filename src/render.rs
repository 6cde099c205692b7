//! Result renderer for one page of a mentions or software listing.
//!
//! A page load moves through `Idle → Listing → PerRowDetail → Settled`.
//! The listing request lays out one container per row; every row then
//! fans out its detail fetches as independent tasks that fill the row as
//! their responses arrive, in whatever order that happens. The renderer
//! waits for all of them before reporting `Settled`, and each task writes
//! through a generation-stamped `RowHandle` so output from a page that has
//! since been replaced is discarded.

use crate::client::{ClientError, KnowledgeBase};
use crate::highlight::highlight;
use crate::metadata::publication_html;
use crate::models::{
    ClaimKey, DocumentMentions, EntityKind, EntityTarget, MentionRecord, SoftwareFields,
    SoftwareRow,
};
use crate::paging::{PageRange, Paging};
use crate::templates::{html_escape, mentions_link, pager_html, row_error_html};
use crate::view::{RowHandle, SharedView};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Listing,
    PerRowDetail,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub generation: u64,
    pub range: PageRange,
    pub rows: usize,
    /// Detail fetches that failed; their rows carry an inline error.
    pub row_failures: usize,
    /// Set when a newer page took over the view before this one finished.
    pub superseded: bool,
}

pub struct ResultRenderer<K: KnowledgeBase> {
    kb: Arc<K>,
    view: SharedView,
    state: RenderState,
}

impl<K: KnowledgeBase> ResultRenderer<K> {
    pub fn new(kb: Arc<K>, view: SharedView) -> Self {
        Self {
            kb,
            view,
            state: RenderState::Idle,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Render the page of `target` selected by `paging` into the view.
    ///
    /// A failed listing request is returned to the caller and leaves the
    /// renderer `Idle`; failed row fetches only mark their own rows.
    pub async fn render_page(
        &mut self,
        target: &EntityTarget,
        paging: &Paging,
    ) -> Result<RenderOutcome, ClientError> {
        let generation = self.view.lock().begin_page();
        info!(kind = %target.kind, id = %target.id, rank = paging.rank, generation, "rendering page");

        self.state = RenderState::Listing;
        let result = match target.kind {
            EntityKind::Software => self.render_mentions(target, paging, generation).await,
            EntityKind::Persons => self.render_software(target, paging, generation).await,
        };
        self.state = match result {
            Ok(_) => RenderState::Settled,
            Err(_) => RenderState::Idle,
        };
        result
    }

    /// Write the pager and row containers for a fresh listing. Returns
    /// `false` if another page has already claimed the view.
    fn lay_out(
        &self,
        target: &EntityTarget,
        paging: &Paging,
        range: &PageRange,
        rows: usize,
        generation: u64,
    ) -> bool {
        let mut view = self.view.lock();
        if view.generation() != generation {
            return false;
        }
        view.pager = pager_html(target, paging, range);
        if rows == 0 {
            view.set_placeholder(target.kind.empty_placeholder());
        } else {
            view.set_rows(target.kind, rows);
        }
        true
    }

    async fn render_mentions(
        &mut self,
        target: &EntityTarget,
        paging: &Paging,
        generation: u64,
    ) -> Result<RenderOutcome, ClientError> {
        let page = self.kb.entity_mentions(target, paging).await?;
        let range = paging.range(page.full_count);
        let rows = page.records.len();

        if !self.lay_out(target, paging, &range, rows, generation) {
            return Ok(superseded(generation, range));
        }

        self.state = RenderState::PerRowDetail;
        let retry = mentions_link(target, paging.rank);
        let mut tasks = JoinSet::new();
        for (index, record) in page.records.into_iter().enumerate() {
            let handle = self.view.row_handle(generation, index);
            spawn_document_row(&mut tasks, &self.kb, handle, record, &retry);
        }
        debug!(rows, tasks = tasks.len(), "fanned out mention rows");

        let row_failures = settle(tasks).await;
        Ok(RenderOutcome {
            generation,
            range,
            rows,
            row_failures,
            superseded: self.view.lock().generation() != generation,
        })
    }

    async fn render_software(
        &mut self,
        target: &EntityTarget,
        paging: &Paging,
        generation: u64,
    ) -> Result<RenderOutcome, ClientError> {
        let page = self.kb.person_software(target, paging).await?;
        let range = paging.range(page.full_count);
        let rows = page.records.len();

        if !self.lay_out(target, paging, &range, rows, generation) {
            return Ok(superseded(generation, range));
        }

        self.state = RenderState::PerRowDetail;
        let retry = mentions_link(target, paging.rank);
        let mut tasks = JoinSet::new();
        for (index, record) in page.records.into_iter().enumerate() {
            let handle = self.view.row_handle(generation, index);
            tasks.spawn(display_software(self.kb.clone(), handle, record, retry.clone()));
        }
        debug!(rows, "fanned out software rows");

        let row_failures = settle(tasks).await;
        Ok(RenderOutcome {
            generation,
            range,
            rows,
            row_failures,
            superseded: self.view.lock().generation() != generation,
        })
    }
}

fn superseded(generation: u64, range: PageRange) -> RenderOutcome {
    RenderOutcome {
        generation,
        range,
        rows: 0,
        row_failures: 0,
        superseded: true,
    }
}

/// Wait for every row task and count the ones that failed.
async fn settle(mut tasks: JoinSet<bool>) -> usize {
    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => {}
            Ok(false) => failures += 1,
            Err(e) => {
                warn!(error = %e, "row task aborted");
                failures += 1;
            }
        }
    }
    failures
}

// ============================================================================
// Document Rows
// ============================================================================

fn spawn_document_row<K: KnowledgeBase>(
    tasks: &mut JoinSet<bool>,
    kb: &Arc<K>,
    handle: RowHandle,
    record: DocumentMentions,
    retry: &str,
) {
    handle.write(|row| row.mention_count = record.mentions.len());

    for (position, mention_id) in record.mentions.into_iter().enumerate() {
        tasks.spawn(display_mention(
            kb.clone(),
            handle.clone(),
            position,
            mention_id,
            retry.to_string(),
        ));
    }
    tasks.spawn(display_document(
        kb.clone(),
        handle,
        record.document_id,
        retry.to_string(),
    ));
}

async fn display_document<K: KnowledgeBase>(
    kb: Arc<K>,
    handle: RowHandle,
    document_id: String,
    retry: String,
) -> bool {
    match kb.document(&document_id).await {
        Ok(publication) => {
            let html = publication_html(kb.host(), &document_id, &publication);
            handle.write(|row| row.header = Some(html));
            true
        }
        Err(e) => {
            warn!(row = handle.index(), %document_id, error = %e, "document fetch failed");
            handle.write(|row| row.errors.push(row_error_html("could not load document", &retry)));
            false
        }
    }
}

async fn display_mention<K: KnowledgeBase>(
    kb: Arc<K>,
    handle: RowHandle,
    position: usize,
    mention_id: String,
    retry: String,
) -> bool {
    match kb.relation(&mention_id).await {
        Ok(mention) => {
            let html = mention_html(kb.host(), &mention_id, &mention);
            handle.write(|row| {
                row.mentions.insert(position, html);
            });
            true
        }
        Err(e) => {
            warn!(row = handle.index(), %mention_id, error = %e, "mention fetch failed");
            handle.write(|row| row.errors.push(row_error_html("could not load mention", &retry)));
            false
        }
    }
}

/// Snippet row for one mention, with its annotations highlighted.
pub fn mention_html(host: &str, mention_id: &str, mention: &MentionRecord) -> String {
    let mut html = String::from(r#"<div class="row mention-row">"#);
    if let Some(snippet) = mention.claim_value(ClaimKey::Snippet) {
        html.push_str(&format!(
            r#"<p>{} <a target="_blank" class="raw-link" href="{}"><i class="fa fa-file"></i></a></p>"#,
            highlight(&snippet, mention),
            html_escape(&format!("{}/relations/{}", host, mention_id))
        ));
    }
    html.push_str(r#"</div><div class="row mention-gap"></div>"#);
    html
}

// ============================================================================
// Software Rows
// ============================================================================

async fn display_software<K: KnowledgeBase>(
    kb: Arc<K>,
    handle: RowHandle,
    record: SoftwareRow,
    retry: String,
) -> bool {
    match kb.software_fields(record.bare_id()).await {
        Ok(Some(fields)) => {
            let html = software_html(kb.host(), &record, &fields);
            handle.write(|row| row.header = Some(html));
            true
        }
        Ok(None) => {
            debug!(row = handle.index(), id = %record.id, "no unique search hit, leaving row empty");
            true
        }
        Err(e) => {
            warn!(row = handle.index(), id = %record.id, error = %e, "software lookup failed");
            handle.write(|row| row.errors.push(row_error_html("could not load software", &retry)));
            false
        }
    }
}

/// Summary row for one software entity of a person listing.
pub fn software_html(host: &str, record: &SoftwareRow, fields: &SoftwareFields) -> String {
    let bare_id = record.bare_id();
    let entity_page = format!(
        "{}/frontend/entity.html?type=software&id={}",
        host,
        urlencoding::encode(bare_id)
    );
    let software_target = EntityTarget::new(EntityKind::Software, bare_id);

    format!(
        r#"<div class="software-summary"><table width="100%"><tr><td width="60%"><p><strong><a target="_blank" href="{page}">{labels}</a></strong> - {descriptions}</p><p><b>roles:</b> {roles}</p></td><td>&nbsp;&nbsp;</td><td><a href="{mentions}">{mention_count} mentions in {document_count} documents</a> <span class="raw-link">(click to view mentions)</span></td></tr></table></div>"#,
        page = html_escape(&entity_page),
        labels = html_escape(&fields.labels),
        descriptions = html_escape(&fields.descriptions),
        roles = html_escape(&record.role_names()),
        mentions = html_escape(&mentions_link(&software_target, 0)),
        mention_count = html_escape(&fields.number_mentions),
        document_count = html_escape(&fields.number_documents),
    )
}

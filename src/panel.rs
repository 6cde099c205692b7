//! The mentions panel: entity metadata, pager and result listing for one
//! `(type, id)` target.
//!
//! `load` fetches the metadata panel and the first page together. `next`
//! and `previous` are the pager handlers: they move the explicit paging
//! context and reload, ignoring clicks on a disabled control.

use crate::client::{ClientError, KnowledgeBase};
use crate::metadata::{show_entity_metadata, MarkdownSummary, SummaryRenderer};
use crate::models::EntityTarget;
use crate::paging::{PageRange, Paging};
use crate::render::{RenderOutcome, RenderState, ResultRenderer};
use crate::templates::{error_panel_html, mentions_link, row_error_html};
use crate::view::SharedView;
use std::sync::Arc;
use tracing::warn;

pub struct MentionsPanel<K: KnowledgeBase> {
    kb: Arc<K>,
    target: EntityTarget,
    paging: Paging,
    view: SharedView,
    renderer: ResultRenderer<K>,
    summary_renderer: Box<dyn SummaryRenderer>,
    last_range: Option<PageRange>,
}

impl<K: KnowledgeBase> MentionsPanel<K> {
    pub fn new(kb: Arc<K>, target: EntityTarget, paging: Paging) -> Self {
        let view = SharedView::new();
        Self {
            renderer: ResultRenderer::new(kb.clone(), view.clone()),
            kb,
            target,
            paging,
            view,
            summary_renderer: Box::new(MarkdownSummary),
            last_range: None,
        }
    }

    pub fn with_summary_renderer(mut self, renderer: impl SummaryRenderer + 'static) -> Self {
        self.summary_renderer = Box::new(renderer);
        self
    }

    pub fn target(&self) -> &EntityTarget {
        &self.target
    }

    pub fn paging(&self) -> Paging {
        self.paging
    }

    pub fn state(&self) -> RenderState {
        self.renderer.state()
    }

    pub fn view(&self) -> &SharedView {
        &self.view
    }

    fn retry_link(&self) -> String {
        mentions_link(&self.target, self.paging.rank)
    }

    /// Initial load: metadata panel and current page, fetched concurrently.
    pub async fn load(&mut self) -> Result<RenderOutcome, ClientError> {
        let (metadata, listing) = tokio::join!(
            show_entity_metadata(self.kb.as_ref(), &self.target, self.summary_renderer.as_ref()),
            self.renderer.render_page(&self.target, &self.paging),
        );

        let entity_info = match metadata {
            Ok(html) => html,
            Err(e) => {
                warn!(id = %self.target.id, error = %e, "entity metadata fetch failed");
                row_error_html("could not load entity", &self.retry_link())
            }
        };
        self.view.lock().entity_info = entity_info;

        self.finish(listing)
    }

    /// Re-render the current page, keeping the metadata panel.
    pub async fn reload(&mut self) -> Result<RenderOutcome, ClientError> {
        let listing = self.renderer.render_page(&self.target, &self.paging).await;
        self.finish(listing)
    }

    fn finish(
        &mut self,
        listing: Result<RenderOutcome, ClientError>,
    ) -> Result<RenderOutcome, ClientError> {
        match listing {
            Ok(outcome) => {
                self.last_range = Some(outcome.range);
                Ok(outcome)
            }
            Err(e) => {
                warn!(id = %self.target.id, rank = self.paging.rank, error = %e, "listing fetch failed");
                let html = error_panel_html(&e.to_string(), &self.retry_link());
                self.view.lock().set_error(html);
                Err(e)
            }
        }
    }

    /// Pager "next": returns `None` when the control is disabled.
    pub async fn next(&mut self) -> Result<Option<RenderOutcome>, ClientError> {
        let Some(range) = self.last_range else {
            return Ok(None);
        };
        if !self.paging.increment(&range) {
            return Ok(None);
        }
        self.reload().await.map(Some)
    }

    /// Pager "previous": returns `None` when the control is disabled.
    pub async fn previous(&mut self) -> Result<Option<RenderOutcome>, ClientError> {
        let Some(range) = self.last_range else {
            return Ok(None);
        };
        if !self.paging.decrement(&range) {
            return Ok(None);
        }
        self.reload().await.map(Some)
    }

    pub fn html(&self) -> String {
        self.view.snapshot().to_html()
    }
}

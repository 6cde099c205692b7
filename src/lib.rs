//! Software mentions viewer - re-exports for testing and external use.
//!
//! Renders paginated software mentions (and a person's software) fetched
//! from a software knowledge-base service into HTML panels, with the
//! annotated parts of each mention snippet highlighted.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod client;
pub mod config;
pub mod handlers;
pub mod highlight;
pub mod metadata;
pub mod models;
pub mod paging;
pub mod panel;
pub mod render;
pub mod templates;
pub mod view;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub kb: Arc<KbClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let kb = KbClient::new(config.kb_service_host.clone(), config.timeout)?;
        Ok(Self {
            config,
            kb: Arc::new(kb),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/mentions", get(handlers::mentions_page))
        .route("/alive", get(handlers::alive))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use client::{ClientError, KbClient, KnowledgeBase};
pub use config::{Config, ConfigError};
pub use highlight::{annotation_spans, highlight, LabelCategory, Span};
pub use metadata::{MarkdownSummary, SummaryRenderer};
pub use models::{EntityKind, EntityTarget, MentionRecord};
pub use paging::{PageRange, Paging};
pub use panel::MentionsPanel;
pub use render::{RenderOutcome, RenderState, ResultRenderer};
pub use view::{PageView, SharedView};

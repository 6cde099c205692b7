//! HTTP route handlers for the mentions viewer.

use crate::models::{EntityKind, EntityTarget};
use crate::panel::MentionsPanel;
use crate::paging::Paging;
use crate::templates::{base_html, html_escape};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Index Handler
// ============================================================================

pub async fn index() -> Html<String> {
    let form = r#"<h1>Software mentions</h1>
        <form action="/mentions" method="get">
            <input type="text" name="id" placeholder="entity id">
            <select name="type">
                <option value="software">software</option>
                <option value="persons">persons</option>
            </select>
            <button type="submit">Show</button>
        </form>"#;
    Html(base_html("Software mentions", form))
}

// ============================================================================
// Mentions Page Handler
// ============================================================================

#[derive(Deserialize)]
pub struct MentionsQuery {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rank: Option<u64>,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(base_html(
            "Bad request",
            &format!("<p>{}</p>", html_escape(message)),
        )),
    )
        .into_response()
}

pub async fn mentions_page(
    Query(query): Query<MentionsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let id = match query.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return bad_request("Missing entity id"),
    };
    let kind = match query.kind.as_deref() {
        None | Some("") => EntityKind::default(),
        Some(other) => match EntityKind::parse(other) {
            Some(kind) => kind,
            None => return bad_request(&format!("Unsupported entity type: {}", other)),
        },
    };

    let target = EntityTarget::new(kind, id);
    let paging = Paging::new(state.config.page_size).at_rank(query.rank.unwrap_or(0));
    let mut panel = MentionsPanel::new(state.kb.clone(), target.clone(), paging);

    // Failures are already rendered into the panel with a retry link.
    if let Ok(outcome) = panel.load().await {
        info!(
            id = %target.id,
            kind = %target.kind,
            rows = outcome.rows,
            row_failures = outcome.row_failures,
            "page settled"
        );
    }

    let title = html_escape(&format!("{} {} mentions", target.kind, target.id));
    Html(base_html(&title, &panel.html())).into_response()
}

// ============================================================================
// Liveness
// ============================================================================

pub async fn alive() -> &'static str {
    "true"
}

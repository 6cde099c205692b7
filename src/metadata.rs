//! Entity metadata panel and publication lines.
//!
//! The metadata panel is fetched once per page load and shows the target
//! entity's label (linked to its detail page), description and rendered
//! summary. Publication lines head each document row of a mentions listing.

use crate::client::{entity_path, ClientError, KnowledgeBase};
use crate::models::{display_value, EntityRecord, EntityTarget, Publication};
use crate::templates::html_escape;
use pulldown_cmark::{html, Parser};

/// Turns an entity summary into HTML. The knowledge base stores summaries
/// as rich text; implementations must return sanitized markup.
pub trait SummaryRenderer: Send + Sync {
    fn render(&self, summary: &str) -> String;
}

/// Renders summaries as Markdown and sanitizes the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSummary;

impl SummaryRenderer for MarkdownSummary {
    fn render(&self, summary: &str) -> String {
        let parser = Parser::new(summary);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        ammonia::clean(&html_output)
    }
}

fn raw_record_link(href: &str) -> String {
    format!(
        r#" <a target="_blank" class="raw-link" href="{}"><i class="fa fa-file"></i></a>"#,
        html_escape(href)
    )
}

// ============================================================================
// Entity Panel
// ============================================================================

pub fn entity_panel_html(
    host: &str,
    target: &EntityTarget,
    record: &EntityRecord,
    summary_renderer: &dyn SummaryRenderer,
) -> String {
    let labels = record.labels.as_ref().map(display_value).unwrap_or_default();
    let entity_page = format!(
        "{}/frontend/entity.html?id={}&type={}",
        host,
        urlencoding::encode(&target.id),
        target.kind
    );

    let mut html = String::from(r#"<div class="panel"><div class="panel-body">"#);
    html.push_str(&format!(
        r#"<p><strong><a target="_blank" href="{}">{}</a></strong>"#,
        html_escape(&entity_page),
        html_escape(&labels)
    ));

    let description = record.descriptions.as_ref().map(display_value).unwrap_or_default();
    if !description.is_empty() {
        html.push_str(" - ");
        html.push_str(&html_escape(&description));
    }

    html.push_str(&raw_record_link(&format!("{}{}", host, entity_path(target))));
    html.push_str("</p>");

    let summary = record.summary.as_ref().map(display_value).unwrap_or_default();
    if !summary.is_empty() {
        html.push_str(&summary_renderer.render(&summary));
    }

    html.push_str("</div></div>");
    html
}

/// Fetch the target entity and render its metadata panel.
pub async fn show_entity_metadata<K: KnowledgeBase>(
    kb: &K,
    target: &EntityTarget,
    summary_renderer: &dyn SummaryRenderer,
) -> Result<String, ClientError> {
    let record = kb.entity(target).await?;
    Ok(entity_panel_html(kb.host(), target, &record, summary_renderer))
}

// ============================================================================
// Publication Line
// ============================================================================

/// One-line citation for a document plus links to its raw record and to
/// the PDF mention viewer.
pub fn publication_html(host: &str, document_id: &str, publication: &Publication) -> String {
    let meta = &publication.metadata;
    let mut line = String::new();

    if let Some(title) = meta.title.first() {
        line.push_str(&format!("<i>{}</i>", html_escape(title)));
    }
    if let Some(family) = meta.author.first().and_then(|a| a.family.as_deref()) {
        line.push_str(&format!(", {} et al.", html_escape(family)));
    }
    if let Some(container) = meta.container_title.first() {
        line.push_str(&format!(", {}", html_escape(container)));
    }

    let identifier = |value: &Option<serde_json::Value>| {
        value
            .as_ref()
            .map(display_value)
            .filter(|v| !v.is_empty())
    };
    if let Some(doi) = identifier(&meta.doi) {
        line.push_str(&format!(
            r#", DOI: <a target="_blank" href="https://doi.org/{}">{}</a>"#,
            html_escape(&doi),
            html_escape(&doi)
        ));
    }
    if let Some(pmid) = identifier(&meta.pmid) {
        line.push_str(&format!(
            r#", PMID: <a target="_blank" href="https://pubmed.ncbi.nlm.nih.gov/{}/">{}</a>"#,
            html_escape(&pmid),
            html_escape(&pmid)
        ));
    }
    if let Some(pmcid) = identifier(&meta.pmcid) {
        line.push_str(&format!(
            r#", PMC ID: <a target="_blank" href="https://www.ncbi.nlm.nih.gov/pmc/articles/{}">{}</a>"#,
            html_escape(&pmcid),
            html_escape(&pmcid)
        ));
    }

    line.push_str(&raw_record_link(&format!("{}/entities/{}", host, document_id)));

    let viewer = format!(
        "{}/frontend/document.html?id={}",
        host,
        document_id.trim_start_matches("documents/")
    );

    format!(
        r#"<div class="row document-row"><table><tr><td>{line}</td><td>&nbsp;&nbsp;</td><td class="pdf-link"><a target="_blank" href="{viewer}">View mentions<br>in PDF</a></td></tr></table></div>"#,
        line = line,
        viewer = html_escape(&viewer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;
    use serde_json::json;

    #[test]
    fn test_entity_panel_with_description_and_summary() {
        let record: EntityRecord = serde_json::from_value(json!({
            "labels": "GROBID",
            "descriptions": "machine learning library for PDF",
            "summary": "A **tool** for <script>x</script> parsing."
        }))
        .unwrap();
        let target = EntityTarget::new(EntityKind::Software, "123");

        let html = entity_panel_html("http://kb", &target, &record, &MarkdownSummary);
        assert!(html.contains(r#"href="http://kb/frontend/entity.html?id=123&amp;type=software">GROBID</a>"#));
        assert!(html.contains(" - machine learning library for PDF"));
        assert!(html.contains(r#"href="http://kb/entities/software/123""#));
        assert!(html.contains("<strong>tool</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_entity_panel_omits_missing_fields() {
        let record = EntityRecord {
            labels: Some(json!("jdoe")),
            ..EntityRecord::default()
        };
        let target = EntityTarget::new(EntityKind::Persons, "p1");

        let html = entity_panel_html("http://kb", &target, &record, &MarkdownSummary);
        assert!(!html.contains(" - "));
        assert!(html.ends_with("</p></div></div>"));
    }

    #[test]
    fn test_publication_line() {
        let publication: Publication = serde_json::from_value(json!({
            "metadata": {
                "title": ["Deep learning for citations"],
                "author": [{"family": "Lopez"}, {"family": "Romary"}],
                "container-title": ["JCDL"],
                "DOI": "10.1000/xyz",
                "pmid": 12345,
                "pmcid": "PMC999"
            }
        }))
        .unwrap();

        let html = publication_html("http://kb", "documents/abc", &publication);
        assert!(html.contains("<i>Deep learning for citations</i>, Lopez et al., JCDL"));
        assert!(html.contains(r#"href="https://doi.org/10.1000/xyz""#));
        assert!(html.contains(r#"href="https://pubmed.ncbi.nlm.nih.gov/12345/""#));
        assert!(html.contains("PMC ID:"));
        assert!(html.contains(r#"href="http://kb/entities/documents/abc""#));
        assert!(html.contains(r#"href="http://kb/frontend/document.html?id=abc""#));
    }

    #[test]
    fn test_publication_line_minimal() {
        let html = publication_html("http://kb", "documents/x", &Publication::default());
        assert!(!html.contains("DOI"));
        assert!(!html.contains("et al."));
    }
}

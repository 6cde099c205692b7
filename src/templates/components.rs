//! Shared HTML components for the mentions viewer.
//!
//! Contains the base page, the pager, panel wrappers and the placeholder and
//! error fragments the renderer drops into row containers.

use crate::models::EntityTarget;
use crate::paging::{add_commas, PageRange, Paging};

use super::styles::STYLE;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Local link to the mentions page of `target` at `rank`.
pub fn mentions_link(target: &EntityTarget, rank: u64) -> String {
    format!(
        "/mentions?id={}&type={}&rank={}",
        urlencoding::encode(&target.id),
        target.kind,
        rank
    )
}

// ============================================================================
// Pager
// ============================================================================

/// Prev/next controls around the `from – to of total` display. A disabled
/// control shows `..` and carries no link.
pub fn pager_html(target: &EntityTarget, paging: &Paging, range: &PageRange) -> String {
    let previous = if paging.previous_disabled(range) {
        r#"<a id="facetview_decrement" class="disabled">..</a>"#.to_string()
    } else {
        format!(
            r#"<a id="facetview_decrement" href="{}">&laquo; back</a>"#,
            html_escape(&mentions_link(target, paging.rank.saturating_sub(1)))
        )
    };
    let next = if paging.next_disabled(range) {
        r#"<a id="facetview_increment" class="disabled">..</a>"#.to_string()
    } else {
        format!(
            r#"<a id="facetview_increment" href="{}">next &raquo;</a>"#,
            html_escape(&mentions_link(target, paging.rank + 1))
        )
    };

    format!(
        r#"<nav>
            <ul class="pager">
                <li class="previous">{previous}</li>
                <li class="active"><a>{from} &ndash; {to} of {total}</a></li>
                <li class="next">{next}</li>
            </ul>
        </nav>"#,
        previous = previous,
        from = range.from,
        to = range.to,
        total = add_commas(range.total),
        next = next,
    )
}

// ============================================================================
// Panels and Placeholders
// ============================================================================

pub fn fetching_html() -> &'static str {
    r#"<div class="row fetching"><p>fetching mentions...</p></div>"#
}

pub fn placeholder_panel_html(text: &str) -> String {
    format!(
        r#"<div class="panel"><div class="panel-body"><div class="row centered">{}</div></div></div>"#,
        html_escape(text)
    )
}

/// Outer panel for one listing row; `container_id` is the row's stable id.
pub fn row_panel_html(container_id: &str, inner: &str) -> String {
    format!(
        r#"<div class="panel"><div class="panel-body" id="{}">{}</div></div>"#,
        html_escape(container_id),
        inner
    )
}

/// Collapsed section holding the mentions past the first two.
pub fn collapsed_mentions_html(rank: usize, hidden: usize, inner: &str) -> String {
    format!(
        r#"<div class="panel-group" id="accordionParentStatements{rank}">
            <details class="panel panel-default" id="collapseElementMentions{rank}">
                <summary class="panel-heading"><h5 class="panel-title">show other {hidden} mentions</h5></summary>
                {inner}
            </details>
        </div>"#,
        rank = rank,
        hidden = hidden,
        inner = inner,
    )
}

pub fn error_panel_html(message: &str, retry_href: &str) -> String {
    format!(
        r#"<div class="panel"><div class="panel-body"><div class="row centered row-error">{} <a href="{}">retry</a></div></div></div>"#,
        html_escape(message),
        html_escape(retry_href)
    )
}

pub fn row_error_html(message: &str, retry_href: &str) -> String {
    format!(
        r#"<div class="row row-error">{} <a href="{}">retry</a></div>"#,
        html_escape(message),
        html_escape(retry_href)
    )
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;

    fn target() -> EntityTarget {
        EntityTarget::new(EntityKind::Software, "abc 1")
    }

    #[test]
    fn test_pager_first_page() {
        let paging = Paging::new(10);
        let html = pager_html(&target(), &paging, &paging.range(2500));
        assert!(html.contains(r#"<a id="facetview_decrement" class="disabled">..</a>"#));
        assert!(html.contains("0 &ndash; 10 of 2,500"));
        assert!(html.contains("/mentions?id=abc%201&amp;type=software&amp;rank=1"));
    }

    #[test]
    fn test_pager_last_page() {
        let paging = Paging::new(10).at_rank(2);
        let html = pager_html(&target(), &paging, &paging.range(25));
        assert!(html.contains(r#"<a id="facetview_increment" class="disabled">..</a>"#));
        assert!(html.contains("rank=1"));
        assert!(html.contains("20 &ndash; 25 of 25"));
    }

    #[test]
    fn test_collapsed_label() {
        let html = collapsed_mentions_html(3, 4, "");
        assert!(html.contains("show other 4 mentions"));
        assert!(html.contains(r#"id="collapseElementMentions3""#));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}

//! Annotation highlighting for mention snippets.
//!
//! Each qualified claim (software name, version, publisher, URL) is located
//! in the original snippet and recorded as a byte span. Spans are collected
//! in a fixed pass order and a span overlapping an earlier one is dropped,
//! so the first pass to claim a stretch of text keeps it. Rendering is a
//! single walk over the sorted spans, escaping the text in between.

use crate::models::{ClaimKey, MentionRecord};
use crate::templates::html_escape;

/// Styling key carried by a highlighted span. The names are colour
/// categories of the label stylesheet and say nothing about the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelCategory {
    Person,
    National,
    Administration,
    Biology,
}

impl LabelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelCategory::Person => "person",
            LabelCategory::National => "national",
            LabelCategory::Administration => "administration",
            LabelCategory::Biology => "biology",
        }
    }

    pub fn for_claim(key: ClaimKey) -> Option<Self> {
        match key {
            ClaimKey::SoftwareName => Some(LabelCategory::Person),
            ClaimKey::Version => Some(LabelCategory::National),
            ClaimKey::Publisher => Some(LabelCategory::Administration),
            ClaimKey::Url => Some(LabelCategory::Biology),
            ClaimKey::Snippet => None,
        }
    }
}

/// Byte range `[start, end)` of the original snippet to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub category: LabelCategory,
}

impl Span {
    fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|offset| from + offset)
}

#[derive(Default)]
struct SpanSet {
    spans: Vec<Span>,
}

impl SpanSet {
    fn add(&mut self, start: usize, len: usize, key: ClaimKey) -> Option<Span> {
        let category = LabelCategory::for_claim(key)?;
        let span = Span {
            start,
            end: start + len,
            category,
        };
        if self.spans.iter().any(|s| s.overlaps(&span)) {
            return None;
        }
        self.spans.push(span);
        Some(span)
    }
}

/// Compute the highlight spans for `snippet`, in pass order.
///
/// The software-name pass searches from the start and leaves a cursor at
/// the end of its match. Version searches from that cursor, as does the
/// publisher when it repeats the software name (so it lands on a later
/// occurrence); otherwise publisher and URL search from the start.
pub fn annotation_spans(snippet: &str, mention: &MentionRecord) -> Vec<Span> {
    let mut set = SpanSet::default();
    let mut cursor = 0;

    let software_name = mention.annotation(ClaimKey::SoftwareName);
    if let Some(name) = &software_name {
        if let Some(start) = snippet.find(name.as_str()) {
            if let Some(span) = set.add(start, name.len(), ClaimKey::SoftwareName) {
                cursor = span.end;
            }
        }
    }

    if let Some(version) = mention.annotation(ClaimKey::Version) {
        if let Some(start) = find_from(snippet, &version, cursor) {
            set.add(start, version.len(), ClaimKey::Version);
        }
    }

    if let Some(publisher) = mention.annotation(ClaimKey::Publisher) {
        let from = if software_name.as_deref() == Some(publisher.as_str()) {
            cursor
        } else {
            0
        };
        if let Some(start) = find_from(snippet, &publisher, from) {
            set.add(start, publisher.len(), ClaimKey::Publisher);
        }
    }

    if let Some(url) = mention.annotation(ClaimKey::Url) {
        if let Some(start) = snippet.find(url.as_str()) {
            set.add(start, url.len(), ClaimKey::Url);
        }
    }

    set.spans
}

fn open_tag(category: LabelCategory) -> String {
    format!(
        r#"<span rel="popover" data-color="{label}"><span class="label {label}" style="cursor:hand;cursor:pointer;" >"#,
        label = category.as_str()
    )
}

const CLOSE_TAG: &str = "</span></span>";

/// Render `snippet` with the given spans wrapped in label markup. Spans
/// must be non-overlapping; their order does not matter.
pub fn render_spans(snippet: &str, spans: &[Span]) -> String {
    let mut sorted = spans.to_vec();
    sorted.sort_by_key(|s| s.start);

    let mut html = String::with_capacity(snippet.len() + sorted.len() * 128);
    let mut pos = 0;
    for span in sorted {
        html.push_str(&html_escape(&snippet[pos..span.start]));
        html.push_str(&open_tag(span.category));
        html.push_str(&html_escape(&snippet[span.start..span.end]));
        html.push_str(CLOSE_TAG);
        pos = span.end;
    }
    html.push_str(&html_escape(&snippet[pos..]));
    html
}

/// Highlight the annotated claims of `mention` inside `snippet`.
pub fn highlight(snippet: &str, mention: &MentionRecord) -> String {
    render_spans(snippet, &annotation_spans(snippet, mention))
}

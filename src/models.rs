//! Data models for the mentions viewer.
//!
//! These mirror the JSON shapes served by the software knowledge base:
//! entity records, paginated listings, mention (relation) records with
//! their claims, publication metadata and search-index hits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Entities
// ============================================================================

/// Entity collections the viewer knows how to page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Software,
    Persons,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Software => "software",
            EntityKind::Persons => "persons",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "software" => Some(EntityKind::Software),
            "persons" => Some(EntityKind::Persons),
            _ => None,
        }
    }

    /// Text shown when a listing comes back empty.
    pub fn empty_placeholder(&self) -> &'static str {
        match self {
            EntityKind::Software => "no mention",
            EntityKind::Persons => "no software",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(type, id)` pair a page is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTarget {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityTarget {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// `{ "record": ... }` envelope used by the entity and relation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEnvelope<T> {
    pub record: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    pub labels: Option<Value>,
    #[serde(default)]
    pub descriptions: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
}

// ============================================================================
// Paginated Listings
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default)]
    pub full_count: u64,
    #[serde(default)]
    pub page_rank: u64,
    #[serde(default)]
    pub page_size: u64,
}

/// One row of a `group_by_document` mentions listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentMentions {
    pub document_id: String,
    #[serde(default)]
    pub nb_doc_mentions: Option<u64>,
    #[serde(default)]
    pub mentions: Vec<String>,
}

/// One row of a person's software listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SoftwareRow {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub codemeta: Option<String>,
}

impl SoftwareRow {
    /// Identifier without the `software/` collection prefix.
    pub fn bare_id(&self) -> &str {
        self.id.strip_prefix("software/").unwrap_or(&self.id)
    }

    pub fn role_names(&self) -> String {
        self.roles
            .iter()
            .filter_map(|r| r.codemeta.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// Mentions and Claims
// ============================================================================

/// Claim properties a mention record may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimKey {
    Snippet,
    SoftwareName,
    Version,
    Publisher,
    Url,
}

impl ClaimKey {
    pub fn code(&self) -> &'static str {
        match self {
            ClaimKey::Snippet => "P7081",
            ClaimKey::SoftwareName => "P6166",
            ClaimKey::Version => "P348",
            ClaimKey::Publisher => "P123",
            ClaimKey::Url => "P854",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub qualifiers: Option<Value>,
}

impl Claim {
    fn text(&self) -> Option<String> {
        let text = display_value(self.value.as_ref()?);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn has_qualifiers(&self) -> bool {
        matches!(&self.qualifiers, Some(q) if !q.is_null())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentionRecord {
    #[serde(default)]
    pub claims: HashMap<String, Vec<Claim>>,
}

impl MentionRecord {
    fn first_claim(&self, key: ClaimKey) -> Option<&Claim> {
        self.claims.get(key.code()).and_then(|claims| claims.first())
    }

    /// Value of the first claim for `key`, if it is non-empty.
    pub fn claim_value(&self, key: ClaimKey) -> Option<String> {
        self.first_claim(key).and_then(Claim::text)
    }

    /// Value of the first claim for `key`, only when it is qualified.
    /// A qualifier means the label was located in the snippet.
    pub fn annotation(&self, key: ClaimKey) -> Option<String> {
        self.first_claim(key)
            .filter(|c| c.has_qualifiers())
            .and_then(Claim::text)
    }
}

// ============================================================================
// Publications
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Publication {
    #[serde(default)]
    pub metadata: PublicationMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicationMetadata {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub author: Vec<Author>,
    #[serde(rename = "container-title", default)]
    pub container_title: Vec<String>,
    #[serde(rename = "DOI", default)]
    pub doi: Option<Value>,
    #[serde(default)]
    pub pmid: Option<Value>,
    #[serde(default)]
    pub pmcid: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub family: Option<String>,
}

// ============================================================================
// Search Index
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Option<HitsEnvelope>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Display fields joined onto a software row from the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareFields {
    pub labels: String,
    pub descriptions: String,
    pub number_mentions: String,
    pub number_documents: String,
}

impl SearchResponse {
    /// Fields of the single hit, or `None` unless exactly one hit came back.
    pub fn single_hit(&self) -> Option<SoftwareFields> {
        let hits = &self.hits.as_ref()?.hits;
        if hits.len() != 1 {
            return None;
        }
        let fields = &hits[0].fields;
        let field = |name: &str| fields.get(name).map(display_value).unwrap_or_default();
        Some(SoftwareFields {
            labels: field("labels"),
            descriptions: field("descriptions"),
            number_mentions: field("number_mentions"),
            number_documents: field("number_documents"),
        })
    }
}

// ============================================================================
// Value Display
// ============================================================================

/// Render a loosely-typed JSON value as display text. Arrays are joined
/// with commas, which is how the knowledge base's multi-valued fields
/// (search-index `fields`, labels) have always been shown.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!(EntityKind::parse("software"), Some(EntityKind::Software));
        assert_eq!(EntityKind::parse("persons"), Some(EntityKind::Persons));
        assert_eq!(EntityKind::parse("documents"), None);
        assert_eq!(EntityKind::default(), EntityKind::Software);
    }

    #[test]
    fn test_annotation_requires_qualifiers() {
        let record: MentionRecord = serde_json::from_value(json!({
            "claims": {
                "P6166": [{"value": "Python", "qualifiers": {"P2": []}}],
                "P348": [{"value": "3.9"}],
                "P123": [{"value": "", "qualifiers": {}}],
                "P854": []
            }
        }))
        .unwrap();

        assert_eq!(
            record.annotation(ClaimKey::SoftwareName).as_deref(),
            Some("Python")
        );
        assert_eq!(record.annotation(ClaimKey::Version), None);
        assert_eq!(record.claim_value(ClaimKey::Version).as_deref(), Some("3.9"));
        assert_eq!(record.annotation(ClaimKey::Publisher), None);
        assert_eq!(record.annotation(ClaimKey::Url), None);
        assert_eq!(record.claim_value(ClaimKey::Snippet), None);
    }

    #[test]
    fn test_single_hit_joins_arrays() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {"hits": [{"fields": {
                "labels": ["numpy"],
                "descriptions": ["array library", "for python"],
                "number_mentions": [42],
                "number_documents": [7]
            }}]}
        }))
        .unwrap();

        let fields = response.single_hit().unwrap();
        assert_eq!(fields.labels, "numpy");
        assert_eq!(fields.descriptions, "array library,for python");
        assert_eq!(fields.number_mentions, "42");
        assert_eq!(fields.number_documents, "7");
    }

    #[test]
    fn test_single_hit_rejects_multiple() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {"hits": [{"fields": {}}, {"fields": {}}]}
        }))
        .unwrap();
        assert!(response.single_hit().is_none());
        assert!(SearchResponse::default().single_hit().is_none());
    }

    #[test]
    fn test_software_row_roles() {
        let row: SoftwareRow = serde_json::from_value(json!({
            "_id": "software/abc123",
            "roles": [{"codemeta": "author"}, {"codemeta": "maintainer"}]
        }))
        .unwrap();
        assert_eq!(row.bare_id(), "abc123");
        assert_eq!(row.role_names(), "author, maintainer");
    }
}

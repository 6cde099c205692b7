//! Tests for the knowledge-base client and the mentions page, run against a
//! stub knowledge-base service bound to an ephemeral local port.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mentions::client::SOFTWARE_INDEX;
use mentions::models::{EntityRecord, PageResponse, SoftwareRow};
use mentions::{build_router, AppState, ClientError, Config, EntityKind, EntityTarget, KbClient, KnowledgeBase, Paging};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

// ============================================================================
// Stub Knowledge Base
// ============================================================================

async fn software_entity(Path(id): Path<String>) -> Response {
    entity("software", &id)
}

async fn person_entity(Path(id): Path<String>) -> Response {
    entity("persons", &id)
}

async fn document_entity(Path(id): Path<String>) -> Response {
    entity("documents", &id)
}

fn entity(collection: &str, id: &str) -> Response {
    match (collection, id) {
        ("software", "s1") => Json(json!({
            "full_count": 1,
            "record": {
                "labels": "SciPy",
                "descriptions": "scientific computing library",
                "summary": "SciPy is *open source*."
            }
        }))
        .into_response(),
        ("documents", "d1") => Json(json!({
            "record": { "metadata": {
                "title": ["Software in science"],
                "author": [{ "family": "Howison" }],
                "DOI": "10.1002/asi.23538"
            } }
        }))
        .into_response(),
        ("persons", "p1") => Json(json!({
            "record": { "labels": ["Ada Lovelace"] }
        }))
        .into_response(),
        ("software", "broken") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn software_mentions(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if id != "s1" || params.get("ranker").map(String::as_str) != Some("group_by_document") {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }
    let rank: u64 = params.get("page_rank").and_then(|r| r.parse().ok()).unwrap_or(0);
    let records = if rank == 0 {
        json!([{
            "document_id": "documents/d1",
            "nb_doc_mentions": 3,
            "mentions": ["citations/m1", "citations/m2", "citations/m3"]
        }])
    } else {
        json!([])
    };
    Json(json!({
        "records": records,
        "full_count": 1,
        "page_rank": rank,
        "page_size": params.get("page_size").and_then(|s| s.parse::<u64>().ok()).unwrap_or(10)
    }))
    .into_response()
}

async fn person_software(Path(id): Path<String>) -> Response {
    Json(json!({
        "records": [{ "_id": "software/s1", "roles": [{ "codemeta": "author" }] }],
        "full_count": if id == "p1" { 1 } else { 0 },
        "page_rank": 0,
        "page_size": 10
    }))
    .into_response()
}

async fn relation(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "m1" => Json(json!({ "record": { "claims": {
            "P7081": [{ "value": "We used SciPy 1.7 for the analysis" }],
            "P6166": [{ "value": "SciPy", "qualifiers": { "P2": [] } }],
            "P348": [{ "value": "1.7", "qualifiers": { "P2": [] } }]
        } } }))
        .into_response(),
        "m2" | "m3" => Json(json!({ "record": { "claims": {
            "P7081": [{ "value": format!("mention {}", id) }]
        } } }))
        .into_response(),
        "bad" => "not json".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn search(Path(index): Path<String>, Json(body): Json<Value>) -> Response {
    if index != SOFTWARE_INDEX || body["_source"] != json!(false) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let hits = if body["query"]["terms"]["_id"] == json!(["s1"]) {
        json!([{ "fields": {
            "labels": ["SciPy"],
            "descriptions": ["scientific computing library"],
            "number_mentions": [1500],
            "number_documents": [900]
        } }])
    } else {
        json!([])
    };
    Json(json!({ "hits": { "hits": hits } })).into_response()
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn stub_kb() -> String {
    let app = Router::new()
        .route("/entities/software/{id}", get(software_entity))
        .route("/entities/software/{id}/mentions", get(software_mentions))
        .route("/entities/persons/{id}", get(person_entity))
        .route("/entities/persons/{id}/software", get(person_software))
        .route("/entities/documents/{id}", get(document_entity))
        .route("/relations/citations/{id}", get(relation))
        .route("/search/{index}/_search", post(search));
    spawn(app).await
}

fn client(host: &str) -> KbClient {
    KbClient::new(host, None).unwrap()
}

// ============================================================================
// Client Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_entity_record() {
    let host = stub_kb().await;
    let kb = client(&host);

    let record = kb
        .entity(&EntityTarget::new(EntityKind::Software, "s1"))
        .await
        .unwrap();
    assert_eq!(record.labels, Some(json!("SciPy")));
    assert!(record.summary.is_some());
}

#[tokio::test]
async fn test_fetch_json_generic() {
    let host = stub_kb().await;
    let kb = client(&host);

    let page: PageResponse<SoftwareRow> = kb
        .fetch_json("/entities/persons/p1/software?page_rank=0&page_size=10")
        .await
        .unwrap();
    assert_eq!(page.full_count, 1);
    assert_eq!(page.records[0].bare_id(), "s1");

    let envelope: Value = kb.fetch_json("/entities/software/s1").await.unwrap();
    let record: EntityRecord = serde_json::from_value(envelope["record"].clone()).unwrap();
    assert_eq!(record.descriptions, Some(json!("scientific computing library")));
}

#[tokio::test]
async fn test_status_error_is_reported() {
    let host = stub_kb().await;
    let kb = client(&host);

    let err = kb
        .entity(&EntityTarget::new(EntityKind::Software, "broken"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_parse_error_is_reported() {
    let host = stub_kb().await;
    let kb = client(&host);

    let err = kb.relation("citations/bad").await.unwrap_err();
    assert!(matches!(err, ClientError::Parse { .. }));
}

#[tokio::test]
async fn test_network_error_is_reported() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let kb = client(&format!("http://{}", addr));
    let err = kb.document("documents/d1").await.unwrap_err();
    assert!(matches!(err, ClientError::Network { .. }));
}

#[tokio::test]
async fn test_search_posts_query_body() {
    let host = stub_kb().await;
    let kb = client(&host);

    let fields = kb.software_fields("s1").await.unwrap().unwrap();
    assert_eq!(fields.labels, "SciPy");
    assert_eq!(fields.number_mentions, "1500");

    assert!(kb.software_fields("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn test_mentions_listing_query() {
    let host = stub_kb().await;
    let kb = client(&host);

    let page = kb
        .entity_mentions(&EntityTarget::new(EntityKind::Software, "s1"), &Paging::new(10))
        .await
        .unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].mentions.len(), 3);
}

// ============================================================================
// Mentions Page
// ============================================================================

async fn viewer() -> String {
    let kb_host = stub_kb().await;
    let config = Config {
        kb_service_host: kb_host,
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config).unwrap());
    spawn(build_router(state)).await
}

#[tokio::test]
async fn test_mentions_page_end_to_end() {
    let base = viewer().await;

    let response = reqwest::get(format!("{}/mentions?id=s1&type=software", base))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();

    assert!(html.contains("SciPy</a></strong> - scientific computing library"));
    assert!(html.contains("<em>open source</em>"));
    assert!(html.contains("0 &ndash; 1 of 1"));
    assert!(html.contains("<i>Software in science</i>, Howison et al."));
    assert!(html.contains(r#"class="label person" style="cursor:hand;cursor:pointer;" >SciPy</span>"#));
    assert!(html.contains(r#"class="label national" style="cursor:hand;cursor:pointer;" >1.7</span>"#));
    assert!(html.contains("show other 1 mentions"));
    assert!(html.contains("mention m3"));
    assert!(!html.contains("fetching mentions..."));
}

#[tokio::test]
async fn test_person_page_end_to_end() {
    let base = viewer().await;

    let html = reqwest::get(format!("{}/mentions?id=p1&type=persons", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Ada Lovelace"));
    assert!(html.contains("1500 mentions in 900 documents"));
    assert!(html.contains("<b>roles:</b> author"));
}

#[tokio::test]
async fn test_mentions_page_past_last_row() {
    let base = viewer().await;

    let html = reqwest::get(format!("{}/mentions?id=s1&rank=3", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("no mention"));
}

#[tokio::test]
async fn test_mentions_page_rejects_bad_input() {
    let base = viewer().await;

    let missing = reqwest::get(format!("{}/mentions", base)).await.unwrap();
    assert_eq!(missing.status().as_u16(), 400);

    let bad_type = reqwest::get(format!("{}/mentions?id=x&type=licenses", base))
        .await
        .unwrap();
    assert_eq!(bad_type.status().as_u16(), 400);

    let alive = reqwest::get(format!("{}/alive", base)).await.unwrap();
    assert_eq!(alive.text().await.unwrap(), "true");
}

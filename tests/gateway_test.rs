//! Gateway and HTTP API tests against an in-process fake Elasticsearch.
//!
//! The fake implements just enough of the REST surface (root, index
//! HEAD/PUT/DELETE, `_doc` writes and deletes, `_search`) to observe what the
//! gateway sends and how it treats the engine's answers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use nonprofit_search::api;
use nonprofit_search::codes::NteeCodebook;
use nonprofit_search::config::{Config, ElasticConfig};
use nonprofit_search::ingest::loader::{ingest_rows, CsvRows, IngestOptions};
use nonprofit_search::ingest::normalize::{subsection_is, CHARITABLE_SUBSECTION};
use nonprofit_search::search::gateway::{GatewayError, IndexCreation, SearchGateway};
use nonprofit_search::state::AppState;

#[derive(Default)]
struct Cluster {
    indices: BTreeMap<String, BTreeMap<String, Value>>,
    mappings: BTreeMap<String, Value>,
    next_id: usize,
    searches: Vec<Value>,
}

type Shared = Arc<Mutex<Cluster>>;

fn es_error(status: StatusCode, kind: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "error": { "type": kind }, "status": status.as_u16() })),
    )
}

async fn root() -> Json<Value> {
    Json(json!({ "cluster_name": "fake", "version": { "number": "8.13.0" } }))
}

async fn index_exists(State(cluster): State<Shared>, Path(index): Path<String>) -> StatusCode {
    if cluster.lock().unwrap().indices.contains_key(&index) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create_index(
    State(cluster): State<Shared>,
    Path(index): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut cluster = cluster.lock().unwrap();
    if cluster.indices.contains_key(&index) {
        return es_error(StatusCode::BAD_REQUEST, "resource_already_exists_exception");
    }
    cluster.indices.insert(index.clone(), BTreeMap::new());
    cluster.mappings.insert(index.clone(), body);
    (
        StatusCode::OK,
        Json(json!({ "acknowledged": true, "index": index })),
    )
}

async fn delete_index(
    State(cluster): State<Shared>,
    Path(index): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut cluster = cluster.lock().unwrap();
    match cluster.indices.remove(&index) {
        Some(_) => (StatusCode::OK, Json(json!({ "acknowledged": true }))),
        None => es_error(StatusCode::NOT_FOUND, "index_not_found_exception"),
    }
}

async fn append(
    State(cluster): State<Shared>,
    Path(index): Path<String>,
    Json(doc): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if doc.get("fail") == Some(&json!(true)) {
        return es_error(StatusCode::INTERNAL_SERVER_ERROR, "simulated_failure");
    }
    let mut cluster = cluster.lock().unwrap();
    let id = format!("auto-{}", cluster.next_id);
    cluster.next_id += 1;
    cluster
        .indices
        .entry(index)
        .or_default()
        .insert(id.clone(), doc);
    (
        StatusCode::CREATED,
        Json(json!({ "_id": id, "result": "created" })),
    )
}

async fn upsert(
    State(cluster): State<Shared>,
    Path((index, id)): Path<(String, String)>,
    Json(doc): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut cluster = cluster.lock().unwrap();
    let existed = cluster
        .indices
        .entry(index)
        .or_default()
        .insert(id.clone(), doc)
        .is_some();
    if existed {
        (StatusCode::OK, Json(json!({ "_id": id, "result": "updated" })))
    } else {
        (
            StatusCode::CREATED,
            Json(json!({ "_id": id, "result": "created" })),
        )
    }
}

async fn delete_doc(
    State(cluster): State<Shared>,
    Path((index, id)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    let mut cluster = cluster.lock().unwrap();
    let removed = cluster
        .indices
        .get_mut(&index)
        .and_then(|docs| docs.remove(&id))
        .is_some();
    if removed {
        (StatusCode::OK, Json(json!({ "_id": id, "result": "deleted" })))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "_id": id, "result": "not_found" })),
        )
    }
}

async fn search(
    State(cluster): State<Shared>,
    Path(index): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body.pointer("/query/invalid").is_some() {
        return es_error(StatusCode::BAD_REQUEST, "parsing_exception");
    }
    let mut cluster = cluster.lock().unwrap();
    cluster.searches.push(body);
    let hits: Vec<Value> = cluster
        .indices
        .get(&index)
        .map(|docs| {
            docs.iter()
                .map(|(id, doc)| json!({ "_index": index, "_id": id, "_source": doc }))
                .collect()
        })
        .unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({ "hits": { "total": { "value": hits.len() }, "hits": hits } })),
    )
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Start a fake cluster and return its URL plus a handle to its state.
async fn fake_cluster() -> (String, Shared) {
    let cluster = Shared::default();
    let app = Router::new()
        .route("/", get(root))
        .route(
            "/{index}",
            axum::routing::head(index_exists)
                .put(create_index)
                .delete(delete_index),
        )
        .route("/{index}/_doc", post(append))
        .route("/{index}/_doc/{id}", put(upsert).delete(delete_doc))
        .route("/{index}/_search", post(search))
        .with_state(cluster.clone());
    (serve(app).await, cluster)
}

fn elastic_config(host: &str) -> ElasticConfig {
    ElasticConfig {
        host: host.to_string(),
        index: "nonprofits".to_string(),
        ..Default::default()
    }
}

async fn connect() -> (SearchGateway, Shared) {
    let (host, cluster) = fake_cluster().await;
    let gateway = SearchGateway::connect(&elastic_config(&host)).await.unwrap();
    (gateway, cluster)
}

#[tokio::test]
async fn test_connect_fails_fast_when_unreachable() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = SearchGateway::connect(&elastic_config(&format!("http://{addr}")))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Unreachable { .. }));
}

#[tokio::test]
async fn test_info_returns_cluster_document() {
    let (gateway, _) = connect().await;
    let info = gateway.info().await.unwrap();
    assert_eq!(info["cluster_name"], "fake");
}

#[tokio::test]
async fn test_create_index_is_idempotent() {
    let (gateway, cluster) = connect().await;
    let mappings = json!({ "properties": { "state": { "type": "keyword" } } });

    let first = gateway.create_index("orgs", Some(&mappings)).await.unwrap();
    let second = gateway.create_index("orgs", None).await.unwrap();

    assert_eq!(first, IndexCreation::Created);
    assert_eq!(second, IndexCreation::AlreadyExists);
    assert_eq!(
        cluster.lock().unwrap().mappings["orgs"],
        json!({ "mappings": mappings })
    );
}

#[tokio::test]
async fn test_delete_missing_index_is_success() {
    let (gateway, _) = connect().await;
    assert!(!gateway.delete_index("never-created").await.unwrap());

    gateway.create_index("orgs", None).await.unwrap();
    assert!(gateway.delete_index("orgs").await.unwrap());
}

#[tokio::test]
async fn test_upsert_is_last_write_wins() {
    let (gateway, cluster) = connect().await;

    let first = gateway
        .upsert_document("orgs", "010590897", &json!({ "name": "Old Name" }))
        .await
        .unwrap();
    let second = gateway
        .upsert_document("orgs", "010590897", &json!({ "name": "New Name" }))
        .await
        .unwrap();

    assert_eq!(first.result, "created");
    assert_eq!(second.result, "updated");
    let cluster = cluster.lock().unwrap();
    assert_eq!(cluster.indices["orgs"].len(), 1);
    assert_eq!(cluster.indices["orgs"]["010590897"]["name"], "New Name");
}

#[tokio::test]
async fn test_delete_missing_document_is_success() {
    let (gateway, _) = connect().await;
    assert!(!gateway.delete_document("orgs", "nope").await.unwrap());

    gateway
        .upsert_document("orgs", "1", &json!({ "name": "x" }))
        .await
        .unwrap();
    assert!(gateway.delete_document("orgs", "1").await.unwrap());
}

#[tokio::test]
async fn test_bulk_append_assigns_ids() {
    let (gateway, cluster) = connect().await;
    let docs = vec![json!({ "name": "a" }), json!({ "name": "b" })];

    let ids = gateway.bulk_append("orgs", &docs).await.unwrap();

    assert_eq!(ids, vec!["auto-0".to_string(), "auto-1".to_string()]);
    assert_eq!(cluster.lock().unwrap().indices["orgs"].len(), 2);
}

#[tokio::test]
async fn test_bulk_append_aborts_on_first_failure() {
    let (gateway, cluster) = connect().await;
    let docs = vec![
        json!({ "name": "a" }),
        json!({ "name": "b", "fail": true }),
        json!({ "name": "c" }),
    ];

    let err = gateway.bulk_append("orgs", &docs).await.unwrap_err();

    match err {
        GatewayError::Engine { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("simulated_failure"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The document before the failure stays; the one after is never sent
    let cluster = cluster.lock().unwrap();
    let names: Vec<_> = cluster.indices["orgs"]
        .values()
        .map(|d| d["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("a")]);
}

#[tokio::test]
async fn test_search_returns_raw_hits() {
    let (gateway, _) = connect().await;
    gateway
        .upsert_document("orgs", "1", &json!({ "name": "Band Boosters" }))
        .await
        .unwrap();

    let hits = gateway
        .search("orgs", &json!({ "query": { "match_all": {} } }))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["_id"], "1");
    assert_eq!(hits[0]["_source"]["name"], "Band Boosters");
}

#[tokio::test]
async fn test_search_engine_error_passes_through() {
    let (gateway, _) = connect().await;
    let err = gateway
        .search("orgs", &json!({ "query": { "invalid": {} } }))
        .await
        .unwrap_err();
    match err {
        GatewayError::Engine { status, body } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let body: Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body["error"]["type"], "parsing_exception");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_ingest_rows_upserts_and_appends() {
    let (gateway, cluster) = connect().await;
    let csv = "\
EIN,NAME,STATE,SUBSECTION,ASSET_AMT,RULING
123,Bad Numbers Org,oh,03,abc,
,Pantry Without Ein,OH,03,5000,202301
555,Social Club,OH,07,100,199001
777,Arts Council,OH,03,90000,199912
";
    let rows = CsvRows::new(csv.as_bytes()).unwrap();
    let options = IngestOptions {
        limit: 100,
        enrich_with: None,
    };

    let added = ingest_rows(
        &gateway,
        "nonprofits",
        rows,
        subsection_is(CHARITABLE_SUBSECTION),
        &options,
    )
    .await
    .unwrap();

    assert_eq!(added, 3);
    let cluster = cluster.lock().unwrap();
    let docs = &cluster.indices["nonprofits"];
    assert_eq!(docs.len(), 3);

    let bad = &docs["123"];
    assert_eq!(bad["asset_amt"], 0);
    assert!(bad.get("ruling").is_none());
    assert_eq!(bad["state"], "OH");

    assert_eq!(docs["auto-0"]["name"], "Pantry Without Ein");
    assert_eq!(docs["auto-0"]["ruling"], 202301);
    assert!(!docs.contains_key("555"));
}

#[tokio::test]
async fn test_ingest_rows_respects_limit() {
    let (gateway, cluster) = connect().await;
    let csv = "EIN,NAME,SUBSECTION\n1,a,03\n2,b,03\n3,c,03\n";
    let options = IngestOptions {
        limit: 2,
        enrich_with: None,
    };

    let added = ingest_rows(
        &gateway,
        "nonprofits",
        CsvRows::new(csv.as_bytes()).unwrap(),
        |_: &nonprofit_search::models::RawRow| true,
        &options,
    )
    .await
    .unwrap();

    assert_eq!(added, 2);
    assert_eq!(cluster.lock().unwrap().indices["nonprofits"].len(), 2);
}

/// Start the real API on top of a fake cluster.
async fn api_server() -> (String, Shared) {
    let (host, cluster) = fake_cluster().await;
    let config = Config {
        elastic: elastic_config(&host),
        ..Default::default()
    };
    let gateway = SearchGateway::connect(&config.elastic).await.unwrap();
    let ntee = NteeCodebook::from_json(
        r#"{"B82": {"title": "Scholarships & Student Financial Aid", "description": "Student aid", "keywords": ["Scholarships"]}}"#,
    )
    .unwrap();
    let state = AppState::with_parts(config, gateway, ntee);
    (serve(api::router(state)).await, cluster)
}

#[tokio::test]
async fn test_api_survey_runs_translated_query() {
    let (base, cluster) = api_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/survey"))
        .json(&json!([{ "question": "cause", "answer": "Health & Medical" }]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["query"]["size"], 50);
    assert_eq!(
        body["query"]["query"]["bool"]["filter"][0]["bool"]["should"],
        json!([{ "prefix": { "ntee": "E" } }, { "prefix": { "ntee": "H" } }])
    );
    assert!(body["results"].as_array().unwrap().is_empty());

    let cluster = cluster.lock().unwrap();
    assert_eq!(cluster.searches.last().unwrap(), &body["query"]);
}

#[tokio::test]
async fn test_api_organization_lifecycle() {
    let (base, cluster) = api_server().await;
    let client = reqwest::Client::new();

    // Index lifecycle
    let resp = client
        .post(format!("{base}/indices/nonprofits"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = client
        .post(format!("{base}/indices/nonprofits"))
        .json(&json!({ "mappings": { "properties": {} } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Upsert via body id, append without one, replace via PUT
    let resp = client
        .post(format!("{base}/organizations"))
        .json(&json!({ "id": "123", "name": "Band Boosters", "city": "Columbus" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = client
        .post(format!("{base}/organizations"))
        .json(&json!({ "name": "No Id Pantry" }))
        .send()
        .await
        .unwrap();
    let appended: Value = resp.json().await.unwrap();
    assert_eq!(appended["id"], "auto-0");
    let resp = client
        .put(format!("{base}/organizations/123"))
        .json(&json!({ "name": "Renamed Boosters" }))
        .send()
        .await
        .unwrap();
    let replaced: Value = resp.json().await.unwrap();
    assert_eq!(replaced["result"], "updated");

    let resp = client
        .post(format!("{base}/organizations/bulk"))
        .json(&json!({ "organizations": [{ "name": "x" }, { "name": "y" }] }))
        .send()
        .await
        .unwrap();
    let bulk: Value = resp.json().await.unwrap();
    assert_eq!(bulk["added"], 2);

    {
        let cluster = cluster.lock().unwrap();
        let docs = &cluster.indices["nonprofits"];
        assert_eq!(docs.len(), 4);
        assert_eq!(docs["123"], json!({ "name": "Renamed Boosters" }));
    }

    // Deleting twice is fine
    for _ in 0..2 {
        let resp = client
            .delete(format!("{base}/organizations/123"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    // Raw search with pagination
    let resp = client
        .post(format!("{base}/api/search"))
        .json(&json!({ "query": { "query": { "match": { "name": "x" } } }, "from": 1, "size": 2 }))
        .send()
        .await
        .unwrap();
    let hits: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(hits.len(), 3);
    {
        let cluster = cluster.lock().unwrap();
        let sent = cluster.searches.last().unwrap();
        assert_eq!(sent["from"], 1);
        assert_eq!(sent["size"], 2);
        assert_eq!(sent["query"]["match"]["name"], "x");
    }

    let resp = client
        .delete(format!("{base}/indices/nonprofits"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = client
        .delete(format!("{base}/indices/nonprofits"))
        .send()
        .await
        .unwrap();
    let dropped: Value = resp.json().await.unwrap();
    assert_eq!(dropped["existed"], false);
}

#[tokio::test]
async fn test_api_search_passes_engine_error_through() {
    let (base, _) = api_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/search"))
        .json(&json!({ "query": { "query": { "invalid": {} } } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["type"], "parsing_exception");
}

#[tokio::test]
async fn test_api_ntee_code_lookup() {
    let (base, _) = api_server().await;
    let client = reqwest::Client::new();

    let known: Value = client
        .get(format!("{base}/api/codes/ntee/b82"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(known["code"], "B82");
    assert_eq!(known["title"], "Scholarships & Student Financial Aid");
    assert_eq!(known["keywords"], json!(["Scholarships"]));

    let unknown: Value = client
        .get(format!("{base}/api/codes/ntee/Z99"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unknown["title"], "Unknown code");
    assert_eq!(unknown["keywords"], json!([]));
}

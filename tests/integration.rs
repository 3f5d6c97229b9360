//! End-to-end tests against a mock Socrata server.
//!
//! Run with:
//!   cargo test --test integration

use socrata_soda::{
    ApiVersion, Authentication, CsvConverter, Dataset, ErrorKind, Filter, OrderDirection,
    SodaClient, SoqlQuery,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_TOKEN: &str = "khpKCi1wMz2bwXyMIHfb6ux73";

async fn test_dataset(server: &MockServer) -> Dataset {
    let auth = Authentication::new(&server.uri(), APP_TOKEN).insecure_http();
    let client = SodaClient::new(auth).unwrap();
    Dataset::new(client, "pkfj-5jsd").unwrap()
}

#[tokio::test]
async fn test_get_data_with_soql_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(query_param("$select", "*"))
        .and(query_param("$where", "state = 'AR'"))
        .and(query_param("$order", "date_posted DESC"))
        .and(query_param("$limit", "2"))
        .and(header("X-App-Token", APP_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "state": "AR", "date_posted": "2014-11-28" },
            { "state": "AR", "date_posted": "2014-11-21" }
        ])))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let query = SoqlQuery::new()
        .where_clause("state = 'AR'")
        .order("date_posted", OrderDirection::Descending)
        .limit(2)
        .unwrap();

    let rows: Vec<serde_json::Value> = dataset.get_data(query).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["state"], "AR");
}

#[tokio::test]
async fn test_get_data_without_filter_sends_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(query_param("$select", "*"))
        .and(query_param("$order", ":id ASC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let rows: Vec<serde_json::Value> = dataset.get_data(Filter::None).await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_get_data_with_field_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(query_param("state", "AR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "state": "AR" }
        ])))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let rows: Vec<serde_json::Value> = dataset
        .get_data(vec![("state".to_string(), "AR".to_string())])
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_soda_error_envelope_surfaces_code_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd/9999.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": true,
            "code": "row.missing",
            "message": "Cannot find row with id 9999",
            "data": { "id": "9999" }
        })))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let err = dataset
        .get_row::<serde_json::Value>("9999")
        .await
        .unwrap_err();

    assert!(err.is_soda());
    assert_eq!(err.soda_code(), Some("row.missing"));
    match err.kind {
        ErrorKind::Soda { code, message, data } => {
            assert_eq!(code, "row.missing");
            assert_eq!(message, "Cannot find row with id 9999");
            assert_eq!(data["data"]["id"], "9999");
        }
        other => panic!("expected a SODA error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_becomes_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string("<html><body>Forbidden</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let err = dataset
        .get_data::<Vec<serde_json::Value>, _>(Filter::None)
        .await
        .unwrap_err();

    assert!(err.is_http());
    assert_eq!(err.http_status(), Some(403));
}

#[tokio::test]
async fn test_api_version_probe_new_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(query_param("$limit", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-SODA2-Truth-Last-Modified", "Thu, 01 Jan 2015 12:00:00 GMT")
                .set_body_json(serde_json::json!([])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/views/pkfj-5jsd.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pkfj-5jsd",
            "newBackend": true
        })))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let version = dataset.api_version().await.unwrap();

    assert_eq!(version, ApiVersion::Soda2NewBackend);
    assert_eq!(version.as_number(), 2.1);

    // Cached: asking again must not issue more requests.
    let again = dataset.api_version().await.unwrap();
    assert_eq!(again, ApiVersion::Soda2NewBackend);
}

#[tokio::test]
async fn test_api_version_legacy_marker() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-SODA2-Legacy-Types", "true")
                .set_body_json(serde_json::json!([])),
        )
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let version = dataset.api_version().await.unwrap();

    assert_eq!(version, ApiVersion::Legacy);
}

#[tokio::test]
async fn test_upsert_posts_normalized_payload() {
    let mock_server = MockServer::start().await;
    let rows = serde_json::json!([
        { "name": "foo", "count": "1" },
        { "name": "bar", "count": "2" }
    ]);

    Mock::given(method("POST"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&rows))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Rows Created": 2,
            "Rows Updated": 0,
            "Rows Deleted": 0
        })))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let result = dataset.upsert(rows.clone()).await.unwrap();

    assert_eq!(result["Rows Created"], 2);
}

#[tokio::test]
async fn test_upsert_from_csv_converter() {
    let mock_server = MockServer::start().await;
    let expected = serde_json::json!([
        { "name": "foo", "count": "1" },
        { "name": "bar", "count": "2" }
    ]);

    Mock::given(method("POST"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Rows Created": 2
        })))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let converter = CsvConverter::new("name,count\nfoo,1\nbar,2\n");
    let payload = socrata_soda::Payload::from_converter(&converter).unwrap();
    let result = dataset.upsert(payload).await.unwrap();

    assert_eq!(result["Rows Created"], 2);
}

#[tokio::test]
async fn test_replace_uses_put() {
    let mock_server = MockServer::start().await;
    let rows = serde_json::json!([{ "name": "only" }]);

    Mock::given(method("PUT"))
        .and(path("/resource/pkfj-5jsd.json"))
        .and(body_json(&rows))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Rows Created": 1,
            "Rows Deleted": 40
        })))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    let result = dataset.replace(rows.clone()).await.unwrap();

    assert_eq!(result["Rows Deleted"], 40);
}

#[tokio::test]
async fn test_delete_row_success_and_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/resource/pkfj-5jsd/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "1", "deleted": true
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/resource/pkfj-5jsd/2.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": true,
            "code": "row.missing",
            "message": "Cannot find row with id 2"
        })))
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;

    dataset.delete_row("1").await.unwrap();

    let err = dataset.delete_row("2").await.unwrap_err();
    assert_eq!(err.soda_code(), Some("row.missing"));
}

#[tokio::test]
async fn test_metadata_is_cached_until_forced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/views/pkfj-5jsd.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pkfj-5jsd",
            "name": "Job postings"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;

    let first = dataset.get_metadata(false).await.unwrap();
    assert_eq!(first["name"], "Job postings");

    // Served from the cache, no second request.
    let cached = dataset.get_metadata(false).await.unwrap();
    assert_eq!(cached, first);

    // Forcing refetches.
    let forced = dataset.get_metadata(true).await.unwrap();
    assert_eq!(forced, first);
}

#[tokio::test]
async fn test_last_modified_captured_from_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/resource/pkfj-5jsd.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT")
                .set_body_json(serde_json::json!([])),
        )
        .mount(&mock_server)
        .await;

    let dataset = test_dataset(&mock_server).await;
    assert!(dataset.last_modified().is_none());

    let _: Vec<serde_json::Value> = dataset.get_data(Filter::None).await.unwrap();

    let timestamp = dataset.last_modified().unwrap();
    assert_eq!(timestamp.timestamp(), 1445412480);
}

#[test]
fn test_invalid_resource_id_fails_without_a_server() {
    let auth = Authentication::new("opendata.socrata.com", APP_TOKEN);
    let client = SodaClient::new(auth).unwrap();

    for id in ["pkfj5jsd", "pk#j-5j!d", "1234-werwe", "123--4545"] {
        let err = Dataset::new(client.clone(), id).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidResourceId(_)));
    }
}

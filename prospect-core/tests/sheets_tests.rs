// Tests for the Sheets values client

use prospect_core::sheets::SheetsClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SheetsClient {
    SheetsClient::new("sheet-1", "tok-1").with_base_url(server.uri())
}

#[tokio::test]
async fn test_read_rows_basic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A2:B4"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "A2:B4",
            "majorDimension": "ROWS",
            "values": [
                ["Acme Inc", "acme.com"],
                ["Globex", "globex.com"],
                ["OnlyName"]
            ]
        })))
        .mount(&mock_server)
        .await;

    let rows = client(&mock_server).read_rows("A2:B4").await.unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["Acme Inc", "acme.com"]);
    // Short rows are passed through, not padded.
    assert_eq!(rows[2], vec!["OnlyName"]);
}

#[tokio::test]
async fn test_read_rows_empty_range() {
    let mock_server = MockServer::start().await;

    // An empty range comes back without a values key at all.
    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A2:B2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "A2:B2",
            "majorDimension": "ROWS"
        })))
        .mount(&mock_server)
        .await;

    let rows = client(&mock_server).read_rows("A2:B2").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_read_rows_numeric_cells_become_strings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A2:B2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [[42, "acme.com"]]
        })))
        .mount(&mock_server)
        .await;

    let rows = client(&mock_server).read_rows("A2:B2").await.unwrap();
    assert_eq!(rows[0], vec!["42", "acme.com"]);
}

#[tokio::test]
async fn test_read_rows_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/A2:B2"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).read_rows("A2:B2").await.unwrap_err();
    assert!(err.contains("403"));
    assert!(err.contains("A2:B2"));
}

#[tokio::test]
async fn test_write_row_raw_semantics() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-1/values/C5:G5"))
        .and(query_param("valueInputOption", "RAW"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({
            "values": [["overview", "Product-based", "B2B", "SaaS", "=not+a+formula"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updatedCells": 5
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let values = vec![
        "overview".to_string(),
        "Product-based".to_string(),
        "B2B".to_string(),
        "SaaS".to_string(),
        // RAW input: stored literally even when it looks like a formula.
        "=not+a+formula".to_string(),
    ];

    client(&mock_server).write_row("C5:G5", &values).await.unwrap();
}

#[tokio::test]
async fn test_write_row_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-1/values/C5:G5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .write_row("C5:G5", &["x".to_string()])
        .await
        .unwrap_err();
    assert!(err.contains("500"));
    assert!(err.contains("C5:G5"));
}

//! End-to-end runs of the sync pipeline against a mock Graph server.

mod common;

use common::*;
use graph_table_sync::SyncError;
use graph_table_sync::sync::{self, RunOptions};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options() -> RunOptions {
    RunOptions {
        dry_run: false,
        retry: fast_retry(),
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_two_column_table_end_to_end() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("public/data/service_stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU", "Qty"])).await;
    mount_first_rows_page(
        &server,
        odata_page(
            vec![
                table_row(0, json!(["A1", "5"])),
                table_row(1, json!(["", "3"])),
                table_row(2, json!(["B2", ""])),
            ],
            None,
        ),
    )
    .await;

    let report = sync::run(&test_config(&server, &output), &options()).await.unwrap();

    assert_eq!(report.rows_fetched, 3);
    assert_eq!(report.records_written, 2);
    assert_eq!(
        read_json(&output),
        json!([
            {"SKU": "A1", "Model": "", "Qty": 5},
            {"SKU": "B2", "Model": "", "Qty": 0}
        ])
    );
}

#[tokio::test]
async fn test_localized_headers_sorted_output() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    // Column descriptors arrive out of index order
    mount_columns(
        &server,
        odata_page(
            vec![
                json!({"name": "Бронь для сервиса", "index": 2}),
                json!({"name": " артикул ", "index": 0}),
                json!({"name": "Модель", "index": 1}),
            ],
            None,
        ),
    )
    .await;
    mount_first_rows_page(
        &server,
        odata_page(
            vec![
                table_row(0, json!(["Z-9", "Перфоратор", "1 200"])),
                table_row(1, json!([4300, "Дрель", 7.9])),
                table_row(2, json!(["M-1"])),
            ],
            None,
        ),
    )
    .await;

    sync::run(&test_config(&server, &output), &options()).await.unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("\"Перфоратор\""), "non-ASCII must stay literal");
    assert!(content.starts_with("[\n  {\n    \"SKU\""));
    assert_eq!(
        read_json(&output),
        json!([
            {"SKU": "4300", "Model": "Дрель", "Qty": 7},
            {"SKU": "M-1", "Model": "", "Qty": 0},
            {"SKU": "Z-9", "Model": "Перфоратор", "Qty": 1200}
        ])
    );
}

#[tokio::test]
async fn test_pagination_follows_next_link_until_absent() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU", "Model", "Qty"])).await;

    let page2 = format!("{}{}?$skiptoken=2", server.uri(), rows_path());
    let page3 = format!("{}{}?$skiptoken=3", server.uri(), rows_path());

    mount_first_rows_page(
        &server,
        odata_page(vec![table_row(0, json!(["C3", "c", 3]))], Some(&page2)),
    )
    .await;

    // An empty page with a next link does not end pagination
    Mock::given(method("GET"))
        .and(path(rows_path()))
        .and(query_param("$skiptoken", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(vec![], Some(&page3))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(rows_path()))
        .and(query_param("$skiptoken", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(odata_page(
            vec![table_row(1, json!(["A1", "a", 1])), table_row(2, json!(["B2", "b", 2]))],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let report = sync::run(&test_config(&server, &output), &options()).await.unwrap();

    assert_eq!(report.rows_fetched, 3);
    let skus: Vec<String> = read_json(&output)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["SKU"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(skus, vec!["A1", "B2", "C3"]);
}

#[tokio::test]
async fn test_empty_next_link_ends_pagination() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU", "Qty"])).await;
    mount_first_rows_page(
        &server,
        odata_page(vec![table_row(0, json!(["A1", "5"]))], Some("")),
    )
    .await;

    let report = sync::run(&test_config(&server, &output), &options()).await.unwrap();

    assert_eq!(report.rows_fetched, 1);
    assert_eq!(report.records_written, 1);
    assert_eq!(read_json(&output), json!([{"SKU": "A1", "Model": "", "Qty": 5}]));
}

#[tokio::test]
async fn test_transient_failures_during_pagination_are_absorbed() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU", "Qty"])).await;

    Mock::given(method("GET"))
        .and(path(rows_path()))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rows_path()))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_first_rows_page(&server, odata_page(vec![table_row(0, json!(["A1", "4"]))], None)).await;

    let report = sync::run(&test_config(&server, &output), &options()).await.unwrap();

    assert_eq!(report.records_written, 1);
    assert_eq!(read_json(&output), json!([{"SKU": "A1", "Model": "", "Qty": 4}]));
}

#[tokio::test]
async fn test_column_override_bypasses_aliases() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU", "Code", "Qty", "Reserved"])).await;
    mount_first_rows_page(
        &server,
        odata_page(vec![table_row(0, json!(["ignored", "X-1", 10, 2]))], None),
    )
    .await;

    let mut config = test_config(&server, &output);
    config.overrides.sku = Some("code".to_string());
    config.overrides.qty = Some("Reserved".to_string());

    sync::run(&config, &options()).await.unwrap();

    assert_eq!(read_json(&output), json!([{"SKU": "X-1", "Model": "", "Qty": 2}]));
}

#[tokio::test]
async fn test_dry_run_does_not_write() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU"])).await;
    mount_first_rows_page(&server, odata_page(vec![table_row(0, json!(["A1"]))], None)).await;

    let options = RunOptions {
        dry_run: true,
        retry: fast_retry(),
    };
    let report = sync::run(&test_config(&server, &output), &options).await.unwrap();

    assert!(report.dry_run);
    assert_eq!(report.records_written, 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_site_id_is_fatal_and_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");
    fs::write(&output, "[]").unwrap();

    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path(site_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"displayName": "Stock"})))
        .mount(&server)
        .await;

    let err = sync::run(&test_config(&server, &output), &options()).await.unwrap_err();

    match &err {
        SyncError::MissingId { resource, body } => {
            assert_eq!(*resource, "site");
            assert!(body.contains("displayName"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.exit_code(), 2);
    assert_eq!(fs::read_to_string(&output).unwrap(), "[]");
}

#[tokio::test]
async fn test_unknown_file_path_is_fatal() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path(site_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": SITE_ID})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(drive_item_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "itemNotFound", "message": "The resource could not be found."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = sync::run(&test_config(&server, &output), &options()).await.unwrap_err();

    assert!(matches!(err, SyncError::GraphStatus { status: 404, .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_empty_column_listing_is_fatal() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, odata_page(vec![], None)).await;

    let err = sync::run(&test_config(&server, &output), &options()).await.unwrap_err();

    assert!(matches!(&err, SyncError::NoColumns(table) if table == TABLE));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_empty_table_is_fatal() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    mount_token(&server).await;
    mount_site_and_item(&server).await;
    mount_columns(&server, columns(&["SKU", "Qty"])).await;
    mount_first_rows_page(&server, odata_page(vec![], None)).await;

    let err = sync::run(&test_config(&server, &output), &options()).await.unwrap_err();

    assert!(matches!(err, SyncError::NoRows(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_rejected_credentials_stop_before_graph_calls() {
    let server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stock.json");

    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(400).set_body_string("unauthorized_client"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = sync::run(&test_config(&server, &output), &options()).await.unwrap_err();

    assert!(matches!(err, SyncError::TokenRequest { status: 400, .. }));
}

//! Shared fixtures for the Graph mock-server tests.

#![allow(dead_code)]

use graph_table_sync::api::{Credentials, RetryConfig};
use graph_table_sync::config::{ColumnOverrides, Endpoints, SyncConfig, TablePath};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT: &str = "tenant-1";
pub const TOKEN: &str = "test-token";
pub const HOSTNAME: &str = "contoso.sharepoint.com";
pub const SITE_PATH: &str = "/sites/Stock";
pub const DRIVE_PATH: &str = "Docs/stock.xlsx";
pub const TABLE: &str = "StockTable";
pub const SITE_ID: &str = "site-1";
pub const ITEM_ID: &str = "item-1";

/// Same schedule shape as production, scaled down to milliseconds.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 6,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        backoff_multiplier: 1.8,
    }
}

pub fn graph_base(server: &MockServer) -> String {
    format!("{}/v1.0", server.uri())
}

pub fn test_config(server: &MockServer, output: &Path) -> SyncConfig {
    SyncConfig {
        credentials: Credentials {
            tenant_id: TENANT.to_string(),
            client_id: "client-1".to_string(),
            client_secret: "secret-1".to_string(),
        },
        table: TablePath {
            site_hostname: HOSTNAME.to_string(),
            site_path: SITE_PATH.to_string(),
            drive_path: DRIVE_PATH.to_string(),
            table_name: TABLE.to_string(),
        },
        overrides: ColumnOverrides::default(),
        output_path: output.to_path_buf(),
        endpoints: Endpoints {
            graph_base: graph_base(server),
            login_base: server.uri(),
        },
    }
}

pub fn token_path() -> String {
    format!("/{}/oauth2/v2.0/token", TENANT)
}

pub fn site_path() -> String {
    format!("/v1.0/sites/{}:{}", HOSTNAME, SITE_PATH)
}

pub fn drive_item_path() -> String {
    format!("/v1.0/sites/{}/drive/root:/{}", SITE_ID, DRIVE_PATH)
}

pub fn table_path() -> String {
    format!(
        "/v1.0/sites/{}/drive/items/{}/workbook/tables/{}",
        SITE_ID, ITEM_ID, TABLE
    )
}

pub fn columns_path() -> String {
    format!("{}/columns", table_path())
}

pub fn rows_path() -> String {
    format!("{}/rows", table_path())
}

/// Wraps items in an OData list response.
pub fn odata_page(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// A row object the way the workbook API returns it.
pub fn table_row(index: usize, cells: Value) -> Value {
    json!({ "index": index, "values": [cells] })
}

pub fn columns(names: &[&str]) -> Value {
    let items = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "name": name, "index": i }))
        .collect();
    odata_page(items, None)
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": TOKEN
        })))
        .mount(server)
        .await;
}

pub async fn mount_site_and_item(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(site_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": SITE_ID,
            "displayName": "Stock"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(drive_item_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": ITEM_ID,
            "name": "stock.xlsx"
        })))
        .mount(server)
        .await;
}

pub async fn mount_columns(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(columns_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answers the first rows request (the one carrying `$top`).
pub async fn mount_first_rows_page(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(rows_path()))
        .and(query_param("$top", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

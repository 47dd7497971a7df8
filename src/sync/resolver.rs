//! Resolves site → drive item → table columns
//!
//! Each hop needs the id produced by the previous one, so the lookups run
//! strictly in order and stop at the first one that yields nothing.

use log::info;
use serde_json::Value;

use crate::api::GraphClient;
use crate::api::constants;
use crate::api::models::{ODataPage, TableColumn, ordered_column_names};
use crate::config::TablePath;
use crate::error::{SyncError, SyncResult, excerpt};

/// Identifiers and column layout of a resolved workbook table
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub site_id: String,
    pub item_id: String,
    pub table_name: String,
    /// Column names in index order
    pub columns: Vec<String>,
}

impl ResolvedTable {
    /// URL of the first page of rows
    pub fn rows_url(&self, base_url: &str) -> String {
        constants::table_rows_endpoint(base_url, &self.site_id, &self.item_id, &self.table_name)
    }
}

pub struct ResourceResolver<'a> {
    client: &'a GraphClient,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(client: &'a GraphClient) -> Self {
        Self { client }
    }

    /// Run all three lookups
    pub async fn resolve(&self, table: &TablePath) -> SyncResult<ResolvedTable> {
        let site_id = self.resolve_site(&table.site_hostname, &table.site_path).await?;
        let item_id = self.resolve_drive_item(&site_id, &table.drive_path).await?;
        let columns = self.resolve_columns(&site_id, &item_id, &table.table_name).await?;

        Ok(ResolvedTable {
            site_id,
            item_id,
            table_name: table.table_name.clone(),
            columns,
        })
    }

    pub async fn resolve_site(&self, hostname: &str, site_path: &str) -> SyncResult<String> {
        info!("Resolving site: {}:{}", hostname, site_path);

        let url = constants::site_endpoint(self.client.base_url(), hostname, site_path);
        let site = self.client.get_json(&url, &[]).await?;
        extract_id(&site, "site")
    }

    pub async fn resolve_drive_item(&self, site_id: &str, drive_path: &str) -> SyncResult<String> {
        info!("Resolving file in site drive: /{}", drive_path);

        let url = constants::drive_item_endpoint(self.client.base_url(), site_id, drive_path);
        let item = self.client.get_json(&url, &[]).await?;
        extract_id(&item, "drive item")
    }

    /// Column names in index order; an empty listing is fatal
    pub async fn resolve_columns(
        &self,
        site_id: &str,
        item_id: &str,
        table_name: &str,
    ) -> SyncResult<Vec<String>> {
        info!("Loading table columns: {}", table_name);

        let url =
            constants::table_columns_endpoint(self.client.base_url(), site_id, item_id, table_name);
        let page: ODataPage<TableColumn> = self
            .client
            .get(&url, &[("$select", "name,index")])
            .await?;

        if page.value.is_empty() {
            return Err(SyncError::NoColumns(table_name.to_string()));
        }

        let columns = ordered_column_names(page.value);
        info!("Table columns found: {}", columns.join(" | "));
        Ok(columns)
    }
}

fn extract_id(body: &Value, resource: &'static str) -> SyncResult<String> {
    match body.get("id").and_then(|id| id.as_str()) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(SyncError::MissingId {
            resource,
            body: excerpt(&body.to_string(), constants::GRAPH_ERROR_EXCERPT),
        }),
    }
}

//! Walks the cursor-chained row listing of a workbook table

use log::{debug, info};
use serde_json::Value;

use super::normalizer::RawRow;
use super::resolver::ResolvedTable;
use crate::api::GraphClient;
use crate::api::models::{ODataPage, TableRow};
use crate::error::{SyncError, SyncResult};

pub struct RowCollector<'a> {
    client: &'a GraphClient,
}

impl<'a> RowCollector<'a> {
    pub fn new(client: &'a GraphClient) -> Self {
        Self { client }
    }

    /// Fetch every page until a response carries no next link; an empty link counts as none.
    ///
    /// Zero rows overall is fatal.
    pub async fn collect(&self, table: &ResolvedTable) -> SyncResult<Vec<RawRow>> {
        info!("Loading table rows...");

        let mut rows = Vec::new();
        let mut next_url = Some(table.rows_url(self.client.base_url()));
        let mut pages = 0usize;

        while let Some(url) = next_url {
            let page: ODataPage<TableRow> = self.client.get(&url, &[]).await?;
            pages += 1;
            debug!("Page {}: {} rows", pages, page.value.len());

            rows.extend(
                page.value
                    .iter()
                    .map(|row| map_row(&table.columns, row.cells())),
            );
            next_url = page.next_link.filter(|link| !link.is_empty());
        }

        if rows.is_empty() {
            return Err(SyncError::NoRows(table.table_name.clone()));
        }

        info!("Collected {} rows across {} page(s)", rows.len(), pages);
        Ok(rows)
    }
}

/// Pair positional cells with column names; missing trailing cells become null
pub fn map_row(columns: &[String], cells: &[Value]) -> RawRow {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), cells.get(i).cloned().unwrap_or(Value::Null)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_row_aligns_by_position() {
        let row = map_row(&columns(&["SKU", "Qty"]), &[json!("A1"), json!(5)]);

        assert_eq!(row.get("SKU"), Some(&json!("A1")));
        assert_eq!(row.get("Qty"), Some(&json!(5)));
    }

    #[test]
    fn test_map_row_pads_short_rows() {
        let row = map_row(&columns(&["SKU", "Model", "Qty"]), &[json!("A1")]);

        assert_eq!(row.len(), 3);
        assert_eq!(row.get("Model"), Some(&Value::Null));
        assert_eq!(row.get("Qty"), Some(&Value::Null));
    }

    #[test]
    fn test_map_row_ignores_extra_cells() {
        let row = map_row(&columns(&["SKU"]), &[json!("A1"), json!("extra")]);
        assert_eq!(row.len(), 1);
    }
}

//! API Constants and endpoint builders for the Microsoft Graph workbook API

/// Graph API version
pub const API_VERSION: &str = "v1.0";

/// Default Graph host
pub const GRAPH_HOST: &str = "https://graph.microsoft.com";

/// Default login authority host
pub const LOGIN_HOST: &str = "https://login.microsoftonline.com";

/// Scope requested for client credential tokens
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// OAuth2 grant type used by the token provider
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Rows requested per page from the table rows endpoint
pub const ROWS_PAGE_SIZE: u32 = 500;

/// Body excerpt length for token endpoint failures
pub const TOKEN_ERROR_EXCERPT: usize = 400;

/// Body excerpt length for Graph GET failures
pub const GRAPH_ERROR_EXCERPT: usize = 600;

/// Standard headers for Graph requests
pub mod headers {
    /// Accept header value
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Server hint for how long to wait before retrying
    pub const RETRY_AFTER: &str = "Retry-After";

    /// User agent sent with every request
    pub const USER_AGENT: &str = "graph-table-sync/0.1";
}

/// Pagination cursor field inside list responses
pub const NEXT_LINK_FIELD: &str = "@odata.nextLink";

/// Full Graph base URL with version, e.g. `https://graph.microsoft.com/v1.0`
pub fn graph_base_url() -> String {
    format!("{}/{}", GRAPH_HOST, API_VERSION)
}

/// Token endpoint for a tenant under the given authority host
pub fn token_endpoint(login_base: &str, tenant_id: &str) -> String {
    format!("{}/{}/oauth2/v2.0/token", login_base.trim_end_matches('/'), tenant_id)
}

/// Site lookup by hostname and server-relative path (`/sites/...`)
pub fn site_endpoint(base_url: &str, hostname: &str, site_path: &str) -> String {
    format!("{}/sites/{}:{}", base_url, hostname, site_path)
}

/// Drive item lookup by path under the site's default drive root
pub fn drive_item_endpoint(base_url: &str, site_id: &str, drive_path: &str) -> String {
    format!(
        "{}/sites/{}/drive/root:/{}",
        base_url,
        site_id,
        encode_drive_path(drive_path)
    )
}

/// Base endpoint for a workbook table inside a drive item
pub fn table_endpoint(base_url: &str, site_id: &str, item_id: &str, table_name: &str) -> String {
    format!(
        "{}/sites/{}/drive/items/{}/workbook/tables/{}",
        base_url,
        site_id,
        item_id,
        urlencoding::encode(table_name)
    )
}

/// Column listing for a workbook table
pub fn table_columns_endpoint(
    base_url: &str,
    site_id: &str,
    item_id: &str,
    table_name: &str,
) -> String {
    format!("{}/columns", table_endpoint(base_url, site_id, item_id, table_name))
}

/// First page of the row listing for a workbook table
pub fn table_rows_endpoint(
    base_url: &str,
    site_id: &str,
    item_id: &str,
    table_name: &str,
) -> String {
    format!(
        "{}/rows?$top={}",
        table_endpoint(base_url, site_id, item_id, table_name),
        ROWS_PAGE_SIZE
    )
}

/// Percent-encode each segment of a drive path while keeping `/` separators
pub fn encode_drive_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

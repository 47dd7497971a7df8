//! Run configuration resolved from the process environment
//!
//! Mandatory variables are checked all at once so a misconfigured job reports
//! every missing name in a single failure.

use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::api::Credentials;
use crate::api::constants;
use crate::error::{SyncError, SyncResult};

pub const TENANT_ID: &str = "TENANT_ID";
pub const CLIENT_ID: &str = "CLIENT_ID";
pub const CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const SP_SITE_HOSTNAME: &str = "SP_SITE_HOSTNAME";
pub const SP_SITE_PATH: &str = "SP_SITE_PATH";
pub const SP_XLSX_PATH: &str = "SP_XLSX_PATH";
pub const SP_TABLE_NAME: &str = "SP_TABLE_NAME";

pub const SP_COL_SKU: &str = "SP_COL_SKU";
pub const SP_COL_MODEL: &str = "SP_COL_MODEL";
pub const SP_COL_QTY: &str = "SP_COL_QTY";

/// Variables every run needs
pub const REQUIRED_VARS: [&str; 7] = [
    TENANT_ID,
    CLIENT_ID,
    CLIENT_SECRET,
    SP_SITE_HOSTNAME,
    SP_SITE_PATH,
    SP_XLSX_PATH,
    SP_TABLE_NAME,
];

/// Exact column-name overrides
pub const OPTIONAL_VARS: [&str; 3] = [SP_COL_SKU, SP_COL_MODEL, SP_COL_QTY];

/// Where the snapshot lands unless told otherwise
pub const DEFAULT_OUTPUT_PATH: &str = "public/data/service_stock.json";

/// Location of the table to sync
#[derive(Debug, Clone, PartialEq)]
pub struct TablePath {
    pub site_hostname: String,
    /// Normalized, always starts with `/sites/`
    pub site_path: String,
    /// Normalized, never starts with `/`
    pub drive_path: String,
    pub table_name: String,
}

/// Optional exact header names that bypass alias search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOverrides {
    pub sku: Option<String>,
    pub model: Option<String>,
    pub qty: Option<String>,
}

/// Remote hosts the run talks to
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    /// Graph base including version, e.g. `https://graph.microsoft.com/v1.0`
    pub graph_base: String,
    /// Login authority host, e.g. `https://login.microsoftonline.com`
    pub login_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            graph_base: constants::graph_base_url(),
            login_base: constants::LOGIN_HOST.to_string(),
        }
    }
}

/// Everything a sync run needs
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub credentials: Credentials,
    pub table: TablePath,
    pub overrides: ColumnOverrides,
    pub output_path: PathBuf,
    pub endpoints: Endpoints,
}

impl SyncConfig {
    /// Resolve from the process environment
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = require_env(&REQUIRED_VARS, &lookup)?;
        let optional = optional_env(&OPTIONAL_VARS, &lookup);

        let config = Self {
            credentials: Credentials {
                tenant_id: env[TENANT_ID].clone(),
                client_id: env[CLIENT_ID].clone(),
                client_secret: env[CLIENT_SECRET].clone(),
            },
            table: TablePath {
                site_hostname: env[SP_SITE_HOSTNAME].clone(),
                site_path: normalize_site_path(&env[SP_SITE_PATH]),
                drive_path: normalize_drive_path(&env[SP_XLSX_PATH]),
                table_name: env[SP_TABLE_NAME].clone(),
            },
            overrides: ColumnOverrides {
                sku: optional[SP_COL_SKU].clone(),
                model: optional[SP_COL_MODEL].clone(),
                qty: optional[SP_COL_QTY].clone(),
            },
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            endpoints: Endpoints::default(),
        };

        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

/// Load variables from an env file, returning the path that was loaded.
///
/// With no explicit path a `.env` in the working directory is loaded if present.
/// An explicit path that cannot be loaded is fatal. Runs before the logger is
/// initialized so `RUST_LOG` may come from the file; callers log the result.
pub fn load_env_file(path: Option<&Path>) -> SyncResult<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| SyncError::EnvFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}

/// Collect every required name, trimmed and non-empty, or fail listing all that are missing
pub fn require_env<F>(names: &[&str], lookup: F) -> SyncResult<HashMap<String, String>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = HashMap::new();
    let mut missing = Vec::new();

    for name in names {
        match lookup(name).map(|v| v.trim().to_string()) {
            Some(value) if !value.is_empty() => {
                values.insert(name.to_string(), value);
            }
            _ => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(SyncError::MissingEnv(missing));
    }

    Ok(values)
}

/// Read optional names; blank values count as unset
pub fn optional_env<F>(names: &[&str], lookup: F) -> HashMap<String, Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .map(|name| {
            let value = lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            (name.to_string(), value)
        })
        .collect()
}

/// Ensure a leading slash and the `/sites/` prefix Graph expects
pub fn normalize_site_path(raw: &str) -> String {
    let mut path = raw.trim().to_string();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    if !path.starts_with("/sites/") {
        path.insert_str(0, "/sites");
    }
    path
}

/// Drive paths are addressed relative to the drive root
pub fn normalize_drive_path(raw: &str) -> String {
    raw.trim().trim_start_matches('/').to_string()
}

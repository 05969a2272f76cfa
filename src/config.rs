//! Environment-driven configuration
//!
//! All settings come from environment variables with sensible development
//! defaults. `dotenvy` is loaded by the binaries before `CatalogConfig::from_env`
//! is called.

use crate::error::{CatalogError, CatalogResult};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_UNIPROT_BASE_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// Runtime settings for the catalog library and web server
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database_url: String,
    pub server_port: u16,
    pub static_dir: String,
    pub page_size: usize,
    pub uniprot_base_url: String,
}

impl CatalogConfig {
    pub fn from_env() -> CatalogResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost:5432/peptide_catalog".to_string());

        let server_port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| {
                CatalogError::configuration(format!("Invalid SERVER_PORT '{}': {}", raw, e))
            })?,
            Err(_) => 3000,
        };

        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let page_size = match std::env::var("PAGE_SIZE") {
            Ok(raw) => {
                let parsed = raw.parse::<usize>().map_err(|e| {
                    CatalogError::configuration(format!("Invalid PAGE_SIZE '{}': {}", raw, e))
                })?;
                if parsed == 0 {
                    return Err(CatalogError::configuration("PAGE_SIZE must be positive"));
                }
                parsed
            }
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let uniprot_base_url = std::env::var("UNIPROT_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UNIPROT_BASE_URL.to_string());

        Ok(Self {
            database_url,
            server_port,
            static_dir,
            page_size,
            uniprot_base_url,
        })
    }
}

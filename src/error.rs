//! Error handling for the peptide catalog
//!
//! This module provides idiomatic Rust error types using thiserror for
//! better error messages and proper error chain handling.

use thiserror::Error;

/// Main error type for the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Organism '{name}' is not in the catalog")]
    UnknownOrganism { name: String },

    #[error("Unexpected UniProt payload: {message}")]
    UniprotPayload { message: String },
}

impl CatalogError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CatalogError::Configuration {
            message: message.into(),
        }
    }

    pub fn uniprot_payload(message: impl Into<String>) -> Self {
        CatalogError::UniprotPayload {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let err = CatalogError::UnknownOrganism {
            name: "Homo sapiens".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Organism 'Homo sapiens' is not in the catalog"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = CatalogError::from(json_err);
        assert!(matches!(err, CatalogError::Serialization(_)));
    }
}

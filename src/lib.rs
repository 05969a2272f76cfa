//! Peptide Catalog
//!
//! Relational catalog of bioactive peptides, proteins, organisms and
//! proteases, browsed through server-rendered listings with cascading
//! taxonomy filters (kingdom → phylum → class), free-text search and
//! pagination.
//!
//! The interesting piece lives in [`filter`]: a pure, request-scoped
//! cascading filter core that turns a (possibly stale) selection into a
//! consistent one, recomputes the valid option sets for every dimension and
//! returns the filtered result page. The web crate
//! (`crates/peptide-catalog-web`) renders its output; [`database`] holds the
//! repositories; [`services`] integrates UniProt and runs background
//! ingests.
//!
//! ## Quick start
//!
//! ```rust
//! use peptide_catalog::filter::{CascadeResolver, Dimension, FilterSelection};
//!
//! let records = Vec::new(); // organism snapshot from OrganismRepository
//! let resolver = CascadeResolver::new(&records, 20);
//! let outcome = resolver.apply_change(
//!     FilterSelection::default(),
//!     Dimension::Kingdom,
//!     Some("Animalia".to_string()),
//! );
//! assert_eq!(outcome.page.page, 1);
//! ```

// Core error handling
pub mod error;

// Environment configuration
pub mod config;

// Record types
pub mod models;

// Cascading filter core (pure, no I/O)
pub mod filter;

// Database repositories
pub mod database;

// UniProt integration and background ingest
pub mod services;

pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};

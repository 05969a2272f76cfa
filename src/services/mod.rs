//! External integrations and background jobs
//!
//! - [`uniprot`]: REST client for reviewed protein accessions and metadata
//! - [`ingest`]: staged background import of an organism's proteins, with a
//!   shared progress registry polled by the web layer

pub mod ingest;
pub mod uniprot;

pub use ingest::{
    create_ingest_registry, status_of, IngestRegistry, IngestService, IngestStage, IngestStatus,
};
pub use uniprot::{ProteinMetadata, ProteinMetadataSource, UniprotClient};

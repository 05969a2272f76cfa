//! Database repositories
//!
//! Thin structs owning a `PgPool`, one per aggregate. All queries use the
//! runtime-checked `sqlx::query_as` form so the crate builds without a live
//! database; the schema lives in `sql/schema.sql`.

pub mod organism_repository;
pub mod peptide_repository;
pub mod protein_repository;

pub use organism_repository::OrganismRepository;
pub use peptide_repository::{NewCleavageReference, PeptideRepository};
pub use protein_repository::{NewProtein, ProteinFilter, ProteinRepository};

//! Data models for the peptide catalog
//!
//! This module contains the record types stored in the relational database:
//! organisms of origin, peptide sequences, proteins, bioactivities and
//! proteases, together with their display formatting.

pub mod catalog_models;

// Re-export commonly used types for convenience
pub use catalog_models::{
    sequence_preview, Bioactivity, BioactivityType, CleavageReference, Organism, Peptide,
    PeptideBioactivityInfo, PeptideSequence, Protease, Protein, ProteinRow, Reference,
};

//! Record types for the catalog schema
//!
//! Field shapes mirror the relational schema in `sql/schema.sql`. All types
//! derive `FromRow` so repositories can use runtime-checked `sqlx::query_as`
//! queries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Organism of origin, keyed by scientific name
///
/// The taxonomic hierarchy (kingdom → phylum → class) is enforced by
/// co-occurrence in the data, not by a separate taxonomy table: a phylum
/// value is meaningful only under the kingdoms it actually appears with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organism {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class_name: Option<String>,
    pub ncbi_url: Option<String>,
}

impl fmt::Display for Organism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.common_name {
            Some(common) => write!(f, "{} ({})", self.scientific_name, common),
            None => write!(f, "{}", self.scientific_name),
        }
    }
}

/// A unique peptide sequence with its provenance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PeptideSequence {
    pub sequence_id: Uuid,
    pub aa_seq: String,
    pub organism_name: Option<String>,
    pub reference_id: Option<String>,
    pub source: Option<String>,
    pub uniprot_code: Option<String>,
    pub is_reviewed: bool,
    pub date_added: DateTime<Utc>,
}

impl PeptideSequence {
    /// Truncated preview of the sequence, see [`sequence_preview`]
    pub fn seq_preview(&self, max_length: usize) -> String {
        sequence_preview(&self.aa_seq, max_length)
    }
}

/// Truncated preview of an amino-acid sequence: head...tail within
/// `max_length` characters (ellipsis included), or the full sequence if
/// short enough.
pub fn sequence_preview(aa_seq: &str, max_length: usize) -> String {
    if aa_seq.len() <= max_length {
        return aa_seq.to_string();
    }
    let half = max_length.saturating_sub(3) / 2;
    format!("{}...{}", &aa_seq[..half], &aa_seq[aa_seq.len() - half..])
}

impl fmt::Display for PeptideSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seq_preview(30))
    }
}

/// Scientific reference identifier (PMID, DOI or other database key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reference {
    pub pmid_doi_db: String,
    pub url: Option<String>,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pmid_doi_db)
    }
}

/// Protein referencing its peptide sequence plus protein-specific info
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Protein {
    pub protein_id: Uuid,
    pub sequence_id: Uuid,
    pub protein_name: Option<String>,
    pub gene_name: Option<String>,
    pub protein_function: Option<String>,
    pub organism_name: Option<String>,
    pub uniprot_code: Option<String>,
}

impl fmt::Display for Protein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.protein_name.as_deref().unwrap_or("Unnamed protein");
        let gene = self.gene_name.as_deref().unwrap_or("No gene name");
        write!(f, "{} ({})", name, gene)
    }
}

/// Joined row for the protein listing page: protein plus organism and a
/// sequence preview, produced by `ProteinRepository::search_page`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProteinRow {
    pub protein_id: Uuid,
    pub protein_name: Option<String>,
    pub gene_name: Option<String>,
    pub protein_function: Option<String>,
    pub uniprot_code: Option<String>,
    pub organism_name: Option<String>,
    pub aa_seq: String,
}

/// Bioactivity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bioactivity_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BioactivityType {
    Quantitative,
    NonQuantitative,
}

/// A specific bioactivity of a peptide: what it does to which target
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bioactivity {
    pub bioactivity_id: Uuid,
    pub name: String,
    pub target: String,
    pub effect: String,
    pub activity_type: BioactivityType,
}

impl fmt::Display for Bioactivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.activity_type {
            BioactivityType::Quantitative => "quantitative",
            BioactivityType::NonQuantitative => "non_quantitative",
        };
        write!(f, "{} on {} ({})", self.name, self.target, kind)
    }
}

/// A bioactive peptide derived from a peptide sequence
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Peptide {
    pub peptide_id: Uuid,
    pub sequence_id: Uuid,
    pub peptide_info_source: Option<String>,
}

/// Annotation on the peptide ↔ bioactivity relationship
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PeptideBioactivityInfo {
    pub peptide_id: Uuid,
    pub bioactivity_id: Uuid,
    pub original_value: Option<String>,
    pub value: Option<f64>,
    pub other_info: Option<String>,
}

/// Protease enzyme that cleaves peptide bonds
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Protease {
    pub protease_id: Uuid,
    pub name: String,
    pub source: String,
    pub ec_number: Option<String>,
}

impl fmt::Display for Protease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source)
    }
}

/// Documented cleavage of a substrate by a protease, with the P4..P4'
/// residue positions around the cleavage site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CleavageReference {
    pub cleavage_id: Uuid,
    pub protease_id: Uuid,
    pub reference_id: String,
    pub substrate_name: String,
    pub substrate_formula: String,
    pub uniprot_substrate: Option<String>,
    pub site_p4: String,
    pub site_p3: String,
    pub site_p2: String,
    pub site_p1: String,
    pub site_p1_prime: String,
    pub site_p2_prime: String,
    pub site_p3_prime: String,
    pub site_p4_prime: String,
}

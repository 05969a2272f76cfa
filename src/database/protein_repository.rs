//! Protein repository
//!
//! The protein listing filters in SQL (the table is much larger than the
//! organism catalog) and pages with the same clamp/offset arithmetic the
//! in-memory slicer uses, so both listings behave identically at the edges.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::filter::options::FilterOption;
use crate::filter::page::{clamp_page, offset, total_pages, ResultPage};
use crate::models::{PeptideSequence, ProteinRow};

/// Filter parameters for the protein listing: substring query over protein
/// name and UniProt code, plus an exact organism constraint.
#[derive(Debug, Clone, Default)]
pub struct ProteinFilter {
    pub query: Option<String>,
    pub organism: Option<String>,
}

/// A protein to insert, sequence already resolved
#[derive(Debug, Clone)]
pub struct NewProtein {
    pub sequence_id: Uuid,
    pub protein_name: Option<String>,
    pub gene_name: Option<String>,
    pub protein_function: Option<String>,
    pub organism_name: Option<String>,
    pub uniprot_code: Option<String>,
}

#[derive(Clone)]
pub struct ProteinRepository {
    pool: PgPool,
}

impl ProteinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of proteins matching the filter, with organism and sequence
    /// joined in. The requested page is clamped against the filtered count.
    pub async fn search_page(
        &self,
        filter: &ProteinFilter,
        page: usize,
        page_size: usize,
    ) -> CatalogResult<ResultPage<ProteinRow>> {
        let (total_count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM proteins p
            JOIN peptide_sequences s ON s.sequence_id = p.sequence_id
            WHERE ($1::text IS NULL
                   OR p.protein_name ILIKE '%' || $1 || '%'
                   OR p.uniprot_code ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR p.organism_name = $2)
            "#,
        )
        .bind(&filter.query)
        .bind(&filter.organism)
        .fetch_one(&self.pool)
        .await?;

        let total_count = total_count.max(0) as usize;
        let page = clamp_page(page, total_count, page_size);

        let items = sqlx::query_as::<_, ProteinRow>(
            r#"
            SELECT p.protein_id, p.protein_name, p.gene_name, p.protein_function,
                   p.uniprot_code, p.organism_name, s.aa_seq
            FROM proteins p
            JOIN peptide_sequences s ON s.sequence_id = p.sequence_id
            WHERE ($1::text IS NULL
                   OR p.protein_name ILIKE '%' || $1 || '%'
                   OR p.uniprot_code ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR p.organism_name = $2)
            ORDER BY p.protein_name NULLS LAST, p.protein_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&filter.query)
        .bind(&filter.organism)
        .bind(page_size as i64)
        .bind(offset(page, page_size) as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(ResultPage {
            items,
            page,
            page_size,
            total_count,
            total_pages: total_pages(total_count, page_size),
        })
    }

    /// Organism filter options for the protein page: every organism that has
    /// at least one protein, with its protein count. Count descending, name
    /// ascending — the same ordering the taxonomy option sets use.
    pub async fn organism_options(&self) -> CatalogResult<Vec<FilterOption>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT o.scientific_name, COUNT(p.protein_id)
            FROM organisms o
            JOIN proteins p ON p.organism_name = o.scientific_name
            GROUP BY o.scientific_name
            ORDER BY COUNT(p.protein_id) DESC, o.scientific_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, count)| FilterOption {
                label: name.clone(),
                value: name,
                count: count.max(0) as usize,
            })
            .collect())
    }

    /// Find the sequence for (aa_seq, organism) or create it. Ingested
    /// sequences are reviewed UniProt entries.
    pub async fn get_or_create_sequence(
        &self,
        aa_seq: &str,
        organism_name: Option<&str>,
        uniprot_code: Option<&str>,
    ) -> CatalogResult<Uuid> {
        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT sequence_id FROM peptide_sequences
            WHERE aa_seq = $1 AND organism_name IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(aa_seq)
        .bind(organism_name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((sequence_id,)) = existing {
            return Ok(sequence_id);
        }

        let (sequence_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO peptide_sequences
            (sequence_id, aa_seq, organism_name, uniprot_code, is_reviewed, date_added)
            VALUES ($1, $2, $3, $4, true, NOW())
            RETURNING sequence_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(aa_seq)
        .bind(organism_name)
        .bind(uniprot_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(sequence_id)
    }

    /// Insert a protein; returns `None` when the (sequence, gene, name)
    /// combination already exists.
    pub async fn insert_protein(&self, protein: &NewProtein) -> CatalogResult<Option<Uuid>> {
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO proteins
            (protein_id, sequence_id, protein_name, gene_name, protein_function,
             organism_name, uniprot_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (sequence_id, gene_name, protein_name) DO NOTHING
            RETURNING protein_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(protein.sequence_id)
        .bind(&protein.protein_name)
        .bind(&protein.gene_name)
        .bind(&protein.protein_function)
        .bind(&protein.organism_name)
        .bind(&protein.uniprot_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.map(|(protein_id,)| protein_id))
    }

    pub async fn get_sequence(&self, sequence_id: Uuid) -> CatalogResult<Option<PeptideSequence>> {
        let sequence = sqlx::query_as::<_, PeptideSequence>(
            r#"
            SELECT sequence_id, aa_seq, organism_name, reference_id, source,
                   uniprot_code, is_reviewed, date_added
            FROM peptide_sequences
            WHERE sequence_id = $1
            "#,
        )
        .bind(sequence_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sequence)
    }
}

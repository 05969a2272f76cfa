//! Bioactive peptide, bioactivity and protease records

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    Bioactivity, BioactivityType, CleavageReference, Peptide, PeptideBioactivityInfo, Protease,
};

/// A documented cleavage to record, ids not yet assigned
#[derive(Debug, Clone)]
pub struct NewCleavageReference {
    pub protease_id: Uuid,
    pub reference_id: String,
    pub substrate_name: String,
    pub substrate_formula: String,
    pub uniprot_substrate: Option<String>,
    pub sites: [String; 8],
}

#[derive(Clone)]
pub struct PeptideRepository {
    pool: PgPool,
}

impl PeptideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ============================================
    // Bioactivities
    // ============================================

    pub async fn list_bioactivities(&self) -> CatalogResult<Vec<Bioactivity>> {
        let bioactivities = sqlx::query_as::<_, Bioactivity>(
            r#"
            SELECT bioactivity_id, name, target, effect, activity_type
            FROM bioactivities
            ORDER BY name, target
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bioactivities)
    }

    pub async fn create_bioactivity(
        &self,
        name: &str,
        target: &str,
        effect: &str,
        activity_type: BioactivityType,
    ) -> CatalogResult<Bioactivity> {
        let bioactivity = sqlx::query_as::<_, Bioactivity>(
            r#"
            INSERT INTO bioactivities (bioactivity_id, name, target, effect, activity_type)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name, target, effect, activity_type)
            DO UPDATE SET name = EXCLUDED.name
            RETURNING bioactivity_id, name, target, effect, activity_type
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(target)
        .bind(effect)
        .bind(activity_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(bioactivity)
    }

    // ============================================
    // Peptides
    // ============================================

    pub async fn create_peptide(
        &self,
        sequence_id: Uuid,
        peptide_info_source: Option<&str>,
    ) -> CatalogResult<Peptide> {
        let peptide = sqlx::query_as::<_, Peptide>(
            r#"
            INSERT INTO peptides (peptide_id, sequence_id, peptide_info_source)
            VALUES ($1, $2, $3)
            RETURNING peptide_id, sequence_id, peptide_info_source
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(sequence_id)
        .bind(peptide_info_source)
        .fetch_one(&self.pool)
        .await?;

        Ok(peptide)
    }

    /// Attach a bioactivity to a peptide with measurement annotations
    pub async fn attach_bioactivity(
        &self,
        info: &PeptideBioactivityInfo,
    ) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO peptide_bioactivity_info
            (peptide_id, bioactivity_id, original_value, value, other_info)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (peptide_id, bioactivity_id) DO UPDATE SET
                original_value = EXCLUDED.original_value,
                value = EXCLUDED.value,
                other_info = EXCLUDED.other_info
            "#,
        )
        .bind(info.peptide_id)
        .bind(info.bioactivity_id)
        .bind(&info.original_value)
        .bind(info.value)
        .bind(&info.other_info)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn bioactivities_for_peptide(
        &self,
        peptide_id: Uuid,
    ) -> CatalogResult<Vec<Bioactivity>> {
        let bioactivities = sqlx::query_as::<_, Bioactivity>(
            r#"
            SELECT b.bioactivity_id, b.name, b.target, b.effect, b.activity_type
            FROM bioactivities b
            JOIN peptide_bioactivity_info pbi ON pbi.bioactivity_id = b.bioactivity_id
            WHERE pbi.peptide_id = $1
            ORDER BY b.name
            "#,
        )
        .bind(peptide_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bioactivities)
    }

    // ============================================
    // Proteases and cleavages
    // ============================================

    pub async fn list_proteases(&self) -> CatalogResult<Vec<Protease>> {
        let proteases = sqlx::query_as::<_, Protease>(
            r#"
            SELECT protease_id, name, source, ec_number
            FROM proteases
            ORDER BY name, source
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(proteases)
    }

    pub async fn create_protease(
        &self,
        name: &str,
        source: &str,
        ec_number: Option<&str>,
    ) -> CatalogResult<Protease> {
        let protease = sqlx::query_as::<_, Protease>(
            r#"
            INSERT INTO proteases (protease_id, name, source, ec_number)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name, source) DO UPDATE SET ec_number = EXCLUDED.ec_number
            RETURNING protease_id, name, source, ec_number
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(source)
        .bind(ec_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(protease)
    }

    pub async fn create_cleavage(&self, cleavage: &NewCleavageReference) -> CatalogResult<Uuid> {
        let [p4, p3, p2, p1, p1p, p2p, p3p, p4p] = &cleavage.sites;

        let (cleavage_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO cleavage_references
            (cleavage_id, protease_id, reference_id, substrate_name, substrate_formula,
             uniprot_substrate, site_p4, site_p3, site_p2, site_p1,
             site_p1_prime, site_p2_prime, site_p3_prime, site_p4_prime)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING cleavage_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cleavage.protease_id)
        .bind(&cleavage.reference_id)
        .bind(&cleavage.substrate_name)
        .bind(&cleavage.substrate_formula)
        .bind(&cleavage.uniprot_substrate)
        .bind(p4)
        .bind(p3)
        .bind(p2)
        .bind(p1)
        .bind(p1p)
        .bind(p2p)
        .bind(p3p)
        .bind(p4p)
        .fetch_one(&self.pool)
        .await?;

        Ok(cleavage_id)
    }

    pub async fn cleavages_for_protease(
        &self,
        protease_id: Uuid,
    ) -> CatalogResult<Vec<CleavageReference>> {
        let cleavages = sqlx::query_as::<_, CleavageReference>(
            r#"
            SELECT cleavage_id, protease_id, reference_id, substrate_name, substrate_formula,
                   uniprot_substrate, site_p4, site_p3, site_p2, site_p1,
                   site_p1_prime, site_p2_prime, site_p3_prime, site_p4_prime
            FROM cleavage_references
            WHERE protease_id = $1
            ORDER BY substrate_name
            "#,
        )
        .bind(protease_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cleavages)
    }
}

//! Organism repository
//!
//! The organism table is the taxonomy store: the filter core operates on a
//! per-request snapshot fetched with `list_all`, which keeps every response
//! internally consistent (one read, one view of the data).

use sqlx::PgPool;

use crate::error::CatalogResult;
use crate::models::Organism;

#[derive(Clone)]
pub struct OrganismRepository {
    pool: PgPool,
}

impl OrganismRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Full organism snapshot, ordered by scientific name
    pub async fn list_all(&self) -> CatalogResult<Vec<Organism>> {
        let organisms = sqlx::query_as::<_, Organism>(
            r#"
            SELECT scientific_name, common_name, kingdom, phylum, class_name, ncbi_url
            FROM organisms
            ORDER BY scientific_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(organisms)
    }

    pub async fn get_by_name(&self, scientific_name: &str) -> CatalogResult<Option<Organism>> {
        let organism = sqlx::query_as::<_, Organism>(
            r#"
            SELECT scientific_name, common_name, kingdom, phylum, class_name, ncbi_url
            FROM organisms
            WHERE scientific_name = $1
            "#,
        )
        .bind(scientific_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organism)
    }

    /// Insert or refresh one organism record, keyed by scientific name
    pub async fn upsert(&self, organism: &Organism) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO organisms
            (scientific_name, common_name, kingdom, phylum, class_name, ncbi_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (scientific_name)
            DO UPDATE SET
                common_name = EXCLUDED.common_name,
                kingdom = EXCLUDED.kingdom,
                phylum = EXCLUDED.phylum,
                class_name = EXCLUDED.class_name,
                ncbi_url = EXCLUDED.ncbi_url
            "#,
        )
        .bind(&organism.scientific_name)
        .bind(&organism.common_name)
        .bind(&organism.kingdom)
        .bind(&organism.phylum)
        .bind(&organism.class_name)
        .bind(&organism.ncbi_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count(&self) -> CatalogResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM organisms")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

//! Background protein ingest
//!
//! Importing an organism's reviewed proteins is slow (two paginated UniProt
//! passes plus inserts), so the web layer spawns [`IngestService::run`] on a
//! task and returns immediately with a task id. Progress lives in a shared
//! registry the progress endpoint polls; the job records failures there and
//! never panics the server.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::{NewProtein, OrganismRepository, ProteinRepository};
use crate::error::{CatalogError, CatalogResult};
use crate::services::uniprot::ProteinMetadataSource;

/// Thread-safe in-memory progress registry, keyed by task id
pub type IngestRegistry = Arc<RwLock<HashMap<Uuid, IngestStatus>>>;

/// Create a new ingest registry
pub fn create_ingest_registry() -> IngestRegistry {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Stages an ingest task moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    Validating,
    FetchingAccessions,
    FetchingMetadata,
    Inserting,
    Complete,
    Failed,
}

impl IngestStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, IngestStage::Complete | IngestStage::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            IngestStage::Validating => "Validating organism",
            IngestStage::FetchingAccessions => "Fetching protein accessions",
            IngestStage::FetchingMetadata => "Fetching protein metadata",
            IngestStage::Inserting => "Adding proteins to the catalog",
            IngestStage::Complete => "Task completed",
            IngestStage::Failed => "Task failed",
        }
    }
}

/// Current state of one ingest task
#[derive(Debug, Clone, Serialize)]
pub struct IngestStatus {
    pub stage: IngestStage,
    pub detail: String,
    pub created: usize,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl IngestStatus {
    pub fn stage(stage: IngestStage) -> Self {
        Self {
            stage,
            detail: stage.label().to_string(),
            created: 0,
            skipped: 0,
            warnings: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: IngestStage::Failed,
            detail: message.into(),
            created: 0,
            skipped: 0,
            warnings: Vec::new(),
        }
    }
}

/// Imports one organism's reviewed proteins from a metadata source
pub struct IngestService<S> {
    organisms: OrganismRepository,
    proteins: ProteinRepository,
    source: S,
    registry: IngestRegistry,
}

impl<S: ProteinMetadataSource> IngestService<S> {
    pub fn new(
        organisms: OrganismRepository,
        proteins: ProteinRepository,
        source: S,
        registry: IngestRegistry,
    ) -> Self {
        Self {
            organisms,
            proteins,
            source,
            registry,
        }
    }

    /// Run the full ingest, recording progress and the terminal state in the
    /// registry. Errors end up as a `Failed` status, not a return value.
    pub async fn run(&self, task_id: Uuid, organism_name: &str) {
        if let Err(e) = self.run_inner(task_id, organism_name).await {
            tracing::error!(%task_id, organism = organism_name, error = %e, "ingest failed");
            self.set_status(task_id, IngestStatus::failed(e.to_string()))
                .await;
        }
    }

    async fn run_inner(&self, task_id: Uuid, organism_name: &str) -> CatalogResult<()> {
        self.set_status(task_id, IngestStatus::stage(IngestStage::Validating))
            .await;
        let organism = self
            .organisms
            .get_by_name(organism_name)
            .await?
            .ok_or_else(|| CatalogError::UnknownOrganism {
                name: organism_name.to_string(),
            })?;

        self.set_status(task_id, IngestStatus::stage(IngestStage::FetchingAccessions))
            .await;
        let accessions = self
            .source
            .reviewed_accessions(&organism.scientific_name)
            .await?;
        tracing::info!(
            organism = %organism.scientific_name,
            count = accessions.len(),
            "fetched reviewed accessions"
        );

        self.set_status(task_id, IngestStatus::stage(IngestStage::FetchingMetadata))
            .await;
        let metadata = self.source.fetch_metadata(&accessions).await?;

        self.set_status(task_id, IngestStatus::stage(IngestStage::Inserting))
            .await;
        let mut created = 0usize;
        let mut skipped = 0usize;
        let mut warnings = Vec::new();

        for meta in &metadata {
            let Some(sequence) = meta.sequence.as_deref() else {
                warnings.push(format!("{}: no sequence in UniProt entry", meta.accession));
                skipped += 1;
                continue;
            };

            let sequence_id = self
                .proteins
                .get_or_create_sequence(
                    sequence,
                    Some(organism.scientific_name.as_str()),
                    Some(meta.accession.as_str()),
                )
                .await?;

            let inserted = self
                .proteins
                .insert_protein(&NewProtein {
                    sequence_id,
                    protein_name: meta.protein_name.clone(),
                    gene_name: meta.gene_name.clone(),
                    protein_function: meta.protein_function.clone(),
                    organism_name: Some(organism.scientific_name.clone()),
                    uniprot_code: Some(meta.accession.clone()),
                })
                .await?;

            match inserted {
                Some(_) => created += 1,
                None => skipped += 1,
            }
        }

        tracing::info!(
            %task_id,
            organism = %organism.scientific_name,
            created,
            skipped,
            "ingest complete"
        );
        self.set_status(
            task_id,
            IngestStatus {
                stage: IngestStage::Complete,
                detail: format!("Imported {} proteins ({} skipped)", created, skipped),
                created,
                skipped,
                warnings,
            },
        )
        .await;

        Ok(())
    }

    async fn set_status(&self, task_id: Uuid, status: IngestStatus) {
        let mut registry = self.registry.write().await;
        registry.insert(task_id, status);
    }
}

/// Look up a task's status; unknown ids read as "not started"
pub async fn status_of(registry: &IngestRegistry, task_id: Uuid) -> Option<IngestStatus> {
    registry.read().await.get(&task_id).cloned()
}

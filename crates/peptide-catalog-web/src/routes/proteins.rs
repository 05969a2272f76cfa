//! Protein listing and UniProt ingest
//!
//! The listing filters in SQL through `ProteinRepository`; the organism
//! widget is an option set with per-organism protein counts. Ingest is a
//! background task: the POST returns the progress partial immediately and
//! the client polls `/progress/:task_id` until the task reaches a terminal
//! stage.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::Html,
    Form,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use peptide_catalog::database::{OrganismRepository, ProteinFilter, ProteinRepository};
use peptide_catalog::filter::decode_param;
use peptide_catalog::models::{sequence_preview, ProteinRow};
use peptide_catalog::services::ingest::status_of;
use peptide_catalog::services::{IngestService, IngestStage, IngestStatus, UniprotClient};

use crate::render::page_context;
use crate::routes::wants_partial;
use crate::state::AppState;

const SEQ_PREVIEW_LENGTH: usize = 30;

pub async fn protein_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Html<String>, StatusCode> {
    let query_string = raw.unwrap_or_default();
    let filter = ProteinFilter {
        query: decode_param(&query_string, "query"),
        organism: decode_param(&query_string, "organism"),
    };
    let page_number = decode_param(&query_string, "page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1);

    let repo = ProteinRepository::new(state.pool.clone());
    let page = repo
        .search_page(&filter, page_number, state.config.page_size)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "protein search failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let organism_options = repo.organism_options().await.map_err(|e| {
        tracing::error!(error = %e, "organism option query failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut context = json!({
        "page": page_context(&page),
        "rows": page.items.iter().map(row_context).collect::<Vec<_>>(),
        "query": filter.query,
        "selected_organism": filter.organism,
        "filter_data": {
            "selection": { "organism": filter.organism, "query": filter.query },
            "options": [{ "dimension": "organism", "options": organism_options }],
        },
    });

    let template = if wants_partial(&headers) {
        "protein_results"
    } else {
        // The full page also carries the ingest form, which offers every
        // organism in the catalog, not just those that already have proteins.
        let organisms = OrganismRepository::new(state.pool.clone())
            .list_all()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to list organisms for ingest form");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
        context["all_organisms"] = json!(organisms);
        "protein_list"
    };

    state.templates.render(template, &context).map(Html).map_err(|e| {
        tracing::error!(template, error = %e, "template render failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn row_context(row: &ProteinRow) -> serde_json::Value {
    json!({
        "protein_id": row.protein_id,
        "protein_name": row.protein_name.as_deref().unwrap_or("Unnamed protein"),
        "gene_name": row.gene_name.as_deref().unwrap_or("—"),
        "protein_function": row.protein_function,
        "uniprot_code": row.uniprot_code,
        "organism_name": row.organism_name,
        "seq_preview": sequence_preview(&row.aa_seq, SEQ_PREVIEW_LENGTH),
        "seq_length": row.aa_seq.len(),
    })
}

#[derive(Debug, Deserialize)]
pub struct IngestForm {
    pub organism: String,
}

pub async fn start_ingest(
    State(state): State<AppState>,
    Form(form): Form<IngestForm>,
) -> Result<Html<String>, StatusCode> {
    let organism = form.organism.trim().to_string();
    if organism.is_empty() {
        let context = json!({ "error": "Please select an organism." });
        return state
            .templates
            .render("task_progress", &context)
            .map(Html)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR);
    }

    let client = UniprotClient::new(state.config.uniprot_base_url.clone()).map_err(|e| {
        tracing::error!(error = %e, "failed to build UniProt client");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let task_id = Uuid::new_v4();
    {
        let mut registry = state.ingest.write().await;
        registry.insert(task_id, IngestStatus::stage(IngestStage::Validating));
    }

    let service = IngestService::new(
        OrganismRepository::new(state.pool.clone()),
        ProteinRepository::new(state.pool.clone()),
        client,
        Arc::clone(&state.ingest),
    );
    let spawn_organism = organism.clone();
    tokio::spawn(async move {
        service.run(task_id, &spawn_organism).await;
    });
    tracing::info!(%task_id, organism, "ingest task started");

    let context = json!({ "task_id": task_id, "organism": organism });
    state
        .templates
        .render("task_progress", &context)
        .map(Html)
        .map_err(|e| {
            tracing::error!(error = %e, "template render failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

pub async fn ingest_progress(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Html<String>, StatusCode> {
    let status = status_of(&state.ingest, task_id).await;

    let context = match status {
        Some(status) => json!({
            "detail": status.detail,
            "stage": status.stage,
            "terminal": status.stage.is_terminal(),
            "created": status.created,
            "skipped": status.skipped,
            "warnings": status.warnings,
        }),
        None => json!({
            "detail": "Not started",
            "terminal": false,
            "warnings": [],
        }),
    };

    state
        .templates
        .render("progress_status", &context)
        .map(Html)
        .map_err(|e| {
            tracing::error!(error = %e, "template render failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_preview_matches_model_behavior() {
        assert_eq!(sequence_preview("MKTAYIAK", 30), "MKTAYIAK");
        assert_eq!(
            sequence_preview("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789", 11),
            "ABCD...6789"
        );
    }
}

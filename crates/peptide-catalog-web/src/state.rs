//! Shared application state
//!
//! One `AppState` for every route: the connection pool, the compiled
//! template registry, the ingest progress registry and the runtime settings.

use std::sync::Arc;

use sqlx::PgPool;

use peptide_catalog::services::IngestRegistry;
use peptide_catalog::CatalogConfig;

use crate::render::TemplateRegistry;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub templates: Arc<TemplateRegistry>,
    pub ingest: IngestRegistry,
    pub config: CatalogConfig,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        templates: Arc<TemplateRegistry>,
        ingest: IngestRegistry,
        config: CatalogConfig,
    ) -> Self {
        Self {
            pool,
            templates,
            ingest,
            config,
        }
    }
}

use metrics_exporter_prometheus::PrometheusHandle;
use scheme_advisor::config::RecommendationConfig;
use scheme_advisor::error::AppError;
use scheme_advisor::recommendation::{ProcessScorer, RecommendationService, SchemeCatalog};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type AdvisorService = RecommendationService<ProcessScorer>;

/// Loads the catalog once and wires the process-backed scorer into the orchestrator.
pub(crate) fn build_service(config: &RecommendationConfig) -> Result<Arc<AdvisorService>, AppError> {
    let catalog = SchemeCatalog::load(config.catalog_path.as_deref())?;
    info!(
        schemes = catalog.len(),
        source = config
            .catalog_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "standard".to_string()),
        "scheme catalog loaded"
    );

    let scorer = Arc::new(ProcessScorer::from_config(&config.scorer));
    Ok(Arc::new(RecommendationService::new(
        scorer,
        Arc::new(catalog),
        config,
    )))
}

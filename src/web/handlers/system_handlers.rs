// src/web/handlers/system_handlers.rs
use crate::analysis::JobAnalyzer;

use rocket::serde::json::Json;
use rocket::State;
use tracing::debug;

pub async fn health_handler(analyzer: &State<JobAnalyzer>) -> Json<&'static str> {
    debug!(
        "Health check (classifier: {}, explainer enabled: {})",
        analyzer.classifier_name(),
        analyzer.explainer_enabled()
    );
    Json("OK")
}

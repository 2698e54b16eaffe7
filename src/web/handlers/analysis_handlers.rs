// src/web/handlers/analysis_handlers.rs
use crate::analysis::{AnalysisReport, AnalysisRequest, JobAnalyzer};
use crate::web::render::{self, MISSING_FIELDS_WARNING};
use crate::web::types::{
    AnalyzeForm, DataResponse, StandardErrorResponse, StandardRequest, WithConversationId,
};

use rocket::form::Form;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn index_handler() -> RawHtml<String> {
    RawHtml(render::form_page(&AnalyzeForm::default(), None))
}

pub async fn analyze_form_handler(
    form: Form<AnalyzeForm>,
    analyzer: &State<JobAnalyzer>,
) -> (Status, RawHtml<String>) {
    let form = form.into_inner();
    let request = AnalysisRequest::from(&form);

    if let Err(missing) = request.validate() {
        warn!("Form submission missing fields: {}", missing.join(", "));
        return (
            Status::UnprocessableEntity,
            RawHtml(render::form_page(&form, Some(MISSING_FIELDS_WARNING))),
        );
    }

    let report = analyzer.analyze(&request).await;
    (Status::Ok, RawHtml(render::report_page(&form, &report)))
}

pub async fn analyze_api_handler(
    request: Json<StandardRequest<AnalysisRequest>>,
    analyzer: &State<JobAnalyzer>,
) -> Result<Json<DataResponse<AnalysisReport>>, Custom<Json<StandardErrorResponse>>> {
    let conversation_id = request.conversation_id();
    let request = request.into_inner().data;

    if let Err(missing) = request.validate() {
        warn!("API request missing fields: {}", missing.join(", "));
        return Err(Custom(
            Status::UnprocessableEntity,
            Json(StandardErrorResponse::new(
                MISSING_FIELDS_WARNING.to_string(),
                "VALIDATION_ERROR".to_string(),
                missing
                    .iter()
                    .map(|field| format!("Provide a non-empty '{}'", field))
                    .collect(),
                conversation_id,
            )),
        ));
    }

    info!(
        "API analysis requested for {} at {}",
        request.job_title, request.company_name
    );
    let report = analyzer.analyze(&request).await;

    Ok(Json(DataResponse::success(
        format!(
            "{} posting at {} classified as {}",
            report.job_title, report.company_name, report.prediction.label
        ),
        report,
        conversation_id,
    )))
}

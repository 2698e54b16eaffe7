// src/web/mod.rs

pub mod handlers;
pub mod render;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::analysis::{AnalysisReport, AnalysisRequest, JobAnalyzer};
use crate::core::ConfigManager;
use anyhow::{anyhow, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "POST, GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[get("/")]
pub async fn index() -> RawHtml<String> {
    handlers::index_handler().await
}

#[post("/analyze", data = "<form>")]
pub async fn analyze_form(
    form: Form<AnalyzeForm>,
    analyzer: &State<JobAnalyzer>,
) -> (Status, RawHtml<String>) {
    handlers::analyze_form_handler(form, analyzer).await
}

#[post("/api/analyze", data = "<request>")]
pub async fn analyze_api(
    request: Json<StandardRequest<AnalysisRequest>>,
    analyzer: &State<JobAnalyzer>,
) -> Result<Json<DataResponse<AnalysisReport>>, Custom<Json<StandardErrorResponse>>> {
    handlers::analyze_api_handler(request, analyzer).await
}

#[get("/api/health")]
pub async fn health(analyzer: &State<JobAnalyzer>) -> Json<&'static str> {
    handlers::health_handler(analyzer).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {}", request.uri()),
        "NOT_FOUND".to_string(),
        vec!["Use GET / for the form or POST /api/analyze for JSON".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "VALIDATION_ERROR".to_string(),
        vec![
            "Send company_name, job_title and job_description as strings".to_string(),
            "Optional fields must be strings when present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

fn mount(rocket: Rocket<Build>, analyzer: JobAnalyzer) -> Rocket<Build> {
    rocket
        .attach(Cors)
        .manage(analyzer)
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable_entity, internal_error],
        )
        .mount(
            "/",
            routes![index, analyze_form, analyze_api, health, options],
        )
}

/// Rocket instance with default figment; used by tests and embedders
pub fn build_rocket(analyzer: JobAnalyzer) -> Rocket<Build> {
    mount(rocket::build(), analyzer)
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    let analyzer = JobAnalyzer::new(&config)?;

    info!("Starting Job Legitimacy Checker on http://0.0.0.0:{}", port);
    info!("Classifier: {}", analyzer.classifier_name());
    if analyzer.explainer_enabled() {
        info!("Narrative explanations enabled ({})", config.explainer.model);
    } else {
        info!("GEMINI_API_KEY not set, narrative explanations disabled");
    }

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let _rocket = mount(rocket::custom(figment), analyzer)
        .launch()
        .await
        .map_err(|e| anyhow!("Web server failed: {}", e))?;

    Ok(())
}

use httpmock::prelude::*;
use job_checker::analysis::classifier::GaussianNaiveBayes;
use job_checker::analysis::{JobAnalyzer, PresenceProber, Rules};
use job_checker::build_rocket;
use job_checker::core::ServiceConfig;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

async fn client(server: &MockServer) -> Client {
    let prober = PresenceProber::new(&ServiceConfig {
        search_url: server.url("/search"),
        timeout_seconds: 5,
        retry_delay_ms: 0,
        settle_delay_ms: 0,
    })
    .unwrap();
    let analyzer = JobAnalyzer::from_parts(
        prober,
        &Rules::default(),
        Box::new(GaussianNaiveBayes::trained()),
        None,
    )
    .unwrap();

    Client::tracked(build_rocket(analyzer)).await.unwrap()
}

#[tokio::test]
async fn test_index_renders_form() {
    let server = MockServer::start_async().await;
    let client = client(&server).await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );

    let body = response.into_string().await.unwrap();
    assert!(body.contains("Job Legitimacy Checker"));
    assert!(body.contains(r#"name="company_name""#));
    assert!(!body.contains("Please fill in all required fields."));
}

#[tokio::test]
async fn test_form_with_missing_fields_warns_without_checking() {
    let server = MockServer::start_async().await;
    let searches = server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).body("<html></html>");
        })
        .await;
    let client = client(&server).await;

    let response = client
        .post("/analyze")
        .header(ContentType::Form)
        .body("company_name=Acme&job_title=&job_description=Build+things")
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response.into_string().await.unwrap();
    assert!(body.contains("Please fill in all required fields."));
    assert!(body.contains(r#"value="Acme""#));
    assert!(!body.contains("Analysis Results"));
    assert_eq!(searches.hits_async().await, 0);
}

#[tokio::test]
async fn test_form_submission_renders_report() {
    let server = MockServer::start_async().await;
    let client = client(&server).await;

    let response = client
        .post("/analyze")
        .header(ContentType::Form)
        .body(
            "company_name=%3Cb%3EShady%3C%2Fb%3E+Co&job_title=Agent\
             &job_description=Guaranteed+income%2C+wire+transfer+required\
             &job_url=https%3A%2F%2Fwww.indeed.com%2Fjob1",
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body = response.into_string().await.unwrap();
    assert!(body.contains("Analysis Results"));
    assert!(body.contains("Suspicious"));
    assert!(body.contains("&lt;b&gt;Shady&lt;/b&gt; Co"));
    assert!(!body.contains("<b>Shady</b>"));
    assert!(body.contains("Warning: Job posting mentions &#39;wire transfer&#39;"));
    assert!(body.contains("❌ Failed"));
}

#[tokio::test]
async fn test_api_analyze_returns_report() {
    let server = MockServer::start_async().await;
    let client = client(&server).await;

    let response = client
        .post("/api/analyze")
        .header(ContentType::JSON)
        .body(
            json!({
                "company_name": "Acme",
                "job_title": "Engineer",
                "job_description": "Guaranteed income, wire transfer required, no interview required",
                "conversation_id": "conv-42"
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["type"], "data");
    assert_eq!(body["success"], true);
    assert_eq!(body["conversation_id"], "conv-42");
    assert_eq!(body["data"]["prediction"]["label"], "Suspicious");
    assert_eq!(body["data"]["description_analysis"]["red_flag_count"], 3);
    assert_eq!(body["data"]["checks"]["X_presence"], false);
    assert!(body["data"]["url_assessment"].is_null());
}

#[tokio::test]
async fn test_api_analyze_rejects_blank_fields() {
    let server = MockServer::start_async().await;
    let client = client(&server).await;

    let response = client
        .post("/api/analyze")
        .header(ContentType::JSON)
        .body(json!({ "company_name": "Acme", "job_title": " ", "job_description": "" }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_api_analyze_malformed_json_hits_catcher() {
    let server = MockServer::start_async().await;
    let client = client(&server).await;

    let response = client
        .post("/api/analyze")
        .header(ContentType::JSON)
        .body(json!({ "company_name": 7 }).to_string())
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let server = MockServer::start_async().await;
    let client = client(&server).await;

    let response = client.get("/api/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_string().await.unwrap(), "\"OK\"");

    let response = client.get("/nope").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "NOT_FOUND");

    let response = client.options("/api/analyze").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
}

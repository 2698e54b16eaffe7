// src/analysis/explainer.rs
use super::classifier::Label;
use super::heuristics::DescriptionAnalysis;
use super::url_validator::UrlAssessment;
use super::AnalysisRequest;
use crate::core::config_manager::ExplainerConfig;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

const DEFAULT_CONFIDENCE: u8 = 50;

static PREDICTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Prediction:\s*(Legitimate|Suspicious)").expect("valid regex")
});
static CONFIDENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Confidence:\s*(\d+)%").expect("valid regex"));

#[derive(Debug, Error)]
pub enum ExplainerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no text")]
    EmptyReply,

    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeLabel {
    Legitimate,
    Suspicious,
    Unknown,
}

impl NarrativeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeLabel::Legitimate => "Legitimate",
            NarrativeLabel::Suspicious => "Suspicious",
            NarrativeLabel::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    pub label: NarrativeLabel,
    pub confidence_percent: u8,
    pub text: String,
}

impl Narrative {
    /// Recover the label and confidence lines, defaulting to Unknown / 50%
    pub fn parse(reply: &str) -> Self {
        let label = PREDICTION_LINE
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| match m.as_str().to_lowercase().as_str() {
                "legitimate" => NarrativeLabel::Legitimate,
                _ => NarrativeLabel::Suspicious,
            })
            .unwrap_or(NarrativeLabel::Unknown);

        let confidence_percent = CONFIDENCE_LINE
            .captures(reply)
            .and_then(|caps| caps.get(1))
            // Digits only, so a parse failure means overflow
            .map(|m| m.as_str().parse::<u64>().map_or(100, |c| c.min(100)) as u8)
            .unwrap_or(DEFAULT_CONFIDENCE);

        Self {
            label,
            confidence_percent,
            text: reply.trim().to_string(),
        }
    }
}

/// Everything the prompt embeds about one analysis
pub struct ExplanationContext<'a> {
    pub request: &'a AnalysisRequest,
    pub url_assessment: Option<&'a UrlAssessment>,
    pub description_analysis: &'a DescriptionAnalysis,
    pub model_label: Label,
}

pub fn build_prompt(ctx: &ExplanationContext<'_>) -> String {
    let job_url = ctx.request.job_url().unwrap_or("Not provided");
    let (url_valid, verified_board) = match ctx.url_assessment {
        Some(a) => (a.is_valid.to_string(), a.on_verified_job_board.to_string()),
        None => ("Not provided".to_string(), "Not provided".to_string()),
    };

    format!(
        r#"Carefully analyze this job posting for legitimacy:

Job Details:
- Job Title: {title}
- Company: {company}
- Job URL: {job_url}

Technical Verification:
- URL Validation: {url_valid}
- Verified Job Board: {verified_board}

Risk Indicators:
- Red Flags Detected: {red_flags}
- Suspicious Patterns: {patterns}
- Calculated Risk Score: {risk_score}

Machine Learning Prediction: {model_label}

Comprehensive Analysis Request:
1. Provide a detailed assessment of the job posting's legitimacy.
2. Explain the reasoning behind your assessment.
3. Generate a confidence percentage (0-100%) based on the strength of evidence.
4. Highlight specific red flags or positive indicators.
5. Recommend actions for the job seeker.

Output Format:
Prediction: [Legitimate/Suspicious]
Confidence: [XX%]
Explanation: [Your detailed reasoning here]

Your response should be Accurate, Clear, Concise and straight to the point.
Your tone should be friendly but professional.
"#,
        title = ctx.request.job_title,
        company = ctx.request.company_name,
        job_url = job_url,
        url_valid = url_valid,
        verified_board = verified_board,
        red_flags = ctx.description_analysis.red_flag_count,
        patterns = ctx.description_analysis.suspicious_pattern_count,
        risk_score = ctx.description_analysis.risk_score,
        model_label = ctx.model_label,
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the hosted generative model that writes the narrative explanation
pub struct NarrativeExplainer {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl NarrativeExplainer {
    /// None when no API key is configured
    pub fn from_config(config: &ExplainerConfig) -> Result<Option<Self>, ExplainerError> {
        let Some(api_key) = config.api_key.clone() else {
            info!("No GEMINI_API_KEY configured, narrative explanations disabled");
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Some(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }))
    }

    pub async fn explain(&self, ctx: &ExplanationContext<'_>) -> Result<Narrative, ExplainerError> {
        let prompt = build_prompt(ctx);
        let reply = self.generate(&prompt).await?;
        Ok(Narrative::parse(&reply))
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ExplainerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        info!("Requesting narrative from model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            error!("Generative model API error {}: {}", status, message);
            return Err(ExplainerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let generated: GenerateResponse = serde_json::from_str(&body)?;
        generated.text().ok_or(ExplainerError::EmptyReply)
    }
}

// src/web/types.rs
use crate::analysis::AnalysisRequest;
use crate::utils::{clean_text, non_empty};
use rocket::form::FromForm;
use rocket::serde::{Deserialize, Serialize};

/// Fields of the HTML input form; every field is optional at the form level so
/// blank submissions reach validation instead of failing to parse
#[derive(Debug, Clone, Default, FromForm)]
pub struct AnalyzeForm {
    #[field(default = String::new())]
    pub company_name: String,
    #[field(default = String::new())]
    pub job_title: String,
    #[field(default = String::new())]
    pub job_description: String,
    #[field(default = String::new())]
    pub job_url: String,
    #[field(default = String::new())]
    pub company_profile: String,
    #[field(default = String::new())]
    pub requirements: String,
    #[field(default = String::new())]
    pub benefits: String,
    #[field(default = String::new())]
    pub country: String,
}

impl From<&AnalyzeForm> for AnalysisRequest {
    fn from(form: &AnalyzeForm) -> Self {
        AnalysisRequest {
            company_name: clean_text(&form.company_name),
            job_title: clean_text(&form.job_title),
            job_description: form.job_description.clone(),
            job_url: non_empty(Some(form.job_url.clone())),
            company_profile: non_empty(Some(form.company_profile.clone())),
            requirements: non_empty(Some(form.requirements.clone())),
            benefits: non_empty(Some(form.benefits.clone())),
            country: non_empty(Some(form.country.clone())),
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Error,
}

// Request types with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// Helper trait for extracting conversation_id
pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

// Helper functions to create standard responses
impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}

// src/analysis/mod.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod classifier;
pub mod explainer;
pub mod heuristics;
pub mod job_analyzer;
pub mod presence_prober;
pub mod rules;
pub mod types;
pub mod url_validator;

pub use classifier::{Classifier, ClassifierKind, FeatureVector, Label, Prediction};
pub use explainer::{Narrative, NarrativeExplainer, NarrativeLabel};
pub use heuristics::{DescriptionAnalysis, TextHeuristics};
pub use job_analyzer::JobAnalyzer;
pub use presence_prober::PresenceProber;
pub use rules::Rules;
pub use types::{CheckValue, CompanyChecks, RegistrationStatus, RiskFactor};
pub use url_validator::{UrlAssessment, UrlValidator};

pub const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub company_profile: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl AnalysisRequest {
    /// Names of required fields that are empty or whitespace-only
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("company_name", &self.company_name),
            ("job_title", &self.job_title),
            ("job_description", &self.job_description),
        ];

        required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    pub fn country(&self) -> &str {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY)
    }

    pub fn job_url(&self) -> Option<&str> {
        self.job_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// The free-text fields fed to the text model, in a fixed order
    pub fn text_fields(&self) -> [&str; 5] {
        [
            self.job_title.as_str(),
            self.company_profile.as_deref().unwrap_or(""),
            self.job_description.as_str(),
            self.requirements.as_deref().unwrap_or(""),
            self.benefits.as_deref().unwrap_or(""),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub company_name: String,
    pub job_title: String,
    pub checks: CompanyChecks,
    pub description_analysis: DescriptionAnalysis,
    pub url_assessment: Option<UrlAssessment>,
    pub features: FeatureVector,
    pub prediction: Prediction,
    pub risk_factors: Vec<RiskFactor>,
    pub narrative: Option<Narrative>,
    pub narrative_error: Option<String>,
}

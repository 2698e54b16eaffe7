// src/analysis/classifier/mod.rs
//! Legitimate/Suspicious classifiers behind a single predict interface

use super::types::CompanyChecks;
use super::AnalysisRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub mod naive_bayes;
mod stopwords;
pub mod text_model;

pub use naive_bayes::GaussianNaiveBayes;
pub use text_model::TextModel;

pub const FEATURE_COUNT: usize = 6;

const ADDRESS_KEYWORDS: [&str; 3] = ["address", "location", "office"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Legitimate,
    Suspicious,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Legitimate => "Legitimate",
            Label::Suspicious => "Suspicious",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the predicted label, within [0, 1]
    pub confidence: f64,
    pub model: String,
}

impl Prediction {
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// `[linkedin, x, has_rating, registered, email_in_description, address_in_description]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_checks(checks: &CompanyChecks, description: &str) -> Self {
        let description_lower = description.to_lowercase();
        let has_email = description.contains('@');
        let has_address = ADDRESS_KEYWORDS
            .iter()
            .any(|keyword| description_lower.contains(keyword));

        Self([
            flag(checks.linkedin_presence),
            flag(checks.x_presence),
            flag(checks.glassdoor_rating.is_some()),
            flag(checks.government_registration.is_registered()),
            flag(has_email),
            flag(has_address),
        ])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn predict(&self, features: &FeatureVector, request: &AnalysisRequest) -> Prediction;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    NaiveBayes,
    Tfidf,
}

impl FromStr for ClassifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "naive_bayes" | "naive-bayes" | "nb" => Ok(ClassifierKind::NaiveBayes),
            "tfidf" | "tf-idf" | "text" => Ok(ClassifierKind::Tfidf),
            other => anyhow::bail!("Unknown classifier: {}. Use naive_bayes or tfidf", other),
        }
    }
}

/// Build the configured classifier; the text model degrades to its untrained fallback
pub fn build_classifier(kind: ClassifierKind, model_dir: &Path) -> Box<dyn Classifier> {
    let classifier: Box<dyn Classifier> = match kind {
        ClassifierKind::NaiveBayes => Box::new(GaussianNaiveBayes::trained()),
        ClassifierKind::Tfidf => Box::new(TextModel::load_or_fallback(model_dir)),
    };
    info!("Using classifier: {}", classifier.name());
    classifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::RegistrationStatus;

    fn checks() -> CompanyChecks {
        CompanyChecks {
            linkedin_presence: true,
            x_presence: false,
            glassdoor_rating: Some(3.9),
            government_registration: RegistrationStatus::CheckFailed,
        }
    }

    #[test]
    fn test_feature_vector_from_checks() {
        let features = FeatureVector::from_checks(
            &checks(),
            "Contact hr@acme.com. Our OFFICE is downtown.",
        );
        assert_eq!(features.values(), &[1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_feature_vector_without_contact_details() {
        let features = FeatureVector::from_checks(&checks(), "Remote role, apply now");
        assert_eq!(features.values()[4], 0.0);
        assert_eq!(features.values()[5], 0.0);
    }

    #[test]
    fn test_classifier_kind_parsing() {
        assert_eq!(
            "naive_bayes".parse::<ClassifierKind>().unwrap(),
            ClassifierKind::NaiveBayes
        );
        assert_eq!("TF-IDF".parse::<ClassifierKind>().unwrap(), ClassifierKind::Tfidf);
        assert!("forest".parse::<ClassifierKind>().is_err());
    }

    #[test]
    fn test_confidence_percent_rounds_and_clamps() {
        let prediction = Prediction {
            label: Label::Legitimate,
            confidence: 0.876,
            model: "test".to_string(),
        };
        assert_eq!(prediction.confidence_percent(), 88);

        let prediction = Prediction {
            confidence: 1.7,
            ..prediction
        };
        assert_eq!(prediction.confidence_percent(), 100);
    }

    #[test]
    fn test_build_classifier_never_fails() {
        let dir = tempfile::tempdir().unwrap();
        let nb = build_classifier(ClassifierKind::NaiveBayes, dir.path());
        let text = build_classifier(ClassifierKind::Tfidf, dir.path());
        assert_eq!(nb.name(), "gaussian_naive_bayes");
        assert_eq!(text.name(), "tfidf_logistic_regression");
    }
}

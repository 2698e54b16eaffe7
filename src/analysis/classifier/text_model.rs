// src/analysis/classifier/text_model.rs
//! TF-IDF vectorizer + logistic regression over the concatenated posting text.
//!
//! Artifacts live in the model directory as `tfidf_vectorizer.json`
//! (`vocabulary`, `idf`) and `model.json` (`coef`, `intercept`). When they are
//! missing or inconsistent the model falls back to an untrained pipeline that
//! always answers `Suspicious` at 0.5.

use super::stopwords;
use super::{Classifier, FeatureVector, Label, Prediction};
use crate::analysis::AnalysisRequest;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{info, warn};

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const MODEL_FILE: &str = "model.json";

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact shapes disagree: {vocabulary} terms, {idf} idf weights, {coef} coefficients")]
    Shape {
        vocabulary: usize,
        idf: usize,
        coef: usize,
    },

    #[error("vocabulary index {index} is out of range for {size} features")]
    IndexOutOfRange { index: usize, size: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Sparse, L2-normalized tf-idf weights for a document
    pub fn transform(&self, document: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in TOKEN.find_iter(&document.to_lowercase()) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in weights.iter_mut() {
                *w /= norm;
            }
        }
        weights.sort_by_key(|(index, _)| *index);
        weights
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn decision_function(&self, features: &[(usize, f64)]) -> f64 {
        features
            .iter()
            .map(|(index, value)| self.coef[*index] * value)
            .sum::<f64>()
            + self.intercept
    }
}

#[derive(Debug, Clone)]
struct Pipeline {
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
}

#[derive(Debug, Clone)]
pub struct TextModel {
    pipeline: Option<Pipeline>,
}

impl TextModel {
    pub fn load(model_dir: &Path) -> Result<Self, ModelError> {
        let vectorizer: TfidfVectorizer = read_artifact(&model_dir.join(VECTORIZER_FILE))?;
        let model: LogisticRegression = read_artifact(&model_dir.join(MODEL_FILE))?;
        Self::from_parts(vectorizer, model)
    }

    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: LogisticRegression,
    ) -> Result<Self, ModelError> {
        let size = vectorizer.idf.len();
        if model.coef.len() != size || vectorizer.vocabulary.len() > size {
            return Err(ModelError::Shape {
                vocabulary: vectorizer.vocabulary.len(),
                idf: size,
                coef: model.coef.len(),
            });
        }
        if let Some(&index) = vectorizer.vocabulary.values().find(|&&i| i >= size) {
            return Err(ModelError::IndexOutOfRange { index, size });
        }

        Ok(Self {
            pipeline: Some(Pipeline { vectorizer, model }),
        })
    }

    pub fn untrained() -> Self {
        Self { pipeline: None }
    }

    /// Load artifacts, substituting the untrained pipeline on any failure
    pub fn load_or_fallback(model_dir: &Path) -> Self {
        match Self::load(model_dir) {
            Ok(model) => {
                info!("Loaded text model artifacts from {}", model_dir.display());
                model
            }
            Err(e) => {
                warn!("Text model unavailable ({}), using untrained fallback", e);
                Self::untrained()
            }
        }
    }

    pub fn is_trained(&self) -> bool {
        self.pipeline.is_some()
    }
}

impl Classifier for TextModel {
    fn name(&self) -> &'static str {
        "tfidf_logistic_regression"
    }

    fn predict(&self, _features: &FeatureVector, request: &AnalysisRequest) -> Prediction {
        let Some(pipeline) = &self.pipeline else {
            return Prediction {
                label: Label::Suspicious,
                confidence: 0.5,
                model: format!("{} (untrained)", self.name()),
            };
        };

        let document = combine_fields(&request.text_fields());
        let features = pipeline.vectorizer.transform(&document);
        let decision = pipeline.model.decision_function(&features);
        let probability = 1.0 / (1.0 + (-decision).exp());

        let label = if decision > 0.0 {
            Label::Legitimate
        } else {
            Label::Suspicious
        };

        Prediction {
            label,
            confidence: probability.max(1.0 - probability),
            model: self.name().to_string(),
        }
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Lowercase, strip digits and punctuation, drop stop words
pub fn preprocess_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.to_lowercase();
    let text = DIGITS.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = NON_WORD.replace_all(&text, "");

    text.split_whitespace()
        .filter(|word| !stopwords::is_stopword(word))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn combine_fields(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| preprocess_text(field))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::FEATURE_COUNT;

    fn fitted() -> TextModel {
        let vocabulary: HashMap<String, usize> = [
            ("engineer", 0),
            ("benefits", 1),
            ("wire", 2),
            ("transfer", 3),
            ("guaranteed", 4),
        ]
        .into_iter()
        .map(|(term, index)| (term.to_string(), index))
        .collect();

        TextModel::from_parts(
            TfidfVectorizer {
                vocabulary,
                idf: vec![1.5, 1.2, 2.0, 2.0, 2.2],
            },
            LogisticRegression {
                coef: vec![1.8, 1.1, -2.5, -2.0, -2.4],
                intercept: 0.1,
            },
        )
        .unwrap()
    }

    fn request(description: &str) -> AnalysisRequest {
        AnalysisRequest {
            company_name: "Acme".to_string(),
            job_title: "Software Engineer".to_string(),
            job_description: description.to_string(),
            benefits: Some("Health benefits".to_string()),
            ..Default::default()
        }
    }

    fn no_features() -> FeatureVector {
        FeatureVector([0.0; FEATURE_COUNT])
    }

    #[test]
    fn test_preprocess_text() {
        assert_eq!(
            preprocess_text("We are hiring 3 Engineers!!  Apply   NOW, it's easy."),
            "hiring engineers apply easy"
        );
        assert_eq!(preprocess_text(""), "");
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let model = fitted();
        let pipeline = model.pipeline.as_ref().unwrap();
        let weights = pipeline.vectorizer.transform("engineer engineer benefits unknown");
        assert_eq!(weights.len(), 2);
        let norm: f64 = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(pipeline.vectorizer.transform("").is_empty());
    }

    #[test]
    fn test_trained_model_separates_postings() {
        let model = fitted();
        let legit = model.predict(&no_features(), &request("Join our platform team"));
        assert_eq!(legit.label, Label::Legitimate);

        let scam = model.predict(
            &no_features(),
            &AnalysisRequest {
                job_title: "Assistant".to_string(),
                benefits: None,
                ..request("Guaranteed pay, wire transfer the deposit first")
            },
        );
        assert_eq!(scam.label, Label::Suspicious);
        assert!(scam.confidence > 0.5 && scam.confidence <= 1.0);
    }

    #[test]
    fn test_missing_artifacts_fall_back_to_untrained() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TextModel::load(dir.path()),
            Err(ModelError::Io { .. })
        ));

        let model = TextModel::load_or_fallback(dir.path());
        assert!(!model.is_trained());

        let prediction = model.predict(&no_features(), &request("anything"));
        assert_eq!(prediction.label, Label::Suspicious);
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn test_artifacts_round_trip_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let model = fitted();
        let pipeline = model.pipeline.unwrap();
        std::fs::write(
            dir.path().join(VECTORIZER_FILE),
            serde_json::to_string(&pipeline.vectorizer).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(MODEL_FILE),
            serde_json::to_string(&pipeline.model).unwrap(),
        )
        .unwrap();

        let loaded = TextModel::load_or_fallback(dir.path());
        assert!(loaded.is_trained());
    }

    #[test]
    fn test_malformed_artifacts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VECTORIZER_FILE), "{not json").unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), "{}").unwrap();
        assert!(matches!(
            TextModel::load(dir.path()),
            Err(ModelError::Json { .. })
        ));
        assert!(!TextModel::load_or_fallback(dir.path()).is_trained());
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let result = TextModel::from_parts(
            TfidfVectorizer {
                vocabulary: HashMap::from([("engineer".to_string(), 0)]),
                idf: vec![1.0, 1.0],
            },
            LogisticRegression {
                coef: vec![1.0],
                intercept: 0.0,
            },
        );
        assert!(matches!(result, Err(ModelError::Shape { .. })));

        let result = TextModel::from_parts(
            TfidfVectorizer {
                vocabulary: HashMap::from([("engineer".to_string(), 5)]),
                idf: vec![1.0],
            },
            LogisticRegression {
                coef: vec![1.0],
                intercept: 0.0,
            },
        );
        assert!(matches!(result, Err(ModelError::IndexOutOfRange { .. })));
    }
}

// src/analysis/classifier/naive_bayes.rs
use super::{Classifier, FeatureVector, Label, Prediction, FEATURE_COUNT};
use crate::analysis::AnalysisRequest;
use std::f64::consts::PI;

const VAR_SMOOTHING: f64 = 1e-9;

/// Hand-authored presence profiles:
/// `[LinkedIn, X, Glassdoor, GovReg, ValidEmail, PhysicalAddress]`
const TRAINING_ROWS: [([f64; FEATURE_COUNT], Label); 9] = [
    ([1.0, 1.0, 1.0, 1.0, 1.0, 1.0], Label::Legitimate),
    ([1.0, 1.0, 1.0, 1.0, 1.0, 0.0], Label::Legitimate),
    ([1.0, 1.0, 0.0, 1.0, 1.0, 1.0], Label::Legitimate),
    ([1.0, 0.0, 1.0, 1.0, 1.0, 1.0], Label::Legitimate),
    ([0.0, 0.0, 0.0, 0.0, 0.0, 0.0], Label::Suspicious),
    ([0.0, 1.0, 0.0, 0.0, 0.0, 0.0], Label::Suspicious),
    ([0.0, 0.0, 0.0, 0.0, 1.0, 0.0], Label::Suspicious),
    ([1.0, 0.0, 0.0, 0.0, 0.0, 0.0], Label::Suspicious),
    ([0.0, 0.0, 0.0, 0.0, 0.0, 1.0], Label::Suspicious),
];

#[derive(Debug, Clone)]
struct ClassStats {
    label: Label,
    log_prior: f64,
    means: [f64; FEATURE_COUNT],
    variances: [f64; FEATURE_COUNT],
}

impl ClassStats {
    fn joint_log_likelihood(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut log_likelihood = self.log_prior;
        for i in 0..FEATURE_COUNT {
            let var = self.variances[i];
            let diff = x[i] - self.means[i];
            log_likelihood -= 0.5 * (2.0 * PI * var).ln();
            log_likelihood -= 0.5 * diff * diff / var;
        }
        log_likelihood
    }
}

/// Gaussian Naive Bayes over the presence feature vector
#[derive(Debug, Clone)]
pub struct GaussianNaiveBayes {
    classes: Vec<ClassStats>,
}

impl GaussianNaiveBayes {
    /// Model fitted on the built-in training rows
    pub fn trained() -> Self {
        let (rows, labels): (Vec<_>, Vec<_>) = TRAINING_ROWS.iter().cloned().unzip();
        Self::fit(&rows, &labels)
    }

    pub fn fit(rows: &[[f64; FEATURE_COUNT]], labels: &[Label]) -> Self {
        assert_eq!(rows.len(), labels.len(), "rows and labels must align");

        // Smoothing is relative to the widest feature spread over the whole set
        let epsilon = VAR_SMOOTHING
            * (0..FEATURE_COUNT)
                .map(|i| {
                    let column: Vec<f64> = rows.iter().map(|r| r[i]).collect();
                    variance(&column, mean(&column))
                })
                .fold(0.0, f64::max);

        // Suspicious is class 0; ties in `predict` resolve to the first class
        let mut classes = Vec::new();
        for label in [Label::Suspicious, Label::Legitimate] {
            let members: Vec<&[f64; FEATURE_COUNT]> = rows
                .iter()
                .zip(labels)
                .filter(|(_, l)| **l == label)
                .map(|(r, _)| r)
                .collect();
            if members.is_empty() {
                continue;
            }

            let mut means = [0.0; FEATURE_COUNT];
            let mut variances = [0.0; FEATURE_COUNT];
            for i in 0..FEATURE_COUNT {
                let column: Vec<f64> = members.iter().map(|r| r[i]).collect();
                means[i] = mean(&column);
                variances[i] = variance(&column, means[i]) + epsilon;
            }

            classes.push(ClassStats {
                label,
                log_prior: (members.len() as f64 / rows.len() as f64).ln(),
                means,
                variances,
            });
        }

        Self { classes }
    }

    /// Posterior probability per class, normalized in log space
    pub fn predict_proba(&self, features: &FeatureVector) -> Vec<(Label, f64)> {
        let jll: Vec<f64> = self
            .classes
            .iter()
            .map(|c| c.joint_log_likelihood(features.values()))
            .collect();

        let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let shifted: Vec<f64> = jll.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = shifted.iter().sum();

        self.classes
            .iter()
            .zip(shifted)
            .map(|(c, p)| (c.label, (p / total).clamp(0.0, 1.0)))
            .collect()
    }
}

impl Classifier for GaussianNaiveBayes {
    fn name(&self) -> &'static str {
        "gaussian_naive_bayes"
    }

    fn predict(&self, features: &FeatureVector, _request: &AnalysisRequest) -> Prediction {
        let (label, confidence) = self
            .predict_proba(features)
            .into_iter()
            .fold((Label::Suspicious, f64::NEG_INFINITY), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });

        Prediction {
            label,
            confidence: if confidence.is_finite() { confidence } else { 0.5 },
            model: self.name().to_string(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

// src/analysis/job_analyzer.rs
use super::classifier::{build_classifier, Classifier, FeatureVector};
use super::explainer::{ExplanationContext, NarrativeExplainer};
use super::heuristics::{DescriptionAnalysis, TextHeuristics};
use super::presence_prober::PresenceProber;
use super::rules::Rules;
use super::types::{CompanyChecks, RiskFactor};
use super::url_validator::{UrlAssessment, UrlValidator};
use super::{AnalysisReport, AnalysisRequest};
use crate::core::ConfigManager;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

const LOW_RATING_THRESHOLD: f64 = 2.5;

/// Process-wide analysis pipeline: one HTTP session, compiled rules, one classifier
pub struct JobAnalyzer {
    prober: PresenceProber,
    heuristics: TextHeuristics,
    url_validator: UrlValidator,
    classifier: Box<dyn Classifier>,
    explainer: Option<NarrativeExplainer>,
}

impl JobAnalyzer {
    pub fn new(config: &ConfigManager) -> Result<Self> {
        let rules = Rules::load(&config.environment.rules_path)?;
        let classifier = build_classifier(config.classifier, &config.environment.model_dir);
        let explainer = NarrativeExplainer::from_config(&config.explainer)
            .context("Failed to create generative model client")?;

        Self::from_parts(
            PresenceProber::new(&config.service)?,
            &rules,
            classifier,
            explainer,
        )
    }

    pub fn from_parts(
        prober: PresenceProber,
        rules: &Rules,
        classifier: Box<dyn Classifier>,
        explainer: Option<NarrativeExplainer>,
    ) -> Result<Self> {
        Ok(Self {
            prober,
            heuristics: TextHeuristics::new(rules)?,
            url_validator: UrlValidator::new(&rules.verified_job_boards),
            classifier,
            explainer,
        })
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn explainer_enabled(&self) -> bool {
        self.explainer.is_some()
    }

    /// Run every check for one posting. Individual check failures degrade to
    /// defaults; this never fails once the request has validated.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        let analysis_id = Uuid::new_v4();
        info!(
            "Starting analysis {} for {} at {}",
            analysis_id, request.job_title, request.company_name
        );

        let checks = self
            .prober
            .probe(request.company_name.trim(), request.country())
            .await;

        let description_analysis = self.heuristics.analyze(&request.job_description);
        let url_assessment = request.job_url().map(|url| self.url_validator.assess(url));

        let features = FeatureVector::from_checks(&checks, &request.job_description);
        let prediction = self.classifier.predict(&features, request);
        info!(
            "Analysis {}: {} ({:.0}% via {})",
            analysis_id,
            prediction.label,
            prediction.confidence * 100.0,
            prediction.model
        );

        let risk_factors =
            collect_risk_factors(&checks, &description_analysis, url_assessment.as_ref());

        let (narrative, narrative_error) = match &self.explainer {
            Some(explainer) => {
                let ctx = ExplanationContext {
                    request,
                    url_assessment: url_assessment.as_ref(),
                    description_analysis: &description_analysis,
                    model_label: prediction.label,
                };
                match explainer.explain(&ctx).await {
                    Ok(narrative) => (Some(narrative), None),
                    Err(e) => {
                        warn!("Narrative explanation failed for {}: {}", analysis_id, e);
                        (None, Some(e.to_string()))
                    }
                }
            }
            None => (None, None),
        };

        AnalysisReport {
            analysis_id,
            analyzed_at: Utc::now(),
            company_name: request.company_name.trim().to_string(),
            job_title: request.job_title.trim().to_string(),
            checks,
            description_analysis,
            url_assessment,
            features,
            prediction,
            risk_factors,
            narrative,
            narrative_error,
        }
    }
}

/// Human-readable list of every triggered heuristic, in a stable order
pub fn collect_risk_factors(
    checks: &CompanyChecks,
    description: &DescriptionAnalysis,
    url: Option<&UrlAssessment>,
) -> Vec<RiskFactor> {
    let mut factors: Vec<RiskFactor> = description
        .matched_red_flags
        .iter()
        .map(|flag| RiskFactor::new(format!("Warning: Job posting mentions '{}'", flag)))
        .collect();

    factors.extend(
        description
            .matched_patterns
            .iter()
            .map(|pattern| RiskFactor::new(format!("Suspicious pattern: {}", pattern))),
    );

    if !checks.has_social_presence() {
        factors.push(RiskFactor::new("No social media presence detected"));
    }
    if !checks.government_registration.is_registered() {
        factors.push(RiskFactor::new("No clear government registration found"));
    }
    if let Some(rating) = checks.glassdoor_rating.filter(|r| *r < LOW_RATING_THRESHOLD) {
        factors.push(RiskFactor::new(format!("Low Glassdoor rating ({:.1})", rating)));
    }

    if let Some(url) = url {
        if !url.is_valid {
            factors.push(RiskFactor::new("Job URL is not a valid URL"));
        }
        if !url.on_verified_job_board {
            factors.push(RiskFactor::new("Job URL is not on a verified job board"));
        }
    }

    factors
}

// src/core/config_manager.rs
//! Unified configuration management - file-based paths plus env-based services

use crate::analysis::ClassifierKind;
use crate::environment::EnvironmentConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
    pub explainer: ExplainerConfig,
    pub classifier: ClassifierKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    pub search_url: String,
    pub timeout_seconds: u64,
    /// Pause after a search query that produced nothing
    pub retry_delay_ms: u64,
    /// Pause after the multi-query rating check completes
    pub settle_delay_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            timeout_seconds: 10,
            retry_delay_ms: 1000,
            settle_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExplainerConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_seconds: 60,
        }
    }
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        let lookup = |key: &str| std::env::var(key).ok();

        let service = Self::load_service(&lookup)?;
        let explainer = Self::load_explainer(&lookup)?;
        let classifier = Self::load_classifier(&lookup)?;

        info!("Search engine: {}", service.search_url);
        info!("Model directory: {}", environment.model_dir.display());

        Ok(Self {
            environment,
            service,
            explainer,
            classifier,
        })
    }

    /// Load service configuration
    pub fn load_service(lookup: &dyn Fn(&str) -> Option<String>) -> Result<ServiceConfig> {
        let defaults = ServiceConfig::default();
        Ok(ServiceConfig {
            search_url: lookup("SEARCH_ENGINE_URL").unwrap_or(defaults.search_url),
            timeout_seconds: parse_var(lookup, "SEARCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.timeout_seconds),
            retry_delay_ms: parse_var(lookup, "SEARCH_RETRY_DELAY_MS")?
                .unwrap_or(defaults.retry_delay_ms),
            settle_delay_ms: parse_var(lookup, "SEARCH_SETTLE_DELAY_MS")?
                .unwrap_or(defaults.settle_delay_ms),
        })
    }

    /// Load generative model configuration
    pub fn load_explainer(lookup: &dyn Fn(&str) -> Option<String>) -> Result<ExplainerConfig> {
        let defaults = ExplainerConfig::default();
        Ok(ExplainerConfig {
            api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("GEMINI_API_URL").unwrap_or(defaults.base_url),
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout_seconds: parse_var(lookup, "GEMINI_TIMEOUT_SECS")?
                .unwrap_or(defaults.timeout_seconds),
        })
    }

    pub fn load_classifier(lookup: &dyn Fn(&str) -> Option<String>) -> Result<ClassifierKind> {
        match lookup("CLASSIFIER") {
            Some(value) => value.parse().context("Invalid CLASSIFIER value"),
            None => Ok(ClassifierKind::default()),
        }
    }
}

fn parse_var(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{} must be a non-negative integer", key))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_service_defaults() {
        let service = ConfigManager::load_service(&lookup_from(&[])).unwrap();
        assert_eq!(service, ServiceConfig::default());
        assert_eq!(service.timeout_seconds, 10);
    }

    #[test]
    fn test_service_overrides() {
        let lookup = lookup_from(&[
            ("SEARCH_ENGINE_URL", "http://127.0.0.1:9000/search"),
            ("SEARCH_RETRY_DELAY_MS", "0"),
            ("SEARCH_SETTLE_DELAY_MS", " 0 "),
        ]);
        let service = ConfigManager::load_service(&lookup).unwrap();
        assert_eq!(service.search_url, "http://127.0.0.1:9000/search");
        assert_eq!(service.retry_delay_ms, 0);
        assert_eq!(service.settle_delay_ms, 0);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let lookup = lookup_from(&[("SEARCH_TIMEOUT_SECS", "soon")]);
        assert!(ConfigManager::load_service(&lookup).is_err());
    }

    #[test]
    fn test_blank_api_key_disables_explainer() {
        let explainer =
            ConfigManager::load_explainer(&lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(explainer.api_key.is_none());
        assert_eq!(explainer.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_classifier_selection() {
        assert_eq!(
            ConfigManager::load_classifier(&lookup_from(&[])).unwrap(),
            ClassifierKind::NaiveBayes
        );
        assert_eq!(
            ConfigManager::load_classifier(&lookup_from(&[("CLASSIFIER", "tfidf")])).unwrap(),
            ClassifierKind::Tfidf
        );
        assert!(ConfigManager::load_classifier(&lookup_from(&[("CLASSIFIER", "svm")])).is_err());
    }
}

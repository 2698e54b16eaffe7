// src/analysis/rules.rs
//! Static phrase lists and patterns, optionally overridden from a rules.toml file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub description: String,
}

impl PatternRule {
    fn new(pattern: &str, description: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub red_flags: Vec<String>,
    pub suspicious_patterns: Vec<PatternRule>,
    pub verified_job_boards: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            red_flags: [
                "no experience needed",
                "guaranteed income",
                "pay upfront",
                "wire transfer",
                "too good to be true",
                "urgent hiring",
                "no interview required",
                "work from home, earn instantly",
                "easy money",
                "no skills required",
                "upfront payment",
                "processing fee",
                "bank details",
                "social security",
                "passport copy",
                "investment required",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            suspicious_patterns: vec![
                PatternRule::new(r"\$\d+k.*per.*week", "unrealistic weekly salary claim"),
                PatternRule::new(r"earn.*\$\d+.*hour", "suspicious hourly rate promise"),
                PatternRule::new(
                    r"(western\s*union|money\s*gram)",
                    "untraceable payment method",
                ),
                PatternRule::new(r"need.*bank.*details", "request for bank details"),
                PatternRule::new(r"instant.*payment", "instant payment promise"),
                PatternRule::new(r"no.*investment", "investment disclaimer"),
            ],
            verified_job_boards: [
                "linkedin.com/jobs",
                "indeed.com",
                "glassdoor.com",
                "monster.com",
                "ziprecruiter.com",
                "dice.com",
                "careerbuilder.com",
                "google.com/jobs",
                "hired.com",
                "angel.co",
                "simplyhired.com",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Rules {
    /// Load rules from a TOML file, falling back to the built-in lists when it does not exist.
    /// Lists omitted from the file keep their built-in values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "No rules file at {}, using built-in rules",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        let rules: Rules = toml::from_str(&content)
            .with_context(|| format!("Failed to parse rules file: {}", path.display()))?;

        if rules.red_flags.is_empty() && rules.suspicious_patterns.is_empty() {
            warn!("Rules file {} disables every text heuristic", path.display());
        }

        info!(
            "Loaded {} red flags, {} patterns, {} job boards from {}",
            rules.red_flags.len(),
            rules.suspicious_patterns.len(),
            rules.verified_job_boards.len(),
            path.display()
        );
        Ok(rules.normalized())
    }

    fn normalized(mut self) -> Self {
        self.red_flags = self
            .red_flags
            .into_iter()
            .map(|flag| flag.trim().to_lowercase())
            .filter(|flag| !flag.is_empty())
            .collect();
        self.verified_job_boards = self
            .verified_job_boards
            .into_iter()
            .map(|board| board.trim().to_lowercase())
            .filter(|board| !board.is_empty())
            .collect();
        self
    }
}

// src/analysis/heuristics.rs
use super::rules::Rules;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

const RED_FLAG_WEIGHT: u32 = 20;
const PATTERN_WEIGHT: u32 = 15;
/// Saturation point of the risk score; never reaches 100
pub const MAX_RISK_SCORE: u32 = 90;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionAnalysis {
    pub red_flag_count: usize,
    pub suspicious_pattern_count: usize,
    pub risk_score: u32,
    pub matched_red_flags: Vec<String>,
    pub matched_patterns: Vec<String>,
}

struct CompiledPattern {
    regex: Regex,
    description: String,
}

/// Red-flag phrase and suspicious-pattern scanner for job descriptions
pub struct TextHeuristics {
    red_flags: Vec<String>,
    patterns: Vec<CompiledPattern>,
}

impl TextHeuristics {
    pub fn new(rules: &Rules) -> Result<Self> {
        let patterns = rules
            .suspicious_patterns
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).with_context(|| {
                    format!("Invalid suspicious pattern: {}", rule.pattern)
                })?;
                Ok(CompiledPattern {
                    regex,
                    description: rule.description.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            red_flags: rules.red_flags.iter().map(|f| f.to_lowercase()).collect(),
            patterns,
        })
    }

    pub fn analyze(&self, description: &str) -> DescriptionAnalysis {
        let description_lower = description.to_lowercase();

        let matched_red_flags: Vec<String> = self
            .red_flags
            .iter()
            .filter(|flag| description_lower.contains(flag.as_str()))
            .cloned()
            .collect();

        let matched_patterns: Vec<String> = self
            .patterns
            .iter()
            .filter(|p| p.regex.is_match(&description_lower))
            .map(|p| p.description.clone())
            .collect();

        let red_flag_count = matched_red_flags.len();
        let suspicious_pattern_count = matched_patterns.len();

        DescriptionAnalysis {
            red_flag_count,
            suspicious_pattern_count,
            risk_score: risk_score(red_flag_count, suspicious_pattern_count),
            matched_red_flags,
            matched_patterns,
        }
    }
}

pub fn risk_score(red_flag_count: usize, pattern_count: usize) -> u32 {
    let raw = (red_flag_count as u64)
        .saturating_mul(RED_FLAG_WEIGHT as u64)
        .saturating_add((pattern_count as u64).saturating_mul(PATTERN_WEIGHT as u64));
    raw.min(MAX_RISK_SCORE as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::rules::PatternRule;

    fn heuristics() -> TextHeuristics {
        TextHeuristics::new(&Rules::default()).unwrap()
    }

    #[test]
    fn test_clean_description_scores_zero() {
        let analysis = heuristics().analyze(
            "We are seeking a talented professional. Requirements: 3+ years of experience.",
        );
        assert_eq!(analysis, DescriptionAnalysis::default());
    }

    #[test]
    fn test_single_red_flag_scores_at_least_twenty() {
        let analysis = heuristics().analyze("Please send a PASSPORT COPY with your application");
        assert_eq!(analysis.red_flag_count, 1);
        assert_eq!(analysis.matched_red_flags, vec!["passport copy".to_string()]);
        assert!(analysis.risk_score >= 20);
    }

    #[test]
    fn test_scam_description_counts_each_flag() {
        let analysis = heuristics()
            .analyze("Guaranteed income, wire transfer required, no interview required");
        assert!(analysis.red_flag_count >= 3);
        assert_eq!(analysis.risk_score, 60);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let analysis = heuristics().analyze("Earn $45 per HOUR, paid via Western Union");
        assert_eq!(analysis.red_flag_count, 0);
        assert_eq!(analysis.suspicious_pattern_count, 2);
        assert_eq!(analysis.risk_score, 30);
        assert!(analysis
            .matched_patterns
            .contains(&"untraceable payment method".to_string()));
    }

    #[test]
    fn test_risk_score_saturates_at_ninety() {
        let analysis = heuristics().analyze(
            "Urgent hiring! Easy money, no skills required, no experience needed. \
             Guaranteed income of $5k per week. Pay upfront via MoneyGram, \
             we need your bank details for instant payment.",
        );
        assert!(analysis.red_flag_count >= 5);
        assert_eq!(analysis.risk_score, MAX_RISK_SCORE);
    }

    #[test]
    fn test_risk_score_bounds() {
        for flags in 0..20 {
            for patterns in 0..20 {
                assert!(risk_score(flags, patterns) <= MAX_RISK_SCORE);
            }
        }
        assert_eq!(risk_score(usize::MAX, usize::MAX), MAX_RISK_SCORE);
        assert_eq!(risk_score(1, 1), 35);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let rules = Rules {
            suspicious_patterns: vec![PatternRule {
                pattern: "(unclosed".to_string(),
                description: "broken".to_string(),
            }],
            ..Rules::default()
        };
        assert!(TextHeuristics::new(&rules).is_err());
    }
}

// src/cli.rs
use crate::analysis::{AnalysisReport, AnalysisRequest, JobAnalyzer};
use crate::core::ConfigManager;
use crate::web::render::format_check;
use crate::web::start_web_server;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_DESCRIPTION: &str = "We are seeking a talented professional to join our team.
Requirements:
- 3+ years of relevant experience
- Bachelor's degree
- Strong communication skills

Benefits:
- Competitive salary
- Health insurance
- Professional development";

#[derive(Parser)]
#[command(name = "job-checker")]
#[command(about = "Check whether a job posting looks legitimate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the web interface (default)
    Serve {
        /// Port to listen on; falls back to ROCKET_PORT, then 8000
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze a single posting and print a report
    Check {
        #[arg(long)]
        company: String,
        #[arg(long)]
        title: String,
        /// Uses a generic description when omitted
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// US or UK enables the registration check
        #[arg(long)]
        country: Option<String>,
    },
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let port = resolve_port(port, std::env::var("ROCKET_PORT").ok())?;
            start_web_server(config, port).await
        }
        Command::Check {
            company,
            title,
            description,
            url,
            country,
        } => {
            let request = AnalysisRequest {
                company_name: company,
                job_title: title,
                job_description: description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                job_url: url,
                country,
                ..Default::default()
            };

            if let Err(missing) = request.validate() {
                bail!("Missing required fields: {}", missing.join(", "));
            }

            let analyzer = JobAnalyzer::new(&config)?;
            println!("\nAnalyzing... This may take a few moments...\n");
            let report = analyzer.analyze(&request).await;
            info!("Check command finished for {}", report.company_name);

            print!("{}", text_report(&report));
            Ok(())
        }
    }
}

fn resolve_port(flag: Option<u16>, env_value: Option<String>) -> Result<u16> {
    if let Some(port) = flag {
        return Ok(port);
    }
    match env_value {
        Some(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number")),
        None => Ok(DEFAULT_PORT),
    }
}

/// Plain-text rendition of a report for terminal output
pub fn text_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Results ===");
    let _ = writeln!(out, "Company: {}", report.company_name);
    let _ = writeln!(out, "Job Title: {}", report.job_title);
    let _ = writeln!(out, "Prediction: {}", report.prediction.label);
    let _ = writeln!(
        out,
        "Confidence: {:.2}%",
        report.prediction.confidence * 100.0
    );

    let _ = writeln!(out, "\nChecks Performed:");
    for (key, value) in report.checks.entries() {
        let _ = writeln!(out, "- {}: {}", key, format_check(&value));
    }

    let description = &report.description_analysis;
    let _ = writeln!(
        out,
        "\nDescription: {} red flag(s), {} suspicious pattern(s), risk score {}",
        description.red_flag_count, description.suspicious_pattern_count, description.risk_score
    );

    if report.risk_factors.is_empty() {
        let _ = writeln!(out, "\nNo major risk factors detected.");
    } else {
        let _ = writeln!(out, "\nRisk Factors:");
        for factor in &report.risk_factors {
            let _ = writeln!(out, "- {}", factor);
        }
    }

    if let Some(narrative) = &report.narrative {
        let _ = writeln!(
            out,
            "\nExplanation ({}, {}%):\n{}",
            narrative.label.as_str(),
            narrative.confidence_percent,
            narrative.text
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["job-checker"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "job-checker",
            "check",
            "--company",
            "Acme",
            "--title",
            "Engineer",
            "--country",
            "UK",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Check {
                company: "Acme".to_string(),
                title: "Engineer".to_string(),
                description: None,
                url: None,
                country: Some("UK".to_string()),
            })
        );
    }

    #[test]
    fn test_check_requires_company() {
        assert!(Cli::try_parse_from(["job-checker", "check", "--title", "Engineer"]).is_err());
    }

    #[test]
    fn test_resolve_port() {
        assert_eq!(resolve_port(Some(9100), Some("7000".to_string())).unwrap(), 9100);
        assert_eq!(resolve_port(None, Some(" 7000 ".to_string())).unwrap(), 7000);
        assert_eq!(resolve_port(None, None).unwrap(), DEFAULT_PORT);
        assert!(resolve_port(None, Some("http".to_string())).is_err());
    }
}

// src/analysis/url_validator.rs
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlAssessment {
    pub url: String,
    pub is_valid: bool,
    pub on_verified_job_board: bool,
}

/// Structural URL checks plus the verified job board allow-list
pub struct UrlValidator {
    verified_job_boards: Vec<String>,
}

impl UrlValidator {
    pub fn new(verified_job_boards: &[String]) -> Self {
        Self {
            verified_job_boards: verified_job_boards
                .iter()
                .map(|board| board.to_lowercase())
                .collect(),
        }
    }

    pub fn assess(&self, url: &str) -> UrlAssessment {
        UrlAssessment {
            url: url.to_string(),
            is_valid: validate_url(url),
            on_verified_job_board: self.verify_job_source(url),
        }
    }

    /// True when host (minus a leading "www.") plus path contains an allow-listed board
    pub fn verify_job_source(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };

        let host = host.to_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);
        let candidate = format!("{}{}", host, parsed.path().to_lowercase());

        self.verified_job_boards
            .iter()
            .any(|board| candidate.contains(board.as_str()))
    }
}

/// A URL is legitimate only with a scheme and a network location longer than 3 characters
pub fn validate_url(url: &str) -> bool {
    let raw = url.trim();
    match Url::parse(raw) {
        Ok(parsed) => !parsed.scheme().is_empty() && netloc(raw, &parsed).len() > 3,
        Err(_) => false,
    }
}

/// userinfo@host:port exactly as written, empty when the URL has no authority.
/// Sliced from the input since `Url` drops an explicit default port.
fn netloc<'a>(raw: &'a str, url: &Url) -> &'a str {
    if url.host_str().is_none() {
        return "";
    }
    let Some((_, rest)) = raw.split_once("://") else {
        return "";
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

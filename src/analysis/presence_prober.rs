// src/analysis/presence_prober.rs
use super::types::{CompanyChecks, RegistrationStatus};
use crate::core::config_manager::ServiceConfig;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const RESULT_BLOCK_SELECTOR: &str = "div.g";
const LINK_SELECTOR: &str = "a[href]";
const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Countries whose business registries the registration check knows about
const REGISTRY_COUNTRIES: [&str; 2] = ["US", "UK"];

const REGISTRATION_INDICATORS: [&str; 7] = [
    "incorporated",
    "llc",
    "corporation",
    "registered",
    "business entity",
    "ein:",
    "registration number",
];

static LINKEDIN_COMPANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/company").expect("valid regex"));
static TWITTER_PROFILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"twitter\.com/").expect("valid regex"));
static RATING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+(\.\d+)?)\s*out of\s*5",
        r"rating:\s*(\d+(\.\d+)?)",
        r"(\d+(\.\d+)?)/5",
        r"(\d+(\.\d+)?)\s+stars?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Search-engine based probe of a company's public footprint
pub struct PresenceProber {
    client: Client,
    search_url: String,
    retry_delay: Duration,
    settle_delay: Duration,
}

impl PresenceProber {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        })
    }

    /// Run every presence check in sequence
    pub async fn probe(&self, company_name: &str, country: &str) -> CompanyChecks {
        info!("Checking LinkedIn presence...");
        let linkedin_presence = self.check_linkedin_presence(company_name).await;

        info!("Checking X presence...");
        let x_presence = self.check_x_presence(company_name).await;

        info!("Checking Glassdoor rating...");
        let glassdoor_rating = self.check_glassdoor_rating(company_name).await;

        info!("Checking government registration...");
        let government_registration = self
            .check_government_registration(company_name, country)
            .await;

        CompanyChecks {
            linkedin_presence,
            x_presence,
            glassdoor_rating,
            government_registration,
        }
    }

    pub async fn check_linkedin_presence(&self, company_name: &str) -> bool {
        let query = format!("{} site:linkedin.com/company", company_name);
        match self.fetch_search_page(&query).await {
            Ok(Some(html)) => has_result_link(&html, &LINKEDIN_COMPANY),
            Ok(None) => false,
            Err(e) => {
                warn!("LinkedIn check error: {:#}", e);
                false
            }
        }
    }

    pub async fn check_x_presence(&self, company_name: &str) -> bool {
        let query = format!("{} site:twitter.com", company_name);
        match self.fetch_search_page(&query).await {
            Ok(Some(html)) => has_result_link(&html, &TWITTER_PROFILE),
            Ok(None) => false,
            Err(e) => {
                warn!("X check error: {:#}", e);
                false
            }
        }
    }

    /// Rating in [0, 5] from the first query that yields one
    pub async fn check_glassdoor_rating(&self, company_name: &str) -> Option<f64> {
        let queries = [
            format!("{} site:glassdoor.com reviews", company_name),
            format!("{} glassdoor rating reviews", company_name),
            format!("{} reviews glassdoor employees", company_name),
        ];

        let mut rating = None;
        for query in &queries {
            match self.fetch_search_page(query).await {
                Ok(Some(html)) => {
                    rating = extract_rating(&html);
                    if rating.is_some() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Glassdoor check error: {:#}", e);
                    break;
                }
            }
            tokio::time::sleep(self.retry_delay).await;
        }

        tokio::time::sleep(self.settle_delay).await;
        rating
    }

    pub async fn check_government_registration(
        &self,
        company_name: &str,
        country: &str,
    ) -> RegistrationStatus {
        let country = country.trim().to_uppercase();
        if !REGISTRY_COUNTRIES.contains(&country.as_str()) {
            return RegistrationStatus::Unknown;
        }

        let query = format!(
            "{} {} business registration corporation LLC",
            company_name, country
        );
        match self.fetch_search_page(&query).await {
            Ok(Some(html)) if has_registration_indicator(&html) => RegistrationStatus::Registered,
            Ok(_) => RegistrationStatus::NotFound,
            Err(e) => {
                warn!("Government registration check error: {:#}", e);
                RegistrationStatus::CheckFailed
            }
        }
    }

    /// Result page body, or None when the engine answered with a non-success status
    async fn fetch_search_page(&self, query: &str) -> Result<Option<String>> {
        debug!("Searching: {}", query);

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await
            .context("Failed to fetch search results")?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search engine returned {} for query: {}", status, query);
            return Ok(None);
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(Some(html))
    }
}

/// True when any result block links somewhere matching `href_pattern`
fn has_result_link(html: &str, href_pattern: &Regex) -> bool {
    let document = Html::parse_document(html);
    let (Ok(blocks), Ok(links)) = (
        Selector::parse(RESULT_BLOCK_SELECTOR),
        Selector::parse(LINK_SELECTOR),
    ) else {
        return false;
    };

    document.select(&blocks).any(|block| {
        block
            .select(&links)
            .filter_map(|a| a.value().attr("href"))
            .any(|href| href_pattern.is_match(href))
    })
}

/// Concatenated text nodes with no separator, so markup splitting a value keeps it whole
fn page_text(document: &Html) -> String {
    document.root_element().text().collect()
}

fn has_registration_indicator(html: &str) -> bool {
    let document = Html::parse_document(html);
    let text = page_text(&document).to_lowercase();
    REGISTRATION_INDICATORS
        .iter()
        .any(|indicator| text.contains(indicator))
}

/// Look for a rating in the visible text, then the raw markup, then JSON-LD blocks
fn extract_rating(html: &str) -> Option<f64> {
    let document = Html::parse_document(html);

    let haystacks = [page_text(&document).to_lowercase(), html.to_lowercase()];
    for haystack in &haystacks {
        for pattern in RATING_PATTERNS.iter() {
            let rating = pattern
                .captures(haystack)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok());
            if let Some(rating) = rating.filter(|r| is_valid_rating(*r)) {
                return Some(rating);
            }
        }
    }

    let selector = Selector::parse(JSON_LD_SELECTOR).ok()?;
    document.select(&selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        let data: serde_json::Value = serde_json::from_str(&raw).ok()?;
        let value = data.get("aggregateRating")?.get("ratingValue")?;
        let rating = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        is_valid_rating(rating).then_some(rating)
    })
}

fn is_valid_rating(rating: f64) -> bool {
    (0.0..=5.0).contains(&rating)
}

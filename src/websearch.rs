//! Web snippet search
//!
//! Fetches the top web-search result for a company name and returns its
//! title, URL and snippet text for keyword scoring. Uses the HTML search
//! endpoint so no API key is needed. Any failure degrades to `None`.

use crate::config::AppConfig;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Top search result for a query
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub title: String,
    pub url: String,
    pub body: String,
}

impl Snippet {
    /// Text handed to the keyword scorer: title plus result body
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Web snippet collaborator
#[async_trait]
pub trait SnippetSearch: Send + Sync {
    /// Top result for the query, or `None` when the search yields nothing
    async fn search_top(&self, query: &str) -> Option<Snippet>;
}

/// HTML-scraping client for the DuckDuckGo non-JS endpoint
pub struct DuckDuckGoClient {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoClient {
    /// Build the client from application configuration
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .user_agent(config.http.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoints.search_url.clone(),
        })
    }

    /// Build a client against an explicit base URL (tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(8))
                .build()
                .expect("default reqwest client must build"),
            base_url: base_url.into(),
        }
    }

    /// Parse the first organic result out of the search HTML
    pub fn parse_top_result(html: &str) -> Option<Snippet> {
        let document = Html::parse_document(html);
        let result_sel = Selector::parse(".result").ok()?;
        let title_sel = Selector::parse("a.result__a").ok()?;
        let snippet_sel = Selector::parse(".result__snippet").ok()?;

        let first = document.select(&result_sel).next()?;

        let anchor = first.select(&title_sel).next()?;
        let title = anchor.text().collect::<String>().trim().to_string();
        let url = anchor.value().attr("href").unwrap_or("").to_string();
        let body = first
            .select(&snippet_sel)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        if title.is_empty() && body.is_empty() {
            return None;
        }

        Some(Snippet { title, url, body })
    }
}

#[async_trait]
impl SnippetSearch for DuckDuckGoClient {
    async fn search_top(&self, query: &str) -> Option<Snippet> {
        debug!("Web search: {}", query);

        let response = match self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("kl", "fr-fr")])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Web search failed for '{}': {}", query, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                "Web search returned status {} for '{}'",
                response.status(),
                query
            );
            return None;
        }

        let html = response.text().await.ok()?;
        let snippet = Self::parse_top_result(&html);
        match &snippet {
            Some(s) => debug!("Top result for '{}': {} ({})", query, s.title, s.url),
            None => debug!("No web results for '{}'", query),
        }
        snippet
    }
}

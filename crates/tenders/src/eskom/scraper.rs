use super::parser::parse_document;
use super::types::EskomTender;
use crate::scraper::{ClientOptions, ScraperError, build_client, get_body};

use reqwest::Client;
use scraper::Html;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_options(&ClientOptions::default())
    }

    pub fn with_options(options: &ClientOptions) -> Result<Self, ScraperError> {
        let client = build_client(Client::builder().user_agent(super::USER_AGENT), options)?;

        Ok(Self {
            client,
            base_url: super::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn tenders_url(&self) -> String {
        format!("{}/Tenders/", self.base_url.trim_end_matches('/'))
    }

    pub async fn fetch_page(&self) -> Result<String, ScraperError> {
        let url = self.tenders_url();
        log::info!("Fetching tender bulletin: {}", url);
        get_body(self.client.get(&url), &url).await
    }

    /// Fetches the bulletin and reads at most `limit` rows of its first table.
    /// When `snapshot` is given the page is written there first; a failed
    /// write is logged and does not stop the run.
    pub async fn fetch_tenders(
        &self,
        limit: usize,
        snapshot: Option<&Path>,
    ) -> Result<Vec<EskomTender>, ScraperError> {
        let html = self.fetch_page().await?;
        let document = Html::parse_document(&html);

        if let Some(path) = snapshot {
            match save_snapshot(&document, path) {
                Ok(()) => log::info!("Saved page snapshot to {}", path.display()),
                Err(e) => log::warn!("Failed to save snapshot to {}: {}", path.display(), e),
            }
        }

        let tenders = parse_document(&document, limit)?;
        log::info!("Extracted {} tender(s)", tenders.len());
        Ok(tenders)
    }
}

/// Writes the document to `path`, replacing any previous file. The markup is
/// the parser's own serialization of the page, not an indented rendering;
/// whitespace between tags is kept as the server sent it.
pub fn save_snapshot(document: &Html, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, document.html())
}

use super::parser::parse_releases;
use super::types::{OcdsTender, ReleaseQuery};
use crate::scraper::{ClientOptions, ScraperError, build_client, get_body};

use reqwest::Client;
use reqwest::header::ACCEPT;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_options(&ClientOptions::default())
    }

    pub fn with_options(options: &ClientOptions) -> Result<Self, ScraperError> {
        let client = build_client(Client::builder(), options)?;

        Ok(Self {
            client,
            base_url: super::BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn releases_url(&self, query: &ReleaseQuery) -> String {
        format!(
            "{}/api/OCDSReleases?{}",
            self.base_url.trim_end_matches('/'),
            query.to_query_string()
        )
    }

    pub async fn fetch_releases(
        &self,
        query: &ReleaseQuery,
    ) -> Result<Vec<OcdsTender>, ScraperError> {
        let url = self.releases_url(query);
        log::info!("Fetching OCDS releases: {}", url);

        let body = get_body(
            self.client.get(&url).header(ACCEPT, "application/json"),
            &url,
        )
        .await?;

        let tenders = parse_releases(&body)?;
        log::info!("Extracted {} release(s)", tenders.len());
        Ok(tenders)
    }
}

mod parser;
pub mod scraper;
pub mod types;

pub use parser::parse_releases;
pub use scraper::ApiClient;
pub use types::{OcdsTender, ReleaseQuery};

pub(crate) const BASE_URL: &str = "https://ocds-api.etenders.gov.za";

pub const NO_TITLE: &str = "No Title";
pub const NO_DESCRIPTION: &str = "No Description";
pub const NO_CLOSING_DATE: &str = "No closing date";
pub const NO_DOCUMENT: &str = "No document";

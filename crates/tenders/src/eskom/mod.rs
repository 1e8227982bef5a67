mod parser;
pub mod scraper;
pub mod types;

pub use parser::{DEFAULT_ROW_LIMIT, parse_tender_table};
pub use scraper::{WebScraper, save_snapshot};
pub use types::EskomTender;

pub(crate) const BASE_URL: &str = "https://tenderbulletin.eskom.co.za";

/// The bulletin rejects requests without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

pub const DEFAULT_SNAPSHOT_PATH: &str = "eskom_page.html";

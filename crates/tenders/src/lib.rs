pub mod eskom;
pub mod etenders;
mod parser;
pub mod scraper;
pub mod types;
pub mod utils;

pub use parser::ParseError;
pub use scraper::{ClientOptions, ScraperError};
pub use types::{Source, TenderRecord};

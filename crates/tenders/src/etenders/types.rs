use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Display;

use super::{NO_CLOSING_DATE, NO_DESCRIPTION, NO_DOCUMENT, NO_TITLE};
use crate::types::{Source, TenderRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of a single `OCDSReleases` page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseQuery {
    pub page: u32,
    pub page_size: u32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl Default for ReleaseQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            date_to: NaiveDate::from_ymd_opt(2024, 3, 31).expect("valid date"),
        }
    }
}

impl ReleaseQuery {
    pub fn validate(self) -> Result<Self, String> {
        if self.date_from > self.date_to {
            return Err(format!(
                "Date from ({}) cannot be after date to ({})",
                self.date_from, self.date_to
            ));
        }
        if self.page == 0 {
            return Err("Page must be greater than 0".to_string());
        }
        if self.page_size == 0 {
            return Err("Page size must be greater than 0".to_string());
        }
        Ok(self)
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("PageNumber", self.page.to_string()),
            ("PageSize", self.page_size.to_string()),
            ("dateFrom", self.date_from.format(DATE_FORMAT).to_string()),
            ("dateTo", self.date_to.format(DATE_FORMAT).to_string()),
        ]
    }

    /// Every value is a number or an ISO date, so nothing needs escaping.
    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// The tender part of one OCDS release. Absent fields stay `None`; the
/// accessors fall back to the placeholder text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OcdsTender {
    pub title: Option<String>,
    pub description: Option<String>,
    pub closing_date: Option<String>,
    pub document_url: Option<String>,
}

impl OcdsTender {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }

    pub fn closing_date(&self) -> &str {
        self.closing_date.as_deref().unwrap_or(NO_CLOSING_DATE)
    }

    pub fn document_url(&self) -> &str {
        self.document_url.as_deref().unwrap_or(NO_DOCUMENT)
    }
}

impl Display for OcdsTender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "📌 Title       : {}", self.title())?;
        writeln!(f, "📝 Description : {}", self.description())?;
        writeln!(f, "📅 Closing     : {}", self.closing_date())?;
        writeln!(f, "📄 Document    : {}", self.document_url())?;
        writeln!(f, "{}", "-".repeat(60))
    }
}

impl From<OcdsTender> for TenderRecord {
    fn from(tender: OcdsTender) -> Self {
        TenderRecord {
            source: Source::Etenders,
            identifier: None,
            title: tender.title,
            description: tender.description,
            issue_date: None,
            closing_date: tender.closing_date,
            document_url: tender.document_url,
        }
    }
}

use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Eskom,
    Etenders,
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Eskom => write!(f, "Eskom Tender Bulletin"),
            Source::Etenders => write!(f, "eTenders OCDS API"),
        }
    }
}

/// A tender in the shape shared by every source. Fields a source does not
/// publish stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenderRecord {
    pub source: Source,
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<String>,
    pub closing_date: Option<String>,
    pub document_url: Option<String>,
}

use serde::Serialize;
use std::fmt::Display;

use crate::types::{Source, TenderRecord};

/// One data row of the bulletin table, cells trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EskomTender {
    pub tender_no: String,
    pub description: String,
    pub issue_date: String,
    pub closing_date: String,
}

impl Display for EskomTender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tender No   : {}", self.tender_no)?;
        writeln!(f, "Description : {}", self.description)?;
        writeln!(f, "Issue Date  : {}", self.issue_date)?;
        writeln!(f, "Closing Date: {}", self.closing_date)?;
        writeln!(f, "{}", "-".repeat(40))
    }
}

impl From<EskomTender> for TenderRecord {
    fn from(tender: EskomTender) -> Self {
        TenderRecord {
            source: Source::Eskom,
            identifier: Some(tender.tender_no),
            title: None,
            description: Some(tender.description),
            issue_date: Some(tender.issue_date),
            closing_date: Some(tender.closing_date),
            document_url: None,
        }
    }
}

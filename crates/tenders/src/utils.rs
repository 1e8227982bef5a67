use crate::types::{Source, TenderRecord};

#[derive(Debug, PartialEq, Eq)]
pub struct RecordStats {
    pub eskom: usize,
    pub etenders: usize,
    pub total: usize,
}

impl RecordStats {
    pub fn from_records(records: &[TenderRecord]) -> RecordStats {
        RecordStats {
            eskom: records.iter().filter(|r| r.source == Source::Eskom).count(),
            etenders: records
                .iter()
                .filter(|r| r.source == Source::Etenders)
                .count(),
            total: records.len(),
        }
    }
}

impl std::fmt::Display for RecordStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Eskom tenders:    {}", self.eskom)?;
        writeln!(f, "  eTenders tenders: {}", self.etenders)?;
        writeln!(f, "  Total:            {}", self.total)
    }
}

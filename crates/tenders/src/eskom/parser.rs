use super::types::EskomTender;
use crate::parser::ParseError;

use scraper::{ElementRef, Html, Selector};

/// Data rows read from the bulletin table when no limit is given.
pub const DEFAULT_ROW_LIMIT: usize = 5;

const MIN_CELLS: usize = 4;

pub fn parse_tender_table(html: &str, limit: usize) -> Result<Vec<EskomTender>, ParseError> {
    let document = Html::parse_document(html);
    parse_document(&document, limit)
}

/// Reads the first `<table>` of the page. The header row is skipped and the
/// `limit` window is taken before short rows are dropped, so fewer than
/// `limit` tenders may come back even when the table is longer.
pub(crate) fn parse_document(
    document: &Html,
    limit: usize,
) -> Result<Vec<EskomTender>, ParseError> {
    let table_selector = Selector::parse("table").unwrap();
    let row_selector = Selector::parse("tr").unwrap();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ParseError::TableNotFound)?;

    let tenders = table
        .select(&row_selector)
        .skip(1)
        .take(limit)
        .filter_map(parse_row)
        .collect();

    Ok(tenders)
}

fn parse_row(row: ElementRef) -> Option<EskomTender> {
    let cell_selector = Selector::parse("td").unwrap();

    let cells: Vec<String> = row
        .select(&cell_selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();

    if cells.len() < MIN_CELLS {
        log::debug!("Skipping row with {} cell(s)", cells.len());
        return None;
    }

    let mut cells = cells.into_iter();
    Some(EskomTender {
        tender_no: cells.next()?,
        description: cells.next()?,
        issue_date: cells.next()?,
        closing_date: cells.next()?,
    })
}

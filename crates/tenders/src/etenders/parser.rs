use super::types::OcdsTender;
use crate::parser::ParseError;

use serde_json::Value;

/// Maps every entry of `releases` to a tender. Missing or mistyped keys
/// become `None`; only a body that is not JSON at all is an error.
pub fn parse_releases(json: &str) -> Result<Vec<OcdsTender>, ParseError> {
    let body: Value = serde_json::from_str(json)?;

    let releases = body
        .get("releases")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    Ok(releases.iter().map(parse_release).collect())
}

fn parse_release(release: &Value) -> OcdsTender {
    let text = |pointer: &str| {
        release
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    OcdsTender {
        title: text("/tender/title"),
        description: text("/tender/description"),
        closing_date: text("/tender/tenderPeriod/endDate"),
        document_url: text("/tender/documents/0/url"),
    }
}

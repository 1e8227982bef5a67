use crate::parser::ParseError;

use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

impl ScraperError {
    /// Status code of a response that was received but not accepted.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ScraperError::UnexpectedStatus { status, .. } => Some(*status),
            ScraperError::HttpError(e) => e.status(),
            ScraperError::ParseError(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

pub(crate) fn build_client(
    builder: ClientBuilder,
    options: &ClientOptions,
) -> Result<Client, ScraperError> {
    let builder = match options.timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };
    Ok(builder.build()?)
}

/// Sends the request and returns the body, rejecting anything but `200 OK`.
pub(crate) async fn get_body(request: RequestBuilder, url: &str) -> Result<String, ScraperError> {
    let response = request
        .send()
        .await
        .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ScraperError::UnexpectedStatus {
            url: url.to_string(),
            status,
        });
    }

    Ok(response
        .text()
        .await
        .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message_mentions_code() {
        let err = ScraperError::UnexpectedStatus {
            url: "https://example.test/Tenders/".to_string(),
            status: StatusCode::NOT_FOUND,
        };

        assert!(err.to_string().contains("404"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_parse_error_has_no_status() {
        let err = ScraperError::from(ParseError::TableNotFound);
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "Parse error: Table not found. Page may have changed."
        );
    }

    #[test]
    fn test_default_options_bound_requests() {
        assert_eq!(
            ClientOptions::default().timeout,
            Some(Duration::from_secs(30))
        );
    }
}

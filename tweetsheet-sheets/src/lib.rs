//! Google Sheets CSV export fetcher.
//!
//! A sheet is read through the unauthenticated `gviz` CSV export endpoint
//! and parsed into ordered rows. The sheet's top-to-bottom order is the
//! publish order downstream, so rows are returned exactly as they appear.

use std::borrow::Cow;

use tweetsheet_common::{Result, TweetsheetError};
use tweetsheet_http::{HttpClient, RequestOpts};

const SHEETS_BASE_URL: &str = "https://docs.google.com";

/// Column header holding the tweet body.
const CONTENT_COLUMN: &str = "Tweet";
/// Column header holding the hashtag.
const TAG_COLUMN: &str = "Hashtag";

/// One spreadsheet row: the text to tweet about and its hashtag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub content: String,
    pub tag: String,
}

/// Fetches and parses the public CSV export of a Google Sheet tab.
#[derive(Clone)]
pub struct SheetSource {
    http: HttpClient,
}

impl SheetSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(SHEETS_BASE_URL)
    }

    /// Point the fetcher at a different host (used by tests against a mock
    /// server).
    pub fn with_base_url(base: &str) -> Result<Self> {
        let http = HttpClient::new(base)
            .map_err(|e| TweetsheetError::Sheet(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Fetch all rows of the named tab, in sheet order.
    ///
    /// The sheet name is escaped by the query encoder, matching the export
    /// URL shape `/spreadsheets/d/{id}/gviz/tq?tqx=out:csv&sheet={name}`.
    pub async fn fetch_rows(&self, sheet_id: &str, sheet_name: &str) -> Result<Vec<SheetRow>> {
        let path = format!("spreadsheets/d/{}/gviz/tq", sheet_id);
        let query: Vec<(&str, Cow<'_, str>)> =
            vec![("tqx", "out:csv".into()), ("sheet", sheet_name.into())];

        let body = self
            .http
            .get_text(
                &path,
                RequestOpts {
                    query: Some(query),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| TweetsheetError::Sheet(format!("Sheet fetch failed: {}", e)))?;

        let rows = parse_rows(&body)?;
        tracing::debug!(sheet_id, sheet_name, rows = rows.len(), "sheet.fetched");
        Ok(rows)
    }
}

/// Parse the CSV export body into rows, keyed by the `Tweet` and `Hashtag`
/// header columns. A missing header column is a request-level error.
pub fn parse_rows(body: &str) -> Result<Vec<SheetRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TweetsheetError::Sheet(format!("Sheet parse failed: {}", e)))?
        .clone();

    let content_idx = column_index(&headers, CONTENT_COLUMN)?;
    let tag_idx = column_index(&headers, TAG_COLUMN)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| TweetsheetError::Sheet(format!("Sheet parse failed: {}", e)))?;
        rows.push(SheetRow {
            content: record.get(content_idx).unwrap_or_default().to_string(),
            tag: record.get(tag_idx).unwrap_or_default().to_string(),
        });
    }
    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| TweetsheetError::Sheet(format!("Missing '{}' column in sheet", name)))
}

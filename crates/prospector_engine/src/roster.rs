use std::collections::HashSet;

use url::Url;

use crate::types::InvestorRecord;

/// Column headings that mark the first line as a header, not a row.
const HEADER_NAMES: &[&str] = &["name", "investor", "investor_name", "investors", "company"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("no investor rows found in the uploaded file")]
    Empty,
}

/// Parse an uploaded roster into ordered, deduplicated investor rows.
///
/// Line-oriented CSV: first column is the investor name, an optional
/// second column is taken as their website when it is an http(s) URL.
/// Duplicate names are dropped case-insensitively, keeping the first
/// occurrence, so re-exported spreadsheets do not probe a firm twice.
pub fn parse_roster(text: &str) -> Result<Vec<InvestorRecord>, RosterError> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut first_line = true;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line);
        let name = fields.first().map(|f| f.trim()).unwrap_or_default();

        if first_line {
            first_line = false;
            if HEADER_NAMES.contains(&name.to_lowercase().as_str()) {
                continue;
            }
        }
        if name.len() < 3 {
            continue;
        }
        if !seen.insert(name.to_lowercase()) {
            continue;
        }

        let website = fields
            .get(1)
            .map(|f| f.trim())
            .filter(|f| is_http_url(f))
            .map(ToOwned::to_owned);

        records.push(InvestorRecord {
            name: name.to_string(),
            website,
        });
    }

    if records.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(records)
}

fn is_http_url(value: &str) -> bool {
    matches!(Url::parse(value), Ok(url) if url.scheme() == "http" || url.scheme() == "https")
}

/// Split one CSV line into fields, honoring double-quoted fields with
/// `""` escapes. Kept by hand since the roster format is this simple.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

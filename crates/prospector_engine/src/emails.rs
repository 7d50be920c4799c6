use std::collections::HashSet;

use regex::Regex;
use scraper::{Html, Selector};

use crate::types::{InvestorKind, InvestorRecord};

/// Address fragments that mark machine or platform mailboxes rather
/// than a reachable contact.
const EXCLUDED_FRAGMENTS: &[&str] = &[
    "noreply@",
    "no-reply@",
    "donotreply@",
    "webmaster@",
    "bounce@",
    "tracking@",
    "pixel@",
    "@example.",
    "@test.",
    "@placeholder.",
    "@sentry.",
    "@googletagmanager.",
    "@mailgun.",
    "@sendgrid.",
    "@mailchimp.",
];

/// Consumer mail providers; a firm publishing one of these as its
/// contact address is almost always a scraping artifact.
const FREEMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "live.com",
    "msn.com",
    "icloud.com",
];

/// Sections where firms publish contact addresses, scanned before the
/// rest of the page so their addresses outrank boilerplate.
const PRIORITY_SECTIONS: &[&str] = &[
    "[class*=\"contact\"]",
    "[class*=\"team\"]",
    "[class*=\"about\"]",
    "[id*=\"contact\"]",
    "[id*=\"team\"]",
    "main",
    "address",
    "footer",
];

pub trait EmailExtractor: Send + Sync {
    /// Candidate addresses for one page, best first, already filtered.
    fn extract(&self, html: &str, record: &InvestorRecord) -> Vec<String>;
}

/// Ranks `mailto:` links above addresses found in page text, and text
/// from contact/team/about sections above the rest of the document.
pub struct MailtoFirstExtractor {
    pattern: Regex,
}

impl MailtoFirstExtractor {
    pub fn new() -> Self {
        let pattern = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern is a valid regex");
        Self { pattern }
    }

    fn scan_text(&self, text: &str, out: &mut Vec<String>) {
        for found in self.pattern.find_iter(text) {
            out.push(found.as_str().to_lowercase());
        }
    }
}

impl Default for MailtoFirstExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailExtractor for MailtoFirstExtractor {
    fn extract(&self, html: &str, record: &InvestorRecord) -> Vec<String> {
        let doc = Html::parse_document(html);
        let mut candidates = Vec::new();

        if let Ok(mailto_sel) = Selector::parse("a[href^=\"mailto:\"]") {
            for link in doc.select(&mailto_sel) {
                if let Some(href) = link.value().attr("href") {
                    let address = href
                        .trim_start_matches("mailto:")
                        .split('?')
                        .next()
                        .unwrap_or_default()
                        .trim()
                        .to_lowercase();
                    if !address.is_empty() {
                        candidates.push(address);
                    }
                }
            }
        }

        for raw in PRIORITY_SECTIONS {
            if let Ok(sel) = Selector::parse(raw) {
                for node in doc.select(&sel) {
                    let text = node.text().collect::<Vec<_>>().join(" ");
                    self.scan_text(&text, &mut candidates);
                }
            }
        }

        let full_text = doc.root_element().text().collect::<Vec<_>>().join(" ");
        self.scan_text(&full_text, &mut candidates);

        let kind = record.kind();
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|email| accepts(email, kind))
            .filter(|email| seen.insert(email.clone()))
            .collect()
    }
}

fn accepts(email: &str, kind: InvestorKind) -> bool {
    if email.len() < 5 {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let Some(tld) = domain.rsplit('.').next() else {
        return false;
    };
    if !domain.contains('.') || tld.len() < 2 {
        return false;
    }
    // Obfuscated or concatenated junk tends to pile up separators.
    if email.matches('.').count() > 3 || email.matches('-').count() > 2 {
        return false;
    }
    if EXCLUDED_FRAGMENTS
        .iter()
        .any(|fragment| email.contains(fragment))
    {
        return false;
    }
    if kind == InvestorKind::Company && FREEMAIL_DOMAINS.contains(&domain) {
        return false;
    }
    true
}

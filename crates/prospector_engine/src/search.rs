use std::collections::HashSet;
use std::sync::Arc;

use probe_logging::probe_debug;
use scraper::{Html, Selector};
use url::Url;

use crate::decode::decode_html;
use crate::fetch::PageFetcher;
use crate::types::{FetchError, FetchFailure, InvestorKind, InvestorRecord};

/// DuckDuckGo's no-javascript results endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const DEFAULT_MAX_RESULTS: usize = 8;

/// Domains that never publish an investor's own contact address.
const SKIP_DOMAINS: &[&str] = &[
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "tiktok.com",
    "pinterest.com",
    "reddit.com",
    "wikipedia.org",
    "duckduckgo.com",
];

#[async_trait::async_trait]
pub trait WebSearcher: Send + Sync {
    /// Candidate result URLs for one query, best first.
    async fn search(&self, query: &str) -> Result<Vec<Url>, FetchError>;
}

/// Searches DuckDuckGo's HTML endpoint and unwraps its redirect links.
///
/// The endpoint is configurable so tests can point it at a local
/// fixture server.
pub struct DuckDuckGoSearcher {
    fetcher: Arc<dyn PageFetcher>,
    endpoint: Url,
    max_results: usize,
}

impl DuckDuckGoSearcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        let endpoint = Url::parse(DEFAULT_SEARCH_ENDPOINT)
            .expect("default search endpoint is a valid url");
        Self {
            fetcher,
            endpoint,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_endpoint(fetcher: Arc<dyn PageFetcher>, endpoint: Url, max_results: usize) -> Self {
        Self {
            fetcher,
            endpoint,
            max_results,
        }
    }
}

#[async_trait::async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str) -> Result<Vec<Url>, FetchError> {
        let mut request_url = self.endpoint.clone();
        request_url.query_pairs_mut().clear().append_pair("q", query);

        probe_debug!("Searching for: {query}");
        let output = self.fetcher.fetch(&request_url).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());

        let doc = Html::parse_document(&decoded.html);
        let result_sel = Selector::parse("a.result__a")
            .map_err(|_| FetchError::new(FetchFailure::Network, "bad result selector"))?;

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for anchor in doc.select(&result_sel) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(target) = resolve_result_url(href, &self.endpoint) else {
                continue;
            };
            if is_skipped(&target) || !seen.insert(target.to_string()) {
                continue;
            }
            results.push(target);
            if results.len() >= self.max_results {
                break;
            }
        }
        probe_debug!("Search returned {} usable results", results.len());
        Ok(results)
    }
}

/// Result anchors are either direct links or `/l/?uddg=<target>`
/// redirects; unwrap the latter to the real destination.
fn resolve_result_url(href: &str, base: &Url) -> Option<Url> {
    let absolute = match Url::parse(href) {
        Ok(url) => url,
        Err(_) => base.join(href).ok()?,
    };
    if let Some(target) = absolute
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
    {
        return Url::parse(&target).ok();
    }
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

fn is_skipped(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return true;
    };
    let host = host.to_lowercase();
    SKIP_DOMAINS
        .iter()
        .any(|skip| host == *skip || host.ends_with(&format!(".{skip}")))
}

/// Query phrasings per investor kind, most specific first.
pub fn build_queries(record: &InvestorRecord) -> Vec<String> {
    let name = &record.name;
    match record.kind() {
        InvestorKind::Person => vec![
            format!("\"{name}\" email contact investor"),
            format!("\"{name}\" contact information"),
        ],
        InvestorKind::Company => vec![
            format!("\"{name}\" contact email team"),
            format!("\"{name}\" investment contact"),
        ],
    }
}

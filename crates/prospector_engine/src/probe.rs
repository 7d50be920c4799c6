use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use probe_logging::{probe_debug, probe_info, probe_warn};
use scraper::{Html, Selector};
use url::Url;

use crate::decode::decode_html;
use crate::emails::EmailExtractor;
use crate::fetch::PageFetcher;
use crate::search::{build_queries, WebSearcher};
use crate::types::{FetchError, InvestorRecord, ProbeError};

/// Link text/path fragments that mark pages worth scanning for contact
/// addresses.
const CONTACT_HINTS: &[&str] = &["contact", "about", "team", "people", "partners"];

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Hard cap on pages fetched for one row; bounds probe duration.
    pub max_pages: usize,
    /// Cap on contact-ish links followed from a known website.
    pub max_contact_links: usize,
    /// Politeness delay between page fetches within one probe.
    pub page_delay: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            max_pages: 5,
            max_contact_links: 4,
            page_delay: Duration::from_millis(1500),
        }
    }
}

#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Attempt to discover a contact email for one row.
    ///
    /// Must not panic and must return within a finite time; every page
    /// fetch underneath carries its own timeout.
    async fn probe(&self, record: &InvestorRecord) -> Result<String, ProbeError>;
}

/// Probes an investor's web presence: their stated website when the
/// roster has one, web search results otherwise.
pub struct WebProber {
    fetcher: Arc<dyn PageFetcher>,
    searcher: Arc<dyn WebSearcher>,
    extractor: Arc<dyn EmailExtractor>,
    settings: ProbeSettings,
}

impl WebProber {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        searcher: Arc<dyn WebSearcher>,
        extractor: Arc<dyn EmailExtractor>,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            fetcher,
            searcher,
            extractor,
            settings,
        }
    }

    /// Fetch one page and return its best candidate address, if any.
    async fn scan_page(
        &self,
        url: &Url,
        record: &InvestorRecord,
    ) -> Result<Option<String>, FetchError> {
        let output = self.fetcher.fetch(url).await?;
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        let mut candidates = self.extractor.extract(&decoded.html, record);
        if candidates.is_empty() {
            Ok(None)
        } else {
            Ok(Some(candidates.remove(0)))
        }
    }

    async fn probe_website(
        &self,
        site: &str,
        record: &InvestorRecord,
    ) -> Result<String, ProbeError> {
        let root =
            Url::parse(site).map_err(|_| ProbeError::InvalidWebsite(site.to_string()))?;

        let output = match self.fetcher.fetch(&root).await {
            Ok(output) => output,
            Err(err) => return Err(ProbeError::Unreachable(err)),
        };
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        let mut candidates = self.extractor.extract(&decoded.html, record);
        if !candidates.is_empty() {
            return Ok(candidates.remove(0));
        }

        let follow_ups = contact_links(&decoded.html, &root, self.settings.max_contact_links);
        probe_debug!(
            "No email on {} itself, following {} contact links",
            root,
            follow_ups.len()
        );
        for url in follow_ups.iter().take(self.settings.max_pages) {
            tokio::time::sleep(self.settings.page_delay).await;
            match self.scan_page(url, record).await {
                Ok(Some(email)) => return Ok(email),
                Ok(None) => {}
                Err(err) => probe_debug!("Skipping {url}: {err}"),
            }
        }
        Err(ProbeError::NoEmailFound)
    }

    async fn probe_by_search(&self, record: &InvestorRecord) -> Result<String, ProbeError> {
        let mut pages: Vec<Url> = Vec::new();
        let mut seen = HashSet::new();
        for query in build_queries(record) {
            match self.searcher.search(&query).await {
                Ok(urls) => {
                    for url in urls {
                        if seen.insert(url.to_string()) {
                            pages.push(url);
                        }
                    }
                }
                Err(err) => probe_warn!("Search failed for '{query}': {err}"),
            }
            if pages.len() >= self.settings.max_pages {
                break;
            }
        }
        if pages.is_empty() {
            return Err(ProbeError::NoSearchResults);
        }

        let mut fetched_any = false;
        let mut last_failure = None;
        for (index, url) in pages.iter().take(self.settings.max_pages).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.settings.page_delay).await;
            }
            match self.scan_page(url, record).await {
                Ok(Some(email)) => return Ok(email),
                Ok(None) => fetched_any = true,
                Err(err) => {
                    probe_debug!("Skipping {url}: {err}");
                    last_failure = Some(err);
                }
            }
        }
        if fetched_any {
            Err(ProbeError::NoEmailFound)
        } else {
            match last_failure {
                Some(err) => Err(ProbeError::Unreachable(err)),
                None => Err(ProbeError::NoSearchResults),
            }
        }
    }
}

#[async_trait::async_trait]
impl Prober for WebProber {
    async fn probe(&self, record: &InvestorRecord) -> Result<String, ProbeError> {
        probe_info!("Probing {}", record.name);
        match &record.website {
            Some(site) => self.probe_website(site, record).await,
            None => self.probe_by_search(record).await,
        }
    }
}

/// Same-host links from `html` whose text or path suggests a contact
/// page, resolved against `base`, deduplicated, capped at `max`.
fn contact_links(html: &str, base: &Url, max: usize) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let Ok(anchor_sel) = Selector::parse("a") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in doc.select(&anchor_sel) {
        if links.len() >= max {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(href, base) else {
            continue;
        };
        if url.host_str() != base.host_str() {
            continue;
        }
        let text = anchor.text().collect::<String>().to_lowercase();
        let path = url.path().to_lowercase();
        let interesting = CONTACT_HINTS
            .iter()
            .any(|hint| text.contains(hint) || path.contains(hint));
        if interesting && seen.insert(url.to_string()) {
            links.push(url);
        }
    }
    links
}

fn resolve_link(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#')
        || lower.starts_with('?')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(_) => base.join(trimmed).ok(),
    }
}

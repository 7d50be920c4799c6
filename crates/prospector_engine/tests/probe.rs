use std::sync::Arc;
use std::time::Duration;

use prospector_engine::{
    FetchError, FetchSettings, InvestorRecord, MailtoFirstExtractor, ProbeError, ProbeSettings,
    Prober, ReqwestFetcher, WebProber, WebSearcher,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Searcher stub returning a fixed result list.
struct FixedSearcher {
    urls: Vec<Url>,
}

#[async_trait::async_trait]
impl WebSearcher for FixedSearcher {
    async fn search(&self, _query: &str) -> Result<Vec<Url>, FetchError> {
        Ok(self.urls.clone())
    }
}

fn prober_with(searcher: FixedSearcher) -> WebProber {
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    let settings = ProbeSettings {
        page_delay: Duration::ZERO,
        ..ProbeSettings::default()
    };
    WebProber::new(
        fetcher,
        Arc::new(searcher),
        Arc::new(MailtoFirstExtractor::new()),
        settings,
    )
}

fn no_searcher() -> FixedSearcher {
    FixedSearcher { urls: Vec::new() }
}

#[tokio::test]
async fn website_probe_follows_contact_link_to_mailto() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body>
                 <a href="/portfolio">Portfolio</a>
                 <a href="/contact">Contact us</a>
               </body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body>
                 <a href="mailto:partners@acmecap.com?subject=hi">Write to us</a>
               </body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let record = InvestorRecord {
        name: "Acme Capital".to_string(),
        website: Some(server.uri()),
    };

    let email = prober_with(no_searcher()).probe(&record).await.unwrap();
    assert_eq!(email, "partners@acmecap.com");
}

#[tokio::test]
async fn website_probe_prefers_email_on_the_homepage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><p>Reach us at hello@acmecap.com</p></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let record = InvestorRecord {
        name: "Acme Capital".to_string(),
        website: Some(server.uri()),
    };

    let email = prober_with(no_searcher()).probe(&record).await.unwrap();
    assert_eq!(email, "hello@acmecap.com");
}

#[tokio::test]
async fn unreachable_website_reports_the_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let record = InvestorRecord {
        name: "Acme Capital".to_string(),
        website: Some(server.uri()),
    };

    let err = prober_with(no_searcher()).probe(&record).await.unwrap_err();
    assert!(matches!(err, ProbeError::Unreachable(_)));
}

#[tokio::test]
async fn search_probe_scans_result_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><div class="contact">jane@roeventures.com</div></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let record = InvestorRecord::named("Jane Roe");
    let searcher = FixedSearcher {
        urls: vec![Url::parse(&format!("{}/profile", server.uri())).unwrap()],
    };

    let email = prober_with(searcher).probe(&record).await.unwrap();
    assert_eq!(email, "jane@roeventures.com");
}

#[tokio::test]
async fn empty_search_results_are_reported() {
    let record = InvestorRecord::named("Jane Roe");
    let err = prober_with(no_searcher()).probe(&record).await.unwrap_err();
    assert_eq!(err, ProbeError::NoSearchResults);
}

#[tokio::test]
async fn pages_without_emails_report_no_email_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>nothing here</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let record = InvestorRecord::named("Jane Roe");
    let searcher = FixedSearcher {
        urls: vec![Url::parse(&format!("{}/profile", server.uri())).unwrap()],
    };

    let err = prober_with(searcher).probe(&record).await.unwrap_err();
    assert_eq!(err, ProbeError::NoEmailFound);
}

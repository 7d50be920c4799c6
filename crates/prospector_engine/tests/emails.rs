use prospector_engine::{EmailExtractor, InvestorRecord, MailtoFirstExtractor};

fn company() -> InvestorRecord {
    InvestorRecord::named("Acme Capital")
}

fn person() -> InvestorRecord {
    InvestorRecord::named("Jane Roe")
}

#[test]
fn mailto_links_outrank_text_addresses() {
    let html = r#"
        <html><body>
          <p>General inbox: text@acmecap.com</p>
          <a href="mailto:partners@acmecap.com">Partners</a>
        </body></html>
    "#;
    let found = MailtoFirstExtractor::new().extract(html, &company());
    assert_eq!(found[0], "partners@acmecap.com");
    assert!(found.contains(&"text@acmecap.com".to_string()));
}

#[test]
fn mailto_query_params_are_stripped() {
    let html = r#"<a href="mailto:team@acmecap.com?subject=deal&body=hi">mail</a>"#;
    let found = MailtoFirstExtractor::new().extract(html, &company());
    assert_eq!(found, vec!["team@acmecap.com"]);
}

#[test]
fn contact_sections_outrank_the_rest_of_the_page() {
    let html = r#"
        <html><body>
          <div>elsewhere@acmecap.com</div>
          <div class="contact-block">reach@acmecap.com</div>
        </body></html>
    "#;
    let found = MailtoFirstExtractor::new().extract(html, &company());
    assert_eq!(found[0], "reach@acmecap.com");
}

#[test]
fn machine_mailboxes_are_filtered() {
    let html = r#"
        <html><body>
          noreply@acmecap.com no-reply@acmecap.com bounce@mailer.acmecap.com
          webmaster@acmecap.com ping@sentry.io partners@acmecap.com
        </body></html>
    "#;
    let found = MailtoFirstExtractor::new().extract(html, &company());
    assert_eq!(found, vec!["partners@acmecap.com"]);
}

#[test]
fn freemail_is_dropped_for_companies_but_kept_for_people() {
    let html = "<html><body>someone@gmail.com</body></html>";
    let extractor = MailtoFirstExtractor::new();

    assert!(extractor.extract(html, &company()).is_empty());
    assert_eq!(extractor.extract(html, &person()), vec!["someone@gmail.com"]);
}

#[test]
fn junk_locals_and_domains_are_rejected() {
    let html = r#"
        <html><body>
          12345@acmecap.com tag@x.y.z.w.example a-b-c-d@dashes.example
        </body></html>
    "#;
    let found = MailtoFirstExtractor::new().extract(html, &person());
    assert!(found.is_empty());
}

#[test]
fn addresses_are_lowercased_and_deduplicated() {
    let html = r#"
        <html><body>
          <a href="mailto:Partners@AcmeCap.com">a</a>
          partners@acmecap.com PARTNERS@ACMECAP.COM
        </body></html>
    "#;
    let found = MailtoFirstExtractor::new().extract(html, &company());
    assert_eq!(found, vec!["partners@acmecap.com"]);
}

mod config;
mod http;
mod logging;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use probe_logging::probe_info;
use prospector_engine::{
    ensure_data_dir, CsvReportWriter, DuckDuckGoSearcher, FetchSettings, JobController,
    MailtoFirstExtractor, NowFn, ProbeSettings, ReqwestFetcher, WebProber,
};

use crate::config::AppConfig;
use crate::http::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();
    logging::initialize(config.log_destination);

    ensure_data_dir(&config.uploads_dir()).context("preparing uploads directory")?;
    ensure_data_dir(&config.results_dir()).context("preparing results directory")?;

    let now: NowFn = Arc::new(|| chrono::Utc::now().to_rfc3339());
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()));
    let searcher = Arc::new(DuckDuckGoSearcher::new(fetcher.clone()));
    let prober = Arc::new(WebProber::new(
        fetcher,
        searcher,
        Arc::new(MailtoFirstExtractor::new()),
        ProbeSettings::default(),
    ));
    let writer = Arc::new(CsvReportWriter::new(config.results_dir(), now.clone()));
    let controller = JobController::new(prober, writer, now);

    let context = AppContext {
        controller,
        uploads_dir: config.uploads_dir(),
        results_dir: config.results_dir(),
    };
    let app = http::build_router(context);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    probe_info!("Prospector listening on {addr}");
    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}

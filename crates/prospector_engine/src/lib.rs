//! Prospector engine: the probing pipeline and the job controller.
mod controller;
mod decode;
mod emails;
mod fetch;
mod filename;
mod persist;
mod probe;
mod report;
mod roster;
mod search;
mod types;

pub use controller::{ControlError, JobController};
pub use decode::{decode_html, DecodedHtml};
pub use emails::{EmailExtractor, MailtoFirstExtractor};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use filename::{results_filename, sanitize, upload_filename};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use probe::{ProbeSettings, Prober, WebProber};
pub use report::{CsvReportWriter, ReportError, ResultWriter};
pub use roster::{parse_roster, RosterError};
pub use search::{build_queries, DuckDuckGoSearcher, WebSearcher, DEFAULT_SEARCH_ENDPOINT};
pub use types::{
    FetchError, FetchFailure, FetchMetadata, FetchOutput, InvestorKind, InvestorRecord, NowFn,
    ProbeError,
};

use std::fmt;
use std::sync::Arc;

/// One roster row: an investor identity plus whatever the prober can
/// use to find their web presence. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestorRecord {
    pub name: String,
    /// Explicit http(s) website from the roster, if the row carried one.
    pub website: Option<String>,
}

impl InvestorRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: None,
        }
    }

    pub fn kind(&self) -> InvestorKind {
        classify(&self.name)
    }
}

/// Rough classification of a roster name, used to phrase search queries
/// and to decide whether freemail addresses are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestorKind {
    Person,
    Company,
}

const COMPANY_INDICATORS: &[&str] = &[
    "ventures",
    "capital",
    "fund",
    "partners",
    "group",
    "corp",
    "ltd",
    "inc",
    "llc",
    "bank",
    "foundation",
    "holdings",
    "management",
    "equity",
    "angels",
    "advisors",
    "family office",
    "asset",
];

fn classify(name: &str) -> InvestorKind {
    let lowered = name.to_lowercase();
    if COMPANY_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
    {
        InvestorKind::Company
    } else {
        InvestorKind::Person
    }
}

/// Injected clock returning the current UTC time as an RFC3339 string.
/// Keeps the engine deterministic under test.
pub type NowFn = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchFailure,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FetchFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::InvalidUrl => write!(f, "invalid url"),
            FetchFailure::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FetchFailure::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FetchFailure::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FetchFailure::Network => write!(f, "network error"),
        }
    }
}

/// Why a probe produced no email. Always local to one row; the run
/// continues past it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid website url: {0}")]
    InvalidWebsite(String),
    #[error("site unreachable: {0}")]
    Unreachable(FetchError),
    #[error("no pages found to scan")]
    NoSearchResults,
    #[error("no email found")]
    NoEmailFound,
}

#[cfg(test)]
mod tests {
    use super::{InvestorKind, InvestorRecord};

    #[test]
    fn fund_names_classify_as_companies() {
        for name in ["Acme Capital", "beacon VENTURES", "Roe Family Office"] {
            assert_eq!(InvestorRecord::named(name).kind(), InvestorKind::Company);
        }
    }

    #[test]
    fn plain_names_classify_as_people() {
        for name in ["Jane Roe", "Taylor Smith"] {
            assert_eq!(InvestorRecord::named(name).kind(), InvestorKind::Person);
        }
    }
}

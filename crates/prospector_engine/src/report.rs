use std::path::PathBuf;

use prospector_core::Finding;

use crate::filename::results_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::types::NowFn;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{0}")]
    Persist(#[from] PersistError),
}

pub trait ResultWriter: Send + Sync {
    /// Serialize the findings of a completed run and return the
    /// artifact identifier they were written under.
    fn write(&self, findings: &[Finding]) -> Result<String, ReportError>;
}

/// Writes findings as a CSV artifact in the results directory.
pub struct CsvReportWriter {
    dir: PathBuf,
    now: NowFn,
}

impl CsvReportWriter {
    pub fn new(dir: PathBuf, now: NowFn) -> Self {
        Self { dir, now }
    }
}

impl ResultWriter for CsvReportWriter {
    fn write(&self, findings: &[Finding]) -> Result<String, ReportError> {
        let written_at = (self.now)();
        let filename = results_filename(&written_at);

        let mut buffer = String::from("investor_name,email,found_utc\n");
        for finding in findings {
            buffer.push_str(&csv_field(&finding.investor));
            buffer.push(',');
            buffer.push_str(&csv_field(&finding.email));
            buffer.push(',');
            buffer.push_str(&csv_field(&written_at));
            buffer.push('\n');
        }

        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(&filename, &buffer)?;
        Ok(filename)
    }
}

/// Quote a CSV field when it carries a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::csv_field;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_field("hello@acmecap.com"), "hello@acmecap.com");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        assert_eq!(csv_field("Acme, Inc"), "\"Acme, Inc\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

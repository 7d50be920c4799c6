use std::env;
use std::path::PathBuf;

use crate::logging::LogDestination;

const DEFAULT_PORT: u16 = 5000;

/// Server configuration, read once from the environment at startup.
#[derive(Debug)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PROSPECTOR_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = env::var("PROSPECTOR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let log_destination = match env::var("PROSPECTOR_LOG").as_deref() {
            Ok("file") => LogDestination::File,
            Ok("both") => LogDestination::Both,
            _ => LogDestination::Terminal,
        };
        Self {
            port,
            data_dir,
            log_destination,
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.data_dir.join("results")
    }
}

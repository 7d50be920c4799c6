use axum::extract::{Extension, Multipart, Path};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use probe_logging::{probe_info, probe_warn};
use prospector_core::JobSnapshot;
use prospector_engine::{parse_roster, upload_filename, AtomicFileWriter};
use serde::{Deserialize, Serialize};

use super::AppContext;

const PREVIEW_ROWS: usize = 10;

#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn ok() -> Json<Self> {
        Json(Self {
            success: true,
            error: None,
        })
    }
}

fn api_error(code: StatusCode, message: impl Into<String>) -> Response {
    (
        code,
        Json(ApiResponse {
            success: false,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    filename: String,
    count: usize,
    preview: Vec<String>,
}

#[derive(Deserialize)]
pub struct StartRequest {
    filename: String,
}

#[derive(Serialize)]
pub(crate) struct StatusResponse {
    running: bool,
    progress: usize,
    total: usize,
    current_investor: String,
    emails_found: usize,
    start_time: Option<String>,
    errors: Vec<String>,
    results_file: Option<String>,
}

impl From<JobSnapshot> for StatusResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        Self {
            running: snapshot.running,
            progress: snapshot.progress,
            total: snapshot.total,
            current_investor: snapshot.current_investor,
            emails_found: snapshot.emails_found,
            start_time: snapshot.start_time,
            errors: snapshot.errors,
            results_file: snapshot.results_file,
        }
    }
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Accept a roster upload, validate it, and store it for `/start`.
pub async fn upload_handler(
    Extension(context): Extension<AppContext>,
    mut multipart: Multipart,
) -> Response {
    let mut file = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let original = field
                    .file_name()
                    .unwrap_or("roster.csv")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((original, bytes)),
                    Err(err) => {
                        return api_error(
                            StatusCode::BAD_REQUEST,
                            format!("failed to read upload: {err}"),
                        )
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(err) => {
                return api_error(
                    StatusCode::BAD_REQUEST,
                    format!("invalid multipart body: {err}"),
                )
            }
        }
    }

    let Some((original, bytes)) = file else {
        return api_error(StatusCode::BAD_REQUEST, "no file provided");
    };
    if !original.to_lowercase().ends_with(".csv") {
        return api_error(
            StatusCode::BAD_REQUEST,
            "unsupported file format, upload a .csv file",
        );
    }
    let Ok(text) = std::str::from_utf8(&bytes) else {
        return api_error(StatusCode::BAD_REQUEST, "file is not valid UTF-8 text");
    };
    let records = match parse_roster(text) {
        Ok(records) => records,
        Err(err) => return api_error(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let filename = upload_filename(&original, &bytes);
    let writer = AtomicFileWriter::new(context.uploads_dir.clone());
    if let Err(err) = writer.write_bytes(&filename, &bytes) {
        probe_warn!("Failed to store upload {filename}: {err}");
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to store upload");
    }

    probe_info!("Stored roster {} with {} rows", filename, records.len());
    let preview = records
        .iter()
        .take(PREVIEW_ROWS)
        .map(|record| record.name.clone())
        .collect();
    Json(UploadResponse {
        success: true,
        filename,
        count: records.len(),
        preview,
    })
    .into_response()
}

/// Launch the scraping job for a previously uploaded roster.
pub async fn start_handler(
    Extension(context): Extension<AppContext>,
    Json(request): Json<StartRequest>,
) -> Response {
    if !is_safe_filename(&request.filename) {
        return api_error(StatusCode::BAD_REQUEST, "invalid filename");
    }
    let path = context.uploads_dir.join(&request.filename);
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(_) => return api_error(StatusCode::NOT_FOUND, "uploaded file not found"),
    };
    let records = match parse_roster(&text) {
        Ok(records) => records,
        Err(err) => return api_error(StatusCode::BAD_REQUEST, err.to_string()),
    };
    match context.controller.start(records) {
        Ok(()) => ApiResponse::ok().into_response(),
        Err(err) => api_error(StatusCode::CONFLICT, err.to_string()),
    }
}

/// Request cooperative cancellation of the running job.
pub async fn stop_handler(Extension(context): Extension<AppContext>) -> Response {
    match context.controller.stop() {
        Ok(()) => ApiResponse::ok().into_response(),
        Err(err) => api_error(StatusCode::CONFLICT, err.to_string()),
    }
}

/// Snapshot of the job state, polled by the front end.
pub async fn status_handler(Extension(context): Extension<AppContext>) -> Json<StatusResponse> {
    Json(StatusResponse::from(context.controller.status()))
}

/// Serve a finished results artifact as an attachment.
pub async fn download_handler(
    Extension(context): Extension<AppContext>,
    Path(filename): Path<String>,
) -> Response {
    if !is_safe_filename(&filename) {
        return api_error(StatusCode::BAD_REQUEST, "invalid filename");
    }
    let path = context.results_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let disposition = format!("attachment; filename=\"{filename}\"");
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(_) => api_error(StatusCode::NOT_FOUND, "results file not found"),
    }
}

/// Names produced by the upload/report paths never contain separators;
/// anything else is a traversal attempt.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

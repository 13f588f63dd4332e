// REST API routes for the single-page analyzer
// The credential is resolved per request and never echoed back.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AppState, INDEX_HTML};
use crate::ai::classifier::ERROR_PREFIX;
use crate::ai::TextGenerator;
use crate::config::{APP_NAME, APP_VERSION, MODEL_ID, RESULTS_FILENAME};
use crate::error::AppError;
use crate::runner;
use crate::table::AugmentedTable;

// ---- Request/Response types ----

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub post_text: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub result: String,
    pub ok: bool,
}

#[derive(Serialize)]
pub struct BatchResponse {
    #[serde(flatten)]
    pub table: AugmentedTable,
    pub csv: String,
    pub filename: &'static str,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub model: &'static str,
    pub credential_configured: bool,
}

/// Fields of a bulk upload form
struct BatchUpload {
    file: Option<Vec<u8>>,
    api_key: Option<String>,
}

// ---- Route registration ----

pub fn api_routes<G: TextGenerator + 'static>() -> Router<Arc<AppState<G>>> {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(get_status::<G>))
        .route("/api/analyze", post(analyze_post::<G>))
        .route("/api/analyze/csv", post(analyze_csv::<G>))
        .route("/api/analyze/csv/download", post(download_csv::<G>))
}

// ---- Handlers ----

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_status<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        name: APP_NAME,
        version: APP_VERSION,
        model: MODEL_ID,
        credential_configured: state.default_credential.is_some(),
    })
}

async fn analyze_post<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let credential = state.credential_for(body.api_key);
    let result =
        runner::analyze_single(&state.generator, credential.as_ref(), &body.post_text).await?;

    Ok(Json(AnalyzeResponse {
        ok: !result.starts_with(ERROR_PREFIX),
        result,
    }))
}

async fn analyze_csv<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    multipart: Multipart,
) -> Result<Json<BatchResponse>, AppError> {
    let table = run_upload(&state, multipart).await?;
    let csv = table.to_csv_string()?;

    Ok(Json(BatchResponse {
        table,
        csv,
        filename: RESULTS_FILENAME,
    }))
}

/// Runs a fresh bulk submission over the upload and returns the export as an
/// attachment. Every row is classified again; the page downloads the `csv`
/// field of `/api/analyze/csv` instead, so this is for scripted clients.
async fn download_csv<G: TextGenerator>(
    State(state): State<Arc<AppState<G>>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let table = run_upload(&state, multipart).await?;
    let bytes = table.to_csv_bytes()?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{RESULTS_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ---- Helpers ----

async fn run_upload<G: TextGenerator>(
    state: &AppState<G>,
    multipart: Multipart,
) -> Result<AugmentedTable, AppError> {
    let upload = read_upload(multipart).await?;
    let credential = state.credential_for(upload.api_key);
    let table =
        runner::analyze_table(&state.generator, credential.as_ref(), upload.file.as_deref())
            .await?;
    Ok(table)
}

async fn read_upload(mut multipart: Multipart) -> Result<BatchUpload, AppError> {
    let mut upload = BatchUpload {
        file: None,
        api_key: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Failed to read upload: {e}")))?
    {
        let name = field.name().unwrap_or("").to_owned();
        match name.as_str() {
            "api_key" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read api_key: {e}")))?;
                upload.api_key = Some(text);
            }
            "file" => {
                // Browsers send an empty, unnamed part when no file was picked
                let unnamed = field.file_name().map_or(true, str::is_empty);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read file data: {e}")))?;
                if !(unnamed && bytes.is_empty()) {
                    upload.file = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}

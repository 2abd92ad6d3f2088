//! Axum route handler for résumé auto-fill.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::{extract_text, MAX_UPLOAD_BYTES};
use crate::extractors::AppQuery;
use crate::profile::{extract_profile, Language, Profile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutoFillQuery {
    pub language: Option<Language>,
}

struct Upload {
    filename: String,
    content: Bytes,
}

/// POST /cv/auto-fill
///
/// Multipart body with a `file` part and an optional `language` part.
/// `language` may also come from the query string; the form value wins.
pub async fn handle_cv_auto_fill(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AutoFillQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Profile>, AppError> {
    let mut multipart = multipart?;
    let mut upload: Option<Upload> = None;
    let mut language = query.language.unwrap_or_default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload { filename, content });
            }
            Some("language") => {
                language = field.text().await.map_err(multipart_error)?.parse()?;
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".into()))?;

    info!(
        "CV upload '{}' ({} bytes), language={language}",
        upload.filename,
        upload.content.len()
    );

    let cv_text = tokio::task::spawn_blocking(move || {
        extract_text(&upload.filename, &upload.content)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("text extraction task failed: {e}")))??;

    let profile = extract_profile(state.llm.as_ref(), &cv_text, language).await?;
    Ok(Json(profile))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            limit: MAX_UPLOAD_BYTES,
        }
    } else {
        AppError::Validation(format!("invalid multipart body: {}", err.body_text()))
    }
}

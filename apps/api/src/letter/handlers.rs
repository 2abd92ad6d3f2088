//! Axum route handler for cover letter generation.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extractors::AppJson;
use crate::letter::{generate_letter, LetterRequest, LetterResult};
use crate::state::AppState;

/// POST /letter/from-url
///
/// Fetches the job posting, then writes a letter grounded in the posted profile.
pub async fn handle_letter_from_url(
    State(state): State<AppState>,
    AppJson(request): AppJson<LetterRequest>,
) -> Result<Json<LetterResult>, AppError> {
    if request.job_url.trim().is_empty() {
        return Err(AppError::Validation("job_url cannot be empty".to_string()));
    }

    let result = generate_letter(&state.fetcher, state.llm.as_ref(), request).await?;
    Ok(Json(result))
}

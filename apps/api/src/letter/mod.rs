//! Cover letter generation from a job posting URL, a profile and style options.
//!
//! The posting is fetched and sanitized, embedded in a grounded prompt, sent in
//! one LLM call, and the reply is stripped of delimiters. The job text is used
//! once and never stored.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::fetch::{truncate_chars, JobFetcher, DEFAULT_MAX_BYTES};
use crate::llm_client::prompts::{render, NO_FABRICATION};
use crate::llm_client::{ChatMessage, ChatProvider, ChatRequest};
use crate::profile::Profile;

pub mod handlers;
pub mod prompts;
pub mod style;

use prompts::{LETTER_PROMPT_TEMPLATE, LETTER_SYSTEM_TEMPLATE};
pub use style::StyleOptions;

/// Characters of job text echoed back as `job_excerpt`.
pub const JOB_EXCERPT_CHARS: usize = 700;

const LETTER_TEMPERATURE: f32 = 0.4;
const LETTER_CALL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize)]
pub struct LetterRequest {
    pub job_url: String,
    pub profile: Profile,
    #[serde(flatten)]
    pub style: StyleOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterResult {
    pub cover_letter: String,
    pub job_excerpt: Option<String>,
}

impl LetterResult {
    fn new(cover_letter: String, job_text: &str) -> Self {
        let excerpt = truncate_chars(job_text, JOB_EXCERPT_CHARS);
        LetterResult {
            cover_letter,
            job_excerpt: (!excerpt.is_empty()).then_some(excerpt),
        }
    }
}

/// Full flow behind `POST /letter/from-url`.
pub async fn generate_letter(
    fetcher: &JobFetcher,
    llm: &dyn ChatProvider,
    request: LetterRequest,
) -> Result<LetterResult, AppError> {
    let job_text = fetcher
        .fetch_job_text(&request.job_url, DEFAULT_MAX_BYTES)
        .await?;
    letter_for_job_text(llm, request, &job_text).await
}

/// Everything after the fetch: blank-page check, profile normalization,
/// the LLM call and the excerpt.
async fn letter_for_job_text(
    llm: &dyn ChatProvider,
    request: LetterRequest,
    job_text: &str,
) -> Result<LetterResult, AppError> {
    if job_text.trim().is_empty() {
        return Err(AppError::EmptyJobPage);
    }

    let profile = request.profile.normalized();
    let cover_letter = compose_letter(llm, &profile, &request.style, job_text).await?;

    info!(
        "Generated {} cover letter ({} chars) in '{}'",
        request.style.tone,
        cover_letter.chars().count(),
        request.style.language
    );
    Ok(LetterResult::new(cover_letter, job_text))
}

/// Asks the model for the letter body and cleans the reply.
/// A reply that is blank after cleaning is `EmptyAiResponse`.
pub async fn compose_letter(
    llm: &dyn ChatProvider,
    profile: &Profile,
    style: &StyleOptions,
    job_text: &str,
) -> Result<String, AppError> {
    let request = build_letter_request(profile, style, job_text)?;
    let reply = llm.complete(request).await?;

    let letter = clean_letter(&reply);
    if letter.is_empty() {
        return Err(AppError::EmptyAiResponse);
    }
    Ok(letter.to_string())
}

fn build_letter_request(
    profile: &Profile,
    style: &StyleOptions,
    job_text: &str,
) -> Result<ChatRequest, AppError> {
    let profile_json = serde_json::to_string_pretty(profile)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    let system = render(LETTER_SYSTEM_TEMPLATE, &[("no_fabrication", NO_FABRICATION)]);
    let tone = style.tone.to_string();
    let user = render(
        LETTER_PROMPT_TEMPLATE,
        &[
            ("language", style.language.code()),
            ("tone", tone.as_str()),
            ("length", style.length.word_band()),
            ("profile_json", profile_json.as_str()),
            ("job_text", job_text),
        ],
    );

    Ok(
        ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)])
            .temperature(LETTER_TEMPERATURE)
            .timeout(LETTER_CALL_TIMEOUT),
    )
}

/// Strips whitespace, backtick fences (with an optional language tag) and a
/// pair of surrounding quotes from a model reply.
fn clean_letter(raw: &str) -> &str {
    let mut text = raw.trim();

    if text.starts_with('`') {
        let fenced = text.starts_with("```");
        text = text.trim_matches('`');
        // ```text\n... leaves the tag on the first line
        if fenced {
            if let Some((first, rest)) = text.split_once('\n') {
                let tag = first.trim();
                if !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                    text = rest;
                }
            }
        }
        text = text.trim();
    } else {
        text = text.trim_end_matches('`').trim_end();
    }

    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}'), ('\u{ab}', '\u{bb}')] {
        if let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close)) {
            text = inner.trim();
            break;
        }
    }
    text
}

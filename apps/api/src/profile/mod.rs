//! Résumé text to a structured candidate profile via one LLM call.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::{render, JSON_OBJECT_ONLY, NO_FABRICATION};
use crate::llm_client::{complete_json, ChatMessage, ChatProvider, ChatRequest};

pub mod handlers;
pub mod normalize;
pub mod prompts;

use normalize::{norm_list, norm_str};
use prompts::{PROFILE_EXTRACT_PROMPT_TEMPLATE, PROFILE_EXTRACT_SYSTEM_TEMPLATE};

const PROFILE_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Output language for generated or rephrased text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
    Fr,
    Es,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Fr => "fr",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "es" => Ok(Language::Es),
            other => Err(AppError::Validation(format!(
                "unsupported language '{other}', expected one of ru, en, fr, es"
            ))),
        }
    }
}

/// Structured candidate data. Scalars are trimmed and non-empty or absent;
/// lists hold no blank or repeated entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
}

impl Profile {
    pub fn from_raw(raw: RawProfile) -> Self {
        Profile {
            name: norm_str(raw.name.as_deref()),
            email: norm_str(raw.email.as_deref()),
            phone: norm_str(raw.phone.as_deref()),
            skills: norm_list(raw.skills),
            experience: norm_list(raw.experience),
            education: norm_list(raw.education),
        }
    }

    /// Re-applies the field invariants to a profile that came from outside.
    pub fn normalized(self) -> Self {
        Profile::from_raw(RawProfile {
            name: self.name,
            email: self.email,
            phone: self.phone,
            skills: self.skills,
            experience: self.experience,
            education: self.education,
        })
    }
}

/// The shape the model is asked for, decoded leniently: every key is optional,
/// unknown keys are ignored, `null` lists are empty and non-string list entries
/// are skipped. Numbers in scalar fields (phones) are kept as text.
#[derive(Debug, Default, Deserialize)]
pub struct RawProfile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub experience: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub education: Vec<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// Builds the extraction request: deterministic, JSON-only, bounded.
fn build_extraction_request(cv_text: &str, language: Language) -> ChatRequest {
    let system = render(
        PROFILE_EXTRACT_SYSTEM_TEMPLATE,
        &[("no_fabrication", NO_FABRICATION), ("json_only", JSON_OBJECT_ONLY)],
    );
    let user = render(
        PROFILE_EXTRACT_PROMPT_TEMPLATE,
        &[("language", language.code()), ("cv_text", cv_text)],
    );

    ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)])
        .temperature(0.0)
        .json_mode()
        .timeout(PROFILE_CALL_TIMEOUT)
}

/// Extracts a normalized `Profile` from résumé text.
///
/// Blank text fails with `EmptyDocument` before the provider is called.
/// Any provider failure or non-JSON completion is `AiCallFailed`.
pub async fn extract_profile(
    llm: &dyn ChatProvider,
    cv_text: &str,
    language: Language,
) -> Result<Profile, AppError> {
    if cv_text.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }

    let raw: RawProfile = complete_json(llm, build_extraction_request(cv_text, language)).await?;
    let profile = Profile::from_raw(raw);

    info!(
        "Extracted profile: {} skills, {} experience, {} education entries",
        profile.skills.len(),
        profile.experience.len(),
        profile.education.len()
    );
    Ok(profile)
}

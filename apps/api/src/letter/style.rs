//! Style options for the generated letter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profile::Language;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Friendly,
    Concise,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tone::Formal => "formal",
            Tone::Friendly => "friendly",
            Tone::Concise => "concise",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Length {
    /// Target word-count band. Advisory text for the prompt; nothing enforces it.
    pub fn word_band(self) -> &'static str {
        match self {
            Length::Short => "about 120-160 words",
            Length::Medium => "about 180-250 words",
            Length::Long => "about 300-400 words",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub length: Length,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_request_defaults() {
        let style: StyleOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(style.language, Language::Ru);
        assert_eq!(style.tone, Tone::Formal);
        assert_eq!(style.length, Length::Medium);
    }

    #[test]
    fn test_word_bands() {
        assert!(Length::Short.word_band().contains("120-160"));
        assert!(Length::Medium.word_band().contains("180-250"));
        assert!(Length::Long.word_band().contains("300-400"));
    }

    #[test]
    fn test_unknown_tone_is_rejected() {
        assert!(serde_json::from_str::<Tone>(r#""sarcastic""#).is_err());
        assert_eq!(serde_json::from_str::<Tone>(r#""friendly""#).unwrap(), Tone::Friendly);
    }
}

//! Multi-language text values.

use serde::{Deserialize, Serialize};

/// Languages metadata texts are written in.
pub const SUPPORTED_LANGUAGES: &[&str] = &["nb", "nn", "en"];

/// One text in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStringItem {
    pub language_code: String,
    pub language_text: String,
}

/// Ordered list of texts, at most one per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageStrings(pub Vec<LanguageStringItem>);

impl LanguageStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for a language code, if present.
    pub fn get(&self, language_code: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|item| item.language_code == language_code)
            .map(|item| item.language_text.as_str())
    }

    /// Set the text for a language, replacing any existing one.
    pub fn with(mut self, language_code: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        match self
            .0
            .iter_mut()
            .find(|item| item.language_code == language_code)
        {
            Some(item) => item.language_text = text,
            None => self.0.push(LanguageStringItem {
                language_code: language_code.to_string(),
                language_text: text,
            }),
        }
        self
    }

    /// True when no language carries non-blank text.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|item| item.language_text.trim().is_empty())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for LanguageStrings {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(LanguageStrings::new(), |acc, (code, text)| acc.with(code, text))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QaError;

/// Languages the backend corpus carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
    De,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Zh, Language::En, Language::De];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
            Language::De => "de",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::Zh => "中文",
            Language::En => "English",
            Language::De => "Deutsch",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| {
                QaError::client(format!(
                    "unsupported language '{}' (expected one of zh, en, de)",
                    s.trim()
                ))
            })
    }
}

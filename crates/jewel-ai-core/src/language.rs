//! Output languages and the localized diagnostic catalog
//!
//! Only two languages are supported. Any unknown or missing tag resolves to
//! English so a caller can never select an empty catalog.

use serde::{Deserialize, Serialize};

/// Language the model is asked to answer in, and the language of diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// Simplified Chinese
    Zh,
}

/// Supported languages in presentation order
pub const SUPPORTED_LANGUAGES: &[Language] = &[Language::En, Language::Zh];

impl Language {
    /// Canonical tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// Name used inside prompts
    pub const fn prompt_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "Simplified Chinese (简体中文)",
        }
    }

    /// Parse a tag, tolerating case and region suffixes (`zh-CN`, `en_US`)
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let primary = normalized.split(['-', '_']).next().unwrap_or("");
        match primary {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }

    /// Resolve an optional tag, defaulting to English
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(Self::parse).unwrap_or_default()
    }

    /// Look up a catalog message
    pub const fn text(self, message: Message) -> &'static str {
        match (self, message) {
            (Language::En, Message::UnparsableResponse) => {
                "The AI service returned an unparsable response."
            }
            (Language::Zh, Message::UnparsableResponse) => "AI 服务返回了无法解析的响应。",
            (Language::En, Message::UnexpectedStructure) => {
                "The AI service returned an unexpected structure."
            }
            (Language::Zh, Message::UnexpectedStructure) => "AI 服务返回了不符合预期的数据结构。",
            (Language::En, Message::RawResponseHeading) => "Raw response:",
            (Language::Zh, Message::RawResponseHeading) => "原始响应：",
            (Language::En, Message::ViolationsHeading) => "Problems found:",
            (Language::Zh, Message::ViolationsHeading) => "发现的问题：",
            (Language::En, Message::Expected) => "expected",
            (Language::Zh, Message::Expected) => "期望",
            (Language::En, Message::Found) => "found",
            (Language::Zh, Message::Found) => "实际为",
            (Language::En, Message::TransportFailure) => {
                "The AI service could not be reached. Please try again later."
            }
            (Language::Zh, Message::TransportFailure) => "无法连接 AI 服务，请稍后重试。",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown language: {}", s))
    }
}

/// Keys of the diagnostic catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Extraction fallback headline
    UnparsableResponse,
    /// Validation fallback headline
    UnexpectedStructure,
    /// Label preceding the verbatim raw response
    RawResponseHeading,
    /// Label preceding the violation list
    ViolationsHeading,
    /// Word joining a path to its expected kind
    Expected,
    /// Word joining the expected kind to what was found
    Found,
    /// Caller-facing transport failure
    TransportFailure,
}

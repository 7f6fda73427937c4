//! Supported source languages.

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// The closed set of languages the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// Actor-style canisters (`actor Name { public func ... }`).
    #[serde(alias = "mo")]
    Motoko,
    /// Exported async functions (`pub async fn ...`).
    #[serde(alias = "rs")]
    Rust,
    /// Exported plain functions (`export function ...`).
    #[serde(alias = "js")]
    JavaScript,
}

/// How a language writes parameter lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSyntax {
    /// Whether parameters carry `name: Type` annotations.
    pub annotated: bool,
    /// Type assigned to a parameter without an annotation.
    pub default_type: &'static str,
    /// Whether `self` receivers are dropped from the list.
    pub skip_receivers: bool,
}

impl SourceLanguage {
    pub const ALL: [SourceLanguage; 3] = [
        SourceLanguage::Motoko,
        SourceLanguage::Rust,
        SourceLanguage::JavaScript,
    ];

    /// Lowercase identifier, as used on the command line and in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Motoko => "motoko",
            SourceLanguage::Rust => "rust",
            SourceLanguage::JavaScript => "javascript",
        }
    }

    /// Human-facing name (`"Motoko compilation successful"`).
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceLanguage::Motoko => "Motoko",
            SourceLanguage::Rust => "Rust",
            SourceLanguage::JavaScript => "JavaScript",
        }
    }

    /// File extensions (without dot) for this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceLanguage::Motoko => &["mo"],
            SourceLanguage::Rust => &["rs"],
            SourceLanguage::JavaScript => &["js", "mjs", "jsx"],
        }
    }

    /// Determine the language from a file extension.
    pub fn from_extension(ext: &str) -> Result<Self, CompileError> {
        let lower = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().contains(&lower.as_str()))
            .ok_or_else(|| CompileError::UnsupportedExtension(ext.to_string()))
    }

    pub fn param_syntax(&self) -> ParamSyntax {
        match self {
            SourceLanguage::Motoko => ParamSyntax {
                annotated: true,
                default_type: "Text",
                skip_receivers: false,
            },
            SourceLanguage::Rust => ParamSyntax {
                annotated: true,
                default_type: "String",
                skip_receivers: true,
            },
            SourceLanguage::JavaScript => ParamSyntax {
                annotated: false,
                default_type: "any",
                skip_receivers: false,
            },
        }
    }
}

impl std::fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for SourceLanguage {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "motoko" | "mo" => Ok(SourceLanguage::Motoko),
            "rust" | "rs" => Ok(SourceLanguage::Rust),
            "javascript" | "js" => Ok(SourceLanguage::JavaScript),
            _ => Err(CompileError::UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_tags() {
        assert_eq!("Motoko".parse::<SourceLanguage>().unwrap(), SourceLanguage::Motoko);
        assert_eq!("rs".parse::<SourceLanguage>().unwrap(), SourceLanguage::Rust);
        assert_eq!(" JS ".parse::<SourceLanguage>().unwrap(), SourceLanguage::JavaScript);
        assert_eq!(
            "python".parse::<SourceLanguage>(),
            Err(CompileError::UnknownLanguage("python".to_string()))
        );
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(SourceLanguage::from_extension("mo").unwrap(), SourceLanguage::Motoko);
        assert_eq!(SourceLanguage::from_extension(".MJS").unwrap(), SourceLanguage::JavaScript);
        assert!(matches!(
            SourceLanguage::from_extension("go"),
            Err(CompileError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_serde_aliases() {
        let lang: SourceLanguage = serde_yaml::from_str("mo").unwrap();
        assert_eq!(lang, SourceLanguage::Motoko);
        let lang: SourceLanguage = serde_yaml::from_str("javascript").unwrap();
        assert_eq!(lang, SourceLanguage::JavaScript);
    }
}

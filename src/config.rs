//! Configuration for canisterc.
//!
//! Two layers: `CompileOptions` is the per-call option bag the library takes,
//! and `ProjectConfig` is the YAML file the CLI discovers, which embeds a
//! `CompileOptions` under its `compiler` key.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::language::SourceLanguage;

/// How the non-header bytes of a generated WASM payload are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Random,
    Zero,
}

impl std::str::FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(FillMode::Random),
            "zero" => Ok(FillMode::Zero),
            _ => Err(format!("unknown fill mode: {}", s)),
        }
    }
}

/// Which braces count toward the document's brace balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BraceCounting {
    /// Every `{` and `}` on every line, including those in strings and
    /// comments.
    #[default]
    Raw,
    /// Only braces in code, outside string literals and comments.
    CodeOnly,
}

impl std::str::FromStr for BraceCounting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "raw" => Ok(BraceCounting::Raw),
            "code_only" => Ok(BraceCounting::CodeOnly),
            _ => Err(format!("unknown brace counting mode: {}", s)),
        }
    }
}

/// Options accepted by [`crate::compile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Name of the implicit file-level module (Rust, JavaScript). Defaults to `main`.
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub fill: FillMode,
    #[serde(default)]
    pub braces: BraceCounting,
    /// Reserved compiler flags. Recognized and carried, but they do not
    /// change the output.
    #[serde(default, flatten)]
    pub flags: BTreeMap<String, serde_yaml::Value>,
}

impl CompileOptions {
    pub const DEFAULT_MODULE_NAME: &'static str = "main";

    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_braces(mut self, braces: BraceCounting) -> Self {
        self.braces = braces;
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    /// Returns the implicit module name (defaults to "main").
    pub fn module_name(&self) -> &str {
        self.module_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(Self::DEFAULT_MODULE_NAME)
    }
}

/// Project-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Forces a language instead of inferring it from file extensions.
    #[serde(default)]
    pub language: Option<SourceLanguage>,
    /// Glob patterns for paths to skip when compiling a directory.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Where `.wasm` and `.did` artifacts are written.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    #[serde(default)]
    pub compiler: CompileOptions,
}

impl ProjectConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProjectConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Compile `excluded_paths` into a single matcher.
    pub fn exclusion_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded path glob {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

/// Validate a parsed config.
pub fn validate(config: &ProjectConfig) -> anyhow::Result<()> {
    config.exclusion_set()?;
    if let Some(name) = &config.compiler.module_name {
        if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            anyhow::bail!("module_name {:?} must be a plain identifier", name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
version: "1"
name: demo
language: motoko
excluded_paths:
  - "**/generated/**"
out_dir: build
compiler:
  module_name: ledger
  fill: zero
  optimize: true
"#;
        let config = ProjectConfig::parse_str(yaml).unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.language, Some(SourceLanguage::Motoko));
        assert_eq!(config.out_dir, Some(PathBuf::from("build")));
        assert_eq!(config.compiler.module_name(), "ledger");
        assert_eq!(config.compiler.fill, FillMode::Zero);
        assert_eq!(
            config.compiler.flags.get("optimize"),
            Some(&serde_yaml::Value::Bool(true))
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ProjectConfig::parse_str("").unwrap();
        assert!(config.language.is_none());
        assert_eq!(config.compiler.fill, FillMode::Random);
        assert_eq!(config.compiler.module_name(), "main");
    }

    #[test]
    fn test_path_exclusion() {
        let config = ProjectConfig {
            excluded_paths: vec!["**/generated/**".to_string(), "*.test.js".to_string()],
            ..Default::default()
        };
        let excluded = config.exclusion_set().unwrap();
        assert!(excluded.is_match(Path::new("src/generated/api.mo")));
        assert!(excluded.is_match(Path::new("api.test.js")));
        assert!(!excluded.is_match(Path::new("src/main.mo")));

        assert!(ProjectConfig::default().exclusion_set().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_exclusion_glob() {
        let config = ProjectConfig {
            excluded_paths: vec!["src/[".to_string()],
            ..Default::default()
        };
        let err = config.exclusion_set().unwrap_err();
        assert!(err.to_string().contains("invalid excluded path glob"));
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_brace_counting_option() {
        assert_eq!(CompileOptions::default().braces, BraceCounting::Raw);
        let config = ProjectConfig::parse_str("compiler:\n  braces: code_only\n").unwrap();
        assert_eq!(config.compiler.braces, BraceCounting::CodeOnly);
        assert!(config.compiler.flags.is_empty());
        assert_eq!("code-only".parse::<BraceCounting>(), Ok(BraceCounting::CodeOnly));
        assert!("loose".parse::<BraceCounting>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_module_name() {
        let config = ProjectConfig {
            compiler: CompileOptions::default().with_module_name("bad name"),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }
}

//! Compilation façade: analyze, then generate artifacts.

use serde::Serialize;
use tracing::debug;

use crate::analysis::{analyze, StructuralModel};
use crate::codegen::{self, Artifacts};
use crate::config::CompileOptions;
use crate::error::CompileError;
use crate::language::SourceLanguage;

/// Message reported when scanning produced errors.
pub const FAILURE_MESSAGE: &str = "Compilation failed with errors";

/// Outcome of one compilation.
///
/// `artifacts` is present exactly when `success` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationResult {
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub artifacts: Option<Artifacts>,
}

impl CompilationResult {
    fn failed(model: StructuralModel) -> Self {
        Self {
            success: false,
            message: FAILURE_MESSAGE.to_string(),
            errors: model.diagnostics.errors,
            warnings: model.diagnostics.warnings,
            artifacts: None,
        }
    }

    fn succeeded(model: StructuralModel, artifacts: Artifacts) -> Self {
        Self {
            success: true,
            message: format!("{} compilation successful", model.language),
            errors: Vec::new(),
            warnings: model.diagnostics.warnings,
            artifacts: Some(artifacts),
        }
    }

    /// The generated WASM payload, if compilation succeeded.
    pub fn wasm(&self) -> Option<&[u8]> {
        self.artifacts.as_ref().map(|a| a.wasm.as_slice())
    }

    /// The generated interface document, if compilation succeeded.
    pub fn candid(&self) -> Option<&str> {
        self.artifacts.as_ref().map(|a| a.candid.as_str())
    }
}

/// Compile source text.
///
/// Problems in the source never make this fail; they are reported in the
/// returned result.
pub fn compile(source: &str, language: SourceLanguage, options: &CompileOptions) -> CompilationResult {
    if !options.flags.is_empty() {
        debug!(flags = ?options.flags.keys().collect::<Vec<_>>(), "ignoring reserved compiler flags");
    }

    let model = analyze(source, language, options);
    if model.is_failed() {
        debug!(language = %language, errors = model.diagnostics.errors.len(), "compilation failed");
        return CompilationResult::failed(model);
    }

    let artifacts = codegen::generate(&model, options.fill);
    debug!(
        language = %language,
        wasm_bytes = artifacts.wasm.len(),
        "compilation succeeded"
    );
    CompilationResult::succeeded(model, artifacts)
}

/// Compile raw bytes, failing if they are not UTF-8 text.
pub fn compile_bytes(
    source: &[u8],
    language: SourceLanguage,
    options: &CompileOptions,
) -> Result<CompilationResult, CompileError> {
    let text = std::str::from_utf8(source)?;
    Ok(compile(text, language, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::WASM_HEADER;
    use crate::config::FillMode;

    #[test]
    fn test_success_message_names_language() {
        let result = compile(
            "export function greet(name) {}",
            SourceLanguage::JavaScript,
            &CompileOptions::default(),
        );
        assert!(result.success);
        assert_eq!(result.message, "JavaScript compilation successful");
        assert_eq!(result.candid(), Some("service : {\n  greet: (name: any) -> (any)\n}"));
    }

    #[test]
    fn test_failure_has_no_artifacts() {
        let result = compile("actor X { ", SourceLanguage::Motoko, &CompileOptions::default());
        assert!(!result.success);
        assert_eq!(result.message, FAILURE_MESSAGE);
        assert!(result.wasm().is_none());
        assert!(result.candid().is_none());
        assert_eq!(result.errors, vec!["Unmatched braces in code".to_string()]);
        assert_eq!(result.warnings, vec!["Actor 'X' has no public functions".to_string()]);
    }

    #[test]
    fn test_zero_fill_is_fully_deterministic() {
        let options = CompileOptions::default().with_fill(FillMode::Zero);
        let source = "actor A { public func f() : async () {} }";
        let first = compile(source, SourceLanguage::Motoko, &options);
        let second = compile(source, SourceLanguage::Motoko, &options);
        assert_eq!(first, second);
        assert_eq!(first.wasm().unwrap()[..8], WASM_HEADER);
    }

    #[test]
    fn test_reserved_flags_do_not_change_output() {
        let mut options = CompileOptions::default().with_fill(FillMode::Zero);
        let plain = compile("actor A { }", SourceLanguage::Motoko, &options);
        options
            .flags
            .insert("optimize".to_string(), serde_yaml::Value::Bool(true));
        let flagged = compile("actor A { }", SourceLanguage::Motoko, &options);
        assert_eq!(plain, flagged);
    }

    #[test]
    fn test_compile_bytes_rejects_invalid_utf8() {
        let err = compile_bytes(b"actor \xc3\x28 {}", SourceLanguage::Motoko, &CompileOptions::default())
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidSource(_)));
    }
}

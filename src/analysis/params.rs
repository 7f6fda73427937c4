//! Parameter-list parsing shared by the scanner and the signature extractor.

use super::facts::ParameterSpec;
use super::lexical::{last_top_level_colon, split_top_level};
use crate::language::SourceLanguage;

const RECEIVERS: &[&str] = &["self", "&self", "&mut self", "mut self"];

/// Parse a raw parameter list (the text between the parentheses).
///
/// Parameters are split on top-level commas; each is split on its last
/// top-level colon into name and type. Without a colon the language's
/// default type is used.
pub fn parse_parameters(raw: &str, language: SourceLanguage) -> Vec<ParameterSpec> {
    let syntax = language.param_syntax();
    if raw.trim().is_empty() {
        return Vec::new();
    }

    split_top_level(raw, ',')
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| !(syntax.skip_receivers && RECEIVERS.contains(p)))
        .map(|param| {
            if !syntax.annotated {
                // Untyped: drop a default value, keep the binding.
                let name = split_top_level(param, '=')[0].trim();
                return ParameterSpec::new(name, syntax.default_type);
            }

            match last_top_level_colon(param) {
                Some(idx) => ParameterSpec::new(param[..idx].trim(), param[idx + 1..].trim()),
                None => ParameterSpec::new(param, syntax.default_type),
            }
        })
        .collect()
}

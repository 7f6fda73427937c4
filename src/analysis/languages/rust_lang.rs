//! Rust grammar: a canister crate file whose `pub async fn` items are the
//! entry points.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::lexical::split_top_level;
use crate::analysis::traits::{Category, EntryPointMatch, Grammar, ImportMatch};
use crate::language::SourceLanguage;

lazy_static! {
    static ref USE_KEYWORD: Regex = Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?use\s").unwrap();
    static ref FN_KEYWORD: Regex = Regex::new(r"\bpub(?:\([^)]*\))?\s+async\s+fn\b").unwrap();
    static ref ITEM_KEYWORD: Regex =
        Regex::new(r"^(?:pub(?:\([^)]*\))?\s+)?(?:static|const)\s+(?:mut\s+)?[A-Za-z_]\w*\s*:").unwrap();

    // use a::b::C; / use a::b::C as D; / use a::{B, C}; / use a::*;
    static ref USE_RE: Regex = Regex::new(
        r"^(?:pub(?:\([^)]*\))?\s+)?use\s+((?:\w+::)*\w+)(?:::\{([^{}]*)\}|::(\*)|\s+as\s+(\w+))?\s*;$"
    ).unwrap();
    static ref FN_RE: Regex = Regex::new(
        r"\bpub(?:\([^)]*\))?\s+async\s+fn\s+(\w+)\s*(?:<[^>]*>)?\s*\(([^)]*)\)\s*(?:->\s*([^{;]+))?"
    ).unwrap();
    static ref ITEM_RE: Regex = Regex::new(
        r"^(?:pub(?:\([^)]*\))?\s+)?(?:static|const)\s+(?:mut\s+)?(\w+)\s*:[^=]+=\s*(.+?)\s*;$"
    ).unwrap();
}

/// Grammar for Rust canister sources.
pub struct RustGrammar;

impl RustGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustGrammar {
    fn default() -> Self {
        Self::new()
    }
}

/// Last `::` segment of a path.
fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Expand one item of a `use base::{...}` group.
fn group_item(base: &str, item: &str) -> ImportMatch {
    let (path, alias) = match item.split_once(" as ") {
        Some((path, alias)) => (path.trim(), Some(alias.trim())),
        None => (item, None),
    };

    if path == "self" {
        return ImportMatch::new(alias.unwrap_or_else(|| last_segment(base)), base);
    }

    let full = format!("{}::{}", base, path);
    let symbol = alias.unwrap_or_else(|| last_segment(path));
    ImportMatch::new(symbol, full)
}

impl Grammar for RustGrammar {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::Rust
    }

    fn implicit_module(&self) -> bool {
        true
    }

    fn mentions(&self, category: Category, masked: &str) -> bool {
        match category {
            Category::Import => USE_KEYWORD.is_match(masked),
            Category::Module => false,
            Category::EntryPoint => FN_KEYWORD.is_match(masked),
            Category::Variable => ITEM_KEYWORD.is_match(masked),
        }
    }

    fn parse_imports(&self, code: &str) -> Option<Vec<ImportMatch>> {
        let caps = USE_RE.captures(code)?;
        let path = &caps[1];

        if let Some(group) = caps.get(2) {
            let items: Vec<ImportMatch> = split_top_level(group.as_str(), ',')
                .into_iter()
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| group_item(path, item))
                .collect();
            return Some(items);
        }

        if caps.get(3).is_some() {
            return Some(vec![ImportMatch::new("*", path)]);
        }

        let symbol = caps
            .get(4)
            .map(|m| m.as_str())
            .unwrap_or_else(|| last_segment(path));
        Some(vec![ImportMatch::new(symbol, path)])
    }

    fn parse_module(&self, _code: &str) -> Option<String> {
        None
    }

    fn parse_entry_point(&self, code: &str) -> Option<EntryPointMatch> {
        let caps = FN_RE.captures(code)?;
        let return_type = caps
            .get(3)
            .map(|m| m.as_str().trim())
            .map(|ret| ret.split(" where ").next().unwrap_or(ret).trim().to_string())
            .filter(|ret| !ret.is_empty());
        Some(EntryPointMatch {
            name: caps[1].to_string(),
            raw_params: caps[2].to_string(),
            return_type,
        })
    }

    fn parse_variables(&self, code: &str) -> Option<Vec<(String, String)>> {
        ITEM_RE
            .captures(code)
            .map(|caps| vec![(caps[1].to_string(), caps[2].to_string())])
    }

    fn default_return_type(&self) -> &'static str {
        "()"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_use() {
        let g = RustGrammar::new();
        assert_eq!(
            g.parse_imports("use std::collections::HashMap;"),
            Some(vec![ImportMatch::new("HashMap", "std::collections::HashMap")])
        );
        assert_eq!(
            g.parse_imports("use candid::Principal as Id;"),
            Some(vec![ImportMatch::new("Id", "candid::Principal")])
        );
        assert_eq!(
            g.parse_imports("use ic_cdk::api::*;"),
            Some(vec![ImportMatch::new("*", "ic_cdk::api")])
        );
    }

    #[test]
    fn test_grouped_use() {
        let g = RustGrammar::new();
        let imports = g
            .parse_imports("use candid::{self, CandidType, Deserialize as De};")
            .unwrap();
        assert_eq!(
            imports,
            vec![
                ImportMatch::new("candid", "candid"),
                ImportMatch::new("CandidType", "candid::CandidType"),
                ImportMatch::new("De", "candid::Deserialize"),
            ]
        );
    }

    #[test]
    fn test_malformed_use() {
        let g = RustGrammar::new();
        assert!(g.mentions(Category::Import, "use std::collections::HashMap"));
        assert_eq!(g.parse_imports("use std::collections::HashMap"), None);
    }

    #[test]
    fn test_entry_points() {
        let g = RustGrammar::new();
        let m = g
            .parse_entry_point("pub async fn transfer(to: Principal, amount: u64) -> Result<(), String> {")
            .unwrap();
        assert_eq!(m.name, "transfer");
        assert_eq!(m.raw_params, "to: Principal, amount: u64");
        assert_eq!(m.return_type.as_deref(), Some("Result<(), String>"));

        let m = g.parse_entry_point("pub async fn ping() {").unwrap();
        assert_eq!(m.return_type, None);

        assert!(!g.mentions(Category::EntryPoint, "async fn private_helper() {"));
    }

    #[test]
    fn test_static_items() {
        let g = RustGrammar::new();
        assert_eq!(
            g.parse_variables("const MAX_USERS: usize = 100;"),
            Some(vec![("MAX_USERS".to_string(), "100".to_string())])
        );
        assert!(g.mentions(Category::Variable, "static mut COUNTER: u64"));
        assert_eq!(g.parse_variables("static mut COUNTER: u64"), None);
        assert!(!g.mentions(Category::Variable, "const fn helper() {}"));
    }
}

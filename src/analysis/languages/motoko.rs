//! Motoko grammar: actors with `public func` entry points.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::traits::{Category, EntryPointMatch, Grammar, ImportMatch};
use crate::language::SourceLanguage;

lazy_static! {
    static ref ACTOR_KEYWORD: Regex = Regex::new(r"\bactor\b").unwrap();
    static ref FUNC_KEYWORD: Regex = Regex::new(r"\bpublic\b.*\bfunc\b").unwrap();
    // `var` only at a declaration position, not inside a `[var T]` type
    static ref VAR_KEYWORD: Regex =
        Regex::new(r"^(?:(?:stable|flexible|transient|private|public|system)\s+)*var\s").unwrap();

    // import Debug "mo:base/Debug"
    static ref IMPORT_RE: Regex = Regex::new(r#"^import\s+(\w+)\s*=?\s*"([^"]+)""#).unwrap();
    // import { print; trap } "mo:base/Debug"
    static ref IMPORT_FIELDS_RE: Regex =
        Regex::new(r#"^import\s*\{([^}]*)\}\s*=?\s*"([^"]+)""#).unwrap();
    // actor Counter / actor class Counter(init : Nat)
    static ref ACTOR_RE: Regex = Regex::new(r"\bactor\s+(?:class\s+)?(\w+)").unwrap();
    // public [shared[(msg)]] [query] func name(params) : async Ret
    static ref FUNC_RE: Regex = Regex::new(
        r"\bpublic\s+(?:shared\s*(?:\([^)]*\))?\s*)?(?:query\s+)?func\s+(\w+)\s*\(([^)]*)\)\s*:\s*async\s+([^;{]+)"
    ).unwrap();
    // [stable] var count [: Nat] = 0;
    static ref VAR_RE: Regex = Regex::new(r"\bvar\s+(\w+)\s*(?::[^=]+)?=\s*([^;]+);").unwrap();
}

/// Grammar for Motoko actors.
pub struct MotokoGrammar;

impl MotokoGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MotokoGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar for MotokoGrammar {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::Motoko
    }

    fn module_label(&self) -> &'static str {
        "Actor"
    }

    fn category_label(&self, category: Category) -> &'static str {
        match category {
            Category::Module => "actor",
            other => other.as_str(),
        }
    }

    fn mentions(&self, category: Category, masked: &str) -> bool {
        match category {
            Category::Import => masked.starts_with("import ") || masked.starts_with("import{"),
            Category::Module => ACTOR_KEYWORD.is_match(masked),
            Category::EntryPoint => FUNC_KEYWORD.is_match(masked),
            Category::Variable => VAR_KEYWORD.is_match(masked),
        }
    }

    fn parse_imports(&self, code: &str) -> Option<Vec<ImportMatch>> {
        if let Some(caps) = IMPORT_RE.captures(code) {
            return Some(vec![ImportMatch::new(&caps[1], &caps[2])]);
        }

        let caps = IMPORT_FIELDS_RE.captures(code)?;
        let path = &caps[2];
        let fields: Vec<ImportMatch> = caps[1]
            .split([';', ','])
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| {
                // `print = p` binds the field under a new name
                let binding = f.split('=').next_back().unwrap_or(f).trim();
                ImportMatch::new(binding, path)
            })
            .collect();

        if fields.is_empty() {
            None
        } else {
            Some(fields)
        }
    }

    fn parse_module(&self, code: &str) -> Option<String> {
        ACTOR_RE.captures(code).map(|caps| caps[1].to_string())
    }

    fn parse_entry_point(&self, code: &str) -> Option<EntryPointMatch> {
        let caps = FUNC_RE.captures(code)?;
        let return_type = caps[3].trim();
        if return_type.is_empty() {
            return None;
        }
        Some(EntryPointMatch {
            name: caps[1].to_string(),
            raw_params: caps[2].to_string(),
            return_type: Some(return_type.to_string()),
        })
    }

    fn parse_variables(&self, code: &str) -> Option<Vec<(String, String)>> {
        VAR_RE
            .captures(code)
            .map(|caps| vec![(caps[1].to_string(), caps[2].trim().to_string())])
    }

    fn default_return_type(&self) -> &'static str {
        "()"
    }
}

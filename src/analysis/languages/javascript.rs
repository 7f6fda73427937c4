//! JavaScript grammar: an ES module whose exported functions are the entry
//! points.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::lexical::split_top_level;
use crate::analysis::traits::{Category, EntryPointMatch, Grammar, ImportMatch};
use crate::language::SourceLanguage;

lazy_static! {
    static ref IMPORT_KEYWORD: Regex = Regex::new(r"^import\b").unwrap();
    static ref EXPORT_FN_KEYWORD: Regex =
        Regex::new(r"^export\s+(?:default\s+)?(?:async\s+)?function\b").unwrap();
    static ref DECL_KEYWORD: Regex = Regex::new(r"^(?:export\s+)?(?:const|let|var)\s").unwrap();

    // import x from "m" / import { a, b as c } from "m" / import * as ns from "m"
    // import x, { a } from "m"
    static ref IMPORT_RE: Regex = Regex::new(
        r#"^import\s+(?:([\w$]+)\s*,?\s*)?(?:\{([^}]*)\}|\*\s*as\s+([\w$]+))?\s*from\s*["']([^"']+)["']\s*;?$"#
    ).unwrap();
    // import "side-effect";
    static ref BARE_IMPORT_RE: Regex = Regex::new(r#"^import\s*["']([^"']+)["']\s*;?$"#).unwrap();
    static ref EXPORT_FN_RE: Regex = Regex::new(
        r"^export\s+(?:default\s+)?(?:async\s+)?function\s*\*?\s*([\w$]+)\s*\(([^)]*)\)"
    ).unwrap();
    // const a = 1, b; the declarator list is split separately
    static ref DECL_RE: Regex =
        Regex::new(r"^(?:export\s+)?(?:const|let|var)\s+(.+?)\s*;?$").unwrap();
    // name [= value] / { a, b } = obj / [x, y] = pair
    static ref DECLARATOR_RE: Regex =
        Regex::new(r"^([\w$]+|\{[^}]*\}|\[[^\]]*\])\s*(?:=\s*(.+))?$").unwrap();
}

/// Grammar for JavaScript ES modules.
pub struct JavaScriptGrammar;

impl JavaScriptGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar for JavaScriptGrammar {
    fn language(&self) -> SourceLanguage {
        SourceLanguage::JavaScript
    }

    fn implicit_module(&self) -> bool {
        true
    }

    fn mentions(&self, category: Category, masked: &str) -> bool {
        match category {
            Category::Import => IMPORT_KEYWORD.is_match(masked),
            Category::Module => false,
            Category::EntryPoint => EXPORT_FN_KEYWORD.is_match(masked),
            Category::Variable => DECL_KEYWORD.is_match(masked),
        }
    }

    fn parse_imports(&self, code: &str) -> Option<Vec<ImportMatch>> {
        if BARE_IMPORT_RE.is_match(code) {
            // Side-effect import: binds nothing.
            return Some(Vec::new());
        }

        let caps = IMPORT_RE.captures(code)?;
        let path = &caps[4];
        let mut imports = Vec::new();

        if let Some(default) = caps.get(1) {
            imports.push(ImportMatch::new(default.as_str(), path));
        }
        if let Some(named) = caps.get(2) {
            for item in split_top_level(named.as_str(), ',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                let binding = match item.split_once(" as ") {
                    Some((_, alias)) => alias.trim(),
                    None => item,
                };
                imports.push(ImportMatch::new(binding, path));
            }
        }
        if let Some(namespace) = caps.get(3) {
            imports.push(ImportMatch::new(namespace.as_str(), path));
        }

        if imports.is_empty() {
            None
        } else {
            Some(imports)
        }
    }

    fn parse_module(&self, _code: &str) -> Option<String> {
        None
    }

    fn parse_entry_point(&self, code: &str) -> Option<EntryPointMatch> {
        let caps = EXPORT_FN_RE.captures(code)?;
        Some(EntryPointMatch {
            name: caps[1].to_string(),
            raw_params: caps[2].to_string(),
            return_type: None,
        })
    }

    fn parse_variables(&self, code: &str) -> Option<Vec<(String, String)>> {
        let caps = DECL_RE.captures(code)?;
        split_declarators(&caps[1])
            .into_iter()
            .map(|declarator| {
                let caps = DECLARATOR_RE.captures(declarator.trim())?;
                let value = caps
                    .get(2)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| "undefined".to_string());
                Some((caps[1].to_string(), value))
            })
            .collect()
    }

    fn default_return_type(&self) -> &'static str {
        "any"
    }
}

/// Split a declarator list on commas outside strings and brackets.
///
/// Unlike [`split_top_level`], `<` and `>` are comparison operators here and
/// do not nest.
fn split_declarators(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_forms() {
        let g = JavaScriptGrammar::new();
        assert_eq!(
            g.parse_imports(r#"import { Actor, HttpAgent as Agent } from "@dfinity/agent";"#),
            Some(vec![
                ImportMatch::new("Actor", "@dfinity/agent"),
                ImportMatch::new("Agent", "@dfinity/agent"),
            ])
        );
        assert_eq!(
            g.parse_imports("import React, { useState } from 'react'"),
            Some(vec![
                ImportMatch::new("React", "react"),
                ImportMatch::new("useState", "react"),
            ])
        );
        assert_eq!(
            g.parse_imports("import * as idl from './idl.js';"),
            Some(vec![ImportMatch::new("idl", "./idl.js")])
        );
        assert_eq!(g.parse_imports("import './styles.css';"), Some(vec![]));
        assert_eq!(g.parse_imports("import from;"), None);
    }

    #[test]
    fn test_exported_functions() {
        let g = JavaScriptGrammar::new();
        let m = g
            .parse_entry_point("export async function fetchUser(id, opts = {}) {")
            .unwrap();
        assert_eq!(m.name, "fetchUser");
        assert_eq!(m.raw_params, "id, opts = {}");
        assert_eq!(m.return_type, None);
        assert!(g.mentions(Category::EntryPoint, "export function broken("));
        assert!(g.parse_entry_point("export function broken(").is_none());
        assert!(!g.mentions(Category::EntryPoint, "function internal() {"));
    }

    #[test]
    fn test_declarations() {
        let g = JavaScriptGrammar::new();
        assert_eq!(
            g.parse_variables("const count = 0;"),
            Some(vec![("count".to_string(), "0".to_string())])
        );
        assert_eq!(
            g.parse_variables("let pending"),
            Some(vec![("pending".to_string(), "undefined".to_string())])
        );
        assert_eq!(
            g.parse_variables("const { a, b } = obj"),
            Some(vec![("{ a, b }".to_string(), "obj".to_string())])
        );
        assert!(g.mentions(Category::Variable, "const = 4;"));
        assert_eq!(g.parse_variables("const = 4;"), None);
    }

    #[test]
    fn test_declarator_lists() {
        let g = JavaScriptGrammar::new();
        assert_eq!(
            g.parse_variables("let a, b;"),
            Some(vec![
                ("a".to_string(), "undefined".to_string()),
                ("b".to_string(), "undefined".to_string()),
            ])
        );
        assert_eq!(
            g.parse_variables(r#"var x = f(1, 2), y = "a,b", z = [3, 4];"#),
            Some(vec![
                ("x".to_string(), "f(1, 2)".to_string()),
                ("y".to_string(), "\"a,b\"".to_string()),
                ("z".to_string(), "[3, 4]".to_string()),
            ])
        );
        assert_eq!(
            g.parse_variables("let lo = a < b, hi = c > d;"),
            Some(vec![
                ("lo".to_string(), "a < b".to_string()),
                ("hi".to_string(), "c > d".to_string()),
            ])
        );
        assert_eq!(g.parse_variables("let a, = 3;"), None);
    }
}

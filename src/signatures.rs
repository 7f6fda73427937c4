//! Lightweight signature extraction for test-input forms.
//!
//! Unlike the declaration scanner this performs no diagnostics and does not
//! track modules: each line is matched against a single per-language
//! pattern and non-matching lines are skipped. Results are best-effort.

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;

use crate::analysis::{parse_parameters, EntryPointSpec};
use crate::language::SourceLanguage;

lazy_static! {
    static ref MOTOKO_FUNC: Regex = Regex::new(
        r"public\s+(?:shared\s*(?:\([^)]*\))?\s*)?(?:query\s+)?func\s+(\w+)\s*\(([^)]*)\)\s*:\s*async\s+([^;{]+)"
    ).unwrap();
    static ref RUST_FUNC: Regex = Regex::new(
        r"pub\s+async\s+fn\s+(\w+)\s*(?:<[^>]*>)?\s*\(([^)]*)\)\s*(?:->\s*([^{;]+))?"
    ).unwrap();
    static ref JAVASCRIPT_FUNC: Regex =
        Regex::new(r"export\s+(?:async\s+)?function\s+([\w$]+)\s*\(([^)]*)\)").unwrap();
}

/// Example literal for unrecognized types.
pub const FALLBACK_EXAMPLE: &str = "Test Value";

/// Lowercased type name to example argument literal.
static EXAMPLE_ARGS: phf::Map<&'static str, &'static str> = phf_map! {
    // text-like
    "text" => "Test Input",
    "string" => "Test Input",
    "&str" => "Test Input",
    "str" => "Test Input",
    // integer-like
    "nat" => "42",
    "int" => "42",
    "nat8" => "42",
    "nat16" => "42",
    "nat32" => "42",
    "nat64" => "42",
    "int8" => "42",
    "int16" => "42",
    "int32" => "42",
    "int64" => "42",
    "u8" => "42",
    "u16" => "42",
    "u32" => "42",
    "u64" => "42",
    "u128" => "42",
    "usize" => "42",
    "i8" => "42",
    "i16" => "42",
    "i32" => "42",
    "i64" => "42",
    "i128" => "42",
    "isize" => "42",
    "number" => "42",
    "bigint" => "42",
    // float-like
    "float" => "3.14",
    "f32" => "3.14",
    "f64" => "3.14",
    // boolean-like
    "bool" => "true",
    "boolean" => "true",
    // identity-like
    "principal" => "aaaaa-aa",
};

fn pattern(language: SourceLanguage) -> &'static Regex {
    match language {
        SourceLanguage::Motoko => &*MOTOKO_FUNC,
        SourceLanguage::Rust => &*RUST_FUNC,
        SourceLanguage::JavaScript => &*JAVASCRIPT_FUNC,
    }
}

/// Return type recorded when the surface syntax has none.
fn default_return_type(language: SourceLanguage) -> &'static str {
    match language {
        SourceLanguage::Motoko | SourceLanguage::JavaScript => "any",
        SourceLanguage::Rust => "()",
    }
}

/// Extract callable signatures from `source`, in order of appearance.
pub fn extract_signatures(source: &str, language: SourceLanguage) -> Vec<EntryPointSpec> {
    let re = pattern(language);

    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = re.captures(line.trim())?;
            let return_type = caps
                .get(3)
                .map(|m| m.as_str().trim())
                .filter(|ret| !ret.is_empty())
                .unwrap_or_else(|| default_return_type(language));
            Some(EntryPointSpec {
                name: caps[1].to_string(),
                params: parse_parameters(&caps[2], language),
                return_type: return_type.to_string(),
                line: idx + 1,
            })
        })
        .collect()
}

/// Example literal for a single type name.
pub fn example_for_type(ty: &str) -> &'static str {
    let key = ty.trim().to_lowercase();
    EXAMPLE_ARGS.get(key.as_str()).copied().unwrap_or(FALLBACK_EXAMPLE)
}

/// One example argument per parameter of `entry`, for pre-filling forms.
pub fn generate_example_args(entry: &EntryPointSpec) -> Vec<String> {
    entry
        .params
        .iter()
        .map(|p| example_for_type(&p.ty).to_string())
        .collect()
}

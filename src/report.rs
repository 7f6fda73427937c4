//! Output formatting for canisterc results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::EntryPointSpec;
use crate::compiler::CompilationResult;
use crate::language::SourceLanguage;
use crate::signatures::generate_example_args;

/// A compilation outcome tied to the file it came from.
#[derive(Debug, Clone)]
pub struct CompiledFile {
    pub file: String,
    pub language: SourceLanguage,
    pub result: CompilationResult,
}

/// Signatures extracted from one file.
#[derive(Debug, Clone)]
pub struct FileSignatures {
    pub file: String,
    pub language: SourceLanguage,
    pub signatures: Vec<EntryPointSpec>,
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for the compile command.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_compiled: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<JsonCompileEntry>,
}

/// One file's compilation outcome.
#[derive(Serialize, Deserialize)]
pub struct JsonCompileEntry {
    pub file: String,
    pub language: SourceLanguage,
    pub success: bool,
    pub message: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wasm_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candid: Option<String>,
}

/// JSON listing for the signatures command.
#[derive(Serialize, Deserialize)]
pub struct JsonSignatureFile {
    pub file: String,
    pub language: SourceLanguage,
    pub signatures: Vec<JsonSignature>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonSignature {
    #[serde(flatten)]
    pub entry: EntryPointSpec,
    pub example_args: Vec<String>,
}

/// Build the JSON report for a set of compiled files.
pub fn build_json_report(path: &str, compiled: &[CompiledFile]) -> JsonReport {
    let results: Vec<JsonCompileEntry> = compiled.iter().map(compile_entry_to_json).collect();
    let succeeded = results.iter().filter(|r| r.success).count();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_compiled: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        results,
    }
}

fn compile_entry_to_json(c: &CompiledFile) -> JsonCompileEntry {
    JsonCompileEntry {
        file: c.file.clone(),
        language: c.language,
        success: c.result.success,
        message: c.result.message.clone(),
        errors: c.result.errors.clone(),
        warnings: c.result.warnings.clone(),
        wasm_size: c.result.wasm().map(<[u8]>::len),
        candid: c.result.candid().map(str::to_string),
    }
}

/// Build the JSON listing for extracted signatures.
pub fn build_signature_listing(listings: &[FileSignatures]) -> Vec<JsonSignatureFile> {
    listings
        .iter()
        .map(|l| JsonSignatureFile {
            file: l.file.clone(),
            language: l.language,
            signatures: l
                .signatures
                .iter()
                .map(|entry| JsonSignature {
                    entry: entry.clone(),
                    example_args: generate_example_args(entry),
                })
                .collect(),
        })
        .collect()
}

/// Write compile results in JSON format.
pub fn write_compile_json(path: &str, compiled: &[CompiledFile]) -> anyhow::Result<()> {
    let report = build_json_report(path, compiled);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

/// Write extracted signatures in JSON format.
pub fn write_signatures_json(listings: &[FileSignatures]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_signature_listing(listings))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write compile results in pretty (human-readable) format.
pub fn write_compile_pretty(path: &str, compiled: &[CompiledFile]) {
    write_header();

    print!("  {}", "Compiling: ".dimmed());
    println!("{}", path);
    println!();

    for c in compiled {
        write_compiled_file(c);
        println!();
    }

    write_final_status(compiled);
    println!();
}

fn write_header() {
    println!();
    print!("  ");
    print!("{}", "canisterc".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
}

fn write_compiled_file(c: &CompiledFile) {
    if c.result.success {
        print!("  {}  ", "✓".green());
    } else {
        print!("  {}  ", "✗".red());
    }
    print!("{}", c.file.blue());
    println!("  {}", format!("({})", c.language.as_str()).dimmed());
    println!("     {}", c.result.message);

    for error in &c.result.errors {
        println!("     {} {}", "ERROR".red(), error);
    }
    for warning in &c.result.warnings {
        println!("     {} {}", "WARN ".yellow(), warning);
    }

    if let Some(wasm) = c.result.wasm() {
        println!("     {}", format!("wasm: {} bytes", wasm.len()).dimmed());
    }
}

fn write_final_status(compiled: &[CompiledFile]) {
    let failed = compiled.iter().filter(|c| !c.result.success).count();
    let summary = format!("{} file(s), {} failed", compiled.len(), failed);
    print!("  {}  ", summary.dimmed());

    if failed == 0 {
        print!("{}", "PASSED".green());
    } else {
        print!("{}", "FAILED".red());
    }
    println!();
}

/// Write extracted signatures in pretty format.
pub fn write_signatures_pretty(listings: &[FileSignatures]) {
    write_header();

    for listing in listings {
        print!("  {}", listing.file.blue());
        println!("  {}", format!("({})", listing.language.as_str()).dimmed());

        if listing.signatures.is_empty() {
            println!("    {}", "(no public functions)".dimmed());
        }
        for entry in &listing.signatures {
            print!("    {}", format!("{:>4}", entry.line).dimmed());
            println!(
                "  {}({}) -> {}",
                entry.name.bold(),
                entry.param_list(),
                entry.return_type
            );
            let args = generate_example_args(entry);
            if !args.is_empty() {
                println!("          {}", format!("example: {:?}", args).dimmed());
            }
        }
        println!();
    }
}

//! canisterc - a lightweight canister source analyzer.
//!
//! canisterc recognizes the declarations of small canister programs written
//! in Motoko, Rust, or JavaScript, reports malformed declarations as ordered
//! diagnostics, and for clean sources emits a placeholder WASM payload and a
//! Candid-style interface document. It also extracts callable signatures
//! and example arguments for pre-filling test forms.
//!
//! # Architecture
//!
//! - `analysis`: line scanner and per-language grammars producing a `StructuralModel`
//! - `codegen`: WASM payload and interface document generation
//! - `compiler`: the `compile` façade tying analysis and codegen together
//! - `signatures`: best-effort signature extraction and example arguments
//! - `config`: compile options and the `canisterc.yaml` project file
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a New Language
//!
//! See `src/analysis/languages/` for examples. Implement the `Grammar`
//! trait and dispatch to it in `analysis::analyze`.

pub mod analysis;
pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod language;
pub mod report;
pub mod signatures;

pub use analysis::{
    analyze, analyze_bytes, EntryPointSpec, ImportDeclaration, LocalVariable, ModuleSpec,
    ParameterSpec, StructuralModel,
};
pub use codegen::{generate_candid, generate_wasm, plan_layout, Artifacts, WasmLayout};
pub use compiler::{compile, compile_bytes, CompilationResult};
pub use config::{BraceCounting, CompileOptions, FillMode, ProjectConfig};
pub use error::CompileError;
pub use language::SourceLanguage;
pub use signatures::{extract_signatures, generate_example_args};

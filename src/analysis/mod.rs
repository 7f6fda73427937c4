//! Source analysis: from source text to a structural model.
//!
//! This module extracts the structure a canister exposes: its modules
//! (actors, or the implicit file module), imports, callable entry points
//! with typed parameter lists, and module-level variables. Malformed
//! declarations become ordered diagnostics rather than failures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ Source text │────▶│ SourceLines  │────▶│ Scanner<Grammar> │
//! └─────────────┘     │ (lexical)    │     │ (Motoko, Rust,   │
//!                     └──────────────┘     │  JavaScript)     │
//!                                          └──────────────────┘
//!                                                   │
//!                                                   ▼
//!                                          ┌──────────────────┐
//!                                          │ StructuralModel  │
//!                                          │ (modules, imports│
//!                                          │  diagnostics)    │
//!                                          └──────────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Add a variant to `SourceLanguage`
//! 2. Create a grammar in `src/analysis/languages/`
//! 3. Implement the `Grammar` trait
//! 4. Dispatch to it in `scanner::analyze`

mod facts;
mod languages;
mod lexical;
mod params;
mod scanner;
mod traits;

pub use facts::{
    Diagnostics, EntryPointSpec, ImportDeclaration, LocalVariable, ModuleSpec, ParameterSpec,
    StructuralModel,
};
pub use languages::{JavaScriptGrammar, MotokoGrammar, RustGrammar};
pub use lexical::{source_lines, SourceLine};
pub use params::parse_parameters;
pub use scanner::{analyze, analyze_bytes, UNMATCHED_BRACES};
pub use traits::{Category, EntryPointMatch, Grammar, ImportMatch};

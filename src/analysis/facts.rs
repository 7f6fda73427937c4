//! Structural model extracted from source text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::SourceLanguage;

/// An imported symbol (`import Debug "mo:base/Debug"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    pub symbol_name: String,
    pub source_path: String,
    /// Line number (1-indexed).
    pub line: usize,
}

/// One parameter of a callable entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A callable function discovered inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointSpec {
    pub name: String,
    pub params: Vec<ParameterSpec>,
    pub return_type: String,
    /// Line number (1-indexed).
    pub line: usize,
}

impl EntryPointSpec {
    /// Render the parameter list as `a: T, b: U`.
    pub fn param_list(&self) -> String {
        self.params
            .iter()
            .map(ParameterSpec::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A variable declared while a module was open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVariable {
    pub name: String,
    pub initial_value: String,
    pub line: usize,
}

/// A top-level container holding entry points (an actor, or the implicit
/// file module for languages without one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    pub entry_points: Vec<EntryPointSpec>,
    pub variables: Vec<LocalVariable>,
}

impl ModuleSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_points: Vec::new(),
            variables: Vec::new(),
        }
    }
}

/// Ordered errors and warnings from a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Everything the scanner learned about one source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub language: SourceLanguage,
    pub modules: Vec<ModuleSpec>,
    pub imports: Vec<ImportDeclaration>,
    pub diagnostics: Diagnostics,
}

impl StructuralModel {
    pub fn new(language: SourceLanguage) -> Self {
        Self {
            language,
            modules: Vec::new(),
            imports: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// A model with errors is terminal: no artifacts are generated from it.
    pub fn is_failed(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Total entry points across all modules.
    pub fn entry_point_count(&self) -> usize {
        self.modules.iter().map(|m| m.entry_points.len()).sum()
    }

    /// All entry points in discovery order.
    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPointSpec> {
        self.modules.iter().flat_map(|m| m.entry_points.iter())
    }
}

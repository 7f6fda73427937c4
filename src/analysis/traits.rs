//! Core traits for language grammars.

use crate::language::SourceLanguage;

/// The line categories the scanner recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Import,
    Module,
    EntryPoint,
    Variable,
}

impl Category {
    /// Default label used in "Invalid <label> syntax" diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Import => "import",
            Category::Module => "module",
            Category::EntryPoint => "function",
            Category::Variable => "variable",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An imported symbol before line numbers are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatch {
    pub symbol_name: String,
    pub source_path: String,
}

impl ImportMatch {
    pub fn new(symbol_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            symbol_name: symbol_name.into(),
            source_path: source_path.into(),
        }
    }
}

/// A recognized entry-point declaration, parameters still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointMatch {
    pub name: String,
    pub raw_params: String,
    /// `None` when the surface syntax omits a return type.
    pub return_type: Option<String>,
}

/// Language-specific surface syntax for the declaration scanner.
///
/// Each category has a cheap keyword test (`mentions`) and a full pattern
/// (`parse_*`). A line that mentions a category but fails its pattern is a
/// syntax error in that category. `mentions` receives the line with string
/// literal contents blanked out; the `parse_*` methods receive the real code.
///
/// One implementation exists per [`SourceLanguage`]; the scanner is generic
/// over it, so dispatch is static.
pub trait Grammar: Send + Sync {
    /// The language this grammar parses.
    fn language(&self) -> SourceLanguage;

    /// Noun used for modules in warnings ("Actor 'X' has no public functions").
    fn module_label(&self) -> &'static str {
        "Module"
    }

    /// Label for a category in syntax-error diagnostics.
    fn category_label(&self, category: Category) -> &'static str {
        category.as_str()
    }

    /// Whether the whole file forms one module that is open from the first
    /// line. Such grammars never report `Category::Module`.
    fn implicit_module(&self) -> bool {
        false
    }

    /// Whether the line contains the category's leading keyword.
    fn mentions(&self, category: Category, masked: &str) -> bool;

    /// Parse an import line into one or more imported symbols.
    fn parse_imports(&self, code: &str) -> Option<Vec<ImportMatch>>;

    /// Parse a module-opening line into the module name.
    fn parse_module(&self, code: &str) -> Option<String>;

    fn parse_entry_point(&self, code: &str) -> Option<EntryPointMatch>;

    /// Parse a variable declaration into `(name, initial value)` pairs, one
    /// per declarator.
    fn parse_variables(&self, code: &str) -> Option<Vec<(String, String)>>;

    /// Return type recorded when an entry point does not declare one.
    fn default_return_type(&self) -> &'static str;
}

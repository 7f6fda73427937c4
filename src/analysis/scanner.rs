//! Declaration scanner: source text to [`StructuralModel`].
//!
//! Scanning is line-oriented. Each code line updates a running brace depth
//! and is tested against every category of the language grammar. Malformed
//! content never aborts the scan; it becomes a diagnostic.

use tracing::{debug, trace};

use super::facts::{EntryPointSpec, ImportDeclaration, LocalVariable, ModuleSpec, StructuralModel};
use super::languages::{JavaScriptGrammar, MotokoGrammar, RustGrammar};
use super::lexical::{mask_strings, source_lines, SourceLine};
use super::params::parse_parameters;
use super::traits::{Category, Grammar};
use crate::config::CompileOptions;
use crate::error::CompileError;
use crate::language::SourceLanguage;

/// Diagnostic appended when the document's braces do not balance.
pub const UNMATCHED_BRACES: &str = "Unmatched braces in code";

/// Scan `source` into a structural model.
pub fn analyze(source: &str, language: SourceLanguage, options: &CompileOptions) -> StructuralModel {
    match language {
        SourceLanguage::Motoko => Scanner::new(&MotokoGrammar, options).scan(source),
        SourceLanguage::Rust => Scanner::new(&RustGrammar, options).scan(source),
        SourceLanguage::JavaScript => Scanner::new(&JavaScriptGrammar, options).scan(source),
    }
}

/// Scan raw bytes, failing if they are not UTF-8 text.
pub fn analyze_bytes(
    source: &[u8],
    language: SourceLanguage,
    options: &CompileOptions,
) -> Result<StructuralModel, CompileError> {
    let text = std::str::from_utf8(source)?;
    Ok(analyze(text, language, options))
}

/// The module entry points are currently attributed to.
#[derive(Debug, Clone, Copy)]
struct OpenModule {
    index: usize,
    /// Depth before the opening line; `None` for an implicit file module,
    /// which never closes.
    base_depth: Option<isize>,
    /// Whether the body has been entered (depth rose above `base_depth`).
    entered: bool,
}

struct Scanner<'a, G: Grammar> {
    grammar: &'a G,
    options: &'a CompileOptions,
}

impl<'a, G: Grammar> Scanner<'a, G> {
    fn new(grammar: &'a G, options: &'a CompileOptions) -> Self {
        Self { grammar, options }
    }

    fn scan(&self, source: &str) -> StructuralModel {
        let language = self.grammar.language();
        let mut model = StructuralModel::new(language);
        let mut depth: isize = 0;
        let mut current: Option<OpenModule> = None;

        if self.grammar.implicit_module() {
            model.modules.push(ModuleSpec::new(self.options.module_name()));
            current = Some(OpenModule {
                index: 0,
                base_depth: None,
                entered: true,
            });
        }

        for line in source_lines(source, language, self.options.braces) {
            let depth_before = depth;
            depth += line.depth_delta();

            // Comment-only line whose braces still count.
            if line.code.is_empty() {
                current = current.and_then(|open| close_if_finished(open, depth, false));
                continue;
            }
            let masked = mask_strings(&line.code, language);

            self.scan_import(&line, &masked, &mut model);

            let mut opened_here = false;
            if let Some(index) = self.scan_module(&line, &masked, &mut model) {
                current = Some(OpenModule {
                    index,
                    base_depth: Some(depth_before),
                    entered: false,
                });
                opened_here = true;
            }

            if let Some(open) = current {
                let failed = self.scan_members(&line, &masked, &mut model.modules[open.index]);
                for category in failed {
                    self.syntax_error(&line, category, &mut model);
                }
            }

            current = current.and_then(|open| close_if_finished(open, depth, opened_here && line.opens > 0));
        }

        if depth != 0 {
            model.diagnostics.error(UNMATCHED_BRACES);
        }

        for module in &model.modules {
            if module.entry_points.is_empty() {
                model.diagnostics.warning(format!(
                    "{} '{}' has no public functions",
                    self.grammar.module_label(),
                    module.name
                ));
            }
        }

        debug!(
            language = %language,
            modules = model.modules.len(),
            entry_points = model.entry_point_count(),
            imports = model.imports.len(),
            errors = model.diagnostics.errors.len(),
            warnings = model.diagnostics.warnings.len(),
            "scanned source"
        );

        model
    }

    fn scan_import(&self, line: &SourceLine, masked: &str, model: &mut StructuralModel) {
        if !self.grammar.mentions(Category::Import, masked) {
            return;
        }
        match self.grammar.parse_imports(&line.code) {
            Some(imports) => {
                for import in imports {
                    trace!(line = line.number, symbol = %import.symbol_name, "import");
                    model.imports.push(ImportDeclaration {
                        symbol_name: import.symbol_name,
                        source_path: import.source_path,
                        line: line.number,
                    });
                }
            }
            None => self.syntax_error(line, Category::Import, model),
        }
    }

    /// Returns the index of a module opened on this line.
    fn scan_module(&self, line: &SourceLine, masked: &str, model: &mut StructuralModel) -> Option<usize> {
        if self.grammar.implicit_module() || !self.grammar.mentions(Category::Module, masked) {
            return None;
        }
        match self.grammar.parse_module(&line.code) {
            Some(name) => {
                trace!(line = line.number, module = %name, "module");
                model.modules.push(ModuleSpec::new(name));
                Some(model.modules.len() - 1)
            }
            None => {
                self.syntax_error(line, Category::Module, model);
                None
            }
        }
    }

    /// Entry points and variables of the open module. Returns the
    /// categories whose pattern failed on this line.
    fn scan_members(&self, line: &SourceLine, masked: &str, module: &mut ModuleSpec) -> Vec<Category> {
        let mut failed = Vec::new();

        if self.grammar.mentions(Category::EntryPoint, masked) {
            match self.grammar.parse_entry_point(&line.code) {
                Some(m) => {
                    trace!(line = line.number, function = %m.name, "entry point");
                    let return_type = m
                        .return_type
                        .unwrap_or_else(|| self.grammar.default_return_type().to_string());
                    module.entry_points.push(EntryPointSpec {
                        name: m.name,
                        params: parse_parameters(&m.raw_params, self.grammar.language()),
                        return_type,
                        line: line.number,
                    });
                }
                None => failed.push(Category::EntryPoint),
            }
        }

        if self.grammar.mentions(Category::Variable, masked) {
            match self.grammar.parse_variables(&line.code) {
                Some(variables) => {
                    for (name, initial_value) in variables {
                        module.variables.push(LocalVariable {
                            name,
                            initial_value,
                            line: line.number,
                        });
                    }
                }
                None => failed.push(Category::Variable),
            }
        }

        failed
    }

    fn syntax_error(&self, line: &SourceLine, category: Category, model: &mut StructuralModel) {
        let label = self.grammar.category_label(category);
        model
            .diagnostics
            .error(format!("Line {}: Invalid {} syntax", line.number, label));
    }
}

/// Track whether an explicit module's body has closed.
///
/// A module closes once the depth, having risen above the depth it was
/// opened at, falls back to it. A one-line module (`actor A { ... }`) closes
/// on its own line.
fn close_if_finished(mut open: OpenModule, depth: isize, one_line: bool) -> Option<OpenModule> {
    let Some(base) = open.base_depth else {
        return Some(open);
    };
    if depth > base {
        open.entered = true;
        return Some(open);
    }
    if open.entered || one_line {
        None
    } else {
        Some(open)
    }
}

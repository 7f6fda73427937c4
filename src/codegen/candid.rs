//! Candid-style interface document rendering.

use crate::analysis::{EntryPointSpec, StructuralModel};

/// Document emitted for a model without modules.
pub const EMPTY_SERVICE: &str = "service : {}";

/// Render one entry point as a service method line.
pub fn signature_line(entry: &EntryPointSpec) -> String {
    format!("  {}: ({}) -> ({})", entry.name, entry.param_list(), entry.return_type)
}

/// Render the interface document for a model.
///
/// Types are emitted as written in the source; no mapping to Candid types
/// is attempted.
pub fn generate_candid(model: &StructuralModel) -> String {
    if model.modules.is_empty() {
        return EMPTY_SERVICE.to_string();
    }

    let lines: Vec<String> = model.entry_points().map(signature_line).collect();
    format!("service : {{\n{}\n}}", lines.join("\n"))
}

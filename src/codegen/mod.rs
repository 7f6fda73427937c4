//! Artifact generation from an error-free structural model.
//!
//! Two artifacts are derived: a placeholder WASM payload whose size and
//! segmentation follow the model's complexity, and a textual interface
//! document listing every entry point.

mod candid;
mod wasm;

pub use candid::{generate_candid, signature_line, EMPTY_SERVICE};
pub use wasm::{
    generate_wasm, payload_size, plan_layout, Segment, SegmentKind, WasmLayout, BASE_SIZE,
    ENTRY_POINT_SIZE, IMPORT_SIZE, MODULE_SIZE, WASM_HEADER,
};

use serde::Serialize;

use crate::analysis::StructuralModel;
use crate::config::FillMode;

/// The artifacts produced for a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifacts {
    #[serde(skip)]
    pub wasm: Vec<u8>,
    pub candid: String,
}

/// Generate both artifacts. The model must not contain errors.
pub fn generate(model: &StructuralModel, fill: FillMode) -> Artifacts {
    debug_assert!(!model.is_failed(), "artifacts requested for a failed model");
    Artifacts {
        wasm: generate_wasm(model, fill),
        candid: generate_candid(model),
    }
}

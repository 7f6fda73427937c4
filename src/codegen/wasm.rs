//! Placeholder WASM payload synthesis.
//!
//! The payload is not executable. Its size and segment layout are derived
//! from the structural model so that larger canisters produce larger
//! artifacts; only the 8-byte header carries fixed content.

use rand::RngCore;

use crate::analysis::StructuralModel;
use crate::config::FillMode;

/// `\0asm` magic followed by version 1.
pub const WASM_HEADER: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

pub const BASE_SIZE: usize = 1000;
pub const MODULE_SIZE: usize = 200;
pub const ENTRY_POINT_SIZE: usize = 150;
pub const IMPORT_SIZE: usize = 100;

const MODULE_METADATA_LEN: usize = 20;
const ENTRY_POINT_BODY_LEN: usize = 50;

/// What a region of the payload stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Header,
    ModuleMetadata { module: usize },
    EntryPoint { module: usize, entry_point: usize },
    Padding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub offset: usize,
    pub len: usize,
}

/// The planned shape of a payload: segments tile `0..total_size` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmLayout {
    pub total_size: usize,
    pub segments: Vec<Segment>,
}

/// Payload size for a model.
pub fn payload_size(model: &StructuralModel) -> usize {
    BASE_SIZE
        + model.modules.len() * MODULE_SIZE
        + model.entry_point_count() * ENTRY_POINT_SIZE
        + model.imports.len() * IMPORT_SIZE
}

/// Plan the segment layout for a model.
pub fn plan_layout(model: &StructuralModel) -> WasmLayout {
    let total_size = payload_size(model);
    let mut segments = Vec::with_capacity(2 + model.modules.len() + model.entry_point_count());
    let mut offset = 0;

    let mut push = |kind: SegmentKind, len: usize, offset: &mut usize| {
        segments.push(Segment {
            kind,
            offset: *offset,
            len,
        });
        *offset += len;
    };

    push(SegmentKind::Header, WASM_HEADER.len(), &mut offset);
    for (m, module) in model.modules.iter().enumerate() {
        push(SegmentKind::ModuleMetadata { module: m }, MODULE_METADATA_LEN, &mut offset);
        for e in 0..module.entry_points.len() {
            push(
                SegmentKind::EntryPoint {
                    module: m,
                    entry_point: e,
                },
                ENTRY_POINT_BODY_LEN,
                &mut offset,
            );
        }
    }
    // Every module and entry point reserves more than its segment, so the
    // padding is never negative.
    push(SegmentKind::Padding, total_size - offset, &mut offset);

    WasmLayout {
        total_size,
        segments,
    }
}

/// Generate the payload bytes for a model.
pub fn generate_wasm(model: &StructuralModel, fill: FillMode) -> Vec<u8> {
    let layout = plan_layout(model);
    let mut wasm = vec![0u8; layout.total_size];

    if fill == FillMode::Random {
        rand::rng().fill_bytes(&mut wasm[WASM_HEADER.len()..]);
    }
    wasm[..WASM_HEADER.len()].copy_from_slice(&WASM_HEADER);

    wasm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{EntryPointSpec, ImportDeclaration, ModuleSpec};
    use crate::language::SourceLanguage;

    fn model(entry_points_per_module: &[usize], imports: usize) -> StructuralModel {
        let mut model = StructuralModel::new(SourceLanguage::Motoko);
        for (i, &count) in entry_points_per_module.iter().enumerate() {
            let mut module = ModuleSpec::new(format!("M{}", i));
            for j in 0..count {
                module.entry_points.push(EntryPointSpec {
                    name: format!("f{}", j),
                    params: vec![],
                    return_type: "()".to_string(),
                    line: j + 1,
                });
            }
            model.modules.push(module);
        }
        for i in 0..imports {
            model.imports.push(ImportDeclaration {
                symbol_name: format!("I{}", i),
                source_path: "mo:base/I".to_string(),
                line: 1,
            });
        }
        model
    }

    #[test]
    fn test_payload_size_formula() {
        assert_eq!(payload_size(&model(&[], 0)), 1000);
        assert_eq!(payload_size(&model(&[1], 0)), 1000 + 200 + 150);
        assert_eq!(payload_size(&model(&[2, 3], 4)), 1000 + 2 * 200 + 5 * 150 + 4 * 100);
    }

    #[test]
    fn test_layout_tiles_payload() {
        let layout = plan_layout(&model(&[2, 0, 1], 1));
        let mut expected_offset = 0;
        for segment in &layout.segments {
            assert_eq!(segment.offset, expected_offset);
            expected_offset += segment.len;
        }
        assert_eq!(expected_offset, layout.total_size);
        assert_eq!(layout.segments[0].kind, SegmentKind::Header);
        assert_eq!(layout.segments[1].kind, SegmentKind::ModuleMetadata { module: 0 });
        assert_eq!(
            layout.segments[3].kind,
            SegmentKind::EntryPoint {
                module: 0,
                entry_point: 1
            }
        );
        assert_eq!(layout.segments.last().unwrap().kind, SegmentKind::Padding);
    }

    #[test]
    fn test_header_and_zero_fill() {
        let wasm = generate_wasm(&model(&[1], 2), FillMode::Zero);
        assert_eq!(wasm.len(), 1000 + 200 + 150 + 200);
        assert_eq!(wasm[..8], WASM_HEADER);
        assert!(wasm[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_random_fill_keeps_header() {
        let wasm = generate_wasm(&model(&[], 0), FillMode::Random);
        assert_eq!(wasm.len(), BASE_SIZE);
        assert_eq!(wasm[..8], WASM_HEADER);
    }
}

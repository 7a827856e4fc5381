use super::atom_line::is_atom_line;
use super::layout::{is_endmdl_line, is_model_line};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The full text of one pose, ready to be written as a standalone file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseBlock {
    pub model_number: u32,
    pub text: String,
}

/// Returns the `ATOM`/`HETATM` lines of the `model_number`-th model.
///
/// Models are counted by `MODEL` lines in file order. Inside the requested
/// model only coordinate lines are kept, verbatim and newline-terminated;
/// torsion-tree and remark records are dropped. Scanning stops at the
/// model's `ENDMDL`.
///
/// If nothing is copied (the text has no `MODEL` lines, or the requested
/// model does not exist or holds no atoms) the original text is returned
/// unchanged, so callers must not assume the result is narrower than the
/// input.
///
/// # Panics
///
/// Panics if `model_number` is 0; model numbers are 1-based.
pub fn extract_model(text: &str, model_number: usize) -> Cow<'_, str> {
    assert!(model_number >= 1, "model numbers are 1-based");

    let mut counter = 0usize;
    let mut in_target = false;
    let mut extracted = String::new();

    for line in text.lines() {
        if is_model_line(line) {
            counter += 1;
            in_target = counter == model_number;
            continue;
        }
        if is_endmdl_line(line) {
            if in_target {
                break;
            }
            continue;
        }
        if in_target && is_atom_line(line) {
            extracted.push_str(line);
            extracted.push('\n');
        }
    }

    if extracted.is_empty() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(extracted)
    }
}

fn push_block(
    current: &mut String,
    header: &str,
    model_number: u32,
    blocks: &mut Vec<PoseBlock>,
) {
    if current.is_empty() {
        return;
    }
    let mut text = String::with_capacity(header.len() + current.len() + 7);
    text.push_str(header);
    text.push_str(current);
    text.push_str("ENDMDL\n");
    blocks.push(PoseBlock { model_number, text });
    current.clear();
}

/// Splits a multi-model file into standalone per-pose texts.
///
/// Lines before the first `MODEL` form a header that is prepended to every
/// pose. Each block holds all records of its model (not only atoms) and is
/// terminated with `ENDMDL`; the `MODEL` line itself is not repeated. A
/// final model left open by a truncated file is still emitted.
///
/// Blocks are numbered by the ordinal of their `MODEL` line, the same
/// numbering [`parse_docking_file`](super::pdbqt::parse_docking_file) uses,
/// so skipping an empty model leaves a gap. If no block has any content (no
/// `MODEL` lines, or only empty models) the whole text is returned as
/// model 1.
pub fn split_poses(text: &str) -> Vec<PoseBlock> {
    let mut header = String::new();
    let mut current = String::new();
    let mut blocks = Vec::new();
    let mut in_model = false;
    let mut model_number = 0u32;

    for line in text.lines() {
        if is_model_line(line) {
            if in_model {
                push_block(&mut current, &header, model_number, &mut blocks);
            }
            in_model = true;
            model_number += 1;
            continue;
        }
        if is_endmdl_line(line) {
            if in_model {
                push_block(&mut current, &header, model_number, &mut blocks);
            }
            in_model = false;
            continue;
        }
        let target = if model_number == 0 {
            &mut header
        } else if in_model {
            &mut current
        } else {
            continue;
        };
        target.push_str(line);
        target.push('\n');
    }
    if in_model {
        push_block(&mut current, &header, model_number, &mut blocks);
    }

    if blocks.is_empty() {
        blocks.push(PoseBlock {
            model_number: 1,
            text: text.to_string(),
        });
    }
    blocks
}

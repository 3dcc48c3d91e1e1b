//! Canonical text rendering for outlines.
//!
//! # Invariants
//! - Blocks (preamble, heading, body) are separated by exactly one blank line.
//! - Output ends with a single newline, or is empty for an empty document.
//! - `parse(&render(doc)) == doc` for every structurally valid `doc`.

use crate::model::document::OutlineDocument;
use crate::model::section::Section;

/// Renders a document in canonical heading-based layout.
pub fn render(document: &OutlineDocument) -> String {
    let mut blocks: Vec<String> = Vec::new();
    if !document.preamble.is_empty() {
        blocks.push(document.preamble.clone());
    }
    for section in &document.sections {
        push_blocks(section, &mut blocks);
    }
    finish(blocks)
}

/// Renders one section subtree on its own.
pub fn render_section(section: &Section) -> String {
    let mut blocks = Vec::new();
    push_blocks(section, &mut blocks);
    finish(blocks)
}

fn push_blocks(section: &Section, blocks: &mut Vec<String>) {
    blocks.push(format!("{} {}", section.level.marker(), section.title));
    if !section.body.is_empty() {
        blocks.push(section.body.clone());
    }
    for child in &section.children {
        push_blocks(child, blocks);
    }
}

fn finish(blocks: Vec<String>) -> String {
    let mut out = blocks.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

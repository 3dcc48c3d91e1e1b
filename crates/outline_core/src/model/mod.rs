//! Outline domain model.
//!
//! # Responsibility
//! - Define the canonical in-memory shape of a paper outline.
//! - Provide drafting edits (body replace/append, section insertion).
//!
//! # Invariants
//! - Child order is narrative order and is never re-sorted.
//! - A child's heading level is exactly one greater than its parent's.
//! - Section bodies never start or end with blank lines.
//!
//! # See also
//! - `crate::parser` and `crate::render` for the text form.

pub mod document;
pub mod section;

//! Core logic for paper outlines.
//! This crate is the single source of truth for outline invariants.

pub mod inspect;
pub mod logging;
pub mod model;
pub mod parser;
pub mod render;
pub mod service;
pub mod store;
pub mod validate;

pub use inspect::{citations, is_placeholder, summarize, Citation, OutlineSummary};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{EditError, OutlineDocument, SectionPath, FUTURE_WORK, PAPER_SECTIONS};
pub use model::section::{HeadingLevel, HeadingLevelError, Section, TitleIssue};
pub use parser::{body_issue, parse, BodyIssue, ParseError, ParseResult};
pub use render::{render, render_section};
pub use service::outline_service::{CheckReport, OutlineService, ServiceError};
pub use store::{FileOutlineStore, MemoryOutlineStore, OutlineStore, StoreError, StoreResult};
pub use validate::{
    structural_violations, validate, validate_with, ProfileError, TrailingSectionRule,
    ValidationProfile, Violation, ViolationKind,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

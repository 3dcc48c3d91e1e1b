//! Outline drafting use-case service.
//!
//! # Responsibility
//! - Load, parse, validate and normalize the stored outline.
//! - Apply drafting edits and persist the canonical rendering.
//!
//! # Invariants
//! - Every save writes `render(doc)` and only after it parses back to `doc`.
//! - Failed edits leave the stored text untouched.

use crate::model::document::{EditError, OutlineDocument, SectionPath};
use crate::parser::{parse, ParseError};
use crate::render::render;
use crate::store::{OutlineStore, StoreError};
use crate::validate::{
    structural_violations, validate_with, ValidationProfile, Violation, ViolationKind,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for outline use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Parse(ParseError),
    Store(StoreError),
    Edit(EditError),
    /// `init` target already holds an outline.
    AlreadyExists(String),
    /// Document has structural violations and cannot be saved faithfully.
    Unrenderable(Vec<Violation>),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
            Self::AlreadyExists(location) => {
                write!(f, "outline already exists: {location}")
            }
            Self::Unrenderable(violations) => {
                let first = violations
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                write!(
                    f,
                    "outline has {} structural violation(s): {first}",
                    violations.len()
                )
            }
            Self::InconsistentState(details) => {
                write!(f, "inconsistent outline state: {details}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Edit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for ServiceError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<EditError> for ServiceError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

/// Parsed document plus its validation findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub document: OutlineDocument,
    pub violations: Vec<Violation>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Outline service facade over a store implementation.
pub struct OutlineService<S: OutlineStore> {
    store: S,
}

impl<S: OutlineStore> OutlineService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Loads and parses the stored outline.
    pub fn open(&self) -> Result<OutlineDocument, ServiceError> {
        let text = self.store.load()?;
        parse(&text).map_err(|err| {
            warn!(
                "event=outline_open module=service status=error location={} error_code={} line={}",
                self.store.describe(),
                err.kind(),
                err.line()
            );
            ServiceError::from(err)
        })
    }

    /// Parses and validates the stored outline against `profile`.
    pub fn check(&self, profile: &ValidationProfile) -> Result<CheckReport, ServiceError> {
        let started_at = Instant::now();
        let document = self.open()?;
        let violations = validate_with(&document, profile);
        info!(
            "event=outline_check module=service status=ok location={} violations={} duration_ms={}",
            self.store.describe(),
            violations.len(),
            started_at.elapsed().as_millis()
        );
        Ok(CheckReport {
            document,
            violations,
        })
    }

    /// Rewrites the stored outline in canonical form.
    ///
    /// Returns `true` when the stored text changed.
    pub fn normalize(&mut self) -> Result<bool, ServiceError> {
        let original = self.store.load()?;
        let document = parse(&original)?;
        let canonical = render(&document);
        if canonical == original {
            return Ok(false);
        }
        self.persist(&document)?;
        Ok(true)
    }

    /// Creates a new paper skeleton. Existing outlines are kept unless
    /// `overwrite` is set.
    pub fn init(&mut self, title: &str, overwrite: bool) -> Result<OutlineDocument, ServiceError> {
        if !overwrite && self.store.exists()? {
            return Err(ServiceError::AlreadyExists(self.store.describe()));
        }
        let document = OutlineDocument::paper_skeleton(title)?;
        self.persist(&document)?;
        Ok(document)
    }

    /// Replaces one section body fully.
    pub fn set_body(&mut self, path: &str, text: &str) -> Result<OutlineDocument, ServiceError> {
        let path = SectionPath::parse(path)?;
        self.edit(|document| document.set_body(&path, text))
    }

    /// Appends a paragraph to one section body.
    pub fn append_body(
        &mut self,
        path: &str,
        text: &str,
    ) -> Result<OutlineDocument, ServiceError> {
        let path = SectionPath::parse(path)?;
        self.edit(|document| document.append_body(&path, text))
    }

    /// Adds a child section (or a top-level section when `parent` is `None`).
    pub fn add_section(
        &mut self,
        parent: Option<&str>,
        title: &str,
    ) -> Result<OutlineDocument, ServiceError> {
        let parent = parent.map(SectionPath::parse).transpose()?;
        self.edit(|document| document.add_section(parent.as_ref(), title))
    }

    fn edit(
        &mut self,
        apply: impl FnOnce(&mut OutlineDocument) -> Result<(), EditError>,
    ) -> Result<OutlineDocument, ServiceError> {
        let mut document = self.open()?;
        apply(&mut document)?;
        self.persist(&document)?;
        Ok(document)
    }

    fn persist(&mut self, document: &OutlineDocument) -> Result<(), ServiceError> {
        // An unclosed fence in the last body still round-trips; the read-back
        // check below catches the cases where it does not.
        let structural: Vec<Violation> = structural_violations(document)
            .into_iter()
            .filter(|violation| violation.kind != ViolationKind::UnclosedFence)
            .collect();
        if !structural.is_empty() {
            return Err(ServiceError::Unrenderable(structural));
        }

        let text = render(document);
        let reparsed = parse(&text)?;
        if reparsed != *document {
            return Err(ServiceError::InconsistentState(
                "rendered outline does not parse back to the same document",
            ));
        }

        self.store.save(&text)?;
        info!(
            "event=outline_persist module=service status=ok location={} sections={}",
            self.store.describe(),
            document.section_count()
        );
        Ok(())
    }
}

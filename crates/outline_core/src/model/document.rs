//! Outline document model and drafting edits.
//!
//! # Responsibility
//! - Hold the ordered top-level sections plus any preamble text.
//! - Resolve `SectionPath` lookups and apply body/section edits.
//!
//! # Invariants
//! - Edits never reorder existing sections.
//! - Edits reject bodies and titles that would not survive render/parse.

use crate::model::section::{normalize_body, title_issue, HeadingLevel, Section, TitleIssue};
use crate::parser::{body_issue, BodyIssue};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Top-level sections of the default paper layout, in narrative order.
pub const PAPER_SECTIONS: &[&str] = &[
    "Abstract",
    "Introduction",
    "Materials and Methods",
    "Results",
    "Discussion",
    "Conclusion",
];
/// Optional section nested under (or following) `Conclusion`.
pub const FUTURE_WORK: &str = "Future Work";
/// Parent of `FUTURE_WORK` in the default layout.
pub const CONCLUSION: &str = "Conclusion";
/// Marker body used for sections that are not drafted yet.
pub const PLACEHOLDER_BODY: &str = "x";

/// The full structured outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Text before the first heading.
    #[serde(default)]
    pub preamble: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Slash-separated title path, e.g. `Title/Conclusion/Future Work`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPath {
    segments: Vec<String>,
}

impl SectionPath {
    /// Parses a path; segments are trimmed and must be non-empty.
    pub fn parse(raw: &str) -> Result<Self, EditError> {
        let segments: Vec<String> = raw
            .split('/')
            .map(|segment| segment.trim().to_string())
            .collect();
        if segments.iter().any(String::is_empty) {
            return Err(EditError::InvalidPath(raw.to_string()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl Display for SectionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Error raised by drafting edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    InvalidPath(String),
    SectionNotFound(String),
    InvalidTitle { title: String, issue: TitleIssue },
    /// Parent already sits at the deepest heading level.
    LevelOverflow(String),
    InvalidBody(BodyIssue),
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(raw) => write!(f, "invalid section path `{raw}`"),
            Self::SectionNotFound(path) => write!(f, "section not found: {path}"),
            Self::InvalidTitle { title, issue } => {
                write!(f, "invalid section title `{title}`: {issue}")
            }
            Self::LevelOverflow(path) => write!(
                f,
                "cannot nest below `{path}`: level {} is the deepest heading",
                HeadingLevel::MAX
            ),
            Self::InvalidBody(issue) => write!(f, "invalid section body: {issue}"),
        }
    }
}

impl Error for EditError {}

impl OutlineDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the canonical paper outline with placeholder bodies.
    pub fn paper_skeleton(title: &str) -> Result<Self, EditError> {
        check_title(title)?;

        let mut root = Section::new(HeadingLevel::TOP, title);
        for name in PAPER_SECTIONS {
            let mut section =
                Section::new(HeadingLevel::SECTION, *name).with_body(PLACEHOLDER_BODY);
            if *name == CONCLUSION {
                let future_work =
                    Section::new(HeadingLevel::SUBSECTION, FUTURE_WORK).with_body(PLACEHOLDER_BODY);
                section = section.with_child(future_work);
            }
            root.children.push(section);
        }

        Ok(Self {
            preamble: String::new(),
            sections: vec![root],
        })
    }

    /// Looks up a section by path, matching titles case-insensitively.
    pub fn find(&self, path: &SectionPath) -> Option<&Section> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.sections.iter().find(|s| s.title_matches(first))?;
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub fn find_mut(&mut self, path: &SectionPath) -> Option<&mut Section> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.sections.iter_mut().find(|s| s.title_matches(first))?;
        for segment in rest {
            current = current.child_mut(segment)?;
        }
        Some(current)
    }

    /// Replaces a section body in full.
    pub fn set_body(&mut self, path: &SectionPath, text: &str) -> Result<(), EditError> {
        let body = checked_body(text)?;
        let section = self
            .find_mut(path)
            .ok_or_else(|| EditError::SectionNotFound(path.to_string()))?;
        section.body = body;
        Ok(())
    }

    /// Appends a paragraph to a section body. Placeholder-only bodies are
    /// replaced instead of extended.
    pub fn append_body(&mut self, path: &SectionPath, text: &str) -> Result<(), EditError> {
        let addition = normalize_body(text);
        let section = self
            .find_mut(path)
            .ok_or_else(|| EditError::SectionNotFound(path.to_string()))?;
        let combined = if crate::inspect::is_placeholder(&section.body) {
            addition
        } else if addition.is_empty() {
            section.body.clone()
        } else {
            format!("{}\n\n{}", section.body, addition)
        };
        section.body = checked_body(&combined)?;
        Ok(())
    }

    /// Appends a new section. `None` parent adds a top-level section.
    pub fn add_section(
        &mut self,
        parent: Option<&SectionPath>,
        title: &str,
    ) -> Result<(), EditError> {
        check_title(title)?;
        match parent {
            None => {
                self.sections.push(Section::new(HeadingLevel::TOP, title));
            }
            Some(path) => {
                let parent = self
                    .find_mut(path)
                    .ok_or_else(|| EditError::SectionNotFound(path.to_string()))?;
                let level = parent
                    .level
                    .child()
                    .ok_or_else(|| EditError::LevelOverflow(path.to_string()))?;
                parent.children.push(Section::new(level, title));
            }
        }
        Ok(())
    }

    /// All sections in document order, paired with their `/`-joined paths.
    pub fn flatten(&self) -> Vec<(String, &Section)> {
        let mut out = Vec::new();
        for section in &self.sections {
            collect(section, String::new(), &mut out);
        }
        out
    }

    /// Number of sections in the whole tree.
    pub fn section_count(&self) -> usize {
        self.sections.iter().map(Section::subtree_len).sum()
    }
}

fn collect<'a>(section: &'a Section, prefix: String, out: &mut Vec<(String, &'a Section)>) {
    let path = if prefix.is_empty() {
        section.title.clone()
    } else {
        format!("{prefix}/{}", section.title)
    };
    out.push((path.clone(), section));
    for child in &section.children {
        collect(child, path.clone(), out);
    }
}

fn check_title(title: &str) -> Result<(), EditError> {
    let issue = title_issue(title).or_else(|| {
        // Paths could never address this section again.
        title.contains('/').then_some(TitleIssue::PathSeparator)
    });
    match issue {
        Some(issue) => Err(EditError::InvalidTitle {
            title: title.to_string(),
            issue,
        }),
        None => Ok(()),
    }
}

fn checked_body(text: &str) -> Result<String, EditError> {
    let body = normalize_body(text);
    match body_issue(&body) {
        Some(issue) => Err(EditError::InvalidBody(issue)),
        None => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::{EditError, OutlineDocument, SectionPath};
    use crate::model::section::TitleIssue;

    fn path(raw: &str) -> SectionPath {
        SectionPath::parse(raw).unwrap()
    }

    #[test]
    fn section_path_rejects_empty_segments() {
        assert!(SectionPath::parse("Title//Results").is_err());
        assert!(SectionPath::parse("").is_err());
        assert_eq!(path(" Title / Results ").to_string(), "Title/Results");
    }

    #[test]
    fn skeleton_contains_paper_layout() {
        let doc = OutlineDocument::paper_skeleton("Plant Phenotyping").unwrap();
        assert_eq!(doc.sections.len(), 1);
        let titles: Vec<&str> = doc.sections[0]
            .children
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Abstract",
                "Introduction",
                "Materials and Methods",
                "Results",
                "Discussion",
                "Conclusion"
            ]
        );
        assert!(doc
            .find(&path("plant phenotyping/conclusion/future work"))
            .is_some());
        assert_eq!(doc.section_count(), 8);
    }

    #[test]
    fn append_replaces_placeholder_then_extends() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let target = path("Paper/Results");
        doc.append_body(&target, "first finding").unwrap();
        doc.append_body(&target, "\nsecond finding\n").unwrap();
        assert_eq!(
            doc.find(&target).unwrap().body,
            "first finding\n\nsecond finding"
        );
    }

    #[test]
    fn set_body_rejects_heading_lines() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let err = doc
            .set_body(&path("Paper/Abstract"), "text\n## Sneaky")
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidBody(_)));
    }

    #[test]
    fn add_section_uses_parent_level_plus_one() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        doc.add_section(Some(&path("Paper/Results")), "Leaf Area")
            .unwrap();
        let added = doc.find(&path("Paper/Results/Leaf Area")).unwrap();
        assert_eq!(added.level.get(), 3);

        let err = doc.add_section(None, "  ").unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidTitle {
                issue: TitleIssue::Empty,
                ..
            }
        ));

        let err = doc
            .add_section(Some(&path("Paper/Missing")), "Child")
            .unwrap_err();
        assert_eq!(err, EditError::SectionNotFound("Paper/Missing".to_string()));
    }

    #[test]
    fn add_section_rejects_titles_with_path_separator() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let err = doc
            .add_section(Some(&path("Paper/Results")), "Inputs/Outputs")
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::InvalidTitle {
                issue: TitleIssue::PathSeparator,
                ..
            }
        ));
        assert!(doc.find(&path("Paper/Results")).unwrap().children.is_empty());
        assert!(OutlineDocument::paper_skeleton("Roots/Shoots").is_err());
    }

    #[test]
    fn flatten_lists_paths_in_document_order() {
        let doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let paths: Vec<String> = doc.flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths.first().map(String::as_str), Some("Paper"));
        assert_eq!(
            paths.last().map(String::as_str),
            Some("Paper/Conclusion/Future Work")
        );
    }
}

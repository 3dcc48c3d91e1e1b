//! Section and heading-level model.
//!
//! # Responsibility
//! - Define `Section`, the titled unit of an outline.
//! - Own body/title normalization rules shared by parser and editors.
//!
//! # Invariants
//! - `HeadingLevel` is always within the ATX range `1..=6`.
//! - `normalize_body` output has no leading or trailing blank lines.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// ATX heading depth (`#` = 1 ... `######` = 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Shallowest heading level.
    pub const MIN: u8 = 1;
    /// Deepest heading level expressible with ATX markers.
    pub const MAX: u8 = 6;
    /// Level of the document title.
    pub const TOP: HeadingLevel = HeadingLevel(1);
    /// Level of the paper's main sections.
    pub const SECTION: HeadingLevel = HeadingLevel(2);
    /// Level of sections nested under a main section.
    pub const SUBSECTION: HeadingLevel = HeadingLevel(3);

    /// Creates a level, rejecting values outside `1..=6`.
    pub fn new(value: u8) -> Result<Self, HeadingLevelError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(HeadingLevelError(value))
        }
    }

    /// Raw numeric depth.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Level used by direct children, or `None` past the deepest level.
    pub fn child(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// Heading marker, e.g. `###` for level 3.
    pub fn marker(self) -> String {
        "#".repeat(usize::from(self.0))
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = HeadingLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(value: HeadingLevel) -> Self {
        value.0
    }
}

impl Display for HeadingLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Heading level outside the supported ATX range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLevelError(pub u8);

impl Display for HeadingLevelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "heading level {} is out of range {}..={}",
            self.0,
            HeadingLevel::MIN,
            HeadingLevel::MAX
        )
    }
}

impl Error for HeadingLevelError {}

/// One titled unit of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub level: HeadingLevel,
    pub title: String,
    /// Free-form text between this heading and the next one.
    #[serde(default)]
    pub body: String,
    /// Nested sections in narrative order.
    #[serde(default)]
    pub children: Vec<Section>,
}

impl Section {
    /// Creates an empty section with the given level and title.
    pub fn new(level: HeadingLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: String::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style body setter. The body is normalized.
    pub fn with_body(mut self, body: impl AsRef<str>) -> Self {
        self.body = normalize_body(body.as_ref());
        self
    }

    /// Builder-style child append. No level checks are applied here.
    pub fn with_child(mut self, child: Section) -> Self {
        self.children.push(child);
        self
    }

    /// Returns whether this section's title matches `name`, ignoring case and
    /// surrounding whitespace.
    pub fn title_matches(&self, name: &str) -> bool {
        titles_match(&self.title, name)
    }

    /// First direct child whose title matches `name`.
    pub fn child(&self, name: &str) -> Option<&Section> {
        self.children.iter().find(|child| child.title_matches(name))
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.children
            .iter_mut()
            .find(|child| child.title_matches(name))
    }

    /// Number of sections in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Section::subtree_len)
            .sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Section::depth).max().unwrap_or(0)
    }
}

/// Case-insensitive, whitespace-trimmed title comparison.
pub fn titles_match(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

/// Normalizes body text: unifies line endings and strips leading and
/// trailing blank lines. Interior lines are kept verbatim apart from
/// trailing carriage returns.
pub fn normalize_body(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    normalize_lines(&lines)
}

pub(crate) fn normalize_lines(lines: &[&str]) -> String {
    // `lines()` only strips one `\r\n`; a stray `\r` would be lost on the
    // next read.
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| line.trim_end_matches('\r'))
        .collect();
    let start = lines.iter().position(|line| !line.trim().is_empty());
    let end = lines.iter().rposition(|line| !line.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Reason a title cannot be rendered as a heading and parsed back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleIssue {
    Empty,
    Multiline,
    SurroundingWhitespace,
    /// Trailing `#` run that the parser would read as a closing sequence.
    ClosingSequence,
    /// Contains `/`, which section paths use as separator.
    PathSeparator,
}

impl Display for TitleIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "title is empty"),
            Self::Multiline => write!(f, "title spans multiple lines"),
            Self::SurroundingWhitespace => {
                write!(f, "title has leading or trailing whitespace")
            }
            Self::ClosingSequence => {
                write!(f, "title ends with a `#` run that reads as a closing sequence")
            }
            Self::PathSeparator => {
                write!(f, "title contains `/`, which separates section path segments")
            }
        }
    }
}

/// Checks that `title` survives a render/parse cycle unchanged.
pub fn title_issue(title: &str) -> Option<TitleIssue> {
    if title.trim().is_empty() {
        return Some(TitleIssue::Empty);
    }
    if title.contains(['\n', '\r']) {
        return Some(TitleIssue::Multiline);
    }
    if title.trim() != title {
        return Some(TitleIssue::SurroundingWhitespace);
    }
    if title.ends_with('#') {
        let rest = title.trim_end_matches('#');
        if rest.is_empty() || rest.ends_with([' ', '\t']) {
            return Some(TitleIssue::ClosingSequence);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{normalize_body, title_issue, HeadingLevel, Section, TitleIssue};

    #[test]
    fn heading_level_rejects_out_of_range_values() {
        assert!(HeadingLevel::new(0).is_err());
        assert!(HeadingLevel::new(7).is_err());
        assert_eq!(HeadingLevel::new(6).unwrap().get(), 6);
        assert_eq!(HeadingLevel::new(6).unwrap().child(), None);
        assert_eq!(HeadingLevel::TOP.marker(), "#");
    }

    #[test]
    fn heading_level_deserialize_enforces_range() {
        let err = serde_json::from_str::<HeadingLevel>("9").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        let level: HeadingLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level.get(), 2);
    }

    #[test]
    fn normalize_body_trims_blank_edges_only() {
        assert_eq!(normalize_body("\n\n  \nfirst\n\n  second\n\n"), "first\n\n  second");
        assert_eq!(normalize_body("\r\nline\r\n"), "line");
        assert_eq!(normalize_body("  \n\t\n"), "");
        assert_eq!(normalize_body("a\r\r\nb\r"), "a\nb");
    }

    #[test]
    fn title_issue_flags_unrenderable_titles() {
        assert_eq!(title_issue(""), Some(TitleIssue::Empty));
        assert_eq!(title_issue("a\nb"), Some(TitleIssue::Multiline));
        assert_eq!(title_issue(" Results"), Some(TitleIssue::SurroundingWhitespace));
        assert_eq!(title_issue("Results ##"), Some(TitleIssue::ClosingSequence));
        assert_eq!(title_issue("C#"), None);
        assert_eq!(title_issue("Materials and Methods"), None);
    }

    #[test]
    fn lookup_and_depth_helpers() {
        let section = Section::new(HeadingLevel::TOP, "Title").with_child(
            Section::new(HeadingLevel::new(2).unwrap(), "Conclusion")
                .with_child(Section::new(HeadingLevel::new(3).unwrap(), "Future Work")),
        );
        assert!(section.child(" conclusion ").is_some());
        assert_eq!(section.subtree_len(), 3);
        assert_eq!(section.depth(), 3);
    }
}

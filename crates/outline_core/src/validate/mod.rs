//! Outline validation.
//!
//! # Responsibility
//! - Check structural invariants (titles, nesting, bodies).
//! - Check the paper layout described by a `ValidationProfile`.
//!
//! # Invariants
//! - Validation never fails; it reports every violation it finds.
//! - An empty result means the document is compliant.
//! - A document free of structural violations round-trips through
//!   `render`/`parse`.

pub mod profile;

use crate::model::document::OutlineDocument;
use crate::model::section::{normalize_body, title_issue, HeadingLevel, Section, TitleIssue};
use crate::parser::{body_issue, BodyIssue};
use log::debug;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub use profile::{ProfileError, TrailingSectionRule, ValidationProfile};

/// Violation category. `code()` is the stable name shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    EmptyTitle,
    InvalidTitle,
    MalformedHeading,
    HeadingInBody,
    UnclosedFence,
    /// Body or preamble with blank edges or line endings that parsing drops.
    UnnormalizedBody,
    TitleCount,
    MissingSection,
    DuplicateSection,
    OutOfOrder,
    MisplacedFutureWork,
}

impl ViolationKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyTitle => "EmptyTitle",
            Self::InvalidTitle => "InvalidTitle",
            Self::MalformedHeading => "MalformedHeading",
            Self::HeadingInBody => "HeadingInBody",
            Self::UnclosedFence => "UnclosedFence",
            Self::UnnormalizedBody => "UnnormalizedBody",
            Self::TitleCount => "TitleCount",
            Self::MissingSection => "MissingSection",
            Self::DuplicateSection => "DuplicateSection",
            Self::OutOfOrder => "OutOfOrder",
            Self::MisplacedFutureWork => "MisplacedFutureWork",
        }
    }

    /// Structural kinds concern the shape of the tree itself; the rest are
    /// profile layout findings.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::EmptyTitle
                | Self::InvalidTitle
                | Self::MalformedHeading
                | Self::HeadingInBody
                | Self::UnclosedFence
                | Self::UnnormalizedBody
        )
    }
}

/// One human-readable finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Section path the finding refers to, when there is one.
    pub path: Option<String>,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, path: Option<String>, message: String) -> Self {
        Self {
            kind,
            path,
            message,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.code(), self.message)
    }
}

/// Validates against the default paper profile.
pub fn validate(document: &OutlineDocument) -> Vec<Violation> {
    validate_with(document, &ValidationProfile::default())
}

/// Validates structure plus the layout required by `profile`.
pub fn validate_with(document: &OutlineDocument, profile: &ValidationProfile) -> Vec<Violation> {
    let mut out = Vec::new();
    check_text(&document.preamble, None, "preamble", &mut out);
    for section in &document.sections {
        check_section(section, None, &mut out);
    }
    check_layout(document, profile, &mut out);
    debug!(
        "event=outline_validate module=validate status=ok violations={}",
        out.len()
    );
    out
}

/// Structural findings only; profile requirements are ignored.
pub fn structural_violations(document: &OutlineDocument) -> Vec<Violation> {
    validate_with(document, &ValidationProfile::structural())
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        "<untitled>"
    } else {
        title
    }
}

fn check_section(
    section: &Section,
    parent: Option<(&str, HeadingLevel)>,
    out: &mut Vec<Violation>,
) {
    let path = match parent {
        Some((parent_path, _)) => format!("{parent_path}/{}", display_title(&section.title)),
        None => display_title(&section.title).to_string(),
    };

    match parent {
        None if section.level != HeadingLevel::TOP => out.push(Violation::new(
            ViolationKind::MalformedHeading,
            Some(path.clone()),
            format!(
                "top-level section `{path}` has level {}; expected level {}",
                section.level,
                HeadingLevel::TOP
            ),
        )),
        Some((parent_path, parent_level))
            if section.level.get() != parent_level.get() + 1 =>
        {
            out.push(Violation::new(
                ViolationKind::MalformedHeading,
                Some(path.clone()),
                format!(
                    "section `{path}` has level {} but parent `{parent_path}` has level {parent_level}",
                    section.level
                ),
            ))
        }
        _ => {}
    }

    match title_issue(&section.title) {
        Some(TitleIssue::Empty) => out.push(Violation::new(
            ViolationKind::EmptyTitle,
            Some(path.clone()),
            format!("section `{path}` has an empty title"),
        )),
        Some(issue) => out.push(Violation::new(
            ViolationKind::InvalidTitle,
            Some(path.clone()),
            format!("section `{path}`: {issue}"),
        )),
        None => {}
    }

    let label = format!("section `{path}`");
    check_text(&section.body, Some(&path), &label, out);

    for child in &section.children {
        check_section(child, Some((&path, section.level)), out);
    }
}

/// Body and preamble checks: text must come back unchanged after a
/// render/parse cycle.
fn check_text(text: &str, path: Option<&str>, label: &str, out: &mut Vec<Violation>) {
    if normalize_body(text) != text {
        out.push(Violation::new(
            ViolationKind::UnnormalizedBody,
            path.map(str::to_string),
            format!("{label} has blank edge lines or non-`\\n` line endings"),
        ));
    }

    match body_issue(text) {
        Some(issue @ BodyIssue::HeadingLine(_)) => out.push(Violation::new(
            ViolationKind::HeadingInBody,
            path.map(str::to_string),
            format!("{label}: {issue}"),
        )),
        Some(issue @ BodyIssue::UnclosedFence(_)) => out.push(Violation::new(
            ViolationKind::UnclosedFence,
            path.map(str::to_string),
            format!("{label}: {issue}"),
        )),
        None => {}
    }
}

fn check_layout(
    document: &OutlineDocument,
    profile: &ValidationProfile,
    out: &mut Vec<Violation>,
) {
    let tops = &document.sections;
    if profile.require_single_title && tops.len() != 1 {
        out.push(Violation::new(
            ViolationKind::TitleCount,
            None,
            format!(
                "expected exactly one top-level title section, found {}",
                tops.len()
            ),
        ));
    }

    // With a single title the paper sections are its children; otherwise
    // they are looked up among the top-level sections.
    let (scope, scope_prefix): (&[Section], Option<&str>) = match tops.as_slice() {
        [title] => (title.children.as_slice(), Some(title.title.as_str())),
        _ => (tops.as_slice(), None),
    };
    let scoped_path = |title: &str| match scope_prefix {
        Some(prefix) => format!("{prefix}/{title}"),
        None => title.to_string(),
    };

    let mut positions: Vec<(&str, usize)> = Vec::new();
    for name in &profile.required_sections {
        let hits: Vec<usize> = scope
            .iter()
            .enumerate()
            .filter(|(_, section)| section.title_matches(name))
            .map(|(index, _)| index)
            .collect();
        match hits.as_slice() {
            [] => out.push(Violation::new(
                ViolationKind::MissingSection,
                None,
                format!("missing required section `{name}`"),
            )),
            [first, rest @ ..] => {
                if !rest.is_empty() {
                    out.push(Violation::new(
                        ViolationKind::DuplicateSection,
                        Some(scoped_path(name)),
                        format!("section `{name}` appears {} times", hits.len()),
                    ));
                }
                positions.push((name.as_str(), *first));
            }
        }
    }

    let mut last: Option<(&str, usize)> = None;
    for &(name, position) in &positions {
        if let Some((previous, previous_position)) = last {
            if position < previous_position {
                out.push(Violation::new(
                    ViolationKind::OutOfOrder,
                    Some(scoped_path(name)),
                    format!("section `{name}` appears before `{previous}`"),
                ));
                continue;
            }
        }
        last = Some((name, position));
    }

    if let Some(rule) = &profile.future_work {
        check_trailing_section(document, scope, rule, &positions, out);
    }
}

fn check_trailing_section(
    document: &OutlineDocument,
    scope: &[Section],
    rule: &TrailingSectionRule,
    positions: &[(&str, usize)],
    out: &mut Vec<Violation>,
) {
    let parent_index = scope.iter().position(|s| s.title_matches(&rule.parent));
    let anchor = parent_index.or_else(|| positions.iter().map(|(_, p)| *p).max());

    let mut allowed: Vec<&Section> = Vec::new();
    if let Some(index) = parent_index {
        allowed.extend(
            scope[index]
                .children
                .iter()
                .filter(|child| child.title_matches(&rule.title)),
        );
    }
    allowed.extend(
        scope
            .iter()
            .enumerate()
            .filter(|(index, s)| {
                s.title_matches(&rule.title) && anchor.map_or(true, |a| *index > a)
            })
            .map(|(_, s)| s),
    );

    let occurrences: Vec<(String, &Section)> = document
        .flatten()
        .into_iter()
        .filter(|(_, section)| section.title_matches(&rule.title))
        .collect();

    if occurrences.len() > 1 {
        out.push(Violation::new(
            ViolationKind::DuplicateSection,
            None,
            format!(
                "section `{}` appears {} times",
                rule.title,
                occurrences.len()
            ),
        ));
    }

    for (path, section) in occurrences {
        if allowed.iter().any(|candidate| std::ptr::eq(*candidate, section)) {
            continue;
        }
        out.push(Violation::new(
            ViolationKind::MisplacedFutureWork,
            Some(path.clone()),
            format!(
                "section `{path}` must be nested under `{}` or follow it as a standalone section",
                rule.parent
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{structural_violations, validate, ViolationKind};
    use crate::model::document::OutlineDocument;
    use crate::model::section::{HeadingLevel, Section};

    fn kinds(doc: &OutlineDocument) -> Vec<ViolationKind> {
        validate(doc).into_iter().map(|v| v.kind).collect()
    }

    #[test]
    fn skeleton_is_compliant() {
        let doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn level_jump_is_reported_as_malformed_heading() {
        let doc = OutlineDocument {
            preamble: String::new(),
            sections: vec![Section::new(HeadingLevel::TOP, "Title")
                .with_child(Section::new(HeadingLevel::SUBSECTION, "Deep"))],
        };
        let violations = structural_violations(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MalformedHeading);
        assert!(violations[0].to_string().contains("MalformedHeading"));
        assert_eq!(violations[0].path.as_deref(), Some("Title/Deep"));
    }

    #[test]
    fn empty_title_and_heading_body_are_structural() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        doc.sections[0].children[0].title = " ".to_string();
        doc.sections[0].children[1].body = "text\n## hidden".to_string();
        let found = kinds(&doc);
        assert!(found.contains(&ViolationKind::EmptyTitle));
        assert!(found.contains(&ViolationKind::HeadingInBody));
        assert!(found.contains(&ViolationKind::MissingSection));
    }

    #[test]
    fn out_of_order_sections_are_reported() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        doc.sections[0].children.swap(0, 1);
        let violations = validate(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::OutOfOrder);
        assert!(violations[0].message.contains("Abstract"));
    }

    #[test]
    fn future_work_may_stand_alone_after_conclusion() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let conclusion = doc.sections[0].children.last_mut().unwrap();
        let future = conclusion.children.remove(0);
        doc.sections[0]
            .children
            .push(Section::new(HeadingLevel::SECTION, future.title).with_body("x"));
        assert!(validate(&doc).is_empty());
    }

    #[test]
    fn future_work_before_conclusion_is_misplaced() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let conclusion = doc.sections[0].children.last_mut().unwrap();
        conclusion.children.clear();
        doc.sections[0]
            .children
            .insert(0, Section::new(HeadingLevel::SECTION, "Future Work"));
        let violations = validate(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MisplacedFutureWork);
        assert_eq!(violations[0].path.as_deref(), Some("Paper/Future Work"));
    }

    #[test]
    fn preamble_that_swallows_headings_is_structural() {
        let doc = OutlineDocument {
            preamble: "```\nopen fence".to_string(),
            sections: vec![Section::new(HeadingLevel::TOP, "Title")],
        };
        let violations = structural_violations(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::UnclosedFence);
        assert_eq!(violations[0].path, None);
        assert!(violations[0].message.starts_with("preamble"));

        let doc = OutlineDocument {
            preamble: "notes\n# Hidden".to_string(),
            sections: Vec::new(),
        };
        let found: Vec<ViolationKind> =
            structural_violations(&doc).into_iter().map(|v| v.kind).collect();
        assert_eq!(found, vec![ViolationKind::HeadingInBody]);
    }

    #[test]
    fn unnormalized_bodies_are_structural() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        doc.sections[0].children[0].body = "\nbody\n".to_string();
        doc.preamble = "draft\r\nnotes".to_string();
        let violations = structural_violations(&doc);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.kind == ViolationKind::UnnormalizedBody && v.kind.is_structural()));
        assert_eq!(violations[0].path, None);
        assert_eq!(violations[1].path.as_deref(), Some("Paper/Abstract"));
    }

    #[test]
    fn multiple_titles_are_reported() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        doc.sections.push(Section::new(HeadingLevel::TOP, "Appendix"));
        let found = kinds(&doc);
        assert!(found.contains(&ViolationKind::TitleCount));
    }
}

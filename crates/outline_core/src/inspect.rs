//! Drafting inspection: citations, placeholders and progress summary.
//!
//! # Responsibility
//! - Extract quoted citations (with optional parenthesized attribution).
//! - Detect placeholder-only bodies (`x`, `TODO`, ...).
//! - Summarize drafting progress for a whole outline.

use crate::model::document::OutlineDocument;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static CITATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:"([^"\n]+)"|“([^”\n]+)”)(?:\s*\(([^)\n]+)\))?"#)
        .expect("valid citation regex")
});

const PLACEHOLDER_MARKERS: &[&str] = &["x", "todo", "tbd", "tk", "...", "…", "[citation needed]"];

/// A quoted passage found in a section body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub text: String,
    /// Trailing `(Author, Year)` text, when present.
    pub attribution: Option<String>,
}

/// Extracts citations in order of appearance.
pub fn citations(body: &str) -> Vec<Citation> {
    CITATION_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let text = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
            if text.is_empty() {
                return None;
            }
            Some(Citation {
                text: text.to_string(),
                attribution: caps
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|value| !value.is_empty()),
            })
        })
        .collect()
}

/// Returns whether `body` is empty or made of placeholder markers only.
pub fn is_placeholder(body: &str) -> bool {
    body.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .all(|line| PLACEHOLDER_MARKERS.contains(&line.as_str()))
}

/// Drafting progress for one outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineSummary {
    pub total_sections: usize,
    pub drafted_sections: usize,
    /// Paths of sections whose body is still a placeholder.
    pub placeholder_paths: Vec<String>,
    pub citation_count: usize,
    /// Deepest nesting in the tree; 0 for an empty outline.
    pub max_depth: usize,
}

impl OutlineSummary {
    /// Drafted share in percent, rounded down. An empty outline is 0%.
    pub fn drafted_percent(&self) -> usize {
        if self.total_sections == 0 {
            0
        } else {
            self.drafted_sections * 100 / self.total_sections
        }
    }
}

/// Summarizes drafting progress.
///
/// Sections with children and an empty body count as structural headers and
/// are neither drafted nor placeholders.
pub fn summarize(document: &OutlineDocument) -> OutlineSummary {
    let mut summary = OutlineSummary {
        total_sections: 0,
        drafted_sections: 0,
        placeholder_paths: Vec::new(),
        citation_count: 0,
        max_depth: document
            .sections
            .iter()
            .map(|s| s.depth())
            .max()
            .unwrap_or(0),
    };

    for (path, section) in document.flatten() {
        summary.total_sections += 1;
        summary.citation_count += citations(&section.body).len();
        if section.body.is_empty() && !section.children.is_empty() {
            continue;
        }
        if is_placeholder(&section.body) {
            summary.placeholder_paths.push(path);
        } else {
            summary.drafted_sections += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::{citations, is_placeholder, summarize};
    use crate::model::document::{OutlineDocument, SectionPath};

    #[test]
    fn citations_capture_quotes_and_attribution() {
        let body = r#"As noted, "plants grow toward light" (Darwin, 1880) and “roots follow water”."#;
        let found = citations(body);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "plants grow toward light");
        assert_eq!(found[0].attribution.as_deref(), Some("Darwin, 1880"));
        assert_eq!(found[1].text, "roots follow water");
        assert_eq!(found[1].attribution, None);
    }

    #[test]
    fn placeholder_detection_is_case_insensitive() {
        assert!(is_placeholder("x"));
        assert!(is_placeholder(" TODO \n\nx"));
        assert!(is_placeholder(""));
        assert!(!is_placeholder("x marks the spot"));
    }

    #[test]
    fn summary_counts_drafted_and_placeholder_sections() {
        let mut doc = OutlineDocument::paper_skeleton("Paper").unwrap();
        let abstract_path = SectionPath::parse("Paper/Abstract").unwrap();
        doc.set_body(&abstract_path, r#"We cite "a short quote" (Lee 2021)."#)
            .unwrap();

        let summary = summarize(&doc);
        assert_eq!(summary.total_sections, 8);
        assert_eq!(summary.drafted_sections, 1);
        // The title has children and no body, so it is only a header.
        assert_eq!(summary.placeholder_paths.len(), 6);
        assert!(summary
            .placeholder_paths
            .contains(&"Paper/Conclusion/Future Work".to_string()));
        assert_eq!(summary.citation_count, 1);
        assert_eq!(summary.max_depth, 3);
        assert_eq!(summary.drafted_percent(), 12);
    }
}

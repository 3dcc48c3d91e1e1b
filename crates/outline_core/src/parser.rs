//! ATX-heading outline parser.
//!
//! # Responsibility
//! - Turn outline text into an `OutlineDocument` section tree.
//! - Classify lines (heading / text) with fenced-code awareness.
//!
//! # Invariants
//! - Heading depth may increase by at most one level per heading.
//! - The level before the first heading is 0, so the first heading is `#`.
//! - Lines inside fenced code blocks are never headings.

use crate::model::document::OutlineDocument;
use crate::model::section::{normalize_lines, HeadingLevel, Section};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for parse APIs.
pub type ParseResult<T> = Result<T, ParseError>;

/// Recoverable parse diagnostics. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Heading nesting deepened by more than one level.
    MalformedHeading { line: usize, previous: u8, found: u8 },
    /// Heading marker without title text.
    EmptyTitle { line: usize },
}

impl ParseError {
    /// Stable diagnostic code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedHeading { .. } => "MalformedHeading",
            Self::EmptyTitle { .. } => "EmptyTitle",
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::MalformedHeading { line, .. } | Self::EmptyTitle { line } => *line,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHeading {
                line,
                previous,
                found,
            } => write!(
                f,
                "MalformedHeading at line {line}: level {found} heading follows level {previous}; nesting may deepen by one level at a time"
            ),
            Self::EmptyTitle { line } => {
                write!(f, "EmptyTitle at line {line}: heading has no title text")
            }
        }
    }
}

impl Error for ParseError {}

/// Parses outline text into a section tree.
///
/// # Errors
/// - `MalformedHeading` when a heading is more than one level deeper than
///   the previous heading.
/// - `EmptyTitle` when a heading marker carries no title.
pub fn parse(text: &str) -> ParseResult<OutlineDocument> {
    let mut document = OutlineDocument::new();
    let mut open: Vec<Section> = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut previous_level = 0u8;
    let mut scanner = LineScanner::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let LineKind::Heading { level, title } = scanner.classify(raw) else {
            pending.push(raw);
            continue;
        };

        if title.is_empty() {
            return Err(ParseError::EmptyTitle { line });
        }
        if level.get() > previous_level + 1 {
            return Err(ParseError::MalformedHeading {
                line,
                previous: previous_level,
                found: level.get(),
            });
        }

        flush_body(&mut document, &mut open, &mut pending);
        close_until(&mut document, &mut open, level);
        open.push(Section::new(level, title));
        previous_level = level.get();
    }

    flush_body(&mut document, &mut open, &mut pending);
    close_all(&mut document, &mut open);

    debug!(
        "event=outline_parse module=parser status=ok sections={}",
        document.section_count()
    );
    Ok(document)
}

fn flush_body(document: &mut OutlineDocument, open: &mut [Section], pending: &mut Vec<&str>) {
    let body = normalize_lines(pending);
    pending.clear();
    match open.last_mut() {
        Some(section) => section.body = body,
        None => document.preamble = body,
    }
}

fn close_until(document: &mut OutlineDocument, open: &mut Vec<Section>, level: HeadingLevel) {
    while open.last().is_some_and(|section| section.level >= level) {
        close_one(document, open);
    }
}

fn close_all(document: &mut OutlineDocument, open: &mut Vec<Section>) {
    while !open.is_empty() {
        close_one(document, open);
    }
}

fn close_one(document: &mut OutlineDocument, open: &mut Vec<Section>) {
    let Some(section) = open.pop() else {
        return;
    };
    match open.last_mut() {
        Some(parent) => parent.children.push(section),
        None => document.sections.push(section),
    }
}

/// Reason a body would change document structure when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyIssue {
    /// Body line (1-based) reads as a heading.
    HeadingLine(usize),
    /// Code fence opened on this body line is never closed.
    UnclosedFence(usize),
}

impl Display for BodyIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeadingLine(line) => write!(f, "body line {line} reads as a heading"),
            Self::UnclosedFence(line) => {
                write!(f, "code fence opened on body line {line} is never closed")
            }
        }
    }
}

/// Scans body text for lines that would be re-read as structure.
pub fn body_issue(body: &str) -> Option<BodyIssue> {
    let mut scanner = LineScanner::default();
    for (index, raw) in body.lines().enumerate() {
        if matches!(scanner.classify(raw), LineKind::Heading { .. }) {
            return Some(BodyIssue::HeadingLine(index + 1));
        }
    }
    scanner
        .open_fence
        .map(|fence| BodyIssue::UnclosedFence(fence.opened_at))
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Heading { level: HeadingLevel, title: &'a str },
    Text,
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    width: usize,
    opened_at: usize,
}

#[derive(Debug, Default)]
struct LineScanner {
    line: usize,
    open_fence: Option<Fence>,
}

impl LineScanner {
    fn classify<'a>(&mut self, raw: &'a str) -> LineKind<'a> {
        self.line += 1;
        let content = raw.trim_start_matches(' ');
        // Four or more spaces is an indented code line.
        if raw.len() - content.len() > 3 {
            return LineKind::Text;
        }

        if let Some(fence) = self.open_fence {
            if is_fence_close(content, fence) {
                self.open_fence = None;
            }
            return LineKind::Text;
        }
        if let Some((marker, width)) = fence_open(content) {
            self.open_fence = Some(Fence {
                marker,
                width,
                opened_at: self.line,
            });
            return LineKind::Text;
        }

        match atx_heading(content) {
            Some((level, title)) => LineKind::Heading { level, title },
            None => LineKind::Text,
        }
    }
}

fn fence_open(content: &str) -> Option<(char, usize)> {
    let marker = content.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let width = content.chars().take_while(|c| *c == marker).count();
    if width < 3 {
        return None;
    }
    // Backtick fences may not carry backticks in their info string.
    if marker == '`' && content[width..].contains('`') {
        return None;
    }
    Some((marker, width))
}

fn is_fence_close(content: &str, fence: Fence) -> bool {
    let width = content.chars().take_while(|c| *c == fence.marker).count();
    width >= fence.width && content[width * fence.marker.len_utf8()..].trim().is_empty()
}

fn atx_heading(content: &str) -> Option<(HeadingLevel, &str)> {
    let hashes = content.bytes().take_while(|b| *b == b'#').count();
    let level = u8::try_from(hashes).ok().and_then(|n| HeadingLevel::new(n).ok())?;
    let rest = &content[hashes..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some((level, strip_closing_sequence(rest.trim())))
}

fn strip_closing_sequence(title: &str) -> &str {
    if !title.ends_with('#') {
        return title;
    }
    let without = title.trim_end_matches('#');
    if without.is_empty() {
        ""
    } else if without.ends_with([' ', '\t']) {
        without.trim_end()
    } else {
        title
    }
}

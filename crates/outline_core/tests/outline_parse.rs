use outline_core::{parse, ParseError};

#[test]
fn parses_title_with_two_children() {
    let doc = parse("# Title\n## A\nbody a\n## B\nbody b\n").unwrap();

    assert_eq!(doc.sections.len(), 1);
    let title = &doc.sections[0];
    assert_eq!(title.title, "Title");
    assert_eq!(title.level.get(), 1);
    let children: Vec<(&str, &str)> = title
        .children
        .iter()
        .map(|s| (s.title.as_str(), s.body.as_str()))
        .collect();
    assert_eq!(children, vec![("A", "body a"), ("B", "body b")]);
}

#[test]
fn orphan_level_two_heading_is_malformed() {
    let err = parse("## Orphan\n").unwrap_err();
    assert!(matches!(err, ParseError::MalformedHeading { line: 1, .. }));
    assert_eq!(err.kind(), "MalformedHeading");
}

#[test]
fn heading_without_title_is_empty_title() {
    let err = parse("# Paper\n## Abstract\nx\n###\n").unwrap_err();
    assert_eq!(err, ParseError::EmptyTitle { line: 4 });
    assert!(err.to_string().contains("EmptyTitle"));
}

#[test]
fn crlf_input_and_closing_sequences_are_accepted() {
    let doc = parse("# Paper #\r\n## Results ##\r\nleaf area\r\n").unwrap();
    let results = &doc.sections[0].children[0];
    assert_eq!(doc.sections[0].title, "Paper");
    assert_eq!(results.title, "Results");
    assert_eq!(results.body, "leaf area");
}

#[test]
fn hash_text_without_space_stays_in_body() {
    let doc = parse("# Paper\n#hashtag and ####### seven\n").unwrap();
    assert_eq!(doc.sections[0].body, "#hashtag and ####### seven");
    assert!(doc.sections[0].children.is_empty());
}

#[test]
fn body_keeps_interior_blank_lines_and_citations() {
    let text = "# Paper\n## Introduction\n\n\"Phenotyping is the bottleneck\" (Furbank 2011)\n\nSecond paragraph.\n\n\n## Results\n";
    let doc = parse(text).unwrap();
    let intro = &doc.sections[0].children[0];
    assert_eq!(
        intro.body,
        "\"Phenotyping is the bottleneck\" (Furbank 2011)\n\nSecond paragraph."
    );
}

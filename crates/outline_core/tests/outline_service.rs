use outline_core::{
    FileOutlineStore, OutlineService, OutlineStore, ServiceError, StoreError, ValidationProfile,
    ViolationKind,
};

#[test]
fn init_and_edit_persist_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.md");
    let mut service = OutlineService::new(FileOutlineStore::new(&path));

    service.init("Automated Phenotyping", false).unwrap();
    service
        .set_body(
            "Automated Phenotyping/Abstract",
            "We reconstruct plants in 3D.",
        )
        .unwrap();
    service
        .append_body("Automated Phenotyping/Abstract", "Traits are extracted.")
        .unwrap();
    service
        .add_section(Some("Automated Phenotyping/Results"), "Plant Height")
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(
        "## Abstract\n\nWe reconstruct plants in 3D.\n\nTraits are extracted.\n"
    ));
    assert!(text.contains("### Plant Height\n"));

    let report = service.check(&ValidationProfile::default()).unwrap();
    assert!(report.is_clean(), "{:?}", report.violations);
}

#[test]
fn check_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.md");
    std::fs::write(&path, "# Paper\n### Skipped\n").unwrap();

    let service = OutlineService::new(FileOutlineStore::new(&path));
    let err = service.check(&ValidationProfile::default()).unwrap_err();
    match err {
        ServiceError::Parse(parse_err) => assert_eq!(parse_err.kind(), "MalformedHeading"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn check_on_missing_file_is_store_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let service = OutlineService::new(FileOutlineStore::new(dir.path().join("none.md")));
    let err = service.check(&ValidationProfile::default()).unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound(_))));
}

#[test]
fn normalize_rewrites_file_in_canonical_form() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.md");
    std::fs::write(&path, "# Paper\n## Abstract\nx\n").unwrap();

    let mut service = OutlineService::new(FileOutlineStore::new(&path));
    assert!(service.normalize().unwrap());
    assert_eq!(
        service.store().load().unwrap(),
        "# Paper\n\n## Abstract\n\nx\n"
    );

    let report = service.check(&ValidationProfile::default()).unwrap();
    assert!(report
        .violations
        .iter()
        .any(|v| v.kind == ViolationKind::MissingSection));
}

#[test]
fn edit_rejecting_heading_body_keeps_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.md");
    let mut service = OutlineService::new(FileOutlineStore::new(&path));
    service.init("Paper", false).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let err = service
        .set_body("Paper/Discussion", "fine\n# Not Allowed")
        .unwrap_err();
    assert!(matches!(err, ServiceError::Edit(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

//! Subcommand handlers. Handlers stay thin: parsing, validation and edits
//! live in `outline_core`.

use crate::cli::{
    AddSectionArgs, BodyArgs, CheckArgs, Command, FileArg, InitArgs, RenderArgs, TreeArgs,
};
use anyhow::{Context, Result};
use outline_core::{
    is_placeholder, render, summarize, FileOutlineStore, OutlineDocument, OutlineService,
    OutlineStore, ParseError, Section, ServiceError, ValidationProfile,
};
use std::process::ExitCode;

/// Result of a successful command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// Command ran but reported violations.
    Findings,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Findings => ExitCode::from(1),
        }
    }
}

pub fn run(command: Command) -> Result<Outcome> {
    match command {
        Command::Check(args) => check(args),
        Command::Render(args) => render_file(args),
        Command::Tree(args) => tree(args),
        Command::Stats(args) => stats(args),
        Command::Init(args) => init(args),
        Command::SetBody(args) => set_body(args),
        Command::Append(args) => append(args),
        Command::AddSection(args) => add_section(args),
    }
}

fn service_for(file: &std::path::Path) -> OutlineService<FileOutlineStore> {
    OutlineService::new(FileOutlineStore::new(file))
}

fn check(args: CheckArgs) -> Result<Outcome> {
    let profile = match &args.profile {
        Some(path) => ValidationProfile::load(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => ValidationProfile::default(),
    };
    let service = service_for(&args.file);
    let report = match service.check(&profile) {
        Ok(report) => report,
        // Parse diagnostics count as findings.
        Err(ServiceError::Parse(err)) => {
            report_parse_error(&args, &err)?;
            return Ok(Outcome::Findings);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("checking {}", args.file.display()));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.violations)?);
    } else if report.is_clean() {
        println!("{}: ok", args.file.display());
    } else {
        for violation in &report.violations {
            println!("{}: {violation}", args.file.display());
        }
    }

    Ok(if report.is_clean() {
        Outcome::Clean
    } else {
        Outcome::Findings
    })
}

fn report_parse_error(args: &CheckArgs, err: &ParseError) -> Result<()> {
    if args.json {
        let finding = serde_json::json!([{
            "kind": err.kind(),
            "line": err.line(),
            "message": err.to_string(),
        }]);
        println!("{}", serde_json::to_string_pretty(&finding)?);
    } else {
        println!("{}: {err}", args.file.display());
    }
    Ok(())
}

fn render_file(args: RenderArgs) -> Result<Outcome> {
    let mut service = service_for(&args.file);
    if args.write {
        let changed = service
            .normalize()
            .with_context(|| format!("normalizing {}", args.file.display()))?;
        let state = if changed { "rewritten" } else { "unchanged" };
        println!("{}: {state}", args.file.display());
    } else {
        let document = service.open()?;
        print!("{}", render(&document));
    }
    Ok(Outcome::Clean)
}

fn tree(args: TreeArgs) -> Result<Outcome> {
    let document = service_for(&args.file).open()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(Outcome::Clean);
    }
    for section in &document.sections {
        print_tree(section, 0);
    }
    Ok(Outcome::Clean)
}

fn print_tree(section: &Section, indent: usize) {
    let marker = if is_placeholder(&section.body) && !section.body.is_empty() {
        " (placeholder)"
    } else {
        ""
    };
    println!(
        "{:indent$}{} {}{marker}",
        "",
        section.level.marker(),
        section.title,
        indent = indent * 2
    );
    for child in &section.children {
        print_tree(child, indent + 1);
    }
}

fn stats(args: FileArg) -> Result<Outcome> {
    let document = service_for(&args.file).open()?;
    let summary = summarize(&document);
    println!("sections:     {}", summary.total_sections);
    println!(
        "drafted:      {} ({}%)",
        summary.drafted_sections,
        summary.drafted_percent()
    );
    println!("citations:    {}", summary.citation_count);
    println!("max depth:    {}", summary.max_depth);
    if !summary.placeholder_paths.is_empty() {
        println!("placeholders:");
        for path in &summary.placeholder_paths {
            println!("  - {path}");
        }
    }
    Ok(Outcome::Clean)
}

fn init(args: InitArgs) -> Result<Outcome> {
    let mut service = service_for(&args.file);
    let document = service
        .init(&args.title, args.force)
        .with_context(|| format!("initializing {}", args.file.display()))?;
    report_saved(service.store(), &document);
    Ok(Outcome::Clean)
}

fn set_body(args: BodyArgs) -> Result<Outcome> {
    let mut service = service_for(&args.file);
    let document = service
        .set_body(&args.section, &args.text)
        .with_context(|| format!("setting body of `{}`", args.section))?;
    report_saved(service.store(), &document);
    Ok(Outcome::Clean)
}

fn append(args: BodyArgs) -> Result<Outcome> {
    let mut service = service_for(&args.file);
    let document = service
        .append_body(&args.section, &args.text)
        .with_context(|| format!("appending to `{}`", args.section))?;
    report_saved(service.store(), &document);
    Ok(Outcome::Clean)
}

fn add_section(args: AddSectionArgs) -> Result<Outcome> {
    let mut service = service_for(&args.file);
    let document = service
        .add_section(args.parent.as_deref(), &args.title)
        .with_context(|| format!("adding section `{}`", args.title))?;
    report_saved(service.store(), &document);
    Ok(Outcome::Clean)
}

fn report_saved(store: &impl OutlineStore, document: &OutlineDocument) {
    println!(
        "{}: saved ({} sections)",
        store.describe(),
        document.section_count()
    );
}

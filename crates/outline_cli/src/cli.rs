//! Argument definitions for the `outline` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "outline",
    version,
    about = "Parse, validate, render and draft ATX-heading paper outlines."
)]
pub struct Cli {
    /// Log level for file logging (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate an outline; exits 1 when violations are found.
    Check(CheckArgs),
    /// Print the canonical rendering, or rewrite the file in place.
    Render(RenderArgs),
    /// Show the section tree.
    Tree(TreeArgs),
    /// Show drafting progress: placeholders, citations, depth.
    Stats(FileArg),
    /// Create a new paper skeleton.
    Init(InitArgs),
    /// Replace one section body.
    SetBody(BodyArgs),
    /// Append a paragraph to one section body.
    Append(BodyArgs),
    /// Add a section under a parent (or at the top level).
    AddSection(AddSectionArgs),
}

#[derive(Args, Debug)]
pub struct FileArg {
    /// Outline file.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    pub file: PathBuf,

    /// JSON validation profile; defaults to the paper layout.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Emit violations as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    pub file: PathBuf,

    /// Rewrite the file instead of printing.
    #[arg(long)]
    pub write: bool,
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    pub file: PathBuf,

    /// Emit the parsed document as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    pub file: PathBuf,

    /// Paper title (the single level-1 heading).
    #[arg(long)]
    pub title: String,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct BodyArgs {
    pub file: PathBuf,

    /// Section path, e.g. `Title/Conclusion/Future Work`.
    #[arg(long)]
    pub section: String,

    #[arg(long)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct AddSectionArgs {
    pub file: PathBuf,

    /// Parent section path; omit to add a top-level section.
    #[arg(long)]
    pub parent: Option<String>,

    #[arg(long)]
    pub title: String,
}

//! CLI argument parsing module for wilf

use crate::output::ReporterSpec;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Pipfile update checker
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wilf",
    version,
    about = "Check Pipfile dependencies for available updates"
)]
pub struct CliArgs {
    /// Pipfile to check (a directory means its Pipfile)
    pub pipfile: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reporter: monochrome-table, colorized-table, junit[:path] or json[:path]
    /// (can be specified multiple times)
    #[arg(short, long, value_name = "REPORTER", action = ArgAction::Append)]
    pub reporter: Vec<ReporterSpec>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

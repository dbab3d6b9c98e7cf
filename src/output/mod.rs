//! Reporters for available updates
//!
//! This module provides:
//! - Monochrome and colorized tables for terminals
//! - JUnit XML for CI test dashboards
//! - JSON for machine processing
//!
//! Every reporter writes to its own destination, stdout by default or a file
//! given as `junit:/path/to/report.xml` / `json:/path/to/report.json`.

mod json;
mod junit;
mod text;

pub use json::JsonReporter;
pub use junit::JUnitReporter;
pub use text::{ColorizedTableReporter, MonochromeTableReporter};

use crate::error::ConfigError;
use crate::orchestrator::DependencyReport;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Version printed in report headers
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trait for update reporters
///
/// `before` is called once, then `report` for every available update, then
/// `after` once all dependency kinds have been checked.
pub trait UpdateReporter {
    /// Write the report header
    fn before(&mut self, out: &mut dyn Write) -> io::Result<()>;

    /// Report one available update
    fn report(&mut self, report: &DependencyReport, out: &mut dyn Write) -> io::Result<()>;

    /// Write the report footer
    fn after(&mut self, out: &mut dyn Write) -> io::Result<()>;
}

/// Reporter selection, as given with `-r`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReporterSpec {
    /// Plain fixed-width table
    MonochromeTable,
    /// Table colored by update level
    #[default]
    ColorizedTable,
    /// JUnit XML, to stdout or a file
    JUnit(Option<PathBuf>),
    /// JSON document, to stdout or a file
    Json(Option<PathBuf>),
}

impl FromStr for ReporterSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidReporter {
            value: s.to_string(),
        };

        let (name, path) = match s.split_once(':') {
            Some((_, path)) if path.trim().is_empty() => return Err(invalid()),
            Some((name, path)) => (name, Some(PathBuf::from(path))),
            None => (s, None),
        };

        match (name, path) {
            ("monochrome-table", None) => Ok(ReporterSpec::MonochromeTable),
            ("colorized-table", None) => Ok(ReporterSpec::ColorizedTable),
            ("junit", path) => Ok(ReporterSpec::JUnit(path)),
            ("json", path) => Ok(ReporterSpec::Json(path)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ReporterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, path) = match self {
            ReporterSpec::MonochromeTable => ("monochrome-table", None),
            ReporterSpec::ColorizedTable => ("colorized-table", None),
            ReporterSpec::JUnit(path) => ("junit", path.as_ref()),
            ReporterSpec::Json(path) => ("json", path.as_ref()),
        };

        match path {
            Some(path) => write!(f, "{}:{}", name, path.display()),
            None => f.write_str(name),
        }
    }
}

/// A reporter bound to its output
pub struct Reporting {
    reporter: Box<dyn UpdateReporter>,
    output: Box<dyn Write>,
}

impl Reporting {
    /// Bind a reporter to an output
    pub fn new(reporter: Box<dyn UpdateReporter>, output: Box<dyn Write>) -> Self {
        Self { reporter, output }
    }

    /// Create the reporter selected by `spec`, opening its output file if any
    pub fn from_spec(spec: &ReporterSpec) -> Result<Self, ConfigError> {
        let reporter: Box<dyn UpdateReporter> = match spec {
            ReporterSpec::MonochromeTable => Box::new(MonochromeTableReporter::new(VERSION)),
            ReporterSpec::ColorizedTable => Box::new(ColorizedTableReporter::new(VERSION)),
            ReporterSpec::JUnit(_) => Box::new(JUnitReporter::new(VERSION)),
            ReporterSpec::Json(_) => Box::new(JsonReporter::new(VERSION)),
        };

        let path = match spec {
            ReporterSpec::JUnit(path) | ReporterSpec::Json(path) => path.as_ref(),
            _ => None,
        };

        let output: Box<dyn Write> = match path {
            Some(path) => {
                let file = File::create(path).map_err(|e| ConfigError::InvalidPath {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };

        Ok(Self::new(reporter, output))
    }

    pub fn before(&mut self) -> io::Result<()> {
        self.reporter.before(&mut self.output)
    }

    pub fn report(&mut self, report: &DependencyReport) -> io::Result<()> {
        self.reporter.report(report, &mut self.output)
    }

    /// Write the footer and flush the output
    pub fn after(&mut self) -> io::Result<()> {
        self.reporter.after(&mut self.output)?;
        self.output.flush()
    }
}

/// Create the reportings for the given specs, colorized table when none is given
pub fn create_reportings(specs: &[ReporterSpec]) -> Result<Vec<Reporting>, ConfigError> {
    if specs.is_empty() {
        return Ok(vec![Reporting::from_spec(&ReporterSpec::default())?]);
    }

    specs.iter().map(Reporting::from_spec).collect()
}

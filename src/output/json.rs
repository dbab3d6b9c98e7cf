//! JSON reporter for machine processing

use super::UpdateReporter;
use crate::orchestrator::DependencyReport;
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter, writing one document once all updates are known
pub struct JsonReporter {
    version: String,
    updates: Vec<JsonUpdate>,
}

impl JsonReporter {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            updates: Vec::new(),
        }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Reporting tool version
    version: &'a str,
    /// At least one update fails the run
    requires_update: bool,
    updates: &'a [JsonUpdate],
}

/// JSON representation of an available update
#[derive(Serialize)]
struct JsonUpdate {
    name: String,
    /// Declared requirement, as written back by the parser
    wanted: String,
    latest: String,
    level: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    home_url: Option<String>,
    fatal: bool,
    excluded: bool,
    /// Seconds spent checking the package
    elapsed: f64,
}

impl JsonUpdate {
    fn fails(&self) -> bool {
        self.fatal && !self.excluded
    }
}

impl From<&DependencyReport> for JsonUpdate {
    fn from(report: &DependencyReport) -> Self {
        Self {
            name: report.name.clone(),
            wanted: report.requirement.to_string(),
            latest: report.latest.clone(),
            level: report.level.label().to_string(),
            kind: report.kind.label().to_string(),
            home_url: report.home_url.clone(),
            fatal: report.fatal,
            excluded: report.excluded,
            elapsed: report.elapsed.as_secs_f64(),
        }
    }
}

impl UpdateReporter for JsonReporter {
    fn before(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        self.updates.clear();
        Ok(())
    }

    fn report(&mut self, report: &DependencyReport, _out: &mut dyn Write) -> io::Result<()> {
        self.updates.push(JsonUpdate::from(report));
        Ok(())
    }

    fn after(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let output = JsonOutput {
            version: &self.version,
            requires_update: self.updates.iter().any(JsonUpdate::fails),
            updates: &self.updates,
        };

        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)
    }
}

//! Table reporters for terminal output

use super::UpdateReporter;
use crate::domain::UpdateLevel;
use crate::orchestrator::DependencyReport;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

/// Plain fixed-width table
pub struct MonochromeTableReporter {
    version: String,
}

impl MonochromeTableReporter {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl UpdateReporter for MonochromeTableReporter {
    fn before(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "-- wilf v{} --", self.version)?;
        writeln!(
            out,
            "Package         Wanted          Latest      Package type  Details"
        )
    }

    fn report(&mut self, report: &DependencyReport, out: &mut dyn Write) -> io::Result<()> {
        if report.excluded {
            return Ok(());
        }

        writeln!(
            out,
            "{:<14.14}\t{:<12.12}\t{:<12.12}{:<12.12}  {} for {}; {}",
            report.name,
            report.requirement.to_string(),
            report.latest,
            report.kind.label(),
            report.level,
            report.name,
            report.home_url.as_deref().unwrap_or_default()
        )
    }

    fn after(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

/// Table colored by update level, preceded by a color legend
pub struct ColorizedTableReporter {
    version: String,
}

impl ColorizedTableReporter {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

/// Paint text with the color of an update level
fn paint(level: UpdateLevel, text: &str) -> ColoredString {
    match level {
        UpdateLevel::Major => text.red(),
        UpdateLevel::Minor => text.yellow(),
        UpdateLevel::Patch => text.green(),
        UpdateLevel::None => text.bright_black().bold(),
    }
}

impl UpdateReporter for ColorizedTableReporter {
    fn before(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let title = format!("wilf v{}", self.version);
        writeln!(out, "-- {} --", title.bold())?;
        writeln!(out)?;
        writeln!(out, "{} Color legend:", "info".blue())?;
        writeln!(
            out,
            " {}    : Major Update backward-incompatible updates",
            "<red>".red()
        )?;
        writeln!(
            out,
            " {} : Minor Update backward-compatible features",
            "<yellow>".yellow()
        )?;
        writeln!(
            out,
            " {}  : Patch Update backward-compatible bug fixes",
            "<green>".green()
        )?;
        writeln!(out)?;

        let headers = [
            format!("{:<14}", "Package"),
            format!("{:<12}", "Wanted"),
            format!("{:<10}", "Latest"),
            format!("{:<12}", "Package type"),
            "Details".to_string(),
        ];
        let underlined: Vec<String> = headers
            .iter()
            .map(|header| header.underline().to_string())
            .collect();
        writeln!(
            out,
            "{}\t{}\t{}  {}  {}",
            underlined[0], underlined[1], underlined[2], underlined[3], underlined[4]
        )
    }

    fn report(&mut self, report: &DependencyReport, out: &mut dyn Write) -> io::Result<()> {
        if report.excluded {
            return Ok(());
        }

        let name = format!("{:<14.14}", report.name);
        let wanted = format!("{:<12.12}", report.requirement.to_string());
        let latest = format!("{:<10.10}", report.latest);
        let kind = format!("{:<12.12}", report.kind.label());

        writeln!(
            out,
            "{}\t{}\t{}  {}  {}; {}",
            paint(report.level, &name),
            wanted,
            paint(report.level, &latest).bold(),
            kind,
            report.name,
            report.home_url.as_deref().unwrap_or_default()
        )
    }

    fn after(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)
    }
}

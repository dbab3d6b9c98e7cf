//! JUnit XML reporter
//!
//! Every available update becomes a test case, grouped in a `dev` and a
//! `run` suite. Fatal updates are failures, excluded packages are skipped.

use super::UpdateReporter;
use crate::domain::DependencyKind;
use crate::orchestrator::DependencyReport;
use chrono::Local;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug)]
enum Outcome {
    Passed,
    Failed(String),
    Skipped(String),
}

#[derive(Debug)]
struct TestCase {
    name: String,
    time: Duration,
    timestamp: String,
    outcome: Outcome,
}

#[derive(Debug)]
struct TestSuite {
    name: &'static str,
    timestamp: String,
    started: Instant,
    cases: Vec<TestCase>,
}

impl TestSuite {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            timestamp: now(),
            started: Instant::now(),
            cases: Vec::new(),
        }
    }

    fn failures(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.cases.iter().filter(|case| predicate(&case.outcome)).count()
    }
}

/// JUnit XML reporter
pub struct JUnitReporter {
    version: String,
    started: Instant,
    dev: TestSuite,
    run: TestSuite,
}

impl JUnitReporter {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            started: Instant::now(),
            dev: TestSuite::new("dev"),
            run: TestSuite::new("run"),
        }
    }

    fn suites(&self) -> [&TestSuite; 2] {
        [&self.dev, &self.run]
    }
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

impl UpdateReporter for JUnitReporter {
    fn before(&mut self, _out: &mut dyn Write) -> io::Result<()> {
        self.started = Instant::now();
        self.dev = TestSuite::new("dev");
        self.run = TestSuite::new("run");
        Ok(())
    }

    fn report(&mut self, report: &DependencyReport, _out: &mut dyn Write) -> io::Result<()> {
        let outcome = if report.excluded {
            Outcome::Skipped(format!("package '{}' is excluded", report.name))
        } else if report.fatal {
            Outcome::Failed(format!(
                "{} {} is outdated. Latest version is {}",
                report.name, report.level, report.latest
            ))
        } else {
            Outcome::Passed
        };

        let suite = match report.kind {
            DependencyKind::Dev => &mut self.dev,
            DependencyKind::Runtime => &mut self.run,
        };

        suite.cases.push(TestCase {
            name: format!("{} {}", report.name, report.level),
            time: report.elapsed,
            timestamp: now(),
            outcome,
        });
        Ok(())
    }

    fn after(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let suites = self.suites();
        let tests: usize = suites.iter().map(|s| s.cases.len()).sum();
        let failures: usize = suites.iter().map(|s| s.failures()).sum();
        let skipped: usize = suites.iter().map(|s| s.skipped()).sum();

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<testsuites name="{}" tests="{}" failures="{}" errors="0" skipped="{}" time="{:.3}">"#,
            escape(&format!("wilf v{}", self.version)),
            tests,
            failures,
            skipped,
            self.started.elapsed().as_secs_f64()
        )?;

        for suite in suites {
            write_suite(suite, out)?;
        }

        writeln!(out, "</testsuites>")
    }
}

fn write_suite(suite: &TestSuite, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        r#"  <testsuite name="{}" timestamp="{}" tests="{}" failures="{}" errors="0" skipped="{}" time="{:.3}">"#,
        suite.name,
        suite.timestamp,
        suite.cases.len(),
        suite.failures(),
        suite.skipped(),
        suite.started.elapsed().as_secs_f64()
    )?;

    for case in &suite.cases {
        let open = format!(
            r#"    <testcase name="{}" time="{:.3}" timestamp="{}""#,
            escape(&case.name),
            case.time.as_secs_f64(),
            case.timestamp
        );

        match &case.outcome {
            Outcome::Passed => writeln!(out, "{}></testcase>", open)?,
            Outcome::Failed(message) => {
                writeln!(out, "{}>", open)?;
                writeln!(
                    out,
                    r#"      <failure message="{0}" type="error">{0}</failure>"#,
                    escape(message)
                )?;
                writeln!(out, "    </testcase>")?;
            }
            Outcome::Skipped(message) => {
                writeln!(out, "{}>", open)?;
                writeln!(
                    out,
                    r#"      <skipped message="{0}">{0}</skipped>"#,
                    escape(message)
                )?;
                writeln!(out, "    </testcase>")?;
            }
        }
    }

    writeln!(out, "  </testsuite>")
}

/// Escape text for XML attributes and character data
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::render;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape("numpy minor"), "numpy minor");
    }

    #[test]
    fn test_document_structure() {
        let output = render(&mut JUnitReporter::new("1.4.0"));

        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(output.contains(
            r#"<testsuites name="wilf v1.4.0" tests="3" failures="1" errors="0" skipped="1""#
        ));
        assert!(output.contains(r#"<testsuite name="dev""#));
        assert!(output.contains(r#"<testsuite name="run""#));
        assert!(output.trim_end().ends_with("</testsuites>"));
    }

    #[test]
    fn test_fatal_update_is_failure() {
        let output = render(&mut JUnitReporter::new("1.4.0"));

        assert!(output.contains(r#"<testcase name="numpy minor" time="0.250""#));
        assert!(output.contains(
            r#"<failure message="numpy minor is outdated. Latest version is v1.26.3" type="error">numpy minor is outdated. Latest version is v1.26.3</failure>"#
        ));
    }

    #[test]
    fn test_excluded_update_is_skipped() {
        let output = render(&mut JUnitReporter::new("1.4.0"));

        assert!(output.contains(r#"<testcase name="pytest major""#));
        assert!(output.contains(
            r#"<skipped message="package &apos;pytest&apos; is excluded">package &apos;pytest&apos; is excluded</skipped>"#
        ));
    }

    #[test]
    fn test_non_fatal_update_passes() {
        let output = render(&mut JUnitReporter::new("1.4.0"));
        let line = output
            .lines()
            .find(|line| line.contains("urllib3 patch"))
            .unwrap();
        assert!(line.trim_end().ends_with("></testcase>"));
    }

    #[test]
    fn test_suites_split_by_kind() {
        let mut reporter = JUnitReporter::new("1.4.0");
        render(&mut reporter);

        assert_eq!(reporter.run.cases.len(), 2);
        assert_eq!(reporter.run.failures(), 1);
        assert_eq!(reporter.dev.cases.len(), 1);
        assert_eq!(reporter.dev.skipped(), 1);
    }

    #[test]
    fn test_timestamp_format() {
        let timestamp = now();
        assert!(chrono::NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).is_ok());
    }
}

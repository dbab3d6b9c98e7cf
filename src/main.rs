//! wilf - Pipfile update checker CLI tool
//!
//! Checks the packages declared in a Pipfile against PyPI (and optionally a
//! GitLab package registry) and reports the available updates.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use wilf::cli::CliArgs;
use wilf::config::Config;
use wilf::domain::{DependencyKind, Requirement};
use wilf::error::ManifestError;
use wilf::logging;
use wilf::manifest::{resolve_path, Pipfile};
use wilf::orchestrator::Orchestrator;
use wilf::output::{create_reportings, Reporting};
use wilf::registry::{GitLabAdapter, HttpClient, PyPIAdapter};
use wilf::update::{Checker, CompositeChecker, RegistryChecker};

const EXIT_USAGE: u8 = 1;
const EXIT_CONFIG: u8 = 2;
const EXIT_PIPFILE_READ: u8 = 3;
const EXIT_PIPFILE_PARSE: u8 = 4;
const EXIT_UPDATES: u8 = 5;
const EXIT_DEV_ERROR: u8 = 6;

/// An error with the exit code it maps to
struct Failure {
    code: u8,
    error: anyhow::Error,
}

trait ExitWith<T> {
    fn exit_with(self, code: u8) -> Result<T, Failure>;
}

impl<T, E: Into<anyhow::Error>> ExitWith<T> for Result<T, E> {
    fn exit_with(self, code: u8) -> Result<T, Failure> {
        self.map_err(|e| Failure {
            code,
            error: e.into(),
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported as errors by clap
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    logging::init(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(failure) => {
            eprintln!("Error: {:#}", failure.error);
            ExitCode::from(failure.code)
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> Result<ExitCode, Failure> {
    let mut reportings = create_reportings(&args.reporter).exit_with(EXIT_USAGE)?;

    let config = match &args.config {
        Some(path) => Config::load(path).exit_with(EXIT_CONFIG)?,
        None => Config::default(),
    };

    let path = resolve_path(&args.pipfile);
    debug!("Reading {}", path.display());
    let pipfile = Pipfile::from_path(&path).map_err(|e| {
        let code = match e {
            ManifestError::NotFound { .. } | ManifestError::ReadError { .. } => EXIT_PIPFILE_READ,
            _ => EXIT_PIPFILE_PARSE,
        };
        Failure {
            code,
            error: e.into(),
        }
    })?;

    let checker = build_checker(&config, &pipfile.python_requirement).exit_with(EXIT_UPDATES)?;
    let orchestrator = Orchestrator::new(checker, config.settings.filter())
        .with_dev_packages(config.settings.check_dev_packages)
        .with_progress(!args.quiet);

    for reporting in &mut reportings {
        reporting.before().exit_with(EXIT_UPDATES)?;
    }

    let mut requires_update = false;
    for kind in orchestrator.kinds() {
        let code = match kind {
            DependencyKind::Runtime => EXIT_UPDATES,
            DependencyKind::Dev => EXIT_DEV_ERROR,
        };

        let report = orchestrator
            .check_kind(&pipfile, kind)
            .await
            .exit_with(code)?;

        for dependency_report in &report.reports {
            for reporting in &mut reportings {
                reporting.report(dependency_report).exit_with(EXIT_UPDATES)?;
            }
        }
        requires_update |= report.requires_update;
    }

    finish(&mut reportings).exit_with(EXIT_UPDATES)?;

    if requires_update {
        Ok(ExitCode::from(EXIT_UPDATES))
    } else {
        debug!("no updates required");
        Ok(ExitCode::SUCCESS)
    }
}

/// PyPI first, then the GitLab registry when configured
fn build_checker(config: &Config, python: &Requirement) -> anyhow::Result<Box<dyn Checker>> {
    let client = HttpClient::new().context("failed to create HTTP client")?;

    let pypi = RegistryChecker::new(Box::new(PyPIAdapter::new(client.clone())))
        .with_python_requirement(python.clone());
    let mut composite = CompositeChecker::new().with(Box::new(pypi));

    if let Some(gitlab) = &config.gitlab {
        debug!("Using GitLab registry {}", gitlab.project_api_packages_url);
        let adapter = GitLabAdapter::new(client, gitlab.clone());
        let checker =
            RegistryChecker::new(Box::new(adapter)).with_python_requirement(python.clone());
        composite = composite.with(Box::new(checker));
    }

    Ok(Box::new(composite))
}

fn finish(reportings: &mut [Reporting]) -> std::io::Result<()> {
    for reporting in reportings {
        reporting.after()?;
    }
    Ok(())
}

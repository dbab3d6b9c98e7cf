//! Update orchestrator for the report workflow
//!
//! This module provides:
//! - Workflow coordination: check each dependency → classify → mark fatal/excluded
//! - Runtime dependencies always, development dependencies on request
//! - Timing of every check for the reporters

use crate::domain::{Dependency, DependencyKind, Requirement, UpdateLevel};
use crate::error::AppError;
use crate::manifest::Pipfile;
use crate::progress::Progress;
use crate::update::{Checker, UpdateFilter};
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// One available update, as handed to the reporters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyReport {
    /// Package name
    pub name: String,
    /// Requirement declared in the Pipfile
    pub requirement: Requirement,
    /// Runtime or development dependency
    pub kind: DependencyKind,
    /// Latest version published by the registry
    pub latest: String,
    /// Severity of the update
    pub level: UpdateLevel,
    /// Project home page
    pub home_url: Option<String>,
    /// The update reaches the configured threshold
    pub fatal: bool,
    /// The package is in the exclusion list
    pub excluded: bool,
    /// Time spent checking the package
    #[serde(serialize_with = "serialize_seconds")]
    pub elapsed: Duration,
}

impl DependencyReport {
    /// Returns true if this update fails the run
    pub fn fails(&self) -> bool {
        self.fatal && !self.excluded
    }
}

fn serialize_seconds<S: serde::Serializer>(elapsed: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(elapsed.as_secs_f64())
}

/// Result of checking a set of dependencies
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateReport {
    /// Available updates, in dependency order
    pub reports: Vec<DependencyReport>,
    /// At least one non-excluded update is fatal
    pub requires_update: bool,
}

impl UpdateReport {
    /// Merge another report into this one
    pub fn extend(&mut self, other: UpdateReport) {
        self.requires_update |= other.requires_update;
        self.reports.extend(other.reports);
    }
}

/// A dependency check failed; the whole dependency kind is aborted
#[derive(Debug, Error)]
#[error("failed to check {kind} dependency '{package}': {source}")]
pub struct OrchestratorError {
    pub kind: DependencyKind,
    pub package: String,
    #[source]
    pub source: AppError,
}

/// Orchestrator for coordinating the check workflow
pub struct Orchestrator {
    checker: Box<dyn Checker>,
    filter: UpdateFilter,
    check_dev_packages: bool,
    show_progress: bool,
}

impl Orchestrator {
    /// Create a new orchestrator checking runtime dependencies only
    pub fn new(checker: Box<dyn Checker>, filter: UpdateFilter) -> Self {
        Self {
            checker,
            filter,
            check_dev_packages: false,
            show_progress: false,
        }
    }

    /// Also check `[dev-packages]`
    pub fn with_dev_packages(mut self, enabled: bool) -> Self {
        self.check_dev_packages = enabled;
        self
    }

    /// Show a progress bar on stderr
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Dependency kinds checked by this run, runtime first
    pub fn kinds(&self) -> Vec<DependencyKind> {
        let mut kinds = vec![DependencyKind::Runtime];
        if self.check_dev_packages {
            kinds.push(DependencyKind::Dev);
        }
        kinds
    }

    /// Check every dependency kind enabled for this run
    pub async fn run(&self, pipfile: &Pipfile) -> Result<UpdateReport, OrchestratorError> {
        let mut report = UpdateReport::default();

        for kind in self.kinds() {
            report.extend(self.check_kind(pipfile, kind).await?);
        }

        if !report.requires_update {
            debug!("no updates required");
        }

        Ok(report)
    }

    /// Check the dependencies of one kind declared in the Pipfile
    pub async fn check_kind(
        &self,
        pipfile: &Pipfile,
        kind: DependencyKind,
    ) -> Result<UpdateReport, OrchestratorError> {
        debug!("Checking {} dependencies ...", kind);
        self.check(pipfile.dependencies(kind)).await
    }

    /// Check a list of dependencies, stopping at the first failure
    pub async fn check(&self, dependencies: &[Dependency]) -> Result<UpdateReport, OrchestratorError> {
        let mut progress = Progress::new(self.show_progress);
        progress.start(dependencies.len() as u64, "Checking dependencies");

        let mut report = UpdateReport::default();

        for dependency in dependencies {
            progress.set_message(&format!("Checking {}", dependency.name));

            let started = Instant::now();
            let check = self
                .checker
                .required_update(&dependency.name, &dependency.requirement)
                .await
                .map_err(|source| OrchestratorError {
                    kind: dependency.kind,
                    package: dependency.name.clone(),
                    source,
                })?;
            progress.inc();

            if !check.is_update() {
                debug!(
                    "no update available for {}: '{}'",
                    dependency.name,
                    check.latest.as_deref().unwrap_or_default()
                );
                continue;
            }

            let dependency_report = DependencyReport {
                name: dependency.name.clone(),
                requirement: dependency.requirement.clone(),
                kind: dependency.kind,
                latest: check.latest.unwrap_or_default(),
                level: check.level,
                home_url: check.home_url,
                fatal: self.filter.is_fatal(check.level),
                excluded: self.filter.is_excluded(&dependency.name),
                elapsed: started.elapsed(),
            };

            report.requires_update |= dependency_report.fails();
            report.reports.push(dependency_report);
        }

        progress.finish_and_clear();
        Ok(report)
    }
}

//! Composite checker trying several checkers in order

use super::{Checker, UpdateCheck};
use crate::domain::Requirement;
use crate::error::AppError;
use async_trait::async_trait;

/// Checker delegating to a list of checkers
///
/// The first checker reporting an update wins. When none does, the first
/// result that found the package is returned (with no update).
#[derive(Default)]
pub struct CompositeChecker {
    checkers: Vec<Box<dyn Checker>>,
}

impl CompositeChecker {
    /// Create an empty composite checker
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a checker
    pub fn with(mut self, checker: Box<dyn Checker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }
}

#[async_trait]
impl Checker for CompositeChecker {
    async fn required_update(
        &self,
        package: &str,
        requirement: &Requirement,
    ) -> Result<UpdateCheck, AppError> {
        let mut found = UpdateCheck::not_found();

        for checker in &self.checkers {
            let check = checker.required_update(package, requirement).await?;

            if check.is_update() {
                return Ok(check);
            }

            if found.latest.is_none() && check.latest.is_some() {
                found = check;
            }
        }

        Ok(found)
    }
}

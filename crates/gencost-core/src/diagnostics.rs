//! Diagnostics collected while preparing OPF cost data.
//!
//! Fatal problems are returned as errors; everything the caller should know
//! about but that does not stop a compilation (the default cost policy being
//! applied, duplicated declarations found by a table check) is collected here.
//!
//! # Example
//!
//! ```
//! use gencost_core::diagnostics::{Diagnostics, IssueCategory};
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning(IssueCategory::Objective, "no costs are given");
//! diag.add_error_for(IssueCategory::Duplicate, "gen 3", "element has two active-power costs");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.error_count(), 1);
//! ```

use std::fmt;

use serde::Serialize;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unusual but the operation continued (e.g. a default policy was applied)
    Warning,
    /// Input that a later stage will reject or silently misinterpret
    Error,
}

/// What part of the cost data an issue is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    /// Choice of the overall objective
    Objective,
    /// More than one declaration for the same element and channel
    Duplicate,
    /// Polynomial coefficients or marginal costs
    Coefficients,
    /// Piecewise segment lists
    Segments,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Objective => "objective",
            IssueCategory::Duplicate => "duplicate",
            IssueCategory::Coefficients => "coefficients",
            IssueCategory::Segments => "segments",
        }
    }
}

/// A single diagnostic issue
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    /// Element the issue refers to (e.g. "load 4", "dcline 2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}:{}] {}", severity, self.category.as_str(), self.message)?;
        match &self.entity {
            Some(entity) => write!(f, " ({})", entity),
            None => Ok(()),
        }
    }
}

/// Issues of one table check or compilation
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: IssueCategory,
        entity: Option<&str>,
        message: &str,
    ) {
        self.issues.push(DiagnosticIssue {
            severity,
            category,
            message: message.to_string(),
            entity: entity.map(str::to_string),
        });
    }

    pub fn add_warning(&mut self, category: IssueCategory, message: &str) {
        self.push(Severity::Warning, category, None, message);
    }

    pub fn add_warning_for(&mut self, category: IssueCategory, entity: &str, message: &str) {
        self.push(Severity::Warning, category, Some(entity), message);
    }

    pub fn add_error_for(&mut self, category: IssueCategory, entity: &str, message: &str) {
        self.push(Severity::Error, category, Some(entity), message);
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn in_category(&self, category: IssueCategory) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    pub fn summary(&self) -> String {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match (self.warning_count(), self.error_count()) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => format!("{} warning{}", w, plural(w)),
            (0, e) => format!("{} error{}", e, plural(e)),
            (w, e) => format!("{} warning{}, {} error{}", w, plural(w), e, plural(e)),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cost diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

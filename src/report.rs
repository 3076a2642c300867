//! Per-category reporting
//!
//! Converts one scan outcome into that category's contribution to the
//! notification body. A failed scan is reported through the same textual
//! channel as violations (the notification deliberately does not distinguish
//! them); the structured [`ScanOutcome`] keeps the two apart for callers
//! that need to.

use crate::aws::error::ScanError;
use crate::aws::tags::GOVERNANCE_TAG;
use std::fmt;
use std::future::Future;
use tracing::{error, info};

/// The four resource categories covered by the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Volumes,
    Instances,
    Snapshots,
    Lambda,
}

impl Category {
    /// Label used in notification text and logs.
    pub fn label(self) -> &'static str {
        match self {
            Category::Volumes => "Volumes",
            Category::Instances => "Instances",
            Category::Snapshots => "Snapshots",
            Category::Lambda => "Lambda",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one category's scan.
#[derive(Debug)]
pub enum ScanOutcome {
    /// Every resource in the category carries the governance tag.
    Clean,
    /// Identifiers of resources missing the tag, in listing order.
    Violations(Vec<String>),
    /// The scan aborted; nothing is known about the category.
    Failed(ScanError),
}

/// One category's outcome plus the label it is reported under.
#[derive(Debug)]
pub struct CategoryReport {
    pub category: Category,
    pub outcome: ScanOutcome,
}

impl CategoryReport {
    /// Render the category's contribution to the notification body.
    ///
    /// A clean category renders as the empty string and drops out of the
    /// aggregate; a failed scan renders its error text.
    pub fn render(&self) -> String {
        match &self.outcome {
            ScanOutcome::Clean => String::new(),
            ScanOutcome::Violations(ids) => format!(
                "{} without {} tag: [{}]",
                self.category.label(),
                GOVERNANCE_TAG,
                ids.join(" ")
            ),
            ScanOutcome::Failed(err) => err.to_string(),
        }
    }
}

/// Run one category's scan and absorb its result into a report.
///
/// Scan failures stop here: they are logged and carried as report text,
/// never escalated to the caller.
pub async fn report_category<Fut>(category: Category, scan: Fut) -> CategoryReport
where
    Fut: Future<Output = Result<Vec<String>, ScanError>>,
{
    let outcome = match scan.await {
        Ok(ids) if ids.is_empty() => ScanOutcome::Clean,
        Ok(ids) => {
            info!(category = %category, untagged = ?ids, "Found untagged resources");
            ScanOutcome::Violations(ids)
        }
        Err(err) => {
            error!(category = %category, error = %err, "Scan failed");
            ScanOutcome::Failed(err)
        }
    };

    CategoryReport { category, outcome }
}

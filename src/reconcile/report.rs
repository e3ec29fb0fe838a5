//! Per-entry outcomes and run totals.

use std::fmt;

use super::Action;

/// What happened to one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    /// The entry could not be processed (bad identifier or failed lookup).
    Skipped { reason: String },
    /// The repository has no published release.
    NoRelease,
    /// Installed version matches the latest tag.
    UpToDate { version: String },
    /// Installed and recorded.
    Installed { version: String },
    /// Updated and recorded.
    Updated { from: String, to: String },
    /// The operator answered no.
    Declined { action: Action },
    /// Dry run: the action would have been offered.
    Planned { action: Action },
    /// The installer failed; nothing was recorded.
    Failed { action: Action, error: String },
}

/// Outcome for a single manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// The manifest line as written.
    pub entry: String,
    /// Package name, when the identifier was valid.
    pub package: Option<String>,
    /// Binary availability line, when a release was found.
    pub availability: Option<String>,
    pub status: ItemStatus,
}

/// Results of one reconciliation run, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    items: Vec<ItemReport>,
}

impl RunReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, item: ItemReport) {
        self.items.push(item);
    }

    /// All item outcomes in processing order.
    pub fn items(&self) -> &[ItemReport] {
        &self.items
    }

    /// Look up the outcome for a package name.
    pub fn item(&self, package: &str) -> Option<&ItemReport> {
        self.items
            .iter()
            .find(|i| i.package.as_deref() == Some(package))
    }

    fn count(&self, pred: impl Fn(&ItemStatus) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.status)).count()
    }

    pub fn installed(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Installed { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Updated { .. }))
    }

    pub fn up_to_date(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::UpToDate { .. }))
    }

    pub fn no_release(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::NoRelease))
    }

    pub fn declined(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Declined { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Planned { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Failed { .. }))
    }

    /// Whether any recorded version changed during the run.
    pub fn changed_state(&self) -> bool {
        self.installed() + self.updated() > 0
    }

    /// Whether every entry was processed without error.
    pub fn is_clean(&self) -> bool {
        self.skipped() + self.failed() == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        let counts = [
            (self.installed(), "installed"),
            (self.updated(), "updated"),
            (self.up_to_date(), "up to date"),
            (self.no_release(), "without release"),
            (self.planned(), "pending"),
            (self.declined(), "declined"),
            (self.failed(), "failed"),
            (self.skipped(), "skipped"),
        ];
        for (n, label) in counts {
            if n > 0 {
                parts.push(format!("{} {}", n, label));
            }
        }
        if parts.is_empty() {
            write!(f, "Nothing to do")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

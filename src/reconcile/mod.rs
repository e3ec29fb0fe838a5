//! Version reconciliation.
//!
//! For every manifest entry the engine resolves the latest release, compares
//! its tag with the recorded installed version, and decides an [`Action`].
//! Mutating actions run only after confirmation, and the installed state is
//! updated only after the installer reports success.

pub mod action;
pub mod engine;
pub mod report;

pub use action::{decide, Action};
pub use engine::{ReconciliationEngine, RunOptions};
pub use report::{ItemReport, ItemStatus, RunReport};

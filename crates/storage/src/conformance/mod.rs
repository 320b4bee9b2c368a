//! Behavioural checks every `ProductStore` backend must pass.
//!
//! Checks are grouped by operation: bootstrap (seeding, idempotence),
//! read (stored order, case-insensitive lookup, not-found), register
//! (identifier format, registration template, append) and concurrent
//! (parallel registrations all persist).
//!
//! # Usage
//!
//! Pass [`run_conformance_suite`] a factory for empty stores:
//!
//! ```ignore
//! use verifarm_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn json_file_conformance() {
//!     let report = run_conformance_suite(|| async { fresh_json_store() }).await;
//!     assert!(report.is_clean(), "{report}");
//! }
//! ```

mod bootstrap;
mod concurrent;
mod read;
mod register;

use std::fmt;
use std::future::Future;

use crate::record::NewProduct;
use crate::ProductStore;

/// Outcome of one conformance check.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Operation family, e.g. `"bootstrap"`.
    pub group: &'static str,
    pub check: &'static str,
    /// Why the check failed; `None` when it passed.
    pub failure: Option<String>,
}

impl CheckOutcome {
    fn new(group: &'static str, check: &'static str, result: Result<(), String>) -> Self {
        Self {
            group,
            check,
            failure: result.err(),
        }
    }

    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Every check outcome from one suite run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct ConformanceReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl ConformanceReport {
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    /// True when at least one check ran and none failed.
    pub fn is_clean(&self) -> bool {
        !self.outcomes.is_empty() && self.failures().next().is_none()
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failing: Vec<&CheckOutcome> = self.failures().collect();
        writeln!(
            f,
            "{} store checks run, {} failing",
            self.outcomes.len(),
            failing.len()
        )?;
        for outcome in failing {
            writeln!(
                f,
                "  {}::{} -> {}",
                outcome.group,
                outcome.check,
                outcome.failure.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

/// Run every check against stores produced by `factory`.
///
/// Each check gets its own store from `factory`, which must hand out an
/// empty backend (no file, no records) every time.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut report = ConformanceReport::default();
    report
        .outcomes
        .extend(bootstrap::run_bootstrap_tests(&factory).await);
    report.outcomes.extend(read::run_read_tests(&factory).await);
    report
        .outcomes
        .extend(register::run_register_tests(&factory).await);
    report
        .outcomes
        .extend(concurrent::run_concurrent_tests(&factory).await);
    report
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_draft(name: &str) -> NewProduct {
    NewProduct::new(name, "Test Farm", "2025-01-01")
}

/// Fail with `msg` unless `cond` holds.
fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(msg())
    }
}

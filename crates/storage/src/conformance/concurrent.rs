use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use super::{ensure, make_draft, CheckOutcome};
use crate::{ProductStore, StorageError};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<CheckOutcome>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(CheckOutcome::new(
        "concurrent",
        "concurrent_registers_all_persist",
        concurrent_registers_all_persist(factory).await,
    ));
    results.push(CheckOutcome::new(
        "concurrent",
        "concurrent_bootstrap_seeds_once",
        concurrent_bootstrap_seeds_once(factory).await,
    ));

    results
}

// ── Concurrent registration: no lost updates ────────────────────────────────

/// N tasks register a product each against the same store. Every record must
/// be present afterwards; a lost load-modify-save cycle would drop some.
async fn concurrent_registers_all_persist<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);
    storage
        .bootstrap()
        .await
        .map_err(|e| format!("bootstrap: {e}"))?;

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            s.register_product(make_draft(&format!("Batch {i}"))).await
        }));
    }

    let mut created = HashSet::new();
    for handle in handles {
        let record = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
        created.insert(record.id);
    }
    ensure(created.len() == N, || {
        format!("expected {N} distinct ids, got {}", created.len())
    })?;

    let stored: HashSet<String> = storage
        .list_products()
        .await
        .into_iter()
        .map(|p| p.id)
        .collect();
    let missing: Vec<&String> = created.difference(&stored).collect();
    ensure(missing.is_empty(), || {
        format!("lost registrations: {missing:?}")
    })?;
    ensure(stored.len() == N + 2, || {
        format!("expected {} stored products, got {}", N + 2, stored.len())
    })
}

// ── Concurrent bootstrap: demo data written once ─────────────────────────────

async fn concurrent_bootstrap_seeds_once<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for _ in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move { s.bootstrap().await }));
    }

    let mut seeded = 0usize;
    for handle in handles {
        let outcome = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
        if matches!(outcome, crate::BootstrapOutcome::Seeded { .. }) {
            seeded += 1;
        }
    }
    ensure(seeded == 1, || format!("expected exactly 1 seeding, got {seeded}"))?;

    let count = storage.list_products().await.len();
    ensure(count == 2, || format!("expected 2 products, got {count}"))
}

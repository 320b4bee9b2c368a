use std::collections::HashSet;
use std::future::Future;

use super::{ensure, make_draft, CheckOutcome};
use crate::record::{NewProduct, StageStatus, DEFAULT_STATUS};
use crate::{is_valid_id, ProductStore};

pub(super) async fn run_register_tests<S, F, Fut>(factory: &F) -> Vec<CheckOutcome>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(CheckOutcome::new(
        "register",
        "registered_id_matches_format",
        registered_id_matches_format(factory).await,
    ));
    results.push(CheckOutcome::new(
        "register",
        "registered_product_uses_template",
        registered_product_uses_template(factory).await,
    ));
    results.push(CheckOutcome::new(
        "register",
        "registered_product_round_trips",
        registered_product_round_trips(factory).await,
    ));
    results.push(CheckOutcome::new(
        "register",
        "register_appends_one_record",
        register_appends_one_record(factory).await,
    ));
    results.push(CheckOutcome::new(
        "register",
        "registered_ids_are_distinct",
        registered_ids_are_distinct(factory).await,
    ));

    results
}

async fn registered_id_matches_format<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let created = store
        .register_product(make_draft("Kale"))
        .await
        .map_err(|e| format!("register: {e}"))?;
    ensure(is_valid_id(&created.id), || {
        format!("id {} does not match AGT + 6 base-36 characters", created.id)
    })
}

async fn registered_product_uses_template<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let created = store
        .register_product(NewProduct::new("Kale", "Hill Farm", "2024-02-01"))
        .await
        .map_err(|e| format!("register: {e}"))?;

    ensure(created.status == DEFAULT_STATUS, || {
        format!("expected status {DEFAULT_STATUS}, got {}", created.status)
    })?;
    ensure(created.timeline.len() == 4, || {
        format!("expected 4 timeline entries, got {}", created.timeline.len())
    })?;

    let first = &created.timeline[0];
    ensure(first.stage_status() == Some(StageStatus::Completed), || {
        format!("first entry should be completed, got {}", first.status)
    })?;
    ensure(first.location == "Hill Farm" && first.date == "2024-02-01", || {
        format!(
            "harvesting entry should carry farm and date, got {} / {}",
            first.location, first.date
        )
    })?;
    for entry in &created.timeline[1..] {
        ensure(entry.stage_status() == Some(StageStatus::Upcoming), || {
            format!("{} should be upcoming, got {}", entry.stage, entry.status)
        })?;
    }
    Ok(())
}

async fn registered_product_round_trips<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let created = store
        .register_product(make_draft("Kale"))
        .await
        .map_err(|e| format!("register: {e}"))?;

    let fetched = store
        .get_product(&created.id)
        .await
        .map_err(|e| format!("get {}: {e}", created.id))?;
    ensure(fetched == created, || {
        "fetched record differs from the registered one".to_string()
    })?;

    let listed = store.list_products().await;
    ensure(listed.contains(&created), || {
        "registered record missing from list".to_string()
    })
}

async fn register_appends_one_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .bootstrap()
        .await
        .map_err(|e| format!("bootstrap: {e}"))?;
    let before = store.list_products().await;

    let created = store
        .register_product(make_draft("Kale"))
        .await
        .map_err(|e| format!("register: {e}"))?;
    let after = store.list_products().await;

    ensure(after.len() == before.len() + 1, || {
        format!("expected {} products, got {}", before.len() + 1, after.len())
    })?;
    ensure(after[..before.len()] == before[..], || {
        "existing records changed during register".to_string()
    })?;
    ensure(after.last() == Some(&created), || {
        "new record was not appended at the end".to_string()
    })
}

async fn registered_ids_are_distinct<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let mut seen = HashSet::new();
    for i in 0..20 {
        let created = store
            .register_product(make_draft(&format!("Product {i}")))
            .await
            .map_err(|e| format!("register {i}: {e}"))?;
        ensure(seen.insert(created.id.clone()), || {
            format!("duplicate id {}", created.id)
        })?;
    }
    Ok(())
}

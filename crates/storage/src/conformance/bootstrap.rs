use std::future::Future;

use super::{ensure, make_draft, CheckOutcome};
use crate::record::Registry;
use crate::{demo_products, BootstrapOutcome, ProductStore};

pub(super) async fn run_bootstrap_tests<S, F, Fut>(factory: &F) -> Vec<CheckOutcome>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(CheckOutcome::new(
        "bootstrap",
        "fresh_store_loads_empty",
        fresh_store_loads_empty(factory).await,
    ));
    results.push(CheckOutcome::new(
        "bootstrap",
        "bootstrap_seeds_empty_store",
        bootstrap_seeds_empty_store(factory).await,
    ));
    results.push(CheckOutcome::new(
        "bootstrap",
        "bootstrap_is_idempotent",
        bootstrap_is_idempotent(factory).await,
    ));
    results.push(CheckOutcome::new(
        "bootstrap",
        "bootstrap_leaves_existing_products",
        bootstrap_leaves_existing_products(factory).await,
    ));
    results.push(CheckOutcome::new(
        "bootstrap",
        "bootstrap_reseeds_after_save_of_empty_registry",
        bootstrap_reseeds_after_save_of_empty_registry(factory).await,
    ));

    results
}

async fn fresh_store_loads_empty<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let products = store.list_products().await;
    ensure(products.is_empty(), || {
        format!("expected no products, found {}", products.len())
    })
}

async fn bootstrap_seeds_empty_store<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let outcome = store
        .bootstrap()
        .await
        .map_err(|e| format!("bootstrap: {e}"))?;
    ensure(outcome == BootstrapOutcome::Seeded { count: 2 }, || {
        format!("expected Seeded {{ count: 2 }}, got {outcome:?}")
    })?;

    let products = store.list_products().await;
    ensure(products == demo_products(), || {
        "stored products differ from the demo products".to_string()
    })
}

async fn bootstrap_is_idempotent<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .bootstrap()
        .await
        .map_err(|e| format!("first bootstrap: {e}"))?;
    let outcome = store
        .bootstrap()
        .await
        .map_err(|e| format!("second bootstrap: {e}"))?;

    ensure(outcome == BootstrapOutcome::Existing { count: 2 }, || {
        format!("expected Existing {{ count: 2 }}, got {outcome:?}")
    })?;
    let count = store.list_products().await.len();
    ensure(count == 2, || format!("expected 2 products, got {count}"))
}

async fn bootstrap_leaves_existing_products<S, F, Fut>(factory: &F) -> Result<(), String>
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

    let outcome = store
        .bootstrap()
        .await
        .map_err(|e| format!("bootstrap: {e}"))?;
    ensure(outcome == BootstrapOutcome::Existing { count: 1 }, || {
        format!("expected Existing {{ count: 1 }}, got {outcome:?}")
    })?;

    let products = store.list_products().await;
    ensure(products == vec![created], || {
        format!("expected only the registered product, got {products:?}")
    })
}

async fn bootstrap_reseeds_after_save_of_empty_registry<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .save(&Registry::default())
        .await
        .map_err(|e| format!("save: {e}"))?;

    let outcome = store
        .bootstrap()
        .await
        .map_err(|e| format!("bootstrap: {e}"))?;
    ensure(matches!(outcome, BootstrapOutcome::Seeded { .. }), || {
        format!("an empty registry must be seeded, got {outcome:?}")
    })
}

use std::future::Future;

use super::{ensure, make_draft, CheckOutcome};
use crate::{ProductStore, StorageError};

pub(super) async fn run_read_tests<S, F, Fut>(factory: &F) -> Vec<CheckOutcome>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(CheckOutcome::new(
        "read",
        "list_preserves_insertion_order",
        list_preserves_insertion_order(factory).await,
    ));
    results.push(CheckOutcome::new(
        "read",
        "get_is_case_insensitive",
        get_is_case_insensitive(factory).await,
    ));
    results.push(CheckOutcome::new(
        "read",
        "get_nonexistent_returns_not_found",
        get_nonexistent_returns_not_found(factory).await,
    ));
    results.push(CheckOutcome::new(
        "read",
        "not_found_error_carries_normalized_id",
        not_found_error_carries_normalized_id(factory).await,
    ));

    results
}

async fn list_preserves_insertion_order<S, F, Fut>(factory: &F) -> Result<(), String>
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

    let mut expected = vec!["AGT001".to_string(), "AGT002".to_string()];
    for name in ["Kale", "Beets", "Leeks"] {
        let created = store
            .register_product(make_draft(name))
            .await
            .map_err(|e| format!("register {name}: {e}"))?;
        expected.push(created.id);
    }

    let ids: Vec<String> = store
        .list_products()
        .await
        .into_iter()
        .map(|p| p.id)
        .collect();
    ensure(ids == expected, || {
        format!("expected order {expected:?}, got {ids:?}")
    })
}

async fn get_is_case_insensitive<S, F, Fut>(factory: &F) -> Result<(), String>
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

    let upper = store
        .get_product("AGT001")
        .await
        .map_err(|e| format!("get AGT001: {e}"))?;
    let lower = store
        .get_product("agt001")
        .await
        .map_err(|e| format!("get agt001: {e}"))?;
    ensure(upper == lower, || {
        "upper- and lower-case lookups returned different records".to_string()
    })?;
    ensure(upper.name == "Organic Tomatoes", || {
        format!("expected Organic Tomatoes, got {}", upper.name)
    })
}

async fn get_nonexistent_returns_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
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

    match store.get_product("AGT999").await {
        Err(StorageError::ProductNotFound { .. }) => Ok(()),
        Err(e) => Err(format!("expected ProductNotFound, got error: {e}")),
        Ok(p) => Err(format!("expected ProductNotFound, got product {}", p.id)),
    }
}

async fn not_found_error_carries_normalized_id<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ProductStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;

    match store.get_product("agt999").await {
        Err(StorageError::ProductNotFound { id }) => ensure(id == "AGT999", || {
            format!("expected id AGT999 in error, got {id}")
        }),
        Err(e) => Err(format!("expected ProductNotFound, got error: {e}")),
        Ok(p) => Err(format!("expected ProductNotFound, got product {}", p.id)),
    }
}

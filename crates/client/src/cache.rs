use std::collections::HashMap;

use verifarm_storage::ProductRecord;

/// Client-side mirror of some of the registry's records, keyed by id.
///
/// Staleness policy: filled once from the product list when the tracker
/// starts, extended with each product this client adds, and never
/// invalidated. Products added by other clients after start-up are missing,
/// and nothing is refreshed. Tracking always asks the service directly, so
/// this divergence only affects [`ProductCache::all`].
#[derive(Debug, Default, Clone)]
pub struct ProductCache {
    products: HashMap<String, ProductRecord>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with `products`. Later duplicates of an id win.
    pub fn fill(&mut self, products: Vec<ProductRecord>) {
        self.products = products.into_iter().map(|p| (p.id.clone(), p)).collect();
    }

    pub fn insert(&mut self, product: ProductRecord) {
        self.products.insert(product.id.clone(), product);
    }

    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All cached products, sorted by id.
    pub fn all(&self) -> Vec<&ProductRecord> {
        let mut all: Vec<&ProductRecord> = self.products.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifarm_storage::demo_products;

    #[test]
    fn fill_replaces_previous_contents() {
        let mut cache = ProductCache::new();
        cache.fill(demo_products());
        assert_eq!(cache.len(), 2);

        cache.fill(Vec::new());
        assert!(cache.is_empty());
    }

    #[test]
    fn all_is_sorted_by_id() {
        let mut cache = ProductCache::new();
        let mut products = demo_products();
        products.reverse();
        cache.fill(products);

        let ids: Vec<&str> = cache.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["AGT001", "AGT002"]);
    }

    #[test]
    fn insert_overwrites_same_id() {
        let mut cache = ProductCache::new();
        cache.fill(demo_products());

        let mut renamed = demo_products().remove(0);
        renamed.name = "Heirloom Tomatoes".to_string();
        cache.insert(renamed);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("AGT001").unwrap().name, "Heirloom Tomatoes");
    }
}

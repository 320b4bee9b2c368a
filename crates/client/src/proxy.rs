use verifarm_storage::{NewProduct, ProductRecord};

use crate::api::ProductApi;
use crate::cache::ProductCache;
use crate::error::ClientError;
use crate::view::TrackerView;

/// Result of [`TrackerProxy::track`].
#[derive(Debug)]
pub enum TrackOutcome {
    /// The tracking field was blank; no request was made.
    EmptyInput,
    Found(ProductRecord),
    NotFound,
    /// The service could not be reached or answered with an error.
    Unavailable(ClientError),
}

/// Result of [`TrackerProxy::add`].
#[derive(Debug)]
pub enum AddOutcome {
    /// A required field was blank; no request was made.
    Invalid,
    Added(ProductRecord),
    Failed(ClientError),
}

/// Drives the tracker page against a registry service.
///
/// Reads user input from `view.form`, talks to the service through `api`,
/// and reports back through the view and its notifications.
pub struct TrackerProxy<A: ProductApi> {
    api: A,
    cache: ProductCache,
    view: TrackerView,
}

impl<A: ProductApi> TrackerProxy<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            cache: ProductCache::new(),
            view: TrackerView::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &ProductCache {
        &self.cache
    }

    pub fn view(&self) -> &TrackerView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TrackerView {
        &mut self.view
    }

    /// Fill the cache from the full product list and return its size.
    ///
    /// On failure the cache is left untouched (empty on a fresh proxy), the
    /// error is logged and handed back; there is no retry and no
    /// notification.
    pub fn initialize(&mut self) -> Result<usize, ClientError> {
        match self.api.list_products() {
            Ok(products) => {
                self.cache.fill(products);
                tracing::info!(count = self.cache.len(), "loaded products from registry");
                Ok(self.cache.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load products from registry");
                Err(e)
            }
        }
    }

    /// Look up the product named in the tracking field and show it.
    ///
    /// Always asks the service; the cache is not consulted.
    pub fn track(&mut self) -> TrackOutcome {
        let product_id = self.view.form.product_id.trim().to_string();
        if product_id.is_empty() {
            self.view.notifications.error("Please enter a product ID");
            return TrackOutcome::EmptyInput;
        }

        match self.api.get_product(&product_id) {
            Ok(Some(product)) => {
                self.view.show_product(&product);
                self.view
                    .notifications
                    .success(format!("Product {} found!", product_id));
                TrackOutcome::Found(product)
            }
            Ok(None) => {
                self.view
                    .notifications
                    .error("Product not found. Try AGT001 or AGT002");
                TrackOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(id = %product_id, error = %e, "error fetching product");
                self.view
                    .notifications
                    .error("Error connecting to server. Please try again.");
                TrackOutcome::Unavailable(e)
            }
        }
    }

    /// Register the product described by the add-product fields.
    ///
    /// On success the new record joins the cache, the add-product fields are
    /// cleared and the tracking field is set to the new id. The timeline is
    /// left as it was.
    pub fn add(&mut self) -> AddOutcome {
        let form = &self.view.form;
        let draft = NewProduct::new(
            form.name.trim(),
            form.farm.trim(),
            form.harvest_date.trim(),
        );
        if !draft.is_complete() {
            self.view.notifications.error("Please fill in all fields");
            return AddOutcome::Invalid;
        }

        match self.api.create_product(&draft) {
            Ok(product) => {
                self.cache.insert(product.clone());
                self.view.notifications.success(format!(
                    "Product added to registry! ID: {}",
                    product.id
                ));
                self.view.form.clear_new_product();
                self.view.form.product_id = product.id.clone();
                AddOutcome::Added(product)
            }
            Err(e) => {
                tracing::error!(error = %e, "error adding product");
                self.view
                    .notifications
                    .error("Failed to add product. Please try again.");
                AddOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use std::time::{Duration, Instant};

    use super::*;
    use crate::api::HealthStatus;
    use crate::notify::{NotificationKind, NOTIFICATION_TTL};
    use verifarm_storage::{demo_products, normalize_id};

    /// In-memory stand-in for the registry service.
    #[derive(Default)]
    struct FakeApi {
        products: RefCell<Vec<ProductRecord>>,
        offline: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn seeded() -> Self {
            Self {
                products: RefCell::new(demo_products()),
                ..Self::default()
            }
        }

        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn record(&self, call: &str) -> Result<(), ClientError> {
            self.calls.borrow_mut().push(call.to_string());
            if self.offline {
                return Err(ClientError::Connection {
                    url: "http://127.0.0.1:9/api".to_string(),
                    message: "connection refused".to_string(),
                });
            }
            Ok(())
        }
    }

    impl ProductApi for FakeApi {
        fn health(&self) -> Result<HealthStatus, ClientError> {
            self.record("health")?;
            Ok(HealthStatus {
                status: "OK".to_string(),
                message: "fake".to_string(),
            })
        }

        fn list_products(&self) -> Result<Vec<ProductRecord>, ClientError> {
            self.record("list")?;
            Ok(self.products.borrow().clone())
        }

        fn get_product(&self, id: &str) -> Result<Option<ProductRecord>, ClientError> {
            self.record(&format!("get {id}"))?;
            let wanted = normalize_id(id);
            Ok(self
                .products
                .borrow()
                .iter()
                .find(|p| p.id == wanted)
                .cloned())
        }

        fn create_product(&self, draft: &NewProduct) -> Result<ProductRecord, ClientError> {
            self.record("create")?;
            let id = format!("AGTNEW{:03}", self.products.borrow().len());
            let record = ProductRecord::registered(id, draft.clone());
            self.products.borrow_mut().push(record.clone());
            Ok(record)
        }
    }

    fn last_notification<A: ProductApi>(proxy: &TrackerProxy<A>) -> (NotificationKind, String) {
        let note = proxy.view().notifications.latest().expect("a notification");
        (note.kind, note.message.clone())
    }

    #[test]
    fn initialize_fills_cache() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        assert_eq!(proxy.initialize().unwrap(), 2);
        assert!(proxy.cache().get("AGT001").is_some());
    }

    #[test]
    fn initialize_failure_leaves_cache_empty() {
        let mut proxy = TrackerProxy::new(FakeApi::offline());
        assert!(proxy.initialize().unwrap_err().is_connection());
        assert!(proxy.cache().is_empty());
        assert!(proxy.view().notifications.is_empty());
    }

    #[test]
    fn track_renders_found_product() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        proxy.view_mut().form.product_id = "  agt001 ".to_string();

        let outcome = proxy.track();
        assert!(matches!(outcome, TrackOutcome::Found(ref p) if p.id == "AGT001"));
        assert_eq!(proxy.view().summary().unwrap().name, "Organic Tomatoes");
        assert_eq!(proxy.view().timeline().len(), 4);
        assert_eq!(
            last_notification(&proxy),
            (NotificationKind::Success, "Product agt001 found!".to_string())
        );
    }

    #[test]
    fn track_bypasses_cache() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        proxy.initialize().unwrap();
        proxy.view_mut().form.product_id = "AGT002".to_string();
        proxy.track();

        assert_eq!(*proxy.api().calls.borrow(), ["list", "get AGT002"]);
    }

    #[test]
    fn track_rejects_blank_input_without_request() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        proxy.view_mut().form.product_id = "   ".to_string();

        assert!(matches!(proxy.track(), TrackOutcome::EmptyInput));
        assert!(proxy.api().calls.borrow().is_empty());
        assert_eq!(
            last_notification(&proxy),
            (NotificationKind::Error, "Please enter a product ID".to_string())
        );
    }

    #[test]
    fn track_distinguishes_not_found_from_connection_failure() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        proxy.view_mut().form.product_id = "AGT999".to_string();
        assert!(matches!(proxy.track(), TrackOutcome::NotFound));
        assert_eq!(
            last_notification(&proxy).1,
            "Product not found. Try AGT001 or AGT002"
        );

        let mut offline = TrackerProxy::new(FakeApi::offline());
        offline.view_mut().form.product_id = "AGT001".to_string();
        assert!(matches!(offline.track(), TrackOutcome::Unavailable(_)));
        assert_eq!(
            last_notification(&offline).1,
            "Error connecting to server. Please try again."
        );
    }

    #[test]
    fn timed_out_notification_is_gone_after_next_action() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        let long_ago = Instant::now()
            .checked_sub(NOTIFICATION_TTL + Duration::from_millis(10))
            .expect("clock far enough past boot");
        proxy.view_mut().notifications.push_at(
            NotificationKind::Error,
            "Please enter a product ID",
            long_ago,
        );

        proxy.view_mut().form.product_id = "AGT002".to_string();
        proxy.track();

        let notes = &proxy.view().notifications;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.latest().unwrap().message, "Product AGT002 found!");
    }

    #[test]
    fn add_registers_and_prefills_tracking_field() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        proxy.initialize().unwrap();
        proxy.view_mut().form = crate::view::TrackerForm {
            product_id: "AGT001".to_string(),
            name: " Kale ".to_string(),
            farm: "Hill Farm".to_string(),
            harvest_date: "2024-02-01".to_string(),
        };

        let product = match proxy.add() {
            AddOutcome::Added(p) => p,
            other => panic!("expected Added, got {other:?}"),
        };
        assert_eq!(product.name, "Kale");
        assert_eq!(proxy.cache().len(), 3);
        assert_eq!(proxy.cache().get(&product.id), Some(&product));

        let form = &proxy.view().form;
        assert_eq!(form.product_id, product.id);
        assert!(form.name.is_empty() && form.farm.is_empty() && form.harvest_date.is_empty());
        assert_eq!(
            last_notification(&proxy),
            (
                NotificationKind::Success,
                format!("Product added to registry! ID: {}", product.id)
            )
        );
        // timeline is not re-rendered for the new product
        assert!(proxy.view().timeline().is_empty());
    }

    #[test]
    fn add_with_blank_field_makes_no_request() {
        let mut proxy = TrackerProxy::new(FakeApi::seeded());
        proxy.view_mut().form.name = "Kale".to_string();
        proxy.view_mut().form.farm = "  ".to_string();
        proxy.view_mut().form.harvest_date = "2024-02-01".to_string();

        assert!(matches!(proxy.add(), AddOutcome::Invalid));
        assert!(proxy.api().calls.borrow().is_empty());
        assert_eq!(proxy.view().form.name, "Kale");
        assert_eq!(last_notification(&proxy).1, "Please fill in all fields");
    }

    #[test]
    fn add_failure_keeps_form_and_cache() {
        let mut proxy = TrackerProxy::new(FakeApi::offline());
        proxy.view_mut().form.name = "Kale".to_string();
        proxy.view_mut().form.farm = "Hill Farm".to_string();
        proxy.view_mut().form.harvest_date = "2024-02-01".to_string();

        assert!(matches!(proxy.add(), AddOutcome::Failed(_)));
        assert!(proxy.cache().is_empty());
        assert_eq!(proxy.view().form.name, "Kale");
        assert_eq!(
            last_notification(&proxy).1,
            "Failed to add product. Please try again."
        );
    }
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductDraft};

/// Persistence gateway for products.
///
/// Every method is a single storage round trip; nothing here spans several
/// writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ascending by id
    async fn find_all(&self) -> ProductResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Insert when `draft.id` is `None`; otherwise update that row, or insert
    /// it under the given id if it does not exist.
    async fn save(&self, draft: ProductDraft) -> ProductResult<Product>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: i64) -> ProductResult<bool>;

    async fn exists_by_id(&self, id: i64) -> ProductResult<bool>;

    /// Exact name match ignoring case
    async fn find_by_name_ignore_case(&self, name: &str) -> ProductResult<Option<Product>>;

    /// Names containing `term`, ignoring case
    async fn find_by_name_containing_ignore_case(&self, term: &str)
    -> ProductResult<Vec<Product>>;

    /// `quantity <= initial_quantity * 0.1`. A missing initial quantity never
    /// matches; a zero one only matches an empty stock.
    async fn find_near_depletion(&self) -> ProductResult<Vec<Product>>;

    /// The product with the smallest quantity
    async fn find_min_quantity(&self) -> ProductResult<Option<Product>>;

    /// `SUM(price * quantity)`, `None` for an empty table
    async fn sum_inventory_value(&self) -> ProductResult<Option<Decimal>>;

    async fn find_by_quantity_greater_than(&self, quantity: i32) -> ProductResult<Vec<Product>>;

    async fn find_by_quantity_equals(&self, quantity: i32) -> ProductResult<Vec<Product>>;
}

#[derive(Debug, Default)]
struct Store {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

/// In-memory implementation of ProductRepository (for development/testing).
///
/// Enforces the same name and quantity constraints the products table does,
/// reporting violations as storage errors.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(store: &Store, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        store.rows.values().filter(|p| predicate(p)).cloned().collect()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.rows.get(&id).cloned())
    }

    async fn save(&self, draft: ProductDraft) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        if draft.quantity < 0 {
            return Err(ProductError::Database(DbErr::Custom(
                "new row for relation \"products\" violates check constraint \"chk_products_quantity_non_negative\"".to_string(),
            )));
        }

        let lowered = draft.name.to_lowercase();
        let name_taken = store
            .rows
            .values()
            .any(|p| Some(p.id) != draft.id && p.name.to_lowercase() == lowered);
        if name_taken {
            return Err(ProductError::Database(DbErr::Custom(format!(
                "duplicate key value violates unique constraint \"uq_products_name_lower\": ({})",
                lowered
            ))));
        }

        let id = match draft.id {
            Some(id) => {
                store.last_id = store.last_id.max(id);
                id
            }
            None => {
                store.last_id += 1;
                store.last_id
            }
        };

        let product = Product {
            id,
            name: draft.name,
            price: draft.price,
            quantity: draft.quantity,
            initial_quantity: draft.initial_quantity,
        };
        let replaced = store.rows.insert(id, product.clone()).is_some();

        if replaced {
            tracing::info!(product_id = id, "Updated product");
        } else {
            tracing::info!(product_id = id, "Created product");
        }
        Ok(product)
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<bool> {
        let mut store = self.store.write().await;

        if store.rows.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_id(&self, id: i64) -> ProductResult<bool> {
        let store = self.store.read().await;
        Ok(store.rows.contains_key(&id))
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        let lowered = name.to_lowercase();
        Ok(store
            .rows
            .values()
            .find(|p| p.name.to_lowercase() == lowered)
            .cloned())
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        term: &str,
    ) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        let lowered = term.to_lowercase();
        Ok(Self::select(&store, |p| p.name.to_lowercase().contains(&lowered)))
    }

    async fn find_near_depletion(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(Self::select(&store, |p| {
            p.initial_quantity
                .is_some_and(|initial| i64::from(p.quantity) * 10 <= i64::from(initial))
        }))
    }

    async fn find_min_quantity(&self) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.rows.values().min_by_key(|p| p.quantity).cloned())
    }

    async fn sum_inventory_value(&self) -> ProductResult<Option<Decimal>> {
        let store = self.store.read().await;
        if store.rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(store.rows.values().map(Product::total_value).sum()))
    }

    async fn find_by_quantity_greater_than(&self, quantity: i32) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(Self::select(&store, |p| p.quantity > quantity))
    }

    async fn find_by_quantity_equals(&self, quantity: i32) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(Self::select(&store, |p| p.quantity == quantity))
    }
}

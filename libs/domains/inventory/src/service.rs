use rust_decimal::Decimal;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{Dashboard, InventoryReport, Product, ProductDraft, ProductView, SeedOutcome};
use crate::repository::ProductRepository;

/// Starter catalogue as `(name, price in cents, quantity)`.
const STARTER_PRODUCTS: [(&str, i64, i32); 10] = [
    ("Peras", 400000, 65),
    ("Limones", 150000, 25),
    ("Moras", 200000, 30),
    ("Piñas", 300000, 15),
    ("Tomates", 100000, 30),
    ("Fresas", 300000, 12),
    ("Frunas", 30000, 50),
    ("Galletas", 50000, 400),
    ("Chocolates", 120000, 500),
    ("Arroz", 120000, 60),
];

/// Business rules over the product store.
///
/// Every failure is returned to the caller; nothing is logged or swallowed
/// here. Name uniqueness is only offered as the advisory [`name_exists`]
/// check, the storage unique index being the final word.
///
/// [`name_exists`]: InventoryService::name_exists
pub struct InventoryService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for InventoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> InventoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All products in storage order
    pub async fn list_all(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        self.repository.find_by_id(id).await
    }

    /// Validate and persist a product, defaulting its initial quantity to the
    /// current quantity.
    pub async fn save(&self, mut draft: ProductDraft) -> ProductResult<Product> {
        draft.validate()?;

        if draft.initial_quantity.is_none() {
            draft.initial_quantity = Some(draft.quantity);
        }

        self.repository.save(draft).await
    }

    /// Replace name, price and quantity of an existing product. The stored
    /// initial quantity is kept unless the draft supplies one.
    pub async fn update(&self, draft: ProductDraft) -> ProductResult<Product> {
        let id = draft.id.ok_or_else(|| {
            ProductError::InvalidArgument("Product id is required for update".to_string())
        })?;

        draft.validate()?;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        let merged = ProductDraft {
            id: Some(id),
            name: draft.name,
            price: draft.price,
            quantity: draft.quantity,
            initial_quantity: draft.initial_quantity.or(existing.initial_quantity),
        };

        self.repository.save(merged).await
    }

    /// Remove a product, returning what was removed
    pub async fn delete(&self, id: i64) -> ProductResult<Product> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if !self.repository.delete_by_id(id).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(existing)
    }

    pub async fn search_by_name(&self, term: &str) -> ProductResult<Vec<Product>> {
        self.repository.find_by_name_containing_ignore_case(term).await
    }

    /// The near-depletion product with the lowest percentage left. On a tie
    /// the one storage returned first wins.
    pub async fn most_near_depletion(&self) -> ProductResult<Option<Product>> {
        let candidates = self.repository.find_near_depletion().await?;

        Ok(candidates
            .into_iter()
            .min_by(|a, b| a.percent_remaining().total_cmp(&b.percent_remaining())))
    }

    /// Storage-level near-depletion filter, without the entity-level
    /// fallback for a missing initial quantity.
    pub async fn all_near_depletion(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_near_depletion().await
    }

    pub async fn total_inventory_value(&self) -> ProductResult<Decimal> {
        let total = self.repository.sum_inventory_value().await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }

    /// Set the stock of a product (the sale path).
    ///
    /// Returns `Ok(false)` when no product has this id.
    pub async fn adjust_quantity(&self, id: i64, quantity: i32) -> ProductResult<bool> {
        if quantity < 0 {
            return Err(ProductError::InvalidArgument(
                "Quantity cannot be negative".to_string(),
            ));
        }

        let Some(product) = self.repository.find_by_id(id).await? else {
            return Ok(false);
        };

        let draft = ProductDraft {
            quantity,
            ..ProductDraft::from(product)
        };
        self.repository.save(draft).await?;
        Ok(true)
    }

    /// Case-insensitive exact name lookup
    pub async fn name_exists(&self, name: &str) -> ProductResult<bool> {
        let found = self.repository.find_by_name_ignore_case(name).await?;
        Ok(found.is_some())
    }

    /// Products with stock left
    pub async fn available(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_by_quantity_greater_than(0).await
    }

    /// Products with no stock left
    pub async fn depleted(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_by_quantity_equals(0).await
    }

    /// Load the starter catalogue into an empty inventory.
    pub async fn seed_initial_inventory(&self) -> ProductResult<SeedOutcome> {
        if !self.repository.find_all().await?.is_empty() {
            return Ok(SeedOutcome::AlreadyLoaded);
        }

        for (name, cents, quantity) in STARTER_PRODUCTS {
            self.save(ProductDraft::new(name, Decimal::new(cents, 2), quantity))
                .await?;
        }

        Ok(SeedOutcome::Seeded(STARTER_PRODUCTS.len()))
    }

    /// Product list with the landing page figures
    pub async fn dashboard(&self) -> ProductResult<Dashboard> {
        let products = self.list_all().await?;
        let total_value = self.total_inventory_value().await?;
        let most_near_depletion = self.most_near_depletion().await?;

        Ok(Dashboard {
            products: to_views(products),
            total_value,
            most_near_depletion: most_near_depletion.map(ProductView::from),
        })
    }

    pub async fn inventory_report(&self) -> ProductResult<InventoryReport> {
        let products = self.list_all().await?;
        let total_value = self.total_inventory_value().await?;
        let available = self.available().await?;
        let depleted = self.depleted().await?;
        let near_depletion = self.all_near_depletion().await?;

        Ok(InventoryReport {
            products: to_views(products),
            total_value,
            available: to_views(available),
            depleted: to_views(depleted),
            near_depletion: to_views(near_depletion),
        })
    }
}

pub(crate) fn to_views(products: Vec<Product>) -> Vec<ProductView> {
    products.into_iter().map(ProductView::from).collect()
}

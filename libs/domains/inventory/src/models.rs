use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Largest price magnitude with at most 10 integer digits.
const PRICE_INTEGER_LIMIT: i64 = 10_000_000_000;
const PRICE_MAX_SCALE: u32 = 2;

/// Rejects names made only of whitespace.
fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Name must not be blank".into()));
    }
    Ok(())
}

/// Price must be positive with at most 10 integer and 2 fractional digits.
/// Trailing fractional zeros do not count, so `12.500` is accepted.
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::new("price_not_positive")
            .with_message("Price must be greater than zero".into()));
    }

    let fits_integer_digits = price.trunc() < Decimal::from(PRICE_INTEGER_LIMIT);
    let fits_fraction_digits = price.normalize().scale() <= PRICE_MAX_SCALE;
    if !fits_integer_digits || !fits_fraction_digits {
        return Err(ValidationError::new("price_precision").with_message(
            "Price allows at most 10 integer digits and 2 decimal places".into(),
        ));
    }

    Ok(())
}

/// A stocked product as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Storage-assigned identifier
    pub id: i64,
    /// Unique (case-insensitive) display name
    pub name: String,
    /// Unit price
    #[schema(value_type = String, example = "4000.00")]
    pub price: Decimal,
    /// Units currently in stock
    pub quantity: i32,
    /// Units in stock when the product was first saved
    pub initial_quantity: Option<i32>,
}

impl Product {
    /// `price × quantity`, exact.
    pub fn total_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Current stock as a percentage of the initial stock; `0.0` when the
    /// initial stock is unknown or zero.
    pub fn percent_remaining(&self) -> f64 {
        match self.initial_quantity {
            Some(initial) if initial > 0 => self.quantity as f64 / initial as f64 * 100.0,
            _ => 0.0,
        }
    }

    /// At or below 10% of the initial stock. Without a usable initial stock
    /// a product counts as near depletion once it is down to one unit.
    pub fn is_near_depletion(&self) -> bool {
        match self.initial_quantity {
            Some(initial) if initial > 0 => i64::from(self.quantity) * 10 <= i64::from(initial),
            _ => self.quantity <= 1,
        }
    }
}

/// A product as supplied by a caller of `save`/`update`.
///
/// `id` is `None` for a new product. `initial_quantity` is `None` when the
/// caller leaves it to be defaulted (on save) or preserved (on update).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ProductDraft {
    pub id: Option<i64>,
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    #[validate(range(min = 0, message = "Initial quantity cannot be negative"))]
    pub initial_quantity: Option<i32>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            quantity,
            initial_quantity: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_initial_quantity(mut self, initial_quantity: i32) -> Self {
        self.initial_quantity = Some(initial_quantity);
        self
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            initial_quantity: product.initial_quantity,
        }
    }
}

/// Request body for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Peras")]
    pub name: String,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "4000.00")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[schema(example = 65)]
    pub quantity: i32,
    #[validate(range(min = 0, message = "Initial quantity cannot be negative"))]
    #[serde(default)]
    pub initial_quantity: Option<i32>,
}

impl ProductInput {
    pub fn into_draft(self, id: Option<i64>) -> ProductDraft {
        ProductDraft {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            initial_quantity: self.initial_quantity,
        }
    }
}

/// Request body for the sale path. A negative quantity is rejected by the
/// service rather than here.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdjustQuantity {
    #[schema(example = 12)]
    pub quantity: i32,
}

/// `?search=` filter for the product list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ProductSearch {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Product plus its derived figures, as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[schema(value_type = String, example = "260000.00")]
    pub total_value: Decimal,
    #[schema(example = 100.0)]
    pub percent_remaining: f64,
    pub near_depletion: bool,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            total_value: product.total_value(),
            percent_remaining: product.percent_remaining(),
            near_depletion: product.is_near_depletion(),
            product,
        }
    }
}

/// Result of loading the starter inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Inventory was empty; this many products were added
    Seeded(usize),
    /// Inventory already had products; nothing was written
    AlreadyLoaded,
}

/// Landing page figures
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Dashboard {
    pub products: Vec<ProductView>,
    #[schema(value_type = String)]
    pub total_value: Decimal,
    pub most_near_depletion: Option<ProductView>,
}

/// Full inventory report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryReport {
    pub products: Vec<ProductView>,
    #[schema(value_type = String)]
    pub total_value: Decimal,
    pub available: Vec<ProductView>,
    pub depleted: Vec<ProductView>,
    pub near_depletion: Vec<ProductView>,
}

/// Outcome level of a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Warning,
    Danger,
}

/// Status and message for a completed mutation, with the affected product
/// when there is one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub status: ActionStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductView>,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Success,
            message: message.into(),
            product: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Warning,
            message: message.into(),
            product: None,
        }
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.product = Some(product.into());
        self
    }
}

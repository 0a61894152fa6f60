use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Product, ProductDraft};

/// Sea-ORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub quantity: i32,
    pub initial_quantity: Option<i32>,
}

impl Model {
    /// OpenAPI tag for product routes
    pub const TAG: &'static str = "products";
    /// Mount point of the product routes under `/api`
    pub const URL: &'static str = "/products";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            quantity: model.quantity,
            initial_quantity: model.initial_quantity,
        }
    }
}

// `id: None` leaves the key to the sequence.
impl From<ProductDraft> for ActiveModel {
    fn from(draft: ProductDraft) -> Self {
        ActiveModel {
            id: draft.id.map_or(NotSet, Set),
            name: Set(draft.name),
            price: Set(draft.price),
            quantity: Set(draft.quantity),
            initial_quantity: Set(draft.initial_quantity),
        }
    }
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entity::{ActiveModel, Column, Entity};
use crate::error::ProductResult;
use crate::models::{Product, ProductDraft};
use crate::repository::ProductRepository;

/// Re-aligns the id sequence after a row was inserted under an explicit id.
const SYNC_ID_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('products', 'id'), \
     GREATEST((SELECT MAX(id) FROM products), 1))";

/// PostgreSQL implementation of ProductRepository
///
/// Each call borrows a pooled connection for its own duration only.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// `lower(name)`
    fn lower_name() -> Expr {
        Expr::expr(Func::lower(Expr::col(Column::Name)))
    }

    /// `%term%` with LIKE wildcards in `term` taken literally
    fn contains_pattern(term: &str) -> String {
        let escaped = term
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }

    fn into_products(models: Vec<crate::entity::Model>) -> Vec<Product> {
        models.into_iter().map(Into::into).collect()
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let models = Entity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(Self::into_products(models))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let result = Entity::find_by_id(id).one(&self.db).await?.map(Into::into);
        Ok(result)
    }

    #[tracing::instrument(skip(self, draft), fields(product_id = ?draft.id), level = "debug")]
    async fn save(&self, draft: ProductDraft) -> ProductResult<Product> {
        let Some(id) = draft.id else {
            let model: ActiveModel = draft.into();
            let created = model.insert(&self.db).await?;
            tracing::info!(product_id = created.id, "Created product");
            return Ok(created.into());
        };

        let exists = Entity::find_by_id(id).one(&self.db).await?.is_some();
        let model: ActiveModel = draft.into();

        if exists {
            let updated = model.update(&self.db).await?;
            tracing::info!(product_id = updated.id, "Updated product");
            return Ok(updated.into());
        }

        let created = model.insert(&self.db).await?;
        self.db.execute_unprepared(SYNC_ID_SEQUENCE).await?;
        tracing::info!(product_id = created.id, "Created product with explicit id");
        Ok(created.into())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn delete_by_id(&self, id: i64) -> ProductResult<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        let deleted = result.rows_affected > 0;
        if deleted {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(deleted)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn exists_by_id(&self, id: i64) -> ProductResult<bool> {
        let found = Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Expr::col(Column::Id).eq(id))
            .into_tuple::<i64>()
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_name_ignore_case(&self, name: &str) -> ProductResult<Option<Product>> {
        let result = Entity::find()
            .filter(Self::lower_name().eq(name.to_lowercase()))
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_name_containing_ignore_case(
        &self,
        term: &str,
    ) -> ProductResult<Vec<Product>> {
        let pattern = LikeExpr::new(Self::contains_pattern(term)).escape('\\');
        let models = Entity::find()
            .filter(Self::lower_name().like(pattern))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(Self::into_products(models))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_near_depletion(&self) -> ProductResult<Vec<Product>> {
        // NULL initial quantities drop out through NULL comparison
        let tenth_of_initial = Expr::col(Column::InitialQuantity).mul(Decimal::new(1, 1));
        let models = Entity::find()
            .filter(Expr::col(Column::Quantity).lte(tenth_of_initial))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(Self::into_products(models))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_min_quantity(&self) -> ProductResult<Option<Product>> {
        let result = Entity::find()
            .order_by_asc(Column::Quantity)
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn sum_inventory_value(&self) -> ProductResult<Option<Decimal>> {
        let line_value = Expr::col(Column::Price).mul(Expr::col(Column::Quantity));
        let total = Entity::find()
            .select_only()
            .column_as(Expr::expr(Func::sum(line_value)), "total")
            .into_tuple::<Option<Decimal>>()
            .one(&self.db)
            .await?;
        Ok(total.flatten())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_quantity_greater_than(&self, quantity: i32) -> ProductResult<Vec<Product>> {
        let models = Entity::find()
            .filter(Expr::col(Column::Quantity).gt(quantity))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(Self::into_products(models))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_quantity_equals(&self, quantity: i32) -> ProductResult<Vec<Product>> {
        let models = Entity::find()
            .filter(Expr::col(Column::Quantity).eq(quantity))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(Self::into_products(models))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: i64, name: &str, quantity: i32) -> crate::entity::Model {
        crate::entity::Model {
            id,
            name: name.to_string(),
            price: Decimal::new(300000, 2),
            quantity,
            initial_quantity: Some(12),
        }
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(PgProductRepository::contains_pattern("Mor"), "%mor%");
        assert_eq!(PgProductRepository::contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(PgProductRepository::contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn test_find_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(6, "Fresas", 1)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let product = repo.find_by_id(6).await.unwrap().unwrap();
        assert_eq!(product.name, "Fresas");
        assert!(product.is_near_depletion());
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.delete_by_id(1).await.unwrap());
        assert!(!repo.delete_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_errors_pass_through() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let err = repo.find_all().await.unwrap_err();
        assert!(matches!(err, crate::error::ProductError::Database(_)));
    }
}

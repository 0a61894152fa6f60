use axum::Router;
use domain_inventory::{InventoryService, PgProductRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());
    let service = InventoryService::new(repository);
    handlers::router(service)
}

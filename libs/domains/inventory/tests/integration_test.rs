//! Integration tests for PgProductRepository
//!
//! These run against a PostgreSQL testcontainer with the workspace migrations
//! applied. They need Docker and are ignored by default:
//!
//! ```sh
//! cargo test -p domain_inventory --test integration_test -- --ignored
//! ```

use domain_inventory::*;
use rust_decimal::Decimal;
use test_utils::{TestDataBuilder, TestDatabase, assertions};

fn draft(name: &str, price_cents: i64, quantity: i32) -> ProductDraft {
    ProductDraft::new(name, Decimal::new(price_cents, 2), quantity)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_and_find_round_trip() {
    let db = TestDatabase::new().await;
    let service = InventoryService::new(PgProductRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("pg_round_trip");

    let name = builder.product_name("main");
    let price = Decimal::new(builder.price_cents(), 2);
    let quantity = builder.quantity();

    let saved = service
        .save(ProductDraft::new(name.clone(), price, quantity))
        .await
        .unwrap();
    let fetched = assertions::assert_some(
        service.get_by_id(saved.id).await.unwrap(),
        "saved product",
    );

    assert_eq!(fetched.name, name);
    assert_eq!(fetched.price, price);
    assert_eq!(fetched.quantity, quantity);
    assert_eq!(fetched.initial_quantity, Some(quantity));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_name_index_is_case_insensitive() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    repo.save(draft("Peras", 400000, 65)).await.unwrap();
    let duplicate = repo.save(draft("PERAS", 100, 1)).await;

    assert!(matches!(duplicate, Err(ProductError::Database(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_negative_quantity_violates_check_constraint() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let result = repo.save(draft("Peras", 400000, -1)).await;

    assert!(matches!(result, Err(ProductError::Database(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_with_explicit_id_keeps_sequence_ahead() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    let explicit = repo.save(draft("Moras", 200000, 30).with_id(50)).await.unwrap();
    assert_eq!(explicit.id, 50);

    let generated = repo.save(draft("Tomates", 100000, 30)).await.unwrap();
    assert!(generated.id > 50);

    let updated = repo
        .save(draft("Moras", 210000, 20).with_id(50))
        .await
        .unwrap();
    assert_eq!(updated.quantity, 20);
    assert_eq!(repo.find_all().await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_queries_against_sample_inventory() {
    let db = TestDatabase::new().await;
    let service = InventoryService::new(PgProductRepository::new(db.connection()));

    service.save(draft("Peras", 400000, 65)).await.unwrap();
    service.save(draft("Limones", 150000, 25)).await.unwrap();
    service
        .save(draft("Fresas", 300000, 1).with_initial_quantity(12))
        .await
        .unwrap();
    service
        .save(draft("Uvas", 250000, 0).with_initial_quantity(0))
        .await
        .unwrap();

    assert_eq!(
        service.total_inventory_value().await.unwrap(),
        Decimal::new(30050000, 2)
    );

    let near: Vec<String> = service
        .all_near_depletion()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(near, vec!["Fresas", "Uvas"]);

    let most = service.most_near_depletion().await.unwrap().unwrap();
    assert_eq!(most.name, "Uvas");

    assert!(service.name_exists("fresas").await.unwrap());
    assert!(!service.name_exists("fres").await.unwrap());
    assert_eq!(service.search_by_name("MON").await.unwrap()[0].name, "Limones");
    assert_eq!(service.available().await.unwrap().len(), 3);
    assert_eq!(service.depleted().await.unwrap()[0].name, "Uvas");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_treats_wildcards_literally() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    repo.save(draft("Arroz 100%", 120000, 60)).await.unwrap();
    repo.save(draft("Arroz integral", 130000, 40)).await.unwrap();

    let matches = repo.find_by_name_containing_ignore_case("%").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Arroz 100%");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_empty_table_aggregates() {
    let db = TestDatabase::new().await;
    let repo = PgProductRepository::new(db.connection());

    assert_eq!(repo.sum_inventory_value().await.unwrap(), None);
    assert!(repo.find_min_quantity().await.unwrap().is_none());

    repo.save(draft("Peras", 400000, 65)).await.unwrap();
    db.truncate_products().await;
    assert!(repo.find_all().await.unwrap().is_empty());
}

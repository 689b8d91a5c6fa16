//! Integration tests for the Products domain
//!
//! These use real PostgreSQL via testcontainers to ensure:
//! - The entity maps onto a real table
//! - The unique name constraint surfaces as `DuplicateName`
//! - Filtering and ordering happen in SQL

use domain_products::*;
use test_utils::{TestDataBuilder, TestDatabase};

async fn setup() -> (TestDatabase, PgProductRepository) {
    let db = TestDatabase::new().await;
    db.create_table_for(entity::Entity).await;
    let repo = PgProductRepository::new(db.connection());
    (db, repo)
}

fn draft(name: String, price: f64, expiry: &str, category_id: i32) -> NewProduct {
    NewProduct {
        name,
        price,
        expiry: expiry.parse().unwrap(),
        category_id,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_product() {
    let (_db, repo) = setup().await;
    let builder = TestDataBuilder::from_test_name("create_and_get");
    let input = draft(
        builder.name("product", "milk"),
        1.5,
        "2030-01-01T00:00:00Z",
        builder.category_id(),
    );

    let created = repo.create(input.clone()).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, input.name);
    assert_eq!(created.expiry, input.expiry);

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(retrieved, Some(created));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_name_constraint() {
    let (_db, repo) = setup().await;
    let builder = TestDataBuilder::from_test_name("duplicate_name");
    let name = builder.name("product", "dup");

    repo.create(draft(name.clone(), 1.0, "2030-01-01T00:00:00Z", 1))
        .await
        .unwrap();

    let result = repo
        .create(draft(name, 2.0, "2030-01-01T00:00:00Z", 2))
        .await;
    assert!(matches!(result, Err(ProductError::DuplicateName(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_overwrites_and_checks_uniqueness() {
    let (_db, repo) = setup().await;

    let mut milk = repo
        .create(draft("milk".into(), 1.0, "2030-01-01T00:00:00Z", 1))
        .await
        .unwrap();
    let mut eggs = repo
        .create(draft("eggs".into(), 2.0, "2030-01-01T00:00:00Z", 1))
        .await
        .unwrap();

    milk.price = 0.0;
    milk.category_id = 4;
    let saved = repo.save(milk.clone()).await.unwrap();
    assert_eq!(saved, milk);

    eggs.name = "milk".into();
    let result = repo.save(eggs).await;
    assert!(matches!(result, Err(ProductError::DuplicateName(_))));

    let mut ghost = milk.clone();
    ghost.id = 9_999;
    ghost.name = "ghost".into();
    let result = repo.save(ghost).await;
    assert!(matches!(result, Err(ProductError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_filters_and_orders_in_sql() {
    let (_db, repo) = setup().await;
    repo.create(draft("bread".into(), 2.5, "2030-01-03T00:00:00Z", 1))
        .await
        .unwrap();
    repo.create(draft("cheese".into(), 9.0, "2030-01-01T00:00:00Z", 2))
        .await
        .unwrap();
    repo.create(draft("milk".into(), 1.0, "2030-01-02T00:00:00Z", 1))
        .await
        .unwrap();

    let params: QueryParams = [("sort", "price"), ("order", "desc")].into_iter().collect();
    let names: Vec<String> = repo
        .list(&ProductQuery::from_params(&params))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["cheese", "bread", "milk"]);

    let params: QueryParams = [("categoryId", "1"), ("sort", "expiry")].into_iter().collect();
    let names: Vec<String> = repo
        .list(&ProductQuery::from_params(&params))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["milk", "bread"]);

    let params: QueryParams = [("categoryId", "abc")].into_iter().collect();
    let products = repo.list(&ProductQuery::from_params(&params)).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_product() {
    let (_db, repo) = setup().await;
    let created = repo
        .create(draft("milk".into(), 1.0, "2030-01-01T00:00:00Z", 1))
        .await
        .unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_update_flow() {
    let (_db, repo) = setup().await;
    let service = ProductService::new(repo);

    let created = service
        .create_product(draft("milk".into(), 1.0, "2030-01-01T00:00:00Z", 1))
        .await
        .unwrap();

    let updated = service
        .update_product(
            created.id,
            UpdateProduct {
                name: Some("oat milk".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "oat milk");
    assert_eq!(updated.price, 1.0);

    let result = service.update_product(created.id + 100, UpdateProduct::default()).await;
    assert!(matches!(result, Err(ProductError::NotFound(_))));
}

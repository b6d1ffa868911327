//! Tests for database initialization and the SQLite user store

use userbatch_common::db::{init_database, SqliteUserStore};
use userbatch_common::{NewUser, UserStore};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("userbatch.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_reopen_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("userbatch.db");

    let pool = init_database(&db_path).await.unwrap();
    let store = SqliteUserStore::new(pool.clone());
    store
        .insert(&[NewUser::new("Alice", 30, "2022-01-01")])
        .await
        .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let users = SqliteUserStore::new(pool).select().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Alice");
}

#[tokio::test]
async fn test_store_round_trip_through_trait_object() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("userbatch.db")).await.unwrap();
    let store: Box<dyn UserStore> = Box::new(SqliteUserStore::new(pool));

    let inserted = store
        .insert(&[
            NewUser::new("Alice", 30, "2022-01-01"),
            NewUser::new("Bob", 41, "1983-04-02"),
        ])
        .await
        .unwrap();
    assert_eq!(inserted, 2);

    let ids: Vec<i64> = store.select().await.unwrap().iter().map(|u| u.id).collect();
    assert_eq!(store.delete(&ids).await.unwrap(), 2);
    assert!(store.select().await.unwrap().is_empty());
}

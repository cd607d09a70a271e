//! Store tests against a live Postgres.
//!
//! Each test creates its own database on the server named by `DB_URL`.
//! Run with `DB_URL=postgres://... cargo test -- --ignored`.

use std::str::FromStr;

use chirpy::error::{AppError, DatabaseError};
use chirpy::models::SortOrder;
use chirpy::store::{ChirpyStore, PostgresStore};
use chrono::{Duration, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, Executor, PgConnection};
use uuid::Uuid;

/// Creates a fresh, uniquely named database on the `DB_URL` server and migrates it
async fn connect() -> PostgresStore {
    let url = std::env::var("DB_URL").expect("DB_URL must be set for Postgres tests");
    let server = PgConnectOptions::from_str(&url).expect("DB_URL is not a Postgres URL");
    let database_name = Uuid::new_v4().to_string();

    let mut connection = PgConnection::connect_with(&server.clone().database("postgres"))
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, database_name))
        .await
        .expect("Failed to create database.");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(server.database(&database_name))
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate the database");

    PostgresStore::new(pool)
}

#[tokio::test]
#[ignore]
async fn each_run_gets_an_empty_database() {
    let store = connect().await;

    assert!(store
        .list_chirps(None, SortOrder::Asc)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(store.delete_all_users().await.unwrap(), 0);
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

#[tokio::test]
#[ignore]
async fn users_are_unique_by_email() {
    let store = connect().await;
    let email = unique_email();

    let user = store.create_user(&email, "hash").await.unwrap();
    assert!(!user.is_chirpy_red);

    let duplicate = store.create_user(&email, "other").await;
    assert!(matches!(
        duplicate,
        Err(AppError::Database(DatabaseError::UniqueConstraintViolation(_)))
    ));

    let upgraded = store.upgrade_user(user.id).await.unwrap();
    assert!(upgraded.is_chirpy_red);
}

#[tokio::test]
#[ignore]
async fn chirps_follow_their_author() {
    let store = connect().await;
    let user = store.create_user(&unique_email(), "hash").await.unwrap();

    let first = store.create_chirp("first", user.id).await.unwrap();
    let second = store.create_chirp("second", user.id).await.unwrap();

    let desc = store
        .list_chirps(Some(user.id), SortOrder::Desc)
        .await
        .unwrap();
    let ids: Vec<Uuid> = desc.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let orphan = store.create_chirp("orphan", Uuid::new_v4()).await;
    assert!(matches!(
        orphan,
        Err(AppError::Database(DatabaseError::ForeignKeyViolation(_)))
    ));

    store.delete_chirp(first.id).await.unwrap();
    assert!(store.get_chirp(first.id).await.unwrap().is_none());
    assert!(matches!(
        store.delete_chirp(first.id).await,
        Err(AppError::Database(DatabaseError::NotFound(_)))
    ));
}

#[tokio::test]
#[ignore]
async fn refresh_tokens_keep_their_first_revocation() {
    let store = connect().await;
    let user = store.create_user(&unique_email(), "hash").await.unwrap();
    let token = hex::encode(Uuid::new_v4().as_bytes()).repeat(2);

    store
        .create_refresh_token(&token, user.id, Utc::now() + Duration::days(60))
        .await
        .unwrap();

    store.revoke_refresh_token(&token).await.unwrap();
    let first = store.get_refresh_token(&token).await.unwrap().unwrap();
    assert!(first.is_revoked());

    store.revoke_refresh_token(&token).await.unwrap();
    let second = store.get_refresh_token(&token).await.unwrap().unwrap();
    assert_eq!(first.revoked_at, second.revoked_at);

    assert!(matches!(
        store.revoke_refresh_token("missing").await,
        Err(AppError::Database(DatabaseError::NotFound(_)))
    ));
}

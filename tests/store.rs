//! Live tests for `PostgresStore` using `#[sqlx::test]`.
//!
//! Each test gets a fresh, migrated database from the sqlx harness. They
//! need `DATABASE_URL` to point at a PostgreSQL server, so they are ignored
//! by default: run them with `cargo test -- --ignored`.

#![allow(clippy::panic, clippy::indexing_slicing)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use threadgems::domain::{ThreadRecord, ThreadType, TokenRecord};
use threadgems::persistence::PostgresStore;
use threadgems::threads::UserProfile;

fn record(id: &str, likes: u32) -> ThreadRecord {
    ThreadRecord {
        id: id.to_string(),
        author: "Figma".to_string(),
        handle: "figma".to_string(),
        avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=figma".to_string(),
        content: "Auto layout tips".to_string(),
        image: None,
        likes,
        replies: 150,
        thread_type: ThreadType::Text,
        timestamp: "2024-04-01T12:00:00+0000".to_string(),
        permalink: format!("https://threads.net/@figma/post/{id}"),
        topic_tag: None,
        fetched_at: Utc::now(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn user_token_is_overwritten_on_relogin(pool: PgPool) {
    let store = PostgresStore::new(pool.clone());
    let profile = UserProfile {
        id: Some("42".to_string()),
        username: Some("designer".to_string()),
        ..UserProfile::default()
    };

    let first = TokenRecord::new("42".to_string(), "tok-1".to_string(), profile.clone());
    let Ok(()) = store.upsert_user(&first).await else {
        panic!("first upsert");
    };
    let second = TokenRecord::new("42".to_string(), "tok-2".to_string(), profile);
    let Ok(()) = store.upsert_user(&second).await else {
        panic!("second upsert");
    };

    let Ok(Some(user)) = store.get_user("42").await else {
        panic!("user should exist");
    };
    assert_eq!(user.profile["username"], "designer");

    let Ok(token) = sqlx::query_scalar::<_, String>("SELECT access_token FROM users WHERE user_id = '42'")
        .fetch_one(&pool)
        .await
    else {
        panic!("token query");
    };
    assert_eq!(token, "tok-2");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn thread_upsert_merges_documents(pool: PgPool) {
    let store = PostgresStore::new(pool.clone());
    let expires_at = Utc::now() + Duration::hours(6);

    let Ok(written) = store
        .upsert_threads(&[record("a", 6_000), record("b", 7_000)], expires_at)
        .await
    else {
        panic!("first batch");
    };
    assert_eq!(written, 2);

    // A key the pipeline never writes survives the merge.
    let Ok(_) = sqlx::query("UPDATE curated_threads SET doc = doc || '{\"pinned\": true}' WHERE id = 'a'")
        .execute(&pool)
        .await
    else {
        panic!("manual update");
    };

    let Ok(_) = store.upsert_threads(&[record("a", 9_000)], expires_at).await else {
        panic!("second batch");
    };

    let Ok(Some(row)) = store.get_thread("a").await else {
        panic!("thread should exist");
    };
    assert_eq!(row.doc["likes"], 9_000);
    assert_eq!(row.doc["pinned"], true);
    assert!(row.expires_at > row.cached_at);

    let Ok(None) = store.get_thread("missing").await else {
        panic!("unknown id should be absent");
    };
}

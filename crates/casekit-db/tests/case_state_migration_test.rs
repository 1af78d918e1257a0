//! Tests for the add-case-state migration.
//!
//! Verifies that `cases.state_id` exists with its default, that rows land on
//! the default state, and that the foreign key to `case_state` is enforced.

use casekit_db::test_fixtures::TestDatabase;

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_cases_get_default_state() {
    let test_db = TestDatabase::new().await;

    let case_id = test_db.insert_case("Phishing wave").await;
    let state_id: Option<i32> = sqlx::query_scalar("SELECT state_id FROM cases WHERE case_id = $1")
        .bind(case_id)
        .fetch_one(&test_db.pool)
        .await
        .unwrap();

    assert_eq!(state_id, Some(1));
    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_state_id_is_nullable_with_foreign_key() {
    let test_db = TestDatabase::new().await;

    let (nullable, default): (String, Option<String>) = sqlx::query_as(
        r#"
        SELECT is_nullable, column_default
        FROM information_schema.columns
        WHERE table_schema = current_schema()
          AND table_name = 'cases'
          AND column_name = 'state_id'
        "#,
    )
    .fetch_one(&test_db.pool)
    .await
    .unwrap();
    assert_eq!(nullable, "YES");
    assert_eq!(default.as_deref(), Some("1"));

    let case_id = test_db.insert_case("Ransomware").await;
    let res = sqlx::query("UPDATE cases SET state_id = 4242 WHERE case_id = $1")
        .bind(case_id)
        .execute(&test_db.pool)
        .await;
    assert!(res.is_err(), "unknown state must violate the foreign key");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires DATABASE_URL
async fn test_migrations_are_idempotent() {
    let test_db = TestDatabase::new().await;

    test_db.db.migrate().await.expect("re-running migrations is a no-op");

    let fk_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM information_schema.table_constraints
        WHERE table_schema = current_schema()
          AND table_name = 'cases'
          AND constraint_type = 'FOREIGN KEY'
        "#,
    )
    .fetch_one(&test_db.pool)
    .await
    .unwrap();
    assert_eq!(fk_count, 1);

    test_db.cleanup().await;
}

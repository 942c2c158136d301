//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    fieldops_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("tenant"), "missing tenant table");
    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("role"), "missing role table");
    assert!(info_str.contains("permission"), "missing permission table");
    assert!(
        info_str.contains("tenant_quota"),
        "missing tenant_quota table"
    );
    assert!(info_str.contains("session"), "missing session table");
    assert!(info_str.contains("worker"), "missing worker table");
    assert!(info_str.contains("job"), "missing job table");
    assert!(
        info_str.contains("job_assignment"),
        "missing job_assignment table"
    );
    assert!(info_str.contains("asset"), "missing asset table");
    assert!(info_str.contains("signature"), "missing signature table");
    assert!(info_str.contains("audit_log"), "missing audit_log table");

    // Verify edge tables.
    assert!(info_str.contains("has_role"), "missing has_role edge");
    assert!(info_str.contains("grants"), "missing grants edge");

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    fieldops_db::run_migrations(&db).await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn can_create_record_after_migration() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    fieldops_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE tenant SET \
         name = 'ACME Field Services', \
         slug = 'acme', \
         status = 'Active', \
         metadata = {}",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let mut result = db
        .query("SELECT * FROM tenant WHERE slug = 'acme'")
        .await
        .unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn unique_index_prevents_duplicate_slugs() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    fieldops_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE tenant SET \
         name = 'ACME Field Services', \
         slug = 'acme', \
         status = 'Active', \
         metadata = {}",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    // Attempt duplicate slug — should fail.
    let result = db
        .query(
            "CREATE tenant SET \
             name = 'Another Corp', \
             slug = 'acme', \
             status = 'Active', \
             metadata = {}",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate slug should be rejected");
}

#[tokio::test]
async fn status_assert_rejects_unknown_values() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    fieldops_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE tenant SET \
             name = 'Bogus', \
             slug = 'bogus', \
             status = 'Frozen', \
             metadata = {}",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown tenant status should be rejected");
}

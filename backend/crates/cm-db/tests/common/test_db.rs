use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    cm_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Inserts a raw identity map row, bypassing the repository
pub async fn insert_raw_id_map(pool: &SqlitePool, source_server: &str, map_json: &str) {
    // Use sqlx::query (not query!) to avoid offline mode issues in tests
    sqlx::query("INSERT INTO cm_id_maps (source_server, map_json, updated_at) VALUES (?, ?, 0)")
        .bind(source_server)
        .bind(map_json)
        .execute(pool)
        .await
        .expect("Failed to insert raw id map");
}

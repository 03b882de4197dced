use ojou::{DbPool, config::DatabaseConfig, database};

/// Test database wrapper
///
/// Every instance owns a private in-memory SQLite database with the
/// migrations applied, so tests never share rows and can run in parallel.
pub struct TestDb {
    pub pool: DbPool,
}

impl TestDb {
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string().into(),
            max_connections: 1,
        };
        let pool = database::connect(&config)
            .await
            .expect("Failed to open in-memory database");

        Self { pool }
    }

    pub async fn get_connection(&self) -> sqlx::pool::PoolConnection<sqlx::Sqlite> {
        self.pool
            .acquire()
            .await
            .expect("Failed to get database connection")
    }

    /// Number of ojou rows currently stored
    pub async fn count_ojous(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM ojous")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count ojous")
    }
}

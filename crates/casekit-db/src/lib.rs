//! # casekit-db
//!
//! PostgreSQL storage layer for casekit.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for administered default schemas and for
//!   the custom attributes of case objects
//! - Embedded schema migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use casekit_db::{Database, ObjectType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/casekit").await?;
//!     db.migrate().await?;
//!
//!     let report = db.reconciler().reconcile_all(ObjectType::Ioc).await?;
//!     println!("updated {} of {} IOCs", report.updated, report.scanned);
//!     Ok(())
//! }
//! ```
pub mod custom_attributes;
pub mod objects;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use std::sync::Arc;

// Re-export core types
pub use casekit_core::*;

pub use custom_attributes::PgCustomAttributeRepository;
pub use objects::PgAttributedObjectRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Administered default schemas.
    pub custom_attributes: PgCustomAttributeRepository,
    /// Custom attributes of case objects.
    pub objects: PgAttributedObjectRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            custom_attributes: PgCustomAttributeRepository::new(pool.clone()),
            objects: PgAttributedObjectRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Attribute reconciler backed by this database.
    pub fn reconciler(&self) -> AttributeReconciler {
        AttributeReconciler::new(
            Arc::new(self.custom_attributes.clone()),
            Arc::new(self.objects.clone()),
        )
    }
}

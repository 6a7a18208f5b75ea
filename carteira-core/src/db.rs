use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::CoreConfig;
use crate::errors::Result;

/// Wrapper around a Postgres connection pool used by the services.
#[derive(Clone)]
pub struct DatabasePool {
    pool: Pool<Postgres>,
}

impl DatabasePool {
    /// Establishes a new connection pool based on the core configuration.
    pub async fn connect(config: &CoreConfig) -> Result<Self> {
        Self::connect_with_url(config.database_url()).await
    }

    /// Establishes a connection pool directly from a database URL.
    pub async fn connect_with_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn inner(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

/// Trait implemented by stores that own schema migrations. The timeline
/// store implements it and is driven through [`run_migrations`] when it
/// is built from a pool.
#[async_trait]
pub trait DatabaseMigrator {
    async fn run_migrations(&self, pool: &DatabasePool) -> Result<()>;
}

/// Run migrations by delegating to the provided migrators, in order.
pub async fn run_migrations(
    pool: &DatabasePool,
    migrators: &[Box<dyn DatabaseMigrator + Send + Sync>],
) -> Result<()> {
    for migrator in migrators {
        migrator.run_migrations(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct CountingMigrator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DatabaseMigrator for CountingMigrator {
        async fn run_migrations(&self, _pool: &DatabasePool) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingMigrator;

    #[async_trait]
    impl DatabaseMigrator for FailingMigrator {
        async fn run_migrations(&self, _pool: &DatabasePool) -> Result<()> {
            Err(crate::errors::CarteiraError::StoreError(
                "migração falhou".to_string(),
            ))
        }
    }

    fn lazy_pool() -> DatabasePool {
        DatabasePool {
            pool: PgPoolOptions::new()
                .connect_lazy("postgres://localhost/postgres")
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn delegates_to_every_migrator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let migrators: Vec<Box<dyn DatabaseMigrator + Send + Sync>> = vec![
            Box::new(CountingMigrator {
                calls: calls.clone(),
            }),
            Box::new(CountingMigrator {
                calls: calls.clone(),
            }),
        ];

        run_migrations(&lazy_pool(), &migrators)
            .await
            .expect("should run migrations");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stops_at_the_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let migrators: Vec<Box<dyn DatabaseMigrator + Send + Sync>> = vec![
            Box::new(FailingMigrator),
            Box::new(CountingMigrator {
                calls: calls.clone(),
            }),
        ];

        run_migrations(&lazy_pool(), &migrators)
            .await
            .expect_err("failure must propagate");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

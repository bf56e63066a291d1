//! Transaction Manager
//!
//! Provides transactional boundaries for database operations. All business
//! writes go through [`TxManager::read_committed`], which pairs them with
//! their audit entries so both commit or roll back together.

use std::future::Future;
use std::pin::Pin;

use sqlx::{PgConnection, PgPool};

use crate::shared::error::AppError;

/// A unit of work executed against a transaction-scoped connection.
pub type TxUnit<'c, T> =
    Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'c>>;

/// Manages READ COMMITTED transactions over a PostgreSQL pool.
///
/// Nested composition does not start a second transaction: callers already
/// holding a transaction connection pass it to [`TxManager::read_committed_in`]
/// and the unit of work joins the outer transaction, whose owner keeps the
/// commit/rollback decision.
#[derive(Clone)]
pub struct TxManager {
    pool: PgPool,
}

impl TxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a READ COMMITTED transaction, run `f`, commit on success and
    /// roll back on error. A failure never leaves a partial write visible.
    pub async fn read_committed<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> TxUnit<'c, T> + Send,
        T: Send,
    {
        self.read_committed_in(None, f).await
    }

    /// Like [`TxManager::read_committed`], but reuses `existing` when a
    /// transaction is already open instead of beginning a new one.
    pub async fn read_committed_in<T, F>(
        &self,
        existing: Option<&mut PgConnection>,
        f: F,
    ) -> Result<T, AppError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> TxUnit<'c, T> + Send,
        T: Send,
    {
        if let Some(conn) = existing {
            // Joined the outer transaction; its owner commits or rolls back.
            return f(conn).await;
        }

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        match f(&mut *tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::Database)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}

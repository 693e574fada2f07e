//! Scoped transaction helper.

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::domain::{AppError, DatabaseClient, UnitOfWork};

/// Runs `work` inside a freshly opened transaction.
///
/// Commits when `work` returns `Ok`. Rolls back when it returns `Err` and
/// hands that same error back to the caller; a failed rollback is only
/// logged. If `work` panics or the returned future is dropped, the
/// transaction is dropped unresolved, which rolls it back.
///
/// ```ignore
/// let user = in_transaction(db, move |tx| {
///     Box::pin(async move { tx.save(user).await })
/// })
/// .await?;
/// ```
pub async fn in_transaction<T, F>(db: &dyn DatabaseClient, work: F) -> Result<T, AppError>
where
    F: for<'t> FnOnce(&'t mut dyn UnitOfWork) -> BoxFuture<'t, Result<T, AppError>> + Send,
    T: Send,
{
    let mut tx = db.begin().await?;
    let outcome = work(tx.as_mut()).await;

    match outcome {
        Ok(value) => {
            tx.commit().await?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            } else {
                debug!("Transaction rolled back");
            }
            Err(err)
        }
    }
}

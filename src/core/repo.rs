use crate::error::ShelfError;
use std::future::Future;

pub mod document;

/// Bound for repositories that support atomic operations.
pub trait Atomic {
    /// Transaction type.
    type Tx: Send;

    /// Start a database transaction.
    fn start_tx(&self) -> impl Future<Output = Result<Self::Tx, ShelfError>> + Send;

    /// Commit a database transaction.
    fn commit_tx(&self, tx: Self::Tx) -> impl Future<Output = Result<(), ShelfError>> + Send;

    /// Abort a database transaction.
    fn abort_tx(&self, tx: Self::Tx) -> impl Future<Output = Result<(), ShelfError>> + Send;
}

/// Uses `$repo` to start a transaction, binding a mutable reference to it as `$tx`
/// for the provided future `$op`. The provided `$op` must return a result.
/// Aborts the transaction on error and commits on success.
///
/// ```ignore
/// transaction!(self.repo, |tx| async move {
///     self.repo.remove_by_id_tx(id, tx).await
/// })
/// ```
#[macro_export]
macro_rules! transaction {
    ($repo:expr, |$tx:ident| $op:expr) => {{
        let mut $tx = $repo.start_tx().await?;
        let result = {
            let $tx = &mut $tx;
            $op
        }
        .await;
        match result {
            Ok(out) => {
                $repo.commit_tx($tx).await?;
                Result::<_, $crate::error::ShelfError>::Ok(out)
            }
            Err(err) => {
                $repo.abort_tx($tx).await?;
                return Err(err);
            }
        }
    }};
}

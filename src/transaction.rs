use std::fmt;

use tracing::debug;

use crate::config::RdsDataOptions;
use crate::error::RdsDataError;
use crate::transport::DataApiTransport;
use crate::wire::{BeginTransactionRequest, EndTransactionRequest};

/// Status the endpoint reports after a successful commit.
pub const TRANSACTION_COMMITTED: &str = "Transaction Committed";
/// Status the endpoint reports after a successful rollback.
pub const ROLLBACK_COMPLETE: &str = "Rollback Complete";

/// Opaque handle for an open remote transaction.
///
/// Pass it to statement executions to run them inside the transaction. Once
/// committed or rolled back the endpoint rejects further use; no local state
/// tracks that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Begin a transaction against the configured database.
///
/// # Errors
///
/// Propagates the transport's error unchanged; returns `RdsDataError::DecodeError`
/// if the endpoint answered without a transaction id.
pub async fn begin_transaction(
    transport: &dyn DataApiTransport,
    options: &RdsDataOptions,
) -> Result<TransactionId, RdsDataError> {
    let response = transport
        .begin_transaction(BeginTransactionRequest {
            resource_arn: options.resource_arn.clone(),
            secret_arn: options.secret_arn.clone(),
            database: options.database.clone(),
            schema: options.schema.clone(),
        })
        .await?;

    let id = response
        .transaction_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            RdsDataError::DecodeError("begin transaction returned no transaction id".to_string())
        })?;
    debug!(transaction_id = %id, "transaction started");
    Ok(TransactionId(id))
}

/// Commit `transaction`, returning the endpoint's status string.
///
/// # Errors
///
/// Propagates the transport's error unchanged. No rollback is attempted on failure.
pub async fn commit_transaction(
    transport: &dyn DataApiTransport,
    options: &RdsDataOptions,
    transaction: &TransactionId,
) -> Result<String, RdsDataError> {
    let response = transport
        .commit_transaction(end_request(options, transaction))
        .await?;
    let status = response.transaction_status.unwrap_or_default();
    debug!(transaction_id = %transaction, %status, "transaction committed");
    Ok(status)
}

/// Roll back `transaction`, returning the endpoint's status string.
///
/// # Errors
///
/// Propagates the transport's error unchanged.
pub async fn rollback_transaction(
    transport: &dyn DataApiTransport,
    options: &RdsDataOptions,
    transaction: &TransactionId,
) -> Result<String, RdsDataError> {
    let response = transport
        .rollback_transaction(end_request(options, transaction))
        .await?;
    let status = response.transaction_status.unwrap_or_default();
    debug!(transaction_id = %transaction, %status, "transaction rolled back");
    Ok(status)
}

fn end_request(options: &RdsDataOptions, transaction: &TransactionId) -> EndTransactionRequest {
    EndTransactionRequest {
        resource_arn: options.resource_arn.clone(),
        secret_arn: options.secret_arn.clone(),
        transaction_id: transaction.0.clone(),
    }
}

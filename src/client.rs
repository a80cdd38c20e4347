use std::sync::Arc;

use crate::config::RdsDataOptions;
use crate::error::RdsDataError;
use crate::executor::{QueryBuilder, execute_statement};
use crate::results::ResultSet;
use crate::transaction::{
    TransactionId, begin_transaction, commit_transaction, rollback_transaction,
};
use crate::transport::DataApiTransport;
use crate::types::Params;

/// Handle to one Data API target.
///
/// Construct it once and pass it (or clones of it) wherever statements are run.
/// Clones share the same options and transport; nothing in the client is mutated
/// per call, so it can be used from concurrent tasks.
#[derive(Clone)]
pub struct RdsDataClient {
    options: Arc<RdsDataOptions>,
    transport: Arc<dyn DataApiTransport>,
}

impl std::fmt::Debug for RdsDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdsDataClient")
            .field("options", &self.options)
            .field("transport", &"<dyn DataApiTransport>")
            .finish()
    }
}

impl RdsDataClient {
    /// Create a client over an existing transport.
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` if the options are incomplete.
    pub fn new(
        options: RdsDataOptions,
        transport: Arc<dyn DataApiTransport>,
    ) -> Result<Self, RdsDataError> {
        options.validate()?;
        Ok(Self {
            options: Arc::new(options),
            transport,
        })
    }

    /// Create a client that talks unsigned JSON over HTTP to `options.endpoint`
    /// (an emulator or a signing proxy; see [`HttpTransport`](crate::transport::HttpTransport)).
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` if the options are incomplete or name no endpoint.
    #[cfg(feature = "http")]
    pub fn connect(options: RdsDataOptions) -> Result<Self, RdsDataError> {
        let transport = crate::transport::HttpTransport::from_options(&options)?;
        Self::new(options, Arc::new(transport))
    }

    /// Create an HTTP client from the `RDS_DATA_API_CLIENT_*` environment variables.
    ///
    /// `RDS_DATA_API_CLIENT_ENDPOINT` must be set alongside the target identifiers.
    ///
    /// # Errors
    /// Returns `RdsDataError::ConfigError` if required variables are missing.
    #[cfg(feature = "http")]
    pub fn from_env() -> Result<Self, RdsDataError> {
        Self::connect(RdsDataOptions::from_env()?)
    }

    #[must_use]
    pub fn options(&self) -> &RdsDataOptions {
        &self.options
    }

    /// Execute a statement, optionally with parameters and inside a transaction.
    ///
    /// # Errors
    /// Fails on unencodable parameters, remote errors, or undecodable responses.
    pub async fn execute(
        &self,
        sql: &str,
        params: Option<&Params>,
        transaction: Option<&TransactionId>,
    ) -> Result<ResultSet, RdsDataError> {
        execute_statement(
            self.transport.as_ref(),
            &self.options,
            sql,
            params,
            transaction,
        )
        .await
    }

    /// Start a fluent statement execution.
    pub fn query<'c, 'q>(&'c self, sql: &'q str) -> QueryBuilder<'c, 'q> {
        QueryBuilder::new(self, sql)
    }

    /// Begin a transaction and return its handle.
    ///
    /// # Errors
    /// Propagates the endpoint's failure; no handle is produced.
    pub async fn transaction(&self) -> Result<TransactionId, RdsDataError> {
        begin_transaction(self.transport.as_ref(), &self.options).await
    }

    /// Commit a transaction, returning the endpoint's status (`"Transaction Committed"`).
    ///
    /// # Errors
    /// Propagates the endpoint's failure.
    pub async fn commit(&self, transaction: &TransactionId) -> Result<String, RdsDataError> {
        commit_transaction(self.transport.as_ref(), &self.options, transaction).await
    }

    /// Roll back a transaction, returning the endpoint's status (`"Rollback Complete"`).
    ///
    /// # Errors
    /// Propagates the endpoint's failure.
    pub async fn rollback(&self, transaction: &TransactionId) -> Result<String, RdsDataError> {
        rollback_transaction(self.transport.as_ref(), &self.options, transaction).await
    }
}

//! The seam between the client and the remote Data API endpoint.
//!
//! The client never talks to the network directly; it hands fully formed wire
//! requests to a [`DataApiTransport`]. The `http` feature provides a JSON-over-HTTP
//! implementation, and tests plug in scripted transports.

use async_trait::async_trait;

use crate::error::RdsDataError;
use crate::wire::{
    BeginTransactionRequest, BeginTransactionResponse, EndTransactionRequest,
    EndTransactionResponse, ExecuteStatementRequest, ExecuteStatementResponse,
};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Remote statement and transaction primitives.
///
/// Implementations must be shareable across concurrent calls and hold no per-call
/// state. Failures are returned as-is; callers do not retry.
#[async_trait]
pub trait DataApiTransport: Send + Sync {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, RdsDataError>;

    async fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, RdsDataError>;

    async fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError>;

    async fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError>;
}

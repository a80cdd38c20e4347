//! In-memory transport for exercising the client without an endpoint.
//!
//! Available with the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::RdsDataError;
use crate::transaction::{ROLLBACK_COMPLETE, TRANSACTION_COMMITTED};
use crate::transport::DataApiTransport;
use crate::wire::{
    BeginTransactionRequest, BeginTransactionResponse, ColumnMetadata, EndTransactionRequest,
    EndTransactionResponse, ExecuteStatementRequest, ExecuteStatementResponse, Field,
};

/// A call the mock transport received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Execute(ExecuteStatementRequest),
    Begin(BeginTransactionRequest),
    Commit(EndTransactionRequest),
    Rollback(EndTransactionRequest),
}

enum Reply {
    Response(ExecuteStatementResponse),
    Failure { status: u16, message: String },
}

/// Scripted transport: execute calls pop queued replies (an empty response once the
/// queue is drained), transaction calls succeed with the endpoint's usual statuses
/// unless a failure is queued for them.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    transaction_failures: Mutex<VecDeque<(u16, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
    next_transaction: AtomicUsize,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next execute call.
    pub fn push_response(&self, response: ExecuteStatementResponse) {
        lock(&self.replies).push_back(Reply::Response(response));
    }

    /// Queue a remote failure for the next execute call.
    pub fn push_failure(&self, status: u16, message: impl Into<String>) {
        lock(&self.replies).push_back(Reply::Failure {
            status,
            message: message.into(),
        });
    }

    /// Queue a remote failure for the next begin/commit/rollback call.
    pub fn push_transaction_failure(&self, status: u16, message: impl Into<String>) {
        lock(&self.transaction_failures).push_back((status, message.into()));
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Only the execute requests received so far.
    #[must_use]
    pub fn executed(&self) -> Vec<ExecuteStatementRequest> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Execute(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }

    fn transaction_failure(&self) -> Result<(), RdsDataError> {
        match lock(&self.transaction_failures).pop_front() {
            Some((status, message)) => Err(RdsDataError::remote(status, message)),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl DataApiTransport for MockTransport {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, RdsDataError> {
        self.record(RecordedCall::Execute(request));
        match lock(&self.replies).pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Failure { status, message }) => Err(RdsDataError::remote(status, message)),
            None => Ok(ExecuteStatementResponse::default()),
        }
    }

    async fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, RdsDataError> {
        self.record(RecordedCall::Begin(request));
        self.transaction_failure()?;
        let n = self.next_transaction.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BeginTransactionResponse {
            transaction_id: Some(format!("mock-tx-{n}")),
        })
    }

    async fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError> {
        self.record(RecordedCall::Commit(request));
        self.transaction_failure()?;
        Ok(EndTransactionResponse {
            transaction_status: Some(TRANSACTION_COMMITTED.to_string()),
        })
    }

    async fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError> {
        self.record(RecordedCall::Rollback(request));
        self.transaction_failure()?;
        Ok(EndTransactionResponse {
            transaction_status: Some(ROLLBACK_COMPLETE.to_string()),
        })
    }
}

/// Build a row-returning response from `(label, type name)` pairs and records.
#[must_use]
pub fn rows_response(columns: &[(&str, &str)], records: Vec<Vec<Field>>) -> ExecuteStatementResponse {
    ExecuteStatementResponse {
        column_metadata: Some(
            columns
                .iter()
                .map(|(label, type_name)| ColumnMetadata {
                    name: Some((*label).to_owned()),
                    label: Some((*label).to_owned()),
                    table_name: Some(String::new()),
                    type_name: Some((*type_name).to_owned()),
                    ..ColumnMetadata::default()
                })
                .collect(),
        ),
        records: Some(records),
        number_of_records_updated: Some(0),
        generated_fields: None,
    }
}

/// Build a DML response with an affected-row count and optional generated key.
#[must_use]
pub fn dml_response(updated: i64, generated_id: Option<i64>) -> ExecuteStatementResponse {
    ExecuteStatementResponse {
        number_of_records_updated: Some(updated),
        generated_fields: generated_id.map(|id| vec![Field::LongValue(id)]),
        ..ExecuteStatementResponse::default()
    }
}

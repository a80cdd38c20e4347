//! Commit/rollback scenario against a small stateful endpoint double that
//! understands exactly the statements used here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rds_data_middleware::prelude::*;
use rds_data_middleware::wire::{
    BeginTransactionRequest, BeginTransactionResponse, ColumnMetadata, EndTransactionRequest,
    EndTransactionResponse, ExecuteStatementRequest, ExecuteStatementResponse, Field,
};

const INSERT: &str = "INSERT INTO items (data) VALUES (:data)";
const COUNT: &str = "SELECT COUNT(*) AS cn FROM items";

#[derive(Default)]
struct State {
    committed: Vec<String>,
    pending: HashMap<String, Vec<String>>,
    next_id: i64,
    next_tx: usize,
}

#[derive(Default)]
struct ItemsEndpoint {
    state: Mutex<State>,
}

fn remote(message: &str) -> RdsDataError {
    RdsDataError::remote(400, message)
}

#[async_trait]
impl DataApiTransport for ItemsEndpoint {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, RdsDataError> {
        let mut state = self.state.lock().unwrap();
        match request.sql.as_str() {
            INSERT => {
                let data = request
                    .parameters
                    .iter()
                    .find(|p| p.name == "data")
                    .and_then(|p| p.value.as_str())
                    .ok_or_else(|| remote("data parameter missing"))?
                    .to_owned();
                match &request.transaction_id {
                    Some(tx) => state
                        .pending
                        .get_mut(tx)
                        .ok_or_else(|| remote("Transaction not found"))?
                        .push(data),
                    None => state.committed.push(data),
                }
                state.next_id += 1;
                Ok(ExecuteStatementResponse {
                    number_of_records_updated: Some(1),
                    generated_fields: Some(vec![Field::LongValue(state.next_id)]),
                    ..ExecuteStatementResponse::default()
                })
            }
            COUNT => {
                let count = i64::try_from(state.committed.len()).unwrap();
                Ok(ExecuteStatementResponse {
                    column_metadata: Some(vec![ColumnMetadata {
                        label: Some("cn".to_owned()),
                        type_name: Some("BIGINT".to_owned()),
                        ..ColumnMetadata::default()
                    }]),
                    records: Some(vec![vec![Field::LongValue(count)]]),
                    number_of_records_updated: Some(0),
                    generated_fields: Some(vec![]),
                })
            }
            other => Err(remote(&format!("unexpected statement: {other}"))),
        }
    }

    async fn begin_transaction(
        &self,
        _request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, RdsDataError> {
        let mut state = self.state.lock().unwrap();
        state.next_tx += 1;
        let id = format!("tx-{}", state.next_tx);
        state.pending.insert(id.clone(), Vec::new());
        Ok(BeginTransactionResponse {
            transaction_id: Some(id),
        })
    }

    async fn commit_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError> {
        let mut state = self.state.lock().unwrap();
        let rows = state
            .pending
            .remove(&request.transaction_id)
            .ok_or_else(|| remote("Transaction not found"))?;
        state.committed.extend(rows);
        Ok(EndTransactionResponse {
            transaction_status: Some(TRANSACTION_COMMITTED.to_owned()),
        })
    }

    async fn rollback_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> Result<EndTransactionResponse, RdsDataError> {
        let mut state = self.state.lock().unwrap();
        state
            .pending
            .remove(&request.transaction_id)
            .ok_or_else(|| remote("Transaction not found"))?;
        Ok(EndTransactionResponse {
            transaction_status: Some(ROLLBACK_COMPLETE.to_owned()),
        })
    }
}

fn client() -> RdsDataClient {
    RdsDataClient::new(
        RdsDataOptions::new("arn:cluster", "arn:secret", "app"),
        Arc::new(ItemsEndpoint::default()),
    )
    .unwrap()
}

async fn count(client: &RdsDataClient) -> i64 {
    let rs = client.execute(COUNT, None, None).await.unwrap();
    assert_eq!(rs.insert_id, 0);
    rs.first().unwrap().get("cn").unwrap().number().unwrap()
}

async fn insert_three(client: &RdsDataClient, tx: &TransactionId) {
    for i in 0..3 {
        let rs = client
            .query(INSERT)
            .params(&params! { "data" => format!("row-{i}") })
            .transaction(tx)
            .execute()
            .await
            .unwrap();
        assert_eq!(rs.number_of_records_updated, 1);
        assert_ne!(rs.insert_id, 0);
    }
}

#[tokio::test]
async fn commit_makes_three_inserts_visible() {
    let client = client();
    client
        .execute(INSERT, Some(&params! { "data" => "seed" }), None)
        .await
        .unwrap();
    let start = count(&client).await;

    let tx = client.transaction().await.unwrap();
    assert!(!tx.as_str().is_empty());
    insert_three(&client, &tx).await;
    // not visible before commit
    assert_eq!(count(&client).await, start);

    let status = client.commit(&tx).await.unwrap();
    assert_eq!(status, "Transaction Committed");
    assert_eq!(count(&client).await, start + 3);
}

#[tokio::test]
async fn rollback_leaves_count_unchanged() {
    let client = client();
    let start = count(&client).await;

    let tx = client.transaction().await.unwrap();
    insert_three(&client, &tx).await;

    let status = client.rollback(&tx).await.unwrap();
    assert_eq!(status, "Rollback Complete");
    assert_eq!(count(&client).await, start);
}

#[tokio::test]
async fn finalized_handle_is_rejected_by_the_endpoint() {
    let client = client();
    let tx = client.transaction().await.unwrap();
    client.commit(&tx).await.unwrap();

    let err = client
        .query(INSERT)
        .params(&params! { "data" => "late" })
        .transaction(&tx)
        .execute()
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert!(client.rollback(&tx).await.is_err());
}

#[tokio::test]
async fn concurrent_transactions_are_independent() {
    let client = client();
    let start = count(&client).await;

    let (a, b) = tokio::join!(client.transaction(), client.transaction());
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a, b);

    let (c1, c2) = (client.clone(), client.clone());
    let (ta, tb) = (a.clone(), b.clone());
    let first = tokio::spawn(async move { insert_three(&c1, &ta).await });
    let second = tokio::spawn(async move { insert_three(&c2, &tb).await });
    first.await.unwrap();
    second.await.unwrap();

    client.commit(&a).await.unwrap();
    client.rollback(&b).await.unwrap();
    assert_eq!(count(&client).await, start + 3);
}

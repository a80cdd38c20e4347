use tracing::debug;

use crate::client::RdsDataClient;
use crate::config::RdsDataOptions;
use crate::decode::build_result_set;
use crate::error::RdsDataError;
use crate::params::WireParams;
use crate::results::ResultSet;
use crate::transaction::TransactionId;
use crate::transport::DataApiTransport;
use crate::types::Params;
use crate::wire::ExecuteStatementRequest;

const SQL_PREVIEW_CHARS: usize = 80;

/// Execute one statement: encode parameters, call the endpoint, decode the response.
///
/// The SQL text is sent verbatim. When `transaction` is given the statement runs
/// inside that transaction, otherwise it auto-commits.
///
/// # Errors
///
/// Returns `RdsDataError::ParameterError` before any network call if a parameter
/// cannot be encoded, the transport's error unchanged if the call fails, and a
/// decode error if the response declares an unsupported column type.
pub async fn execute_statement(
    transport: &dyn DataApiTransport,
    options: &RdsDataOptions,
    sql: &str,
    params: Option<&Params>,
    transaction: Option<&TransactionId>,
) -> Result<ResultSet, RdsDataError> {
    let parameters = WireParams::convert(params)?.into_vec();

    debug!(
        sql = %sql_preview(sql),
        sql_len = sql.len(),
        params = parameters.len(),
        transaction_id = transaction.map(TransactionId::as_str),
        "executing statement"
    );

    let request = ExecuteStatementRequest {
        resource_arn: options.resource_arn.clone(),
        secret_arn: options.secret_arn.clone(),
        database: options.database.clone(),
        schema: options.schema.clone(),
        sql: sql.to_owned(),
        parameters,
        transaction_id: transaction.map(|t| t.as_str().to_owned()),
        include_result_metadata: true,
    };

    let response = transport.execute_statement(request).await?;
    build_result_set(response)
}

fn sql_preview(sql: &str) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > SQL_PREVIEW_CHARS {
        let cut: String = flat.chars().take(SQL_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

/// Fluent builder for a single statement execution.
///
/// ```rust,no_run
/// use rds_data_middleware::prelude::*;
///
/// # async fn demo(client: RdsDataClient) -> Result<(), RdsDataError> {
/// let params = params! { "id" => 42 };
/// let rs = client
///     .query("SELECT name FROM users WHERE id = :id")
///     .params(&params)
///     .execute()
///     .await?;
/// let name = rs.first().and_then(|row| row.get("name")).and_then(|v| v.string());
/// # let _ = name;
/// # Ok(()) }
/// ```
pub struct QueryBuilder<'c, 'q> {
    client: &'c RdsDataClient,
    sql: &'q str,
    params: Option<&'q Params>,
    transaction: Option<&'q TransactionId>,
}

impl<'c, 'q> QueryBuilder<'c, 'q> {
    pub(crate) fn new(client: &'c RdsDataClient, sql: &'q str) -> Self {
        Self {
            client,
            sql,
            params: None,
            transaction: None,
        }
    }

    /// Provide named parameters for this statement.
    #[must_use]
    pub fn params(mut self, params: &'q Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Run the statement inside an open transaction.
    #[must_use]
    pub fn transaction(mut self, transaction: &'q TransactionId) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// Execute the statement and decode its result.
    ///
    /// # Errors
    /// See [`execute_statement`].
    pub async fn execute(self) -> Result<ResultSet, RdsDataError> {
        self.client
            .execute(self.sql, self.params, self.transaction)
            .await
    }
}

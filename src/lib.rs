//! Typed async client for the RDS Data API.
//!
//! Statements go out with named parameters encoded into the endpoint's tagged wire
//! values; responses come back as rows of lazily interpreted [`ColumnValue`]s.
//! Transactions are opaque handles threaded through later executions.
//!
//! The bundled HTTP transport sends unsigned requests to `RDS_DATA_API_CLIENT_ENDPOINT`
//! (a local emulator or a signing proxy). Other backends plug in through
//! [`DataApiTransport`].
//!
//! ```rust,no_run
//! use rds_data_middleware::prelude::*;
//!
//! # async fn demo() -> Result<(), RdsDataError> {
//! let client = RdsDataClient::from_env()?;
//!
//! let tx = client.transaction().await?;
//! let inserted = client
//!     .query("INSERT INTO users (name) VALUES (:name)")
//!     .params(&params! { "name" => "alice" })
//!     .transaction(&tx)
//!     .execute()
//!     .await?;
//! assert_eq!(client.commit(&tx).await?, TRANSACTION_COMMITTED);
//!
//! let rs = client
//!     .execute("SELECT name FROM users WHERE id = :id", Some(&params! { "id" => inserted.insert_id }), None)
//!     .await?;
//! println!("{:?}", rs.first().and_then(|row| row.get("name")).and_then(ColumnValue::string));
//! # Ok(()) }
//! ```

pub mod client;
pub mod column;
pub mod config;
pub mod decode;
pub mod error;
pub mod executor;
pub mod params;
pub mod prelude;
pub mod results;
pub mod transaction;
pub mod transport;
pub mod types;
pub mod wire;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use client::RdsDataClient;
pub use column::{ColumnValue, TypeCategory};
pub use config::{RdsDataOptions, RdsDataOptionsBuilder};
pub use error::RdsDataError;
pub use executor::QueryBuilder;
pub use results::{Column, ResultSet, Row};
pub use transaction::{ROLLBACK_COMPLETE, TRANSACTION_COMMITTED, TransactionId};
pub use transport::DataApiTransport;
pub use types::{ParamValue, Params};

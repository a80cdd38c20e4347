//! Convenient imports for common functionality.

pub use crate::client::RdsDataClient;
pub use crate::column::{ColumnValue, TypeCategory};
pub use crate::config::{RdsDataOptions, RdsDataOptionsBuilder};
pub use crate::error::RdsDataError;
pub use crate::executor::QueryBuilder;
pub use crate::params;
pub use crate::results::{Column, ResultSet, Row};
pub use crate::transaction::{ROLLBACK_COMPLETE, TRANSACTION_COMMITTED, TransactionId};
pub use crate::transport::DataApiTransport;
pub use crate::types::{ParamValue, Params};

#[cfg(feature = "http")]
pub use crate::transport::HttpTransport;

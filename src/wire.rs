//! JSON models of the Data API protocol.
//!
//! These mirror the endpoint's request and response shapes one-to-one so the
//! transport can ship them with `serde_json` and the encoder/decoder can work on
//! plain Rust values.

use serde::{Deserialize, Serialize};

/// One value on the wire: a single-key tagged union such as `{"longValue": 5}`.
///
/// `IsNull` carries a `true` marker rather than a null payload so that "present but
/// NULL" stays distinguishable from "absent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    IsNull(bool),
    BooleanValue(bool),
    LongValue(i64),
    DoubleValue(f64),
    StringValue(String),
    #[serde(with = "blob")]
    BlobValue(Vec<u8>),
    ArrayValue(serde_json::Value),
}

impl Field {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Field::IsNull(true))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Field::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Field::LongValue(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Field::DoubleValue(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::StringValue(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Field::BlobValue(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Name of the wire tag, used in diagnostics.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Field::IsNull(_) => "isNull",
            Field::BooleanValue(_) => "booleanValue",
            Field::LongValue(_) => "longValue",
            Field::DoubleValue(_) => "doubleValue",
            Field::StringValue(_) => "stringValue",
            Field::BlobValue(_) => "blobValue",
            Field::ArrayValue(_) => "arrayValue",
        }
    }
}

/// A named, bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlParameter {
    pub name: String,
    pub value: Field,
    /// How the endpoint should read a `stringValue` (`TIMESTAMP`, `DATE`, `DECIMAL`, `UUID`, `JSON`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// Column metadata as reported by the endpoint when `includeResultMetadata` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMetadata {
    pub name: Option<String>,
    pub label: Option<String>,
    pub table_name: Option<String>,
    pub type_name: Option<String>,
    #[serde(rename = "type")]
    pub type_code: Option<i32>,
    pub nullable: Option<i32>,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
    pub is_signed: Option<bool>,
    pub is_auto_increment: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatementRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub sql: String,
    pub parameters: Vec<SqlParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub include_result_metadata: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteStatementResponse {
    pub column_metadata: Option<Vec<ColumnMetadata>>,
    pub records: Option<Vec<Vec<Field>>>,
    pub number_of_records_updated: Option<i64>,
    pub generated_fields: Option<Vec<Field>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeginTransactionResponse {
    pub transaction_id: Option<String>,
}

/// Request body shared by commit and rollback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub transaction_id: String,
}

/// Response body shared by commit and rollback.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndTransactionResponse {
    pub transaction_status: Option<String>,
}

/// Blobs travel as base64 text inside the JSON body.
mod blob {
    use base64::prelude::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_uses_single_key_tags() {
        assert_eq!(
            serde_json::to_value(Field::LongValue(7)).unwrap(),
            json!({"longValue": 7})
        );
        assert_eq!(
            serde_json::to_value(Field::IsNull(true)).unwrap(),
            json!({"isNull": true})
        );
        assert_eq!(
            serde_json::to_value(Field::BlobValue(b"hi".to_vec())).unwrap(),
            json!({"blobValue": "aGk="})
        );
    }

    #[test]
    fn response_parses_endpoint_payload() {
        let body = json!({
            "columnMetadata": [
                {"name": "id", "label": "id", "tableName": "t", "typeName": "INT", "type": 4},
                {"name": "bin", "label": "bin", "tableName": "t", "typeName": "BINARY", "type": -2}
            ],
            "records": [[{"longValue": 1}, {"blobValue": "AAEC"}]],
            "numberOfRecordsUpdated": 0
        });
        let response: ExecuteStatementResponse = serde_json::from_value(body).unwrap();
        let columns = response.column_metadata.unwrap();
        assert_eq!(columns[1].type_name.as_deref(), Some("BINARY"));
        assert_eq!(columns[0].type_code, Some(4));
        let records = response.records.unwrap();
        assert_eq!(records[0][1], Field::BlobValue(vec![0, 1, 2]));
        assert!(response.generated_fields.is_none());
    }

    #[test]
    fn request_omits_absent_transaction() {
        let request = ExecuteStatementRequest {
            resource_arn: "arn:cluster".into(),
            secret_arn: "arn:secret".into(),
            database: "db".into(),
            schema: None,
            sql: "SELECT 1".into(),
            parameters: vec![],
            transaction_id: None,
            include_result_metadata: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("transactionId").is_none());
        assert!(value.get("schema").is_none());
        assert_eq!(value["includeResultMetadata"], json!(true));
        assert_eq!(value["resourceArn"], json!("arn:cluster"));
    }
}

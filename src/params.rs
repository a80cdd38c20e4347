use serde_json::Value as JsonValue;

use crate::error::RdsDataError;
use crate::types::{ParamValue, Params};
use crate::wire::{Field, SqlParameter};

/// Type hint sent with timestamp parameters.
pub const TYPE_HINT_TIMESTAMP: &str = "TIMESTAMP";

/// Container for encoded Data API parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireParams(pub Vec<SqlParameter>);

impl WireParams {
    /// Encode a parameter mapping into the wire parameter list.
    ///
    /// `None` and an empty mapping both encode to an empty list. Each value is
    /// classified once: integers go out as `longValue`, floats as `doubleValue`,
    /// text and timestamps as `stringValue`, booleans as `booleanValue`, byte
    /// buffers as `blobValue` and NULL as the `isNull` marker.
    ///
    /// # Errors
    ///
    /// Returns `RdsDataError::ParameterError` naming the offending parameter when a
    /// value has no wire representation (JSON arrays/objects, non-finite floats).
    pub fn convert(params: Option<&Params>) -> Result<WireParams, RdsDataError> {
        let Some(params) = params else {
            return Ok(WireParams::default());
        };

        let mut encoded = Vec::with_capacity(params.len());
        for (name, value) in params.iter() {
            encoded.push(SqlParameter {
                name: name.to_owned(),
                value: encode_value(name, value)?,
                type_hint: type_hint(value).map(str::to_owned),
            });
        }
        Ok(WireParams(encoded))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SqlParameter] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SqlParameter> {
        self.0
    }
}

fn encode_value(name: &str, value: &ParamValue) -> Result<Field, RdsDataError> {
    let field = match value {
        ParamValue::Int(i) => Field::LongValue(*i),
        ParamValue::Float(f) if f.is_finite() => Field::DoubleValue(*f),
        ParamValue::Text(s) => Field::StringValue(s.clone()),
        ParamValue::Bool(b) => Field::BooleanValue(*b),
        ParamValue::Timestamp(dt) => Field::StringValue(dt.format("%F %T%.f").to_string()),
        ParamValue::Null => Field::IsNull(true),
        ParamValue::Blob(bytes) => Field::BlobValue(bytes.clone()),
        ParamValue::Json(json) => match encode_json(json) {
            Some(field) => field,
            None => return Err(unclassifiable(name, &json.to_string(), value)),
        },
        ParamValue::Float(f) => return Err(unclassifiable(name, &f.to_string(), value)),
    };
    Ok(field)
}

/// Postgres needs a hint to read a `stringValue` as anything but text.
fn type_hint(value: &ParamValue) -> Option<&'static str> {
    match value {
        ParamValue::Timestamp(_) => Some(TYPE_HINT_TIMESTAMP),
        _ => None,
    }
}

fn encode_json(json: &JsonValue) -> Option<Field> {
    match json {
        JsonValue::Null => Some(Field::IsNull(true)),
        JsonValue::Bool(b) => Some(Field::BooleanValue(*b)),
        JsonValue::String(s) => Some(Field::StringValue(s.clone())),
        // integers past i64 have no exact wire form
        JsonValue::Number(n) if n.is_f64() => n.as_f64().map(Field::DoubleValue),
        JsonValue::Number(n) => n.as_i64().map(Field::LongValue),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

fn unclassifiable(name: &str, rendered: &str, value: &ParamValue) -> RdsDataError {
    RdsDataError::ParameterError {
        name: name.to_owned(),
        value: rendered.to_owned(),
        inferred: value.kind().to_owned(),
    }
}

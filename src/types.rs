use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values that can be bound as named statement parameters.
///
/// ```rust
/// use rds_data_middleware::prelude::*;
///
/// let params = params! {
///     "id" => 1,
///     "name" => "alice",
///     "active" => true,
///     "deleted_at" => None::<String>,
/// };
/// assert_eq!(params.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value, sent in the endpoint's textual form
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// Dynamic JSON value; only scalars can be bound
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl ParamValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Timestamp(_) => "timestamp",
            Self::Null => "null",
            Self::Json(JsonValue::Array(_)) => "json array",
            Self::Json(JsonValue::Object(_)) => "json object",
            Self::Json(_) => "json scalar",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<&[u8]> for ParamValue {
    fn from(value: &[u8]) -> Self {
        Self::Blob(value.to_vec())
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<JsonValue> for ParamValue {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Named parameters for one statement. Names are unique; order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`, replacing any earlier binding of that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Build a [`Params`] mapping from `name => value` pairs.
#[macro_export]
macro_rules! params {
    () => {
        $crate::types::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::types::Params::new();
        $(params.insert($name, $value);)+
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_none_binds_null() {
        let params = crate::params! { "a" => None::<i64>, "b" => Some("x") };
        assert_eq!(params.get("a"), Some(&ParamValue::Null));
        assert_eq!(params.get("b"), Some(&ParamValue::Text("x".into())));
    }

    #[test]
    fn later_binding_replaces_earlier() {
        let params = Params::new().with("id", 1).with("id", 2);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some(&ParamValue::Int(2)));
    }

    #[test]
    fn kind_names_json_shapes() {
        assert_eq!(ParamValue::from(json!([1, 2])).kind(), "json array");
        assert_eq!(ParamValue::from(json!({"a": 1})).kind(), "json object");
        assert_eq!(ParamValue::from(json!(3)).kind(), "json scalar");
    }
}

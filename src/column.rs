//! Column type classification and the lazy per-field accessor.

use base64::prelude::*;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;

use crate::wire::Field;

/// Semantic family of a reported column type name.
///
/// Every getter on [`ColumnValue`] is driven by this category alone, so the list of
/// recognised type names lives in exactly one place: [`TypeCategory::from_type_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Raw bytes (`BINARY`, `VARBINARY`, `BLOB`, `bytea`), read with `buffer()`
    Binary,
    /// `BIT` and Postgres `bool`
    Boolean,
    /// Dates and timestamps, read with `date()` or as epoch milliseconds
    Temporal,
    /// Integer families, signed or `UNSIGNED`
    Integer,
    /// Exact and floating decimals
    Decimal,
    /// Character data and types the endpoint ships as text (`uuid`, `json`, `TIME`)
    Text,
    /// Anything else; a result set declaring one fails to decode
    Unsupported,
}

impl TypeCategory {
    /// Map a MySQL- or Postgres-flavored type name to its category.
    ///
    /// Total and case-insensitive; names outside the known set map to `Unsupported`.
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Self {
        let upper = type_name.trim().to_ascii_uppercase();
        let base = upper.strip_suffix(" UNSIGNED").unwrap_or(&upper);

        match base {
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB"
            | "BYTEA" => Self::Binary,
            "BIT" | "BOOL" | "BOOLEAN" => Self::Boolean,
            "TIMESTAMP" | "DATETIME" | "DATE" | "TIMESTAMPTZ" => Self::Temporal,
            "INT" | "INTEGER" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "BIGINT" | "INT2"
            | "INT4" | "INT8" | "SERIAL" | "SERIAL2" | "SERIAL4" | "SERIAL8"
            | "BIGSERIAL" | "SMALLSERIAL" | "OID" | "YEAR" => Self::Integer,
            "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" | "FLOAT4" | "FLOAT8" => {
                Self::Decimal
            }
            "TEXT" | "CHAR" | "VARCHAR" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "BPCHAR"
            | "NAME" | "UUID" | "JSON" | "JSONB" | "ENUM" | "SET" | "TIME" | "TIMETZ" => {
                Self::Text
            }
            _ => Self::Unsupported,
        }
    }

    #[must_use]
    pub fn is_supported(self) -> bool {
        self != Self::Unsupported
    }
}

/// Textual layouts the endpoint uses for temporal columns.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Offset-carrying layouts (`timestamptz`); `%#z` accepts `+05`, `+05:30` and `Z`.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

/// One raw field of a result row, interpreted only when a getter is called.
///
/// A NULL field yields `None` from every getter; a getter whose interpretation does
/// not apply to the column's category also yields `None` rather than a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    field: Field,
    category: TypeCategory,
}

impl ColumnValue {
    /// Wrap a raw field with the category of its column
    ///
    /// # Arguments
    ///
    /// * `field` - The wire value as received
    /// * `category` - The category derived from the column's type name
    ///
    /// # Returns
    ///
    /// A new `ColumnValue`; nothing is parsed until a getter is called
    #[must_use]
    pub fn new(field: Field, category: TypeCategory) -> Self {
        Self { field, category }
    }

    /// The raw wire field.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn category(&self) -> TypeCategory {
        self.category
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.field.is_null()
    }

    /// Text form: base64 for binary columns, the endpoint's text for temporal,
    /// numeric and text columns.
    #[must_use]
    pub fn string(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self.category {
            TypeCategory::Binary => self.field.as_blob().map(|b| BASE64_STANDARD.encode(b)),
            TypeCategory::Temporal | TypeCategory::Text => self.field.as_str().map(str::to_owned),
            TypeCategory::Integer | TypeCategory::Decimal => match &self.field {
                Field::LongValue(i) => Some(i.to_string()),
                Field::DoubleValue(f) => Some(f.to_string()),
                Field::StringValue(s) => Some(s.clone()),
                _ => None,
            },
            TypeCategory::Boolean | TypeCategory::Unsupported => None,
        }
    }

    /// Integer form of the value
    ///
    /// # Returns
    ///
    /// The value of integer columns, 1/0 for boolean columns, epoch milliseconds
    /// for temporal columns, or None for NULL and for every other category
    #[must_use]
    pub fn number(&self) -> Option<i64> {
        if self.is_null() {
            return None;
        }
        match self.category {
            TypeCategory::Integer => match &self.field {
                Field::LongValue(i) => Some(*i),
                Field::StringValue(s) => s.parse().ok(),
                _ => None,
            },
            TypeCategory::Boolean => self.boolean().map(i64::from),
            TypeCategory::Temporal => self.date().map(|dt| dt.and_utc().timestamp_millis()),
            _ => None,
        }
    }

    /// Floating form of decimal and integer columns.
    #[must_use]
    pub fn double(&self) -> Option<f64> {
        if self.is_null() {
            return None;
        }
        match self.category {
            TypeCategory::Decimal | TypeCategory::Integer => match &self.field {
                Field::DoubleValue(f) => Some(*f),
                #[allow(clippy::cast_precision_loss)]
                Field::LongValue(i) => Some(*i as f64),
                Field::StringValue(s) => s.parse().ok(),
                _ => None,
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn boolean(&self) -> Option<bool> {
        if self.is_null() || self.category != TypeCategory::Boolean {
            return None;
        }
        match &self.field {
            Field::BooleanValue(b) => Some(*b),
            Field::LongValue(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Parsed temporal value; DATE columns resolve to midnight.
    ///
    /// Values carrying an offset (`+05`, `-05:30`, `Z`) are converted to UTC;
    /// values without one are returned as written.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDateTime> {
        if self.is_null() || self.category != TypeCategory::Temporal {
            return None;
        }
        parse_temporal(self.field.as_str()?)
    }

    #[must_use]
    pub fn buffer(&self) -> Option<&[u8]> {
        if self.is_null() || self.category != TypeCategory::Binary {
            return None;
        }
        self.field.as_blob()
    }

    /// JSON rendering using the getter that matches the column's category.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        if self.is_null() {
            return JsonValue::Null;
        }
        match self.category {
            TypeCategory::Boolean => self.boolean().map_or(JsonValue::Null, JsonValue::Bool),
            TypeCategory::Integer => self.number().map_or(JsonValue::Null, JsonValue::from),
            TypeCategory::Decimal => match &self.field {
                Field::StringValue(s) => JsonValue::String(s.clone()),
                _ => self.double().map_or(JsonValue::Null, JsonValue::from),
            },
            _ => self.string().map_or(JsonValue::Null, JsonValue::String),
        }
    }
}

fn parse_temporal(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    // An explicit offset is applied, so the result is always the UTC instant
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TypeCategory; 6] = [
        TypeCategory::Binary,
        TypeCategory::Boolean,
        TypeCategory::Temporal,
        TypeCategory::Integer,
        TypeCategory::Decimal,
        TypeCategory::Text,
    ];

    fn value(field: Field, type_name: &str) -> ColumnValue {
        ColumnValue::new(field, TypeCategory::from_type_name(type_name))
    }

    #[test]
    fn classifies_mysql_and_postgres_names() {
        assert_eq!(TypeCategory::from_type_name("INT UNSIGNED"), TypeCategory::Integer);
        assert_eq!(TypeCategory::from_type_name("bigint unsigned"), TypeCategory::Integer);
        assert_eq!(TypeCategory::from_type_name("int4"), TypeCategory::Integer);
        assert_eq!(TypeCategory::from_type_name("bool"), TypeCategory::Boolean);
        assert_eq!(TypeCategory::from_type_name("BIT"), TypeCategory::Boolean);
        assert_eq!(TypeCategory::from_type_name("bytea"), TypeCategory::Binary);
        assert_eq!(TypeCategory::from_type_name("DATETIME"), TypeCategory::Temporal);
        assert_eq!(TypeCategory::from_type_name("varchar"), TypeCategory::Text);
        assert_eq!(TypeCategory::from_type_name("uuid"), TypeCategory::Text);
        assert_eq!(TypeCategory::from_type_name("numeric"), TypeCategory::Decimal);
        assert_eq!(TypeCategory::from_type_name("GEOMETRY"), TypeCategory::Unsupported);
        assert_eq!(TypeCategory::from_type_name("_int4"), TypeCategory::Unsupported);
    }

    #[test]
    fn null_yields_no_value_for_every_category() {
        for category in ALL {
            let v = ColumnValue::new(Field::IsNull(true), category);
            assert!(v.is_null());
            assert_eq!(v.string(), None);
            assert_eq!(v.number(), None);
            assert_eq!(v.double(), None);
            assert_eq!(v.boolean(), None);
            assert_eq!(v.date(), None);
            assert_eq!(v.buffer(), None);
            assert_eq!(v.to_json(), JsonValue::Null);
        }
    }

    #[test]
    fn binary_getters() {
        let v = value(Field::BlobValue(vec![0xde, 0xad]), "BINARY");
        assert_eq!(v.buffer(), Some(&[0xde, 0xad][..]));
        assert_eq!(v.string().as_deref(), Some("3q0="));
        assert_eq!(v.number(), None);
        assert_eq!(v.boolean(), None);
    }

    #[test]
    fn bit_getters() {
        let on = value(Field::BooleanValue(true), "BIT");
        assert_eq!(on.boolean(), Some(true));
        assert_eq!(on.number(), Some(1));
        assert_eq!(on.string(), None);
        let off = value(Field::BooleanValue(false), "bool");
        assert_eq!(off.boolean(), Some(false));
        assert_eq!(off.number(), Some(0));
    }

    #[test]
    fn temporal_getters() {
        let v = value(Field::StringValue("2020-06-27 21:02:28".into()), "DATETIME");
        let dt = v.date().unwrap();
        assert_eq!(dt.to_string(), "2020-06-27 21:02:28");
        assert_eq!(v.string().as_deref(), Some("2020-06-27 21:02:28"));
        assert_eq!(v.number(), Some(1_593_291_748_000));
        assert_eq!(v.boolean(), None);

        let d = value(Field::StringValue("2020-06-27".into()), "DATE");
        assert_eq!(d.date().unwrap().to_string(), "2020-06-27 00:00:00");

        let tz = value(Field::StringValue("2020-06-27 21:02:28.419+00".into()), "timestamptz");
        assert_eq!(tz.number(), Some(1_593_291_748_419));

        let garbage = value(Field::StringValue("not a date".into()), "TIMESTAMP");
        assert_eq!(garbage.date(), None);
        assert_eq!(garbage.number(), None);
    }

    #[test]
    fn temporal_offsets_are_applied() {
        let utc = value(Field::StringValue("2020-06-27 21:02:28+00".into()), "timestamptz");
        let minus_five = value(Field::StringValue("2020-06-27 21:02:28-05".into()), "timestamptz");
        let plus_half = value(
            Field::StringValue("2020-06-27 21:02:28+05:30".into()),
            "timestamptz",
        );
        let zulu = value(Field::StringValue("2020-06-27T21:02:28Z".into()), "TIMESTAMP");

        assert_eq!(utc.number(), Some(1_593_291_748_000));
        assert_eq!(minus_five.number(), Some(1_593_291_748_000 + 5 * 3_600_000));
        assert_eq!(plus_half.number(), Some(1_593_291_748_000 - 19_800_000));
        assert_eq!(zulu.number(), utc.number());
        assert_ne!(utc.number(), minus_five.number());

        assert_eq!(
            minus_five.date().unwrap().to_string(),
            "2020-06-28 02:02:28"
        );
        // text keeps the endpoint's own representation
        assert_eq!(
            minus_five.string().as_deref(),
            Some("2020-06-27 21:02:28-05")
        );
    }

    #[test]
    fn integer_getters() {
        let v = value(Field::LongValue(1_048_576), "INT");
        assert_eq!(v.number(), Some(1_048_576));
        assert_eq!(v.string().as_deref(), Some("1048576"));
        assert_eq!(v.double(), Some(1_048_576.0));
        assert_eq!(v.boolean(), None);
        assert_eq!(v.date(), None);
    }

    #[test]
    fn text_getters() {
        let v = value(Field::StringValue("hello".into()), "VARCHAR");
        assert_eq!(v.string().as_deref(), Some("hello"));
        assert_eq!(v.number(), None);
        assert_eq!(v.boolean(), None);
        assert_eq!(v.buffer(), None);
        assert_eq!(v.date(), None);
    }

    #[test]
    fn decimal_getters() {
        let v = value(Field::StringValue("12.50".into()), "DECIMAL");
        assert_eq!(v.string().as_deref(), Some("12.50"));
        assert_eq!(v.double(), Some(12.5));
        assert_eq!(v.number(), None);
        assert_eq!(v.to_json(), JsonValue::String("12.50".into()));
    }

    #[test]
    fn getters_are_repeatable() {
        let v = value(Field::StringValue("2021-01-02 03:04:05".into()), "TIMESTAMP");
        assert_eq!(v.date(), v.date());
        assert_eq!(v.number(), v.number());
        assert_eq!(v.string(), v.string());
    }
}

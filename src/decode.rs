use std::sync::Arc;

use tracing::trace;

use crate::column::ColumnValue;
use crate::error::RdsDataError;
use crate::results::{Column, ResultSet, Row};
use crate::wire::{ColumnMetadata, ExecuteStatementResponse, Field};

/// Build a result set from an execute-statement response.
///
/// Responses without column metadata or without records (DDL, plain DML) decode to
/// an empty row set; the affected-row count and generated key are still carried.
///
/// # Errors
///
/// Returns `RdsDataError::UnsupportedColumnType` when a column declares a type this
/// decoder does not recognise, and `RdsDataError::DecodeError` when a record's width
/// does not match the column list.
pub fn build_result_set(response: ExecuteStatementResponse) -> Result<ResultSet, RdsDataError> {
    let number_of_records_updated = response.number_of_records_updated.unwrap_or(0);
    let insert_id = response
        .generated_fields
        .as_deref()
        .and_then(<[Field]>::first)
        .map_or(0, generated_key);

    let (Some(metadata), Some(records)) = (response.column_metadata, response.records) else {
        return Ok(ResultSet::new(
            Arc::default(),
            Vec::new(),
            number_of_records_updated,
            insert_id,
        ));
    };

    let columns = Arc::new(decode_columns(&metadata)?);
    let index = Arc::new(Row::build_index(&columns));

    let mut data = Vec::with_capacity(records.len());
    for (row_num, record) in records.into_iter().enumerate() {
        if record.len() != columns.len() {
            return Err(RdsDataError::DecodeError(format!(
                "record {row_num} has {} fields but {} columns were declared",
                record.len(),
                columns.len()
            )));
        }

        let values = record
            .into_iter()
            .zip(columns.iter())
            .map(|(field, column)| ColumnValue::new(field, column.category))
            .collect();
        data.push(Row::new(columns.clone(), index.clone(), values));
    }

    trace!(
        columns = columns.len(),
        rows = data.len(),
        number_of_records_updated,
        insert_id,
        "decoded execute-statement response"
    );

    Ok(ResultSet::new(
        columns,
        data,
        number_of_records_updated,
        insert_id,
    ))
}

fn decode_columns(metadata: &[ColumnMetadata]) -> Result<Vec<Column>, RdsDataError> {
    let mut columns = Vec::with_capacity(metadata.len());
    for meta in metadata {
        let name = meta
            .label
            .as_deref()
            .or(meta.name.as_deref())
            .unwrap_or_default();
        let column = Column::new(
            name,
            meta.table_name.as_deref().unwrap_or_default(),
            meta.type_name.as_deref().unwrap_or_default(),
        );
        if !column.category.is_supported() {
            return Err(RdsDataError::UnsupportedColumnType(column.type_name));
        }
        columns.push(column);
    }
    Ok(columns)
}

fn generated_key(field: &Field) -> i64 {
    match field {
        Field::LongValue(i) => *i,
        Field::StringValue(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use super::EventError;

/// Get a required column by name.
pub(crate) fn required_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a ArrayRef, EventError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| EventError::ColumnNotFound(name.to_string()))
}

/// Get a required integer column by name, widened to Int64.
///
/// Any signed or unsigned integer type is accepted.
pub(crate) fn int64_column(batch: &RecordBatch, name: &str) -> Result<Int64Array, EventError> {
    let column = required_column(batch, name)?;
    if !column.data_type().is_integer() {
        return Err(EventError::InvalidColumnType {
            column: name.to_string(),
            expected: "integer",
        });
    }
    let widened = cast(column, &DataType::Int64)?;
    widened
        .as_any()
        .downcast_ref::<Int64Array>()
        .cloned()
        .ok_or_else(|| EventError::InvalidColumnType {
            column: name.to_string(),
            expected: "integer",
        })
}

/// Get a required floating-point column by name, widened to Float64.
pub(crate) fn float64_column(batch: &RecordBatch, name: &str) -> Result<Float64Array, EventError> {
    let column = required_column(batch, name)?;
    if !column.data_type().is_numeric() {
        return Err(EventError::InvalidColumnType {
            column: name.to_string(),
            expected: "float",
        });
    }
    let widened = cast(column, &DataType::Float64)?;
    widened
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| EventError::InvalidColumnType {
            column: name.to_string(),
            expected: "float",
        })
}

/// Get a required boolean column by name.
///
/// Integer columns are accepted as flags (non-zero is true).
pub(crate) fn boolean_column(batch: &RecordBatch, name: &str) -> Result<BooleanArray, EventError> {
    let column = required_column(batch, name)?;
    let flags = match column.data_type() {
        DataType::Boolean => column.clone(),
        dt if dt.is_integer() => cast(column, &DataType::Boolean)?,
        _ => {
            return Err(EventError::InvalidColumnType {
                column: name.to_string(),
                expected: "boolean",
            })
        }
    };
    flags
        .as_any()
        .downcast_ref::<BooleanArray>()
        .cloned()
        .ok_or_else(|| EventError::InvalidColumnType {
            column: name.to_string(),
            expected: "boolean",
        })
}

/// Get an optional string column by name.
pub(crate) fn optional_string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Option<&'a StringArray> {
    batch.column_by_name(name)?.as_any().downcast_ref::<StringArray>()
}

/// Read a nullable value, treating null as absent.
pub(crate) fn value_at<T>(array: &arrow::array::PrimitiveArray<T>, idx: usize) -> Option<T::Native>
where
    T: arrow::datatypes::ArrowPrimitiveType,
{
    if array.is_null(idx) {
        None
    } else {
        Some(array.value(idx))
    }
}

/// Return a copy of `batch` with `column` added, or replaced if a column of that
/// name already exists. Existing columns keep their position.
pub(crate) fn with_column(
    batch: &RecordBatch,
    name: &str,
    column: ArrayRef,
) -> Result<RecordBatch, EventError> {
    // Derived columns are always nullable; unmatched rows stay null.
    let field = Field::new(name, column.data_type().clone(), true);
    let schema = batch.schema();

    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    match schema.index_of(name) {
        Ok(idx) => {
            fields[idx] = Arc::new(field);
            columns[idx] = column;
        }
        Err(_) => {
            fields.push(Arc::new(field));
            columns.push(column);
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

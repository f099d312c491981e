use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, UInt32Array};
use arrow::compute::{filter_record_batch, take};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use log::{debug, info};

use super::columns::{float64_column, int64_column, value_at};
use super::EventError;

/// Comparison applied by a [`ColumnCut`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// Keep rows strictly greater than the value
    Greater,
    /// Keep rows strictly less than the value
    Less,
    /// Keep rows equal to the value
    Equal,
}

impl FromStr for CutKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            "equal" => Ok(Self::Equal),
            other => Err(EventError::InvalidCut(format!(
                "unknown cut type '{}' (expected greater, less or equal)",
                other
            ))),
        }
    }
}

impl fmt::Display for CutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Greater => "greater",
            Self::Less => "less",
            Self::Equal => "equal",
        };
        f.write_str(name)
    }
}

/// A single row selection on a numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCut {
    /// Column the cut applies to
    pub column: String,
    /// Comparison
    pub kind: CutKind,
    /// Threshold
    pub value: f64,
}

impl ColumnCut {
    /// Create a new cut
    pub fn new(column: impl Into<String>, kind: CutKind, value: f64) -> Self {
        Self {
            column: column.into(),
            kind,
            value,
        }
    }

    /// Evaluate the cut row by row; null values never pass
    pub fn mask(&self, batch: &RecordBatch) -> Result<BooleanArray, EventError> {
        let values = float64_column(batch, &self.column)?;
        let mask = (0..values.len())
            .map(|i| {
                value_at(&values, i).map_or(false, |v| match self.kind {
                    CutKind::Greater => v > self.value,
                    CutKind::Less => v < self.value,
                    CutKind::Equal => v == self.value,
                })
            })
            .collect::<Vec<bool>>();
        Ok(BooleanArray::from(mask))
    }
}

/// Parses `column:kind:value`, e.g. `energy_true:greater:10`
impl FromStr for ColumnCut {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [column, kind, value] = parts.as_slice() else {
            return Err(EventError::InvalidCut(format!(
                "'{}' is not of the form column:kind:value",
                s
            )));
        };
        let value = value
            .parse::<f64>()
            .map_err(|_| EventError::InvalidCut(format!("'{}' is not a number", value)))?;
        Ok(Self::new(*column, kind.parse()?, value))
    }
}

impl fmt::Display for ColumnCut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.column, self.kind, self.value)
    }
}

/// Apply cuts in order, keeping only rows that pass all of them
pub fn apply_cuts(batch: &RecordBatch, cuts: &[ColumnCut]) -> Result<RecordBatch, EventError> {
    let mut selected = batch.clone();
    for cut in cuts {
        let mask = cut.mask(&selected)?;
        selected = filter_record_batch(&selected, &mask)?;
        debug!("Cut {} kept {} rows", cut, selected.num_rows());
    }
    Ok(selected)
}

/// Rename columns; renames whose source column is absent are ignored
pub fn rename_columns(
    batch: &RecordBatch,
    renames: &[(&str, &str)],
) -> Result<RecordBatch, EventError> {
    let schema = batch.schema();
    let fields: Vec<Arc<Field>> = schema
        .fields()
        .iter()
        .map(|field| {
            match renames.iter().find(|(from, _)| field.name().as_str() == *from) {
                Some((_, to)) => Arc::new(field.as_ref().clone().with_name(*to)),
                None => field.clone(),
            }
        })
        .collect();

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), batch.columns().to_vec())?)
}

/// Left join `right` onto `left` using integer key columns
///
/// Every left row is kept in its original order. A left row matching several
/// right rows is repeated once per match; a left row without a match gets
/// nulls in the right-hand columns. Non-key columns present on both sides are
/// suffixed `_x` (left) and `_y` (right).
pub fn left_join(
    left: &RecordBatch,
    right: &RecordBatch,
    keys: &[&str],
) -> Result<RecordBatch, EventError> {
    let left_keys = keys
        .iter()
        .map(|k| int64_column(left, k))
        .collect::<Result<Vec<_>, _>>()?;
    let right_keys = keys
        .iter()
        .map(|k| int64_column(right, k))
        .collect::<Result<Vec<_>, _>>()?;

    let key_of = |arrays: &[arrow::array::Int64Array], row: usize| -> Option<Vec<i64>> {
        arrays.iter().map(|a| value_at(a, row)).collect()
    };

    let mut index: HashMap<Vec<i64>, Vec<u32>> = HashMap::new();
    for row in 0..right.num_rows() {
        if let Some(key) = key_of(&right_keys, row) {
            index.entry(key).or_default().push(row as u32);
        }
    }

    let mut left_rows: Vec<u32> = Vec::with_capacity(left.num_rows());
    let mut right_rows: Vec<Option<u32>> = Vec::with_capacity(left.num_rows());
    for row in 0..left.num_rows() {
        match key_of(&left_keys, row).and_then(|key| index.get(&key)) {
            Some(matches) => {
                for &m in matches {
                    left_rows.push(row as u32);
                    right_rows.push(Some(m));
                }
            }
            None => {
                left_rows.push(row as u32);
                right_rows.push(None);
            }
        }
    }
    let left_rows = UInt32Array::from(left_rows);
    let right_rows = UInt32Array::from(right_rows);

    let key_set: HashSet<&str> = keys.iter().copied().collect();
    let left_schema = left.schema();
    let right_schema = right.schema();
    let left_names: HashSet<&str> = left_schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .filter(|name| !key_set.contains(name))
        .collect();
    let right_names: HashSet<&str> = right_schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .filter(|name| !key_set.contains(name))
        .collect();

    let mut fields: Vec<Field> = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();

    for (field, column) in left_schema.fields().iter().zip(left.columns()) {
        let name = field.name().as_str();
        let name = if right_names.contains(name) {
            format!("{}_x", name)
        } else {
            name.to_string()
        };
        fields.push(field.as_ref().clone().with_name(name));
        columns.push(take(column.as_ref(), &left_rows, None)?);
    }

    for (field, column) in right_schema.fields().iter().zip(right.columns()) {
        let name = field.name().as_str();
        if key_set.contains(name) {
            continue;
        }
        let name = if left_names.contains(name) {
            format!("{}_y", name)
        } else {
            name.to_string()
        };
        fields.push(field.as_ref().clone().with_name(name).with_nullable(true));
        columns.push(take(column.as_ref(), &right_rows, None)?);
    }

    let merged = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;

    info!("Shape of the main table: {} rows", left.num_rows());
    info!("Shape of the new table: {} rows", right.num_rows());
    info!(
        "Shape of the merged table: {} rows x {} columns",
        merged.num_rows(),
        merged.num_columns()
    );

    Ok(merged)
}

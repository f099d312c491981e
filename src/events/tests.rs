use std::sync::Arc;

use arrow::array::{Array, BooleanArray, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tempfile::tempdir;

use super::columns::{boolean_column, int64_column, with_column};
use super::*;

fn sample_events() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("type", DataType::Int32, false),
        Field::new("interaction_type", DataType::Int32, false),
        Field::new("is_cc", DataType::Boolean, false),
        Field::new("energy_true", DataType::Float64, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![12, -14, 16, 14, -16])),
            Arc::new(Int32Array::from(vec![1, 1, 2, 1, 3])),
            Arc::new(BooleanArray::from(vec![true, true, true, false, true])),
            Arc::new(Float64Array::from(vec![5.0, 15.0, 25.0, 35.0, 150.0])),
        ],
    )
    .unwrap()
}

fn keyed(name: &str, runs: Vec<i64>, frames: Vec<i64>, values: Vec<f64>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("RunID", DataType::Int64, false),
        Field::new("Frame", DataType::Int64, false),
        Field::new(name, DataType::Float64, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(runs)),
            Arc::new(Int64Array::from(frames)),
            Arc::new(Float64Array::from(values)),
        ],
    )
    .unwrap()
}

#[test]
fn test_write_read_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("events.parquet");
    let events = sample_events();

    let written = write_events(&path, &events, WriterConfig::default())?;
    assert_eq!(written, 5);

    let read = EventReader::open(&path)?.read_all()?;
    assert_eq!(read.num_rows(), 5);
    assert_eq!(read.schema().fields(), events.schema().fields());

    Ok(())
}

#[test]
fn test_projection_and_batch_size() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("events.parquet");
    write_events(&path, &sample_events(), WriterConfig::default())?;

    let reader = EventReader::open(&path)?
        .with_columns(&["energy_true", "type"])
        .with_batch_size(2);
    let batches = reader.iter_batches()?.collect::<Result<Vec<_>, _>>()?;

    assert_eq!(batches.len(), 3);
    assert!(batches.iter().all(|b| b.num_rows() <= 2));
    // Projection keeps file order
    let schema = batches[0].schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["type", "energy_true"]);

    Ok(())
}

#[test]
fn test_unknown_projected_column() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("events.parquet");
    write_events(&path, &sample_events(), WriterConfig::default())?;

    let result = EventReader::open(&path)?
        .with_columns(&["bjorken_y_true"])
        .iter_batches();
    assert!(matches!(result, Err(EventError::ColumnNotFound(name)) if name == "bjorken_y_true"));

    Ok(())
}

#[test]
fn test_open_missing_file() {
    let result = EventReader::open("/nonexistent/events.parquet");
    assert!(matches!(result, Err(EventError::IoError(_))));
}

#[test]
fn test_read_event_files_concatenates() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let first = dir.path().join("nue.parquet");
    let second = dir.path().join("numu.parquet");
    write_events(&first, &sample_events(), WriterConfig::default())?;
    write_events(
        &second,
        &sample_events(),
        WriterConfig {
            compression: CompressionType::Snappy,
            ..Default::default()
        },
    )?;

    let merged = read_event_files(
        &[&first, &second],
        Some(&["type", "is_cc"][..]),
        &ReaderConfig::default(),
    )?;
    assert_eq!(merged.num_rows(), 10);
    assert_eq!(merged.num_columns(), 2);

    Ok(())
}

#[test]
fn test_read_event_files_schema_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let first = dir.path().join("events.parquet");
    let second = dir.path().join("summary.parquet");
    write_events(&first, &sample_events(), WriterConfig::default())?;
    write_events(
        &second,
        &keyed("aafit_flag", vec![1], vec![1], vec![1.0]),
        WriterConfig::default(),
    )?;

    let result = read_event_files::<_, &str>(&[&first, &second], None, &ReaderConfig::default());
    assert!(matches!(result, Err(EventError::SchemaMismatch(_))));

    let empty: Vec<&std::path::Path> = Vec::new();
    let result = read_event_files::<_, &str>(&empty, None, &ReaderConfig::default());
    assert!(matches!(result, Err(EventError::SchemaMismatch(_))));

    Ok(())
}

#[test]
fn test_apply_cuts_in_order() -> Result<(), EventError> {
    let events = sample_events();
    let cuts = [
        ColumnCut::new("energy_true", CutKind::Greater, 10.0),
        ColumnCut::new("energy_true", CutKind::Less, 100.0),
    ];
    let selected = apply_cuts(&events, &cuts)?;
    assert_eq!(selected.num_rows(), 3);

    let equal = apply_cuts(&events, &[ColumnCut::new("type", CutKind::Equal, 16.0)])?;
    assert_eq!(equal.num_rows(), 1);

    Ok(())
}

#[test]
fn test_cut_on_missing_column() {
    let cut = ColumnCut::new("cos_zenith_true", CutKind::Less, 0.0);
    assert!(matches!(
        apply_cuts(&sample_events(), &[cut]),
        Err(EventError::ColumnNotFound(_))
    ));
}

#[test]
fn test_cut_nulls_never_pass() -> Result<(), EventError> {
    let schema = Arc::new(Schema::new(vec![Field::new(
        "energy_true",
        DataType::Float64,
        true,
    )]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(Float64Array::from(vec![Some(50.0), None, Some(5.0)]))],
    )?;
    let mask = ColumnCut::new("energy_true", CutKind::Greater, 1.0).mask(&batch)?;
    assert_eq!(mask, BooleanArray::from(vec![true, false, true]));
    Ok(())
}

#[test]
fn test_parse_cut() {
    let cut: ColumnCut = "energy_true:greater:10".parse().unwrap();
    assert_eq!(cut, ColumnCut::new("energy_true", CutKind::Greater, 10.0));
    assert_eq!(cut.to_string(), "energy_true:greater:10");

    assert!(matches!(
        "energy_true:between:10".parse::<ColumnCut>(),
        Err(EventError::InvalidCut(_))
    ));
    assert!(matches!(
        "energy_true:less".parse::<ColumnCut>(),
        Err(EventError::InvalidCut(_))
    ));
    assert!(matches!(
        "energy_true:less:ten".parse::<ColumnCut>(),
        Err(EventError::InvalidCut(_))
    ));
}

#[test]
fn test_rename_columns() -> Result<(), EventError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("RunID", DataType::Int64, false),
        Field::new("EventID", DataType::Int64, false),
        Field::new("TrigCount", DataType::Int64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1])),
            Arc::new(Int64Array::from(vec![2])),
            Arc::new(Int64Array::from(vec![3])),
        ],
    )?;

    let renamed = rename_columns(
        &batch,
        &[("TrigCount", "TriggCounter"), ("EventID", "Frame"), ("Missing", "Ignored")],
    )?;
    let schema = renamed.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["RunID", "Frame", "TriggCounter"]);
    Ok(())
}

#[test]
fn test_left_join_keeps_left_rows() -> Result<(), EventError> {
    let left = keyed("energy", vec![1, 1, 2], vec![10, 11, 20], vec![1.0, 2.0, 3.0]);
    let right = keyed("energy", vec![1, 2, 2], vec![10, 20, 20], vec![9.0, 8.0, 7.0]);

    let merged = left_join(&left, &right, &["RunID", "Frame"])?;

    // Row (2, 20) matches twice, (1, 11) not at all
    assert_eq!(merged.num_rows(), 4);
    let schema = merged.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["RunID", "Frame", "energy_x", "energy_y"]);

    let runs = int64_column(&merged, "RunID")?;
    assert_eq!(runs.values().to_vec(), vec![1, 1, 2, 2]);

    let right_energy = merged
        .column_by_name("energy_y")
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .unwrap();
    assert_eq!(right_energy.value(0), 9.0);
    assert!(right_energy.is_null(1));
    assert_eq!(right_energy.value(2), 8.0);
    assert_eq!(right_energy.value(3), 7.0);

    Ok(())
}

#[test]
fn test_left_join_missing_key() {
    let left = keyed("energy", vec![1], vec![10], vec![1.0]);
    let right = keyed("energy", vec![1], vec![10], vec![1.0]);
    assert!(matches!(
        left_join(&left, &right, &["TriggCounter"]),
        Err(EventError::ColumnNotFound(_))
    ));
}

#[test]
fn test_boolean_column_from_integers() -> Result<(), EventError> {
    let schema = Arc::new(Schema::new(vec![Field::new("is_cc", DataType::Int32, false)]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![0, 1, 2]))])?;
    let flags = boolean_column(&batch, "is_cc")?;
    assert_eq!(flags, BooleanArray::from(vec![false, true, true]));

    let schema = Arc::new(Schema::new(vec![Field::new("is_cc", DataType::Utf8, false)]));
    let batch = RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["yes"]))])?;
    assert!(matches!(
        boolean_column(&batch, "is_cc"),
        Err(EventError::InvalidColumnType { .. })
    ));
    Ok(())
}

#[test]
fn test_with_column_replaces_in_place() -> Result<(), EventError> {
    let events = sample_events();
    let labels = Arc::new(StringArray::from(vec![Some("a"), None, None, None, None]));
    let added = with_column(&events, "Flavour type", labels)?;
    assert_eq!(added.num_columns(), 5);

    let relabelled = with_column(
        &added,
        "Flavour type",
        Arc::new(StringArray::from(vec![Some("b"); 5])),
    )?;
    assert_eq!(relabelled.num_columns(), 5);
    assert_eq!(relabelled.schema().index_of("Flavour type").ok(), Some(4));
    Ok(())
}

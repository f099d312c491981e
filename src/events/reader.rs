use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;

use super::EventError;

/// Configuration for reading event files
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Number of rows per record batch
    pub batch_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { batch_size: 100_000 }
    }
}

/// Streaming iterator over record batches
///
/// Memory usage is bounded by `batch_size * row_size`.
pub struct EventBatchIterator {
    inner: Box<dyn Iterator<Item = Result<RecordBatch, arrow::error::ArrowError>> + Send>,
    schema: SchemaRef,
}

impl EventBatchIterator {
    /// Schema of the projected batches
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }
}

impl Iterator for EventBatchIterator {
    type Item = Result<RecordBatch, EventError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.map_err(EventError::from))
    }
}

/// Reader for Parquet event tables
///
/// # Example
///
/// ```rust,no_run
/// use nutau::events::EventReader;
///
/// let reader = EventReader::open("full_nutau_sample.parquet")?
///     .with_columns(&["RunID", "Type", "interaction_type"])
///     .with_batch_size(50_000);
///
/// for batch in reader.iter_batches()? {
///     println!("{} rows", batch?.num_rows());
/// }
/// # Ok::<(), nutau::events::EventError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EventReader {
    path: PathBuf,
    columns: Option<Vec<String>>,
    config: ReaderConfig,
}

impl EventReader {
    /// Open an event file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EventError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open an event file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, EventError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(EventError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("event file not found: {}", path.display()),
            )));
        }

        Ok(Self {
            path,
            columns: None,
            config,
        })
    }

    /// Restrict reading to the named columns
    ///
    /// Columns come back in file order, not in the order given here.
    pub fn with_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Override the number of rows per batch
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size.max(1);
        self
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a streaming iterator over record batches
    pub fn iter_batches(&self) -> Result<EventBatchIterator, EventError> {
        let file = File::open(&self.path)?;
        let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(self.config.batch_size);

        if let Some(columns) = &self.columns {
            let arrow_schema = builder.schema().clone();
            let indices = columns
                .iter()
                .map(|name| {
                    arrow_schema
                        .index_of(name)
                        .map_err(|_| EventError::ColumnNotFound(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
            builder = builder.with_projection(mask);
        }

        debug!(
            "Reading {} with batch size {}",
            self.path.display(),
            self.config.batch_size
        );

        let reader = builder.build()?;
        let schema = reader.schema();
        Ok(EventBatchIterator {
            inner: Box::new(reader),
            schema,
        })
    }

    /// Read the whole (projected) file into a single batch
    ///
    /// **Warning**: This loads all rows into memory. For large files, prefer `iter_batches()`.
    pub fn read_all(&self) -> Result<RecordBatch, EventError> {
        let iter = self.iter_batches()?;
        let schema = iter.schema();
        let batches = iter.collect::<Result<Vec<_>, _>>()?;
        let merged = concat_batches(&schema, &batches)?;
        info!(
            "Loaded {} events from {}",
            merged.num_rows(),
            self.path.display()
        );
        Ok(merged)
    }
}

/// Read several event files with the same columns into one batch
///
/// All files must yield the same (projected) schema.
pub fn read_event_files<P, S>(
    paths: &[P],
    columns: Option<&[S]>,
    config: &ReaderConfig,
) -> Result<RecordBatch, EventError>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let mut reader = EventReader::open_with_config(path, config.clone())?;
        if let Some(columns) = columns {
            reader = reader.with_columns(columns);
        }
        tables.push(reader.read_all()?);
    }

    let Some(first) = tables.first() else {
        return Err(EventError::SchemaMismatch(
            "no event files given".to_string(),
        ));
    };
    let schema = first.schema();

    for (path, table) in paths.iter().zip(&tables) {
        if table.schema().fields() != schema.fields() {
            return Err(EventError::SchemaMismatch(format!(
                "{} does not match the schema of the first file",
                path.as_ref().display()
            )));
        }
    }

    Ok(concat_batches(&schema, &tables)?)
}

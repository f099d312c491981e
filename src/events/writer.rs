use std::fs::File;
use std::io::Write;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};

use super::EventError;

/// Compression options for event files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// ZSTD compression at the given level
    Zstd(i32),
    /// Snappy compression (faster, slightly larger files)
    Snappy,
    /// No compression
    Uncompressed,
}

impl Default for CompressionType {
    fn default() -> Self {
        Self::Zstd(3)
    }
}

/// Configuration for the event writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression type to use
    pub compression: CompressionType,

    /// Target row group size (number of rows per group)
    pub row_group_size: usize,

    /// Whether to write statistics for columns
    pub write_statistics: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: CompressionType::default(),
            row_group_size: 100_000,
            write_statistics: true,
        }
    }
}

impl WriterConfig {
    fn to_writer_properties(&self) -> WriterProperties {
        let compression = match self.compression {
            CompressionType::Zstd(level) => {
                Compression::ZSTD(ZstdLevel::try_new(level).unwrap_or_default())
            }
            CompressionType::Snappy => Compression::SNAPPY,
            CompressionType::Uncompressed => Compression::UNCOMPRESSED,
        };

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Streaming writer for Parquet event tables
pub struct EventWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    rows_written: usize,
}

impl EventWriter<File> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        schema: SchemaRef,
        config: WriterConfig,
    ) -> Result<Self, EventError> {
        let file = File::create(path)?;
        Self::new(file, schema, config)
    }
}

impl<W: Write + Send> EventWriter<W> {
    /// Create a new writer to any Write implementation
    pub fn new(writer: W, schema: SchemaRef, config: WriterConfig) -> Result<Self, EventError> {
        let props = config.to_writer_properties();
        let writer = ArrowWriter::try_new(writer, schema, Some(props))?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write one batch; its schema must match the writer schema
    pub fn write(&mut self, batch: &RecordBatch) -> Result<(), EventError> {
        self.writer.write(batch)?;
        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Flush buffered rows and finalize the file, returning the number of rows written
    pub fn finish(self) -> Result<usize, EventError> {
        self.writer.close()?;
        Ok(self.rows_written)
    }
}

/// Write a single batch to a new Parquet file
pub fn write_events<P: AsRef<Path>>(
    path: P,
    batch: &RecordBatch,
    config: WriterConfig,
) -> Result<usize, EventError> {
    let path = path.as_ref();
    let mut writer = EventWriter::new_file(path, batch.schema(), config)?;
    writer.write(batch)?;
    let rows = writer.finish()?;
    info!("Wrote {} events to {}", rows, path.display());
    Ok(rows)
}

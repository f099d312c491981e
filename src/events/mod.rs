//! # Event Tables
//!
//! Reading, writing and reshaping the simulated event tables the analysis runs on.
//!
//! Event tables are Arrow [`RecordBatch`](arrow::record_batch::RecordBatch)es and
//! live on disk as Parquet files. Large samples are read with column projection
//! and a bounded batch size; several files can be concatenated when they share a
//! schema.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutau::events::{apply_cuts, ColumnCut, CutKind, EventReader};
//!
//! let events = EventReader::open("numu_sample.parquet")?
//!     .with_columns(&["type", "interaction_type", "is_cc", "energy_true"])
//!     .read_all()?;
//!
//! let low_energy = apply_cuts(
//!     &events,
//!     &[
//!         ColumnCut::new("energy_true", CutKind::Greater, 10.0),
//!         ColumnCut::new("energy_true", CutKind::Less, 100.0),
//!     ],
//! )?;
//! println!("{} low-energy events", low_energy.num_rows());
//! # Ok::<(), nutau::events::EventError>(())
//! ```

pub(crate) mod columns;
mod error;
mod reader;
mod transform;
mod writer;

#[cfg(test)]
mod tests;

pub use error::EventError;
pub use reader::{read_event_files, EventBatchIterator, EventReader, ReaderConfig};
pub use transform::{apply_cuts, left_join, rename_columns, ColumnCut, CutKind};
pub use writer::{write_events, CompressionType, EventWriter, WriterConfig};

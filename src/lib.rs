//! # nutau - Tau-Appearance Event Classification and Fit Configuration
//!
//! `nutau` prepares the inputs of a neutrino tau-appearance sensitivity study:
//! it labels simulated events by flavour and topology, summarises their
//! reconstruction, and writes the JSON configuration records read by the
//! oscillation fitter.
//!
//! ## Key Features
//!
//! - **Event classification**: pure flavour and topology predicates over Arrow
//!   record batches, applied as labels in a fixed order where the last matching
//!   predicate wins.
//!
//! - **Columnar event IO**: Parquet event tables read with column projection and
//!   bounded batches, filtered with cuts and merged with reconstruction outputs.
//!
//! - **Smearing**: seeded Gaussian smearing of true energy and direction to
//!   emulate alternative detector resolutions.
//!
//! - **Configuration records**: user, variables, classes, parameters and binning
//!   records for every combination of channel, reconstruction, mass ordering,
//!   systematics, cut policy and smear level. Existing records are never
//!   overwritten.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nutau::classify::apply_all_masks;
//! use nutau::events::{write_events, EventReader, WriterConfig};
//!
//! let mut events = EventReader::open("events.parquet")?.read_all()?;
//! apply_all_masks(&mut events)?;
//! write_events("events_labelled.parquet", &events, WriterConfig::default())?;
//! # Ok::<(), nutau::events::EventError>(())
//! ```
//!
//! ```rust,no_run
//! use nutau::generate::{Combination, ConfigLayout, CutPolicy, generate_all};
//!
//! let combinations = Combination::all(CutPolicy::MuonFree, &[]);
//! let report = generate_all(&ConfigLayout::new("json"), &combinations)?;
//! println!("{} records written", report.created().count());
//! # Ok::<(), nutau::generate::GenerateError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`schema`]: column names of event and detector summary tables
//! - [`events`]: Parquet reading and writing, cuts, renames and joins
//! - [`classify`]: flavour and topology predicates and label application
//! - [`smear`]: Gaussian smearing of true kinematics
//! - [`summary`]: reconstruction-flag and run-count summaries
//! - [`generate`]: configuration record builders and the no-clobber writer

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod classify;
pub mod events;
pub mod generate;
pub mod schema;
pub mod smear;
pub mod summary;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::classify::{apply_all_masks, with_labels, Flavour, Topology};
    pub use crate::events::{
        apply_cuts, read_event_files, write_events, ColumnCut, CutKind, EventError, EventReader,
        WriterConfig,
    };
    pub use crate::generate::{
        generate_all, generate_combination, Combination, ConfigLayout, GenerateError,
        GenerationReport,
    };
    pub use crate::schema::columns;
    pub use crate::smear::{smear_events, SmearConfig};
    pub use crate::summary::{flag_summary, run_counts};
}

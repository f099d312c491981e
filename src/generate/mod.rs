//! # Configuration Records
//!
//! Builds the JSON configuration records read by the oscillation fitter for
//! one combination of channel, reconstruction, mass ordering, systematics,
//! cut policy, smearing and scenario.
//!
//! | Record | Directory | Content |
//! |--------|-----------|---------|
//! | user | `USER/` | scan of the tau normalization and the echoed options |
//! | variables | `ANTARES/` | experiment description and fitter flags |
//! | classes | `ANTARES/` | track and shower selections with their branches |
//! | binning | `ANTARES/` | histogram binning with log-spaced energy edges |
//! | parameters | `PARAMETERS/` | physics parameters with fixed flags and priors |
//!
//! Records are written with create-new semantics: an artifact that already
//! exists is reported as skipped and never rewritten.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutau::generate::{
//!     generate_combination, Channel, Combination, ConfigLayout, CutPolicy, MassOrdering,
//!     Reconstruction, Systematics,
//! };
//!
//! let layout = ConfigLayout::new("json");
//! let combination = Combination::new(
//!     Channel::Tau,
//!     Reconstruction::NnFitFull,
//!     MassOrdering::Normal,
//!     Systematics::Systematics,
//!     CutPolicy::MuonFree,
//! );
//! let report = generate_combination(&layout, &combination)?;
//! println!("{}", report);
//! # Ok::<(), nutau::generate::GenerateError>(())
//! ```

mod artifact;
mod builder;
mod error;
mod layout;
mod options;
mod plan;
mod records;
mod templates;

#[cfg(test)]
mod tests;

pub use artifact::{to_json_bytes, write_if_absent, WriteOutcome};
pub use builder::{
    build_binning, build_classes, build_parameters, build_template, build_user, build_variables,
    energy_edges, shower_cut, track_cut, ENERGY_RECO_MAX, ENERGY_RECO_MIN, ENERGY_RECO_OVERFLOW,
    UNSMEARED_LEVEL,
};
pub use error::GenerateError;
pub use layout::{
    create_output_dirs, smeared_output_dir, unsmeared_output_dir, ConfigLayout, DirectoryReport,
    ANTARES_DIR, PARAMETERS_DIR, PLOT_KINDS, USER_DIR,
};
pub use options::{
    Asymmetry, BranchNames, Channel, CutPolicy, FitMode, MassOrdering, Reconstruction, Scenario,
    SmearLevel, Smearing, Systematics,
};
pub use plan::{
    generate_all, generate_combination, ArtifactEntry, Combination, GenerationReport,
    DEFAULT_ENERGY_BINS,
};
pub use records::{
    Binning, BinningRecord, ClassReconstructions, ClassesRecord, EventClass, Parameter,
    ParametersRecord, UserRecord, UserSettings, Variables, VariablesRecord,
};
pub use templates::{base_variables, parameter_template, SCANNED_PARAMETER, SYSTEMATIC_PARAMETERS};

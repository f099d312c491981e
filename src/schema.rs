//! # Event Table Schema
//!
//! Column names used by the event tables this crate reads and writes.
//!
//! Event tables are plain Arrow record batches (Parquet on disk). Only a handful
//! of columns are interpreted by the library; every other column is carried
//! through untouched.
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | type | any integer | Signed PDG particle code of the interacting neutrino |
//! | interaction_type | any integer | Generator interaction-type code |
//! | is_cc | Boolean or integer | Charged-current flag |
//! | energy_true | Float64 | True neutrino energy in GeV |
//! | cos_zenith_true | Float64 | Cosine of the true zenith angle |
//! | run_id | any integer | Detector run identifier |
//! | Flavour type | Utf8 (nullable) | Derived flavour label |
//! | Event type | Utf8 (nullable) | Derived topology label |
//! | energy_smeared | Float64 | Smeared energy |
//! | cos_zenith_smeared | Float64 | Smeared cosine zenith |

/// Column names as constants for type safety
pub mod columns {
    /// Signed PDG code of the interacting neutrino
    pub const TYPE: &str = "type";
    /// Generator interaction-type code
    pub const INTERACTION_TYPE: &str = "interaction_type";
    /// Charged-current flag
    pub const IS_CC: &str = "is_cc";
    /// True neutrino energy in GeV
    pub const ENERGY_TRUE: &str = "energy_true";
    /// Cosine of the true zenith angle
    pub const COS_ZENITH_TRUE: &str = "cos_zenith_true";
    /// Detector run identifier
    pub const RUN_ID: &str = "run_id";

    /// Derived flavour label column
    pub const FLAVOUR_LABEL: &str = "Flavour type";
    /// Derived topology label column
    pub const TOPOLOGY_LABEL: &str = "Event type";

    /// Smeared energy in GeV
    pub const ENERGY_SMEARED: &str = "energy_smeared";
    /// Smeared cosine zenith
    pub const COS_ZENITH_SMEARED: &str = "cos_zenith_smeared";
}

/// Column names of the raw detector summary files (before renaming)
pub mod summary_columns {
    /// Detector run identifier
    pub const RUN_ID: &str = "RunID";
    /// Signed PDG code
    pub const TYPE: &str = "Type";
    /// Frame index within the run
    pub const FRAME: &str = "Frame";
    /// Trigger counter within the frame
    pub const TRIGGER_COUNTER: &str = "TriggCounter";

    /// Per-algorithm reconstruction success flags
    pub const RECONSTRUCTION_FLAGS: [&str; 6] = [
        "aafit_flag",
        "bbfit_flag",
        "gridfit_flag",
        "showerdusj_flag",
        "NNFitTrack_flag",
        "NNFitShower_flag",
    ];

    /// Keys identifying one triggered event across summary and NNFit files
    pub const MERGE_KEYS: [&str; 3] = [RUN_ID, FRAME, TRIGGER_COUNTER];

    /// Renames applied to NNFit reconstruction tables so they share the merge keys
    pub const NNFIT_RENAMES: [(&str, &str); 2] = [("TrigCount", TRIGGER_COUNTER), ("EventID", FRAME)];
}

/// Runs before this identifier were produced without tau events
pub const FIRST_TAU_RUN: i64 = 34348;

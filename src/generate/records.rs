//! Serialized configuration records.
//!
//! Each record is a single-key JSON object (`user`, `variables`, `classes`,
//! `parameters`, `binning`). Field order here is the order in the written file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::options::{Channel, CutPolicy, FitMode, MassOrdering, Reconstruction, Systematics};

/// Run parameters of one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Scanned parameter
    pub parname: String,
    /// Scan points
    pub npoints: usize,
    /// Lower scan bound
    pub parmin: f64,
    /// Upper scan bound
    pub parmax: f64,
    /// Fit mode
    #[serde(rename = "type")]
    pub fit_mode: FitMode,
    /// Model mass ordering
    pub ordering: MassOrdering,
    /// Channel
    pub experiment: Channel,
    /// Reconstruction algorithm
    pub reco: Reconstruction,
    /// Scan both Theta23 octants
    pub both_octants: bool,
    /// Systematics option
    pub systematics: Systematics,
    /// Cut policy
    pub cut_option: CutPolicy,
    /// Whether the events are smeared
    pub is_smeared: bool,
    /// Smear level text, `"0"` when unsmeared
    pub smear_level: String,
}

/// `{"user": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Run parameters
    pub user: UserSettings,
}

/// Experiment description and fitter flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Variables {
    #[serde(rename = "MClabel")]
    pub mc_label: String,
    #[serde(rename = "SelectedEvents_filename")]
    pub selected_events_filename: Vec<String>,
    pub exposure_nyears: f64,
    pub output_path: String,
    pub flux_path: String,
    pub by_path: String,
    #[serde(rename = "crossfile_InteractingEvents_path")]
    pub crossfile_interacting_events_path: String,
    #[serde(rename = "crossfile_RespMatrix_path")]
    pub crossfile_resp_matrix_path: String,
    #[serde(rename = "PREMTable")]
    pub prem_table: String,
    #[serde(rename = "ExtensiveOutput")]
    pub extensive_output: bool,
    #[serde(rename = "EnableMCError")]
    pub enable_mc_error: bool,
    #[serde(rename = "UseW2Method")]
    pub use_w2_method: bool,
    #[serde(rename = "PlotEffMass")]
    pub plot_eff_mass: bool,
    #[serde(rename = "Verbose")]
    pub verbose: bool,
    #[serde(rename = "SetMuons")]
    pub set_muons: bool,
    #[serde(rename = "EnableSmearMachine")]
    pub enable_smear_machine: bool,
    #[serde(rename = "Analysis_Type")]
    pub analysis_type: String,
    #[serde(rename = "Experiment_Type")]
    pub experiment_type: String,
    #[serde(rename = "PseudoExperiment_seed")]
    pub pseudo_experiment_seed: u64,
    #[serde(rename = "SetBootstrap")]
    pub set_bootstrap: bool,
    #[serde(rename = "Bootstrap_seed")]
    pub bootstrap_seed: u64,
    #[serde(rename = "Bootstrap_Fraction")]
    pub bootstrap_fraction: f64,
}

/// `{"variables": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablesRecord {
    /// Experiment description
    pub variables: Variables,
}

/// Branch names for the three kinematic roles of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReconstructions {
    /// Energy branch
    #[serde(rename = "E")]
    pub energy: String,
    /// Cosine zenith branch
    #[serde(rename = "cosT")]
    pub cos_zenith: String,
    /// Bjorken y branch
    #[serde(rename = "By")]
    pub bjorken_y: String,
}

/// One event class of the fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventClass {
    /// `tracks` or `showers`
    pub name: String,
    /// Selection expression
    pub general_cut: String,
    /// Selection expression with loose muon rejection
    pub muon_loose_cut: String,
    /// Branches read for this class
    pub reconstructions: ClassReconstructions,
    /// Normalization parameter of the class
    #[serde(rename = "ClassNorm")]
    pub class_norm: String,
}

/// `{"classes": [tracks, showers]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassesRecord {
    /// Event classes
    pub classes: Vec<EventClass>,
}

/// One physics parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Value used to build the pseudo data
    #[serde(rename = "vData")]
    pub data: f64,
    /// Starting value of the model
    #[serde(rename = "vModel")]
    pub model: f64,
    /// Held constant in the fit
    pub fixed: bool,
    /// Gaussian prior applied
    pub prior: bool,
    /// Prior mean
    pub prior_mean: f64,
    /// Prior width
    pub prior_sigma: f64,
}

/// `{"parameters": {name: parameter}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersRecord {
    /// Parameters in fitter order
    pub parameters: IndexMap<String, Parameter>,
}

/// Histogram binning of the fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Binning {
    #[serde(rename = "nEbinsTrue")]
    pub n_energy_bins_true: u32,
    #[serde(rename = "EminTrue")]
    pub energy_min_true: u32,
    #[serde(rename = "EmaxTrue")]
    pub energy_max_true: u32,
    #[serde(rename = "nEbinsReco")]
    pub n_energy_bins_reco: u32,
    #[serde(rename = "EminReco")]
    pub energy_min_reco: u32,
    #[serde(rename = "EmaxReco")]
    pub energy_max_reco: u32,
    #[serde(rename = "ncosTbinsTrue")]
    pub n_cos_zenith_bins_true: u32,
    #[serde(rename = "ncosTbinsReco")]
    pub n_cos_zenith_bins_reco: u32,
    #[serde(rename = "nBybinsTrue")]
    pub n_bjorken_y_bins_true: u32,
    #[serde(rename = "nBybinsReco")]
    pub n_bjorken_y_bins_reco: u32,
    pub custom: bool,
    /// Reconstructed-energy bin edges in GeV
    #[serde(rename = "custom_EbinsReco")]
    pub custom_energy_bins_reco: Vec<f64>,
}

/// `{"binning": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningRecord {
    /// Binning
    pub binning: Binning,
}

//! Categorical inputs of a generation run.
//!
//! Every option has a canonical text form, used both in record fields and in
//! file names. Parsing anything else is a lookup failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::GenerateError;

/// Analysis channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Standard three-flavour oscillation
    #[serde(rename = "STD")]
    Std,
    /// Tau-appearance channel
    #[serde(rename = "TAU")]
    Tau,
}

impl Channel {
    /// All channels
    pub const ALL: [Channel; 2] = [Channel::Std, Channel::Tau];

    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Std => "STD",
            Self::Tau => "TAU",
        }
    }

    /// Experiment type label understood by the fitter
    pub fn experiment_type(self) -> &'static str {
        match self {
            Self::Std => "Std",
            Self::Tau => "Tau",
        }
    }
}

impl FromStr for Channel {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STD" => Ok(Self::Std),
            "TAU" => Ok(Self::Tau),
            other => Err(GenerateError::UnknownChannel(other.to_string())),
        }
    }
}

/// Names of the reconstructed branches for the three kinematic roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchNames {
    /// Reconstructed energy
    pub energy: &'static str,
    /// Reconstructed cosine zenith
    pub cos_zenith: &'static str,
    /// Reconstructed Bjorken y
    pub bjorken_y: &'static str,
}

/// Reconstruction algorithm whose output the fit reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reconstruction {
    /// Monte Carlo truth
    #[serde(rename = "MC")]
    Mc,
    /// AAFit direction with the dE/dX energy estimate
    #[serde(rename = "AAFit_dedx")]
    AaFitDedx,
    /// AAFit direction with the ANN energy estimate
    #[serde(rename = "AAFit_ann")]
    AaFitAnn,
    /// NNFit energy and direction
    #[serde(rename = "NNFit_full")]
    NnFitFull,
    /// NNFit direction with true energy
    #[serde(rename = "NNFit_dir")]
    NnFitDir,
    /// Smeared true values
    #[serde(rename = "Smeared")]
    Smeared,
}

impl Reconstruction {
    /// Every algorithm that reads detector or truth branches directly
    pub const UNSMEARED: [Reconstruction; 5] = [
        Reconstruction::Mc,
        Reconstruction::AaFitDedx,
        Reconstruction::AaFitAnn,
        Reconstruction::NnFitFull,
        Reconstruction::NnFitDir,
    ];

    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mc => "MC",
            Self::AaFitDedx => "AAFit_dedx",
            Self::AaFitAnn => "AAFit_ann",
            Self::NnFitFull => "NNFit_full",
            Self::NnFitDir => "NNFit_dir",
            Self::Smeared => "Smeared",
        }
    }

    /// Branches read for the shower class (and the track class unless overridden)
    pub fn branches(self) -> BranchNames {
        match self {
            Self::Mc => BranchNames {
                energy: "energy_recoTrue",
                cos_zenith: "cos_zenith_recoTrue",
                bjorken_y: "bjorken_y_recoTrue",
            },
            Self::AaFitDedx => BranchNames {
                energy: "energy_aafit_dEdX_CEA",
                cos_zenith: "aafit_cos_zenith",
                bjorken_y: "aafit_bjy",
            },
            Self::AaFitAnn => BranchNames {
                energy: "energy_aafit_ANN_ECAP",
                cos_zenith: "aafit_cos_zenith",
                bjorken_y: "aafit_bjy",
            },
            Self::NnFitFull => BranchNames {
                energy: "NNFitShower_Energy",
                cos_zenith: "NNFitShower_cos_zenith",
                bjorken_y: "NNFit_Bjorken_y",
            },
            Self::NnFitDir => BranchNames {
                energy: "energy_recoTrue",
                cos_zenith: "NNFitShower_cos_zenith",
                bjorken_y: "NNFit_Bjorken_y",
            },
            Self::Smeared => BranchNames {
                energy: "energy_smeared",
                cos_zenith: "cos_zenith_smeared",
                bjorken_y: "bjorken_y_recoTrue",
            },
        }
    }

    /// Branches read for the track class
    ///
    /// NNFit has a dedicated track fit, so both NNFit variants read the track
    /// direction and NNFit_full also reads the track energy.
    pub fn track_branches(self) -> BranchNames {
        let base = self.branches();
        match self {
            Self::NnFitFull => BranchNames {
                energy: "NNFitTrack_Energy",
                cos_zenith: "NNFitTrack_cos_zenith",
                ..base
            },
            Self::NnFitDir => BranchNames {
                cos_zenith: "NNFitTrack_cos_zenith",
                ..base
            },
            _ => base,
        }
    }
}

impl FromStr for Reconstruction {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MC" => Ok(Self::Mc),
            "AAFit_dedx" => Ok(Self::AaFitDedx),
            "AAFit_ann" => Ok(Self::AaFitAnn),
            "NNFit_full" => Ok(Self::NnFitFull),
            "NNFit_dir" => Ok(Self::NnFitDir),
            "Smeared" => Ok(Self::Smeared),
            other => Err(GenerateError::UnknownReconstruction(other.to_string())),
        }
    }
}

/// Neutrino mass ordering hypothesis of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MassOrdering {
    /// Normal ordering
    #[serde(rename = "NO")]
    Normal,
    /// Inverted ordering
    #[serde(rename = "IO")]
    Inverted,
}

impl MassOrdering {
    /// Both orderings
    pub const ALL: [MassOrdering; 2] = [MassOrdering::Normal, MassOrdering::Inverted];

    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NO",
            Self::Inverted => "IO",
        }
    }
}

impl FromStr for MassOrdering {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NO" => Ok(Self::Normal),
            "IO" => Ok(Self::Inverted),
            other => Err(GenerateError::UnknownOrdering(other.to_string())),
        }
    }
}

/// Whether the tau normalization is scanned or floats in the fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scanned over a grid of fixed values
    Fixed,
    /// Free in the fit; the scan collapses to one point
    Free,
}

impl FitMode {
    /// Both modes, in the order their records are written
    pub const ALL: [FitMode; 2] = [FitMode::Fixed, FitMode::Free];

    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Free => "free",
        }
    }

    /// Scan grid as (points, min, max) for a requested number of points
    pub fn scan(self, points: usize) -> (usize, f64, f64) {
        match self {
            Self::Fixed => (points, 0.0, 2.0),
            Self::Free => (1, 0.5, 0.5),
        }
    }
}

impl FromStr for FitMode {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "free" => Ok(Self::Free),
            other => Err(GenerateError::UnknownFitMode(other.to_string())),
        }
    }
}

/// Whether the systematic nuisance parameters float
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Systematics {
    /// Only the scanned parameter varies
    NoSystematics,
    /// Systematic parameters float in the fit
    Systematics,
}

impl Systematics {
    /// Both options
    pub const ALL: [Systematics; 2] = [Systematics::NoSystematics, Systematics::Systematics];

    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSystematics => "no_systematics",
            Self::Systematics => "systematics",
        }
    }

    /// True when the systematic parameters float
    pub fn enabled(self) -> bool {
        self == Self::Systematics
    }

    /// Scan points used when none are requested
    pub fn default_scan_points(self) -> usize {
        match self {
            Self::NoSystematics => 21,
            Self::Systematics => 15,
        }
    }
}

/// Accepts the canonical text and the `0`/`1` shorthand
impl FromStr for Systematics {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_systematics" | "0" => Ok(Self::NoSystematics),
            "systematics" | "1" => Ok(Self::Systematics),
            other => Err(GenerateError::UnknownSystematics(other.to_string())),
        }
    }
}

/// Named event selection applied on top of the class cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutPolicy {
    /// Up-going events only
    MuonFree,
    /// Up-going according to the NNFit shower direction
    IsNnfit,
    /// Up-going events with a successful AAFit
    IsAafit,
    /// Well up-going events with a successful BBFit
    HardCut,
}

impl CutPolicy {
    /// Every policy
    pub const ALL: [CutPolicy; 4] = [
        CutPolicy::MuonFree,
        CutPolicy::IsNnfit,
        CutPolicy::IsAafit,
        CutPolicy::HardCut,
    ];

    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MuonFree => "muon_free",
            Self::IsNnfit => "is_nnfit",
            Self::IsAafit => "is_aafit",
            Self::HardCut => "hard_cut",
        }
    }

    /// Selection expression in the fitter's cut syntax
    pub fn selection(self) -> &'static str {
        match self {
            Self::MuonFree => "cos_zenith_recoTrue < 0",
            Self::IsNnfit => "NNFitShower_cos_zenith < 0",
            Self::IsAafit => "(aafit_flag == 1) && (cos_zenith_recoTrue < 0)",
            Self::HardCut => "(cos_zenith_recoTrue < -0.4) && (bbfit_flag == 1)",
        }
    }
}

impl FromStr for CutPolicy {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| GenerateError::UnknownCutPolicy(s.to_string()))
    }
}

/// Detector resolution emulated by smearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmearLevel {
    /// ORCA with 6 detection units
    Orca6,
    /// ORCA with 115 detection units
    Orca115,
    /// ANTARES resolution
    Antares,
    /// Constant relative resolution in percent
    Percent(u32),
}

impl SmearLevel {
    /// Levels the analysis is run with
    pub const CATALOG: [SmearLevel; 9] = [
        SmearLevel::Orca6,
        SmearLevel::Orca115,
        SmearLevel::Percent(10),
        SmearLevel::Percent(50),
        SmearLevel::Percent(70),
        SmearLevel::Percent(100),
        SmearLevel::Percent(200),
        SmearLevel::Percent(500),
        SmearLevel::Antares,
    ];

    /// Directory of the level under `smeared/`: percentage levels carry a
    /// `_percent` suffix, named levels are used as is
    pub fn output_dir_name(self) -> String {
        match self {
            Self::Percent(p) => format!("{}_percent", p),
            named => named.to_string(),
        }
    }

    /// Relative resolution for percentage levels
    pub fn fraction(self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(f64::from(p) / 100.0),
            _ => None,
        }
    }
}

impl fmt::Display for SmearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orca6 => f.write_str("orca6"),
            Self::Orca115 => f.write_str("orca115"),
            Self::Antares => f.write_str("antares"),
            Self::Percent(p) => write!(f, "{}", p),
        }
    }
}

/// Accepts the named levels, `N` and `N_percent`
impl FromStr for SmearLevel {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orca6" => Ok(Self::Orca6),
            "orca115" => Ok(Self::Orca115),
            "antares" => Ok(Self::Antares),
            other => other
                .strip_suffix("_percent")
                .unwrap_or(other)
                .parse::<u32>()
                .ok()
                .filter(|p| *p > 0)
                .map(Self::Percent)
                .ok_or_else(|| GenerateError::UnknownSmearLevel(other.to_string())),
        }
    }
}

/// Energy and direction multipliers on the smearing resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asymmetry {
    /// Energy resolution factor
    pub energy: f64,
    /// Direction resolution factor
    pub direction: f64,
}

impl Default for Asymmetry {
    fn default() -> Self {
        Self {
            energy: 1.0,
            direction: 1.0,
        }
    }
}

impl Asymmetry {
    /// Validate both factors
    pub fn new(energy: f64, direction: f64) -> Result<Self, GenerateError> {
        for factor in [energy, direction] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(GenerateError::InvalidAsymmetry(factor.to_string()));
            }
        }
        Ok(Self { energy, direction })
    }

    /// True unless either factor differs from 1.0
    pub fn is_symmetric(&self) -> bool {
        self.energy == 1.0 && self.direction == 1.0
    }
}

/// Text of a factor as it appears in labels: always with a decimal point
fn factor_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Smearing applied to the true values fed to the fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smearing {
    /// Resolution
    pub level: SmearLevel,
    /// Asymmetry factors
    pub asymmetry: Asymmetry,
}

impl Smearing {
    /// Symmetric smearing at `level`
    pub fn new(level: SmearLevel) -> Self {
        Self {
            level,
            asymmetry: Asymmetry::default(),
        }
    }

    /// Suffix of the variables label and event file: the level, then
    /// `_{direction}_{energy}` when asymmetric
    pub fn tag(&self) -> String {
        if self.asymmetry.is_symmetric() {
            self.level.to_string()
        } else {
            format!(
                "{}_{}_{}",
                self.level,
                factor_text(self.asymmetry.direction),
                factor_text(self.asymmetry.energy)
            )
        }
    }
}

/// Which detector description the fit uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scenario {
    /// Selected events as reconstructed
    #[default]
    Nominal,
    /// Atmospheric muons and the smearing machine enabled
    Realistic,
}

impl Scenario {
    /// Canonical text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nominal => "nominal",
            Self::Realistic => "realistic",
        }
    }
}

impl FromStr for Scenario {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nominal" => Ok(Self::Nominal),
            "realistic" => Ok(Self::Realistic),
            other => Err(GenerateError::UnknownScenario(other.to_string())),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Channel, Reconstruction, MassOrdering, FitMode, Systematics, CutPolicy, Scenario);

//! Filesystem layout of generated records and fit outputs.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::options::{
    Channel, CutPolicy, FitMode, MassOrdering, Reconstruction, Scenario, SmearLevel, Smearing,
    Systematics,
};
use super::plan::Combination;
use super::GenerateError;

/// Directory of run-parameter records
pub const USER_DIR: &str = "USER";
/// Directory of variable, class and binning records
pub const ANTARES_DIR: &str = "ANTARES";
/// Directory of parameter tables
pub const PARAMETERS_DIR: &str = "PARAMETERS";

/// Record tree under one root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayout {
    root: PathBuf,
}

impl ConfigLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of run-parameter records
    pub fn user_dir(&self) -> PathBuf {
        self.root.join(USER_DIR)
    }

    /// Directory of variable, class and binning records
    pub fn antares_dir(&self) -> PathBuf {
        self.root.join(ANTARES_DIR)
    }

    /// Directory of parameter tables
    pub fn parameters_dir(&self) -> PathBuf {
        self.root.join(PARAMETERS_DIR)
    }

    /// Create the three record directories if missing
    pub fn ensure(&self) -> Result<(), GenerateError> {
        for dir in [self.user_dir(), self.antares_dir(), self.parameters_dir()] {
            fs::create_dir_all(&dir).map_err(|e| GenerateError::io(&dir, e))?;
        }
        Ok(())
    }

    /// `USER/User_{reco}[_{level}]_{channel}_{order}_{cut}_{sys}_{mode}.json`
    pub fn user_path(&self, combination: &Combination, mode: FitMode) -> PathBuf {
        let reco = match &combination.smearing {
            Some(smearing) => format!("{}_{}", combination.reconstruction, smearing.level),
            None => combination.reconstruction.to_string(),
        };
        self.user_dir().join(format!(
            "User_{}_{}_{}_{}_{}_{}.json",
            reco,
            combination.channel,
            combination.ordering,
            combination.cut,
            combination.systematics,
            mode
        ))
    }

    /// `ANTARES/variables_ANTARES_{channel}[_Smeared_{tag}|_Realistic].json`
    pub fn variables_path(
        &self,
        channel: Channel,
        smearing: Option<&Smearing>,
        scenario: Scenario,
    ) -> PathBuf {
        let suffix = match (smearing, scenario) {
            (Some(smearing), _) => format!("_Smeared_{}", smearing.tag()),
            (None, Scenario::Realistic) => "_Realistic".to_string(),
            (None, Scenario::Nominal) => String::new(),
        };
        self.antares_dir()
            .join(format!("variables_ANTARES_{}{}.json", channel, suffix))
    }

    /// `ANTARES/classes_ANTARES_{cut}_{reco}[_{level}].json`
    pub fn classes_path(
        &self,
        cut: CutPolicy,
        reconstruction: Reconstruction,
        level: Option<SmearLevel>,
    ) -> PathBuf {
        let name = match level {
            Some(level) => format!("classes_ANTARES_{}_{}_{}.json", cut, reconstruction, level),
            None => format!("classes_ANTARES_{}_{}.json", cut, reconstruction),
        };
        self.antares_dir().join(name)
    }

    /// `ANTARES/binning_ANTARES_{n+1}.json`, named after the number of edges
    pub fn binning_path(&self, energy_bins: usize) -> PathBuf {
        self.antares_dir()
            .join(format!("binning_ANTARES_{}.json", energy_bins + 1))
    }

    /// `PARAMETERS/params_template_{order}.json`
    pub fn template_path(&self, ordering: MassOrdering) -> PathBuf {
        self.parameters_dir()
            .join(format!("params_template_{}.json", ordering))
    }

    /// `PARAMETERS/parameters_Data_NO_Model_{order}_{sys}_{mode}.json`
    pub fn parameters_path(
        &self,
        ordering: MassOrdering,
        systematics: Systematics,
        mode: FitMode,
    ) -> PathBuf {
        self.parameters_dir().join(format!(
            "parameters_Data_NO_Model_{}_{}_{}.json",
            ordering, systematics, mode
        ))
    }
}

/// Result of creating a set of directories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryReport {
    /// Directories that were created
    pub created: Vec<PathBuf>,
    /// Directories that already existed
    pub existing: Vec<PathBuf>,
}

impl DirectoryReport {
    fn ensure(&mut self, dir: PathBuf) -> Result<(), GenerateError> {
        if dir.is_dir() {
            self.existing.push(dir);
        } else {
            fs::create_dir_all(&dir).map_err(|e| GenerateError::io(&dir, e))?;
            debug!("Created {}", dir.display());
            self.created.push(dir);
        }
        Ok(())
    }
}

/// Fit-output directory of an unsmeared combination
///
/// `output/ANTARES/{cut}/unsmeared/{sys}/{reco}/{channel}/{order}/{mode}`
pub fn unsmeared_output_dir(
    base: &Path,
    cut: CutPolicy,
    systematics: Systematics,
    reconstruction: Reconstruction,
    channel: Channel,
    ordering: MassOrdering,
    mode: FitMode,
) -> PathBuf {
    base.join("output")
        .join("ANTARES")
        .join(cut.as_str())
        .join("unsmeared")
        .join(systematics.as_str())
        .join(reconstruction.as_str())
        .join(channel.as_str())
        .join(ordering.as_str())
        .join(mode.as_str())
}

/// Fit-output directory of a smeared combination
///
/// `output/ANTARES/{cut}/smeared/{level_dir}/{sys}/{channel}/{order}/{mode}`,
/// where `level_dir` is [`SmearLevel::output_dir_name`]
pub fn smeared_output_dir(
    base: &Path,
    cut: CutPolicy,
    level: SmearLevel,
    systematics: Systematics,
    channel: Channel,
    ordering: MassOrdering,
    mode: FitMode,
) -> PathBuf {
    base.join("output")
        .join("ANTARES")
        .join(cut.as_str())
        .join("smeared")
        .join(level.output_dir_name())
        .join(systematics.as_str())
        .join(channel.as_str())
        .join(ordering.as_str())
        .join(mode.as_str())
}

/// Plot subdirectories created for every cut and systematics option
pub const PLOT_KINDS: [&str; 3] = ["reconstruction", "study", "smeared"];

/// Create the full fit-output and plot trees under `base`
///
/// Existing directories are left untouched and reported separately.
pub fn create_output_dirs(
    base: &Path,
    cut: CutPolicy,
    levels: &[SmearLevel],
) -> Result<DirectoryReport, GenerateError> {
    let mut report = DirectoryReport::default();

    for systematics in Systematics::ALL {
        for channel in Channel::ALL {
            for ordering in MassOrdering::ALL {
                for mode in FitMode::ALL {
                    for reconstruction in Reconstruction::UNSMEARED {
                        report.ensure(unsmeared_output_dir(
                            base,
                            cut,
                            systematics,
                            reconstruction,
                            channel,
                            ordering,
                            mode,
                        ))?;
                    }
                    for &level in levels {
                        report.ensure(smeared_output_dir(
                            base,
                            cut,
                            level,
                            systematics,
                            channel,
                            ordering,
                            mode,
                        ))?;
                    }
                }
            }
        }

        for kind in PLOT_KINDS {
            report.ensure(
                base.join("plots")
                    .join(cut.as_str())
                    .join(systematics.as_str())
                    .join(kind),
            )?;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::options::Asymmetry;
    use tempfile::tempdir;

    fn combination() -> Combination {
        Combination::new(
            Channel::Tau,
            Reconstruction::NnFitFull,
            MassOrdering::Normal,
            Systematics::NoSystematics,
            CutPolicy::MuonFree,
        )
    }

    #[test]
    fn test_user_path() {
        let layout = ConfigLayout::new("json");
        assert_eq!(
            layout.user_path(&combination(), FitMode::Fixed),
            Path::new("json/USER/User_NNFit_full_TAU_NO_muon_free_no_systematics_fixed.json")
        );

        let smeared = Combination::new(
            Channel::Std,
            Reconstruction::Smeared,
            MassOrdering::Inverted,
            Systematics::Systematics,
            CutPolicy::HardCut,
        )
        .with_smearing(Smearing::new(SmearLevel::Orca6));
        assert_eq!(
            layout.user_path(&smeared, FitMode::Free),
            Path::new("json/USER/User_Smeared_orca6_STD_IO_hard_cut_systematics_free.json")
        );
    }

    #[test]
    fn test_record_paths() {
        let layout = ConfigLayout::new("json");
        assert_eq!(
            layout.variables_path(Channel::Std, None, Scenario::Nominal),
            Path::new("json/ANTARES/variables_ANTARES_STD.json")
        );
        let asymmetric = Smearing {
            level: SmearLevel::Percent(10),
            asymmetry: Asymmetry::new(2.0, 1.0).unwrap(),
        };
        assert_eq!(
            layout.variables_path(Channel::Tau, Some(&asymmetric), Scenario::Nominal),
            Path::new("json/ANTARES/variables_ANTARES_TAU_Smeared_10_1.0_2.0.json")
        );
        assert_eq!(
            layout.variables_path(Channel::Tau, None, Scenario::Realistic),
            Path::new("json/ANTARES/variables_ANTARES_TAU_Realistic.json")
        );
        assert_eq!(
            layout.classes_path(CutPolicy::IsNnfit, Reconstruction::Smeared, Some(SmearLevel::Antares)),
            Path::new("json/ANTARES/classes_ANTARES_is_nnfit_Smeared_antares.json")
        );
        assert_eq!(
            layout.binning_path(15),
            Path::new("json/ANTARES/binning_ANTARES_16.json")
        );
        assert_eq!(
            layout.template_path(MassOrdering::Inverted),
            Path::new("json/PARAMETERS/params_template_IO.json")
        );
        assert_eq!(
            layout.parameters_path(MassOrdering::Inverted, Systematics::Systematics, FitMode::Fixed),
            Path::new("json/PARAMETERS/parameters_Data_NO_Model_IO_systematics_fixed.json")
        );
    }

    #[test]
    fn test_output_dirs() {
        let base = Path::new("runs");
        assert_eq!(
            unsmeared_output_dir(
                base,
                CutPolicy::MuonFree,
                Systematics::Systematics,
                Reconstruction::AaFitAnn,
                Channel::Tau,
                MassOrdering::Normal,
                FitMode::Free
            ),
            Path::new("runs/output/ANTARES/muon_free/unsmeared/systematics/AAFit_ann/TAU/NO/free")
        );
        assert_eq!(
            smeared_output_dir(
                base,
                CutPolicy::MuonFree,
                SmearLevel::Percent(200),
                Systematics::NoSystematics,
                Channel::Std,
                MassOrdering::Inverted,
                FitMode::Fixed
            ),
            Path::new("runs/output/ANTARES/muon_free/smeared/200_percent/no_systematics/STD/IO/fixed")
        );
    }

    #[test]
    fn test_create_output_dirs_twice() {
        let dir = tempdir().unwrap();
        let levels = [SmearLevel::Orca6];

        let first = create_output_dirs(dir.path(), CutPolicy::MuonFree, &levels).unwrap();
        // 2 sys x 2 channels x 2 orders x 2 modes x (5 recos + 1 level) + 2 x 3 plot dirs
        assert_eq!(first.created.len(), 2 * 2 * 2 * 2 * 6 + 6);
        assert!(first.existing.is_empty());

        let second = create_output_dirs(dir.path(), CutPolicy::MuonFree, &levels).unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.existing.len(), first.created.len());
    }

    #[test]
    fn test_ensure_creates_record_dirs() {
        let dir = tempdir().unwrap();
        let layout = ConfigLayout::new(dir.path().join("json"));
        layout.ensure().unwrap();
        assert!(layout.user_dir().is_dir());
        assert!(layout.antares_dir().is_dir());
        assert!(layout.parameters_dir().is_dir());
    }
}

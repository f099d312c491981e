//! Combinations of categorical inputs and their generation.

use std::fmt;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::artifact::{write_if_absent, WriteOutcome};
use super::builder::{
    build_binning, build_classes, build_parameters, build_template, build_user, build_variables,
};
use super::layout::ConfigLayout;
use super::options::{
    Channel, CutPolicy, FitMode, MassOrdering, Reconstruction, Scenario, SmearLevel, Smearing,
    Systematics,
};
use super::GenerateError;

/// Number of log-spaced reconstructed-energy edges used by default
pub const DEFAULT_ENERGY_BINS: usize = 15;

/// One combination of categorical inputs
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Analysis channel
    pub channel: Channel,
    /// Reconstruction algorithm
    pub reconstruction: Reconstruction,
    /// Model mass ordering
    pub ordering: MassOrdering,
    /// Systematics option
    pub systematics: Systematics,
    /// Cut policy
    pub cut: CutPolicy,
    /// Smearing, only with [`Reconstruction::Smeared`]
    pub smearing: Option<Smearing>,
    /// Detector scenario
    pub scenario: Scenario,
    /// Requested scan points; the systematics default when `None`
    pub scan_points: Option<usize>,
    /// Number of log-spaced reconstructed-energy edges
    pub energy_bins: usize,
}

impl Combination {
    /// Nominal, unsmeared combination with default scan and binning
    pub fn new(
        channel: Channel,
        reconstruction: Reconstruction,
        ordering: MassOrdering,
        systematics: Systematics,
        cut: CutPolicy,
    ) -> Self {
        Self {
            channel,
            reconstruction,
            ordering,
            systematics,
            cut,
            smearing: None,
            scenario: Scenario::Nominal,
            scan_points: None,
            energy_bins: DEFAULT_ENERGY_BINS,
        }
    }

    /// Set the smearing
    pub fn with_smearing(mut self, smearing: Smearing) -> Self {
        self.smearing = Some(smearing);
        self
    }

    /// Set the scenario
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }

    /// Set the scan points of fixed mode
    pub fn with_scan_points(mut self, points: usize) -> Self {
        self.scan_points = Some(points);
        self
    }

    /// Set the number of log-spaced energy edges
    pub fn with_energy_bins(mut self, bins: usize) -> Self {
        self.energy_bins = bins;
        self
    }

    /// Scan points of fixed mode
    pub fn scan_points(&self) -> usize {
        self.scan_points
            .unwrap_or_else(|| self.systematics.default_scan_points())
    }

    /// Reject combinations no record can describe
    pub fn validate(&self) -> Result<(), GenerateError> {
        match (self.reconstruction, &self.smearing) {
            (Reconstruction::Smeared, None) => return Err(GenerateError::MissingSmearLevel),
            (reco, Some(smearing)) if reco != Reconstruction::Smeared => {
                return Err(GenerateError::InvalidCombination(format!(
                    "smear level {} requires reconstruction Smeared, got {}",
                    smearing.level, reco
                )));
            }
            _ => {}
        }

        if self.scenario == Scenario::Realistic && self.smearing.is_some() {
            return Err(GenerateError::InvalidCombination(
                "the realistic scenario cannot be smeared".to_string(),
            ));
        }
        if self.scan_points == Some(0) {
            return Err(GenerateError::InvalidCombination(
                "scan needs at least one point".to_string(),
            ));
        }
        if self.energy_bins == 0 {
            return Err(GenerateError::InvalidCombination(
                "binning needs at least one energy edge".to_string(),
            ));
        }
        Ok(())
    }

    /// Every combination of one cut policy
    ///
    /// Unsmeared reconstructions × channels × orderings × systematics, followed
    /// by channels × orderings × systematics × `levels` with the Smeared
    /// reconstruction.
    pub fn all(cut: CutPolicy, levels: &[SmearLevel]) -> Vec<Combination> {
        let mut combinations = Vec::new();

        for reconstruction in Reconstruction::UNSMEARED {
            for channel in Channel::ALL {
                for ordering in MassOrdering::ALL {
                    for systematics in Systematics::ALL {
                        combinations.push(Self::new(
                            channel,
                            reconstruction,
                            ordering,
                            systematics,
                            cut,
                        ));
                    }
                }
            }
        }

        for channel in Channel::ALL {
            for ordering in MassOrdering::ALL {
                for systematics in Systematics::ALL {
                    for &level in levels {
                        combinations.push(
                            Self::new(
                                channel,
                                Reconstruction::Smeared,
                                ordering,
                                systematics,
                                cut,
                            )
                            .with_smearing(Smearing::new(level)),
                        );
                    }
                }
            }
        }

        combinations
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.reconstruction, self.channel, self.ordering, self.cut, self.systematics
        )?;
        if let Some(smearing) = &self.smearing {
            write!(f, " smeared {}", smearing.tag())?;
        }
        if self.scenario == Scenario::Realistic {
            write!(f, " realistic")?;
        }
        Ok(())
    }
}

/// One artifact touched by a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    /// Target path
    pub path: PathBuf,
    /// Whether it was written
    pub outcome: WriteOutcome,
}

/// Artifacts of one or more generated combinations, in write order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Artifacts in write order
    pub artifacts: Vec<ArtifactEntry>,
}

impl GenerationReport {
    /// Artifacts that were written
    pub fn created(&self) -> impl Iterator<Item = &Path> {
        self.paths(WriteOutcome::Created)
    }

    /// Artifacts that already existed
    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.paths(WriteOutcome::Skipped)
    }

    fn paths(&self, outcome: WriteOutcome) -> impl Iterator<Item = &Path> {
        self.artifacts
            .iter()
            .filter(move |a| a.outcome == outcome)
            .map(|a| a.path.as_path())
    }

    /// Append the artifacts of another report
    pub fn merge(&mut self, other: GenerationReport) {
        self.artifacts.extend(other.artifacts);
    }

    fn record<T: Serialize>(&mut self, path: PathBuf, record: &T) -> Result<(), GenerateError> {
        let outcome = write_if_absent(&path, record)?;
        if outcome == WriteOutcome::Created {
            info!("Wrote {}", path.display());
        }
        self.artifacts.push(ArtifactEntry { path, outcome });
        Ok(())
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::style;

            let mut output = String::new();
            for artifact in &self.artifacts {
                let status = match artifact.outcome {
                    WriteOutcome::Created => style("created").green(),
                    WriteOutcome::Skipped => style("skipped").yellow(),
                };
                output.push_str(&format!("[{}] {}\n", status, artifact.path.display()));
            }
            output.push_str(&format!(
                "\n{}: {} created, {} skipped\n",
                style("Summary").bold(),
                style(self.created().count()).green(),
                style(self.skipped().count()).yellow()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for artifact in &self.artifacts {
            writeln!(f, "[{}] {}", artifact.outcome, artifact.path.display())?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} created, {} skipped",
            self.created().count(),
            self.skipped().count()
        )
    }
}

/// Build and write every record of one combination
///
/// All records are built before the first write, so a lookup failure leaves
/// no partial output. Records are then written in the order user (fixed,
/// free), variables, classes, template, parameters (fixed, free), binning.
pub fn generate_combination(
    layout: &ConfigLayout,
    combination: &Combination,
) -> Result<GenerationReport, GenerateError> {
    combination.validate()?;

    let users = FitMode::ALL.map(|mode| build_user(combination, mode));
    let variables = build_variables(
        combination.channel,
        combination.smearing.as_ref(),
        combination.scenario,
    );
    let classes = build_classes(combination.reconstruction, combination.cut);
    let template = build_template(combination.ordering);
    let mut parameters = Vec::with_capacity(FitMode::ALL.len());
    for mode in FitMode::ALL {
        parameters.push(build_parameters(
            combination.ordering,
            combination.systematics,
            mode,
        )?);
    }
    let binning = build_binning(combination.energy_bins);

    layout.ensure()?;
    info!("Generating {}", combination);

    let mut report = GenerationReport::default();
    for (mode, user) in FitMode::ALL.into_iter().zip(&users) {
        report.record(layout.user_path(combination, mode), user)?;
    }
    report.record(
        layout.variables_path(
            combination.channel,
            combination.smearing.as_ref(),
            combination.scenario,
        ),
        &variables,
    )?;
    report.record(
        layout.classes_path(
            combination.cut,
            combination.reconstruction,
            combination.smearing.map(|s| s.level),
        ),
        &classes,
    )?;
    report.record(layout.template_path(combination.ordering), &template)?;
    for (mode, table) in FitMode::ALL.into_iter().zip(&parameters) {
        report.record(
            layout.parameters_path(combination.ordering, combination.systematics, mode),
            table,
        )?;
    }
    report.record(layout.binning_path(combination.energy_bins), &binning)?;

    Ok(report)
}

/// Generate every combination in order, stopping at the first failure
pub fn generate_all(
    layout: &ConfigLayout,
    combinations: &[Combination],
) -> Result<GenerationReport, GenerateError> {
    let mut report = GenerationReport::default();
    for combination in combinations {
        report.merge(generate_combination(layout, combination)?);
    }
    Ok(report)
}

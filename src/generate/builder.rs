//! Record builders.
//!
//! Builders are pure: they turn a [`Combination`] into records and never touch
//! the filesystem. Writing is done by [`super::artifact`].

use super::options::{
    BranchNames, Channel, CutPolicy, FitMode, MassOrdering, Reconstruction, Scenario, Smearing,
    Systematics,
};
use super::plan::Combination;
use super::records::{
    Binning, BinningRecord, ClassReconstructions, ClassesRecord, EventClass, ParametersRecord,
    UserRecord, UserSettings, Variables, VariablesRecord,
};
use super::templates::{base_variables, parameter_template, SCANNED_PARAMETER, SYSTEMATIC_PARAMETERS};
use super::GenerateError;

/// Lower edge of the reconstructed-energy binning in GeV
pub const ENERGY_RECO_MIN: f64 = 10.0;
/// Upper log-spaced edge of the reconstructed-energy binning in GeV
pub const ENERGY_RECO_MAX: f64 = 100.0;
/// Overflow edge appended after the log-spaced edges
pub const ENERGY_RECO_OVERFLOW: f64 = 1000.0;

/// Text stored in `smear_level` for unsmeared records
pub const UNSMEARED_LEVEL: &str = "0";

/// Build the run-parameter record of `combination` for one fit mode
pub fn build_user(combination: &Combination, mode: FitMode) -> UserRecord {
    let (npoints, parmin, parmax) = mode.scan(combination.scan_points());
    let smear_level = combination
        .smearing
        .map(|smearing| smearing.level.to_string())
        .unwrap_or_else(|| UNSMEARED_LEVEL.to_string());

    UserRecord {
        user: UserSettings {
            parname: SCANNED_PARAMETER.to_string(),
            npoints,
            parmin,
            parmax,
            fit_mode: mode,
            ordering: combination.ordering,
            experiment: combination.channel,
            reco: combination.reconstruction,
            both_octants: true,
            systematics: combination.systematics,
            cut_option: combination.cut,
            is_smeared: combination.smearing.is_some(),
            smear_level,
        },
    }
}

/// Build the experiment description for a channel
///
/// The smeared variant points at the smeared event file; the realistic
/// scenario reads its own file and enables muons and the smearing machine.
pub fn build_variables(
    channel: Channel,
    smearing: Option<&Smearing>,
    scenario: Scenario,
) -> VariablesRecord {
    let mut variables: Variables = base_variables(channel);

    if let Some(smearing) = smearing {
        let tag = smearing.tag();
        variables.mc_label = format!("ANTARES_Smeared_{}", tag);
        variables.selected_events_filename = vec![format!("antares_smeared_{}.root", tag)];
    } else if scenario == Scenario::Realistic {
        variables.mc_label = "ANTARES_Realistic".to_string();
        variables.selected_events_filename = vec!["antares_realistic.root".to_string()];
        variables.set_muons = true;
        variables.enable_smear_machine = true;
    }

    VariablesRecord { variables }
}

/// Track selection: muon neutrinos and tau neutrinos with interaction type 2
pub fn track_cut(cut: CutPolicy) -> String {
    format!(
        "((abs(type) == 14) || (abs(type) == 16 && interaction_type == 2)) && ({})",
        cut.selection()
    )
}

/// Shower selection
pub fn shower_cut(cut: CutPolicy) -> String {
    format!(
        "(!(abs(type) == 14) || (abs(type) == 16 && interaction_type == 2)) && ({})",
        cut.selection()
    )
}

fn event_class(name: &str, cut: String, branches: BranchNames, norm: &str) -> EventClass {
    EventClass {
        name: name.to_string(),
        general_cut: cut.clone(),
        muon_loose_cut: cut,
        reconstructions: ClassReconstructions {
            energy: branches.energy.to_string(),
            cos_zenith: branches.cos_zenith.to_string(),
            bjorken_y: branches.bjorken_y.to_string(),
        },
        class_norm: norm.to_string(),
    }
}

/// Build the two event classes, tracks first
pub fn build_classes(reconstruction: Reconstruction, cut: CutPolicy) -> ClassesRecord {
    ClassesRecord {
        classes: vec![
            event_class(
                "tracks",
                track_cut(cut),
                reconstruction.track_branches(),
                "TrackNorm",
            ),
            event_class(
                "showers",
                shower_cut(cut),
                reconstruction.branches(),
                "ShowerNorm",
            ),
        ],
    }
}

/// Build the parameter table for an ordering, systematics option and fit mode
///
/// Starts from the ordering's template, releases the systematic parameters
/// when systematics are enabled, then fixes the scanned parameter in fixed
/// mode and frees it in free mode.
pub fn build_parameters(
    ordering: MassOrdering,
    systematics: Systematics,
    mode: FitMode,
) -> Result<ParametersRecord, GenerateError> {
    let mut parameters = parameter_template(ordering);

    if systematics.enabled() {
        for name in SYSTEMATIC_PARAMETERS {
            parameters
                .get_mut(name)
                .ok_or_else(|| GenerateError::UnknownParameter(name.to_string()))?
                .fixed = false;
        }
    }

    parameters
        .get_mut(SCANNED_PARAMETER)
        .ok_or_else(|| GenerateError::UnknownParameter(SCANNED_PARAMETER.to_string()))?
        .fixed = mode == FitMode::Fixed;

    Ok(ParametersRecord { parameters })
}

/// Bare template of an ordering, as persisted next to the parameter tables
pub fn build_template(ordering: MassOrdering) -> ParametersRecord {
    ParametersRecord {
        parameters: parameter_template(ordering),
    }
}

/// `n` log-spaced edges from 10 to 100 GeV rounded to 4 decimals, then 1000 GeV
pub fn energy_edges(n: usize) -> Vec<f64> {
    let log_min = ENERGY_RECO_MIN.log10();
    let log_max = ENERGY_RECO_MAX.log10();
    let step = if n > 1 {
        (log_max - log_min) / (n - 1) as f64
    } else {
        0.0
    };

    (0..n)
        .map(|i| {
            let edge = 10f64.powf(log_min + step * i as f64);
            (edge * 1e4).round() / 1e4
        })
        .chain(std::iter::once(ENERGY_RECO_OVERFLOW))
        .collect()
}

/// Build the binning record with `n` log-spaced reconstructed-energy edges
pub fn build_binning(n: usize) -> BinningRecord {
    BinningRecord {
        binning: Binning {
            n_energy_bins_true: 30,
            energy_min_true: 1,
            energy_max_true: 100,
            n_energy_bins_reco: 20,
            energy_min_reco: 10,
            energy_max_reco: 100,
            n_cos_zenith_bins_true: 40,
            n_cos_zenith_bins_reco: 25,
            n_bjorken_y_bins_true: 1,
            n_bjorken_y_bins_reco: 1,
            custom: true,
            custom_energy_bins_reco: energy_edges(n),
        },
    }
}

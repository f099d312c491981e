//! Integration tests for configuration record generation
//!
//! These tests drive the public generation API against temporary directories
//! and check the written JSON the way the fitter reads it.

use nutau::generate::{
    generate_all, generate_combination, Asymmetry, Channel, ClassesRecord, Combination,
    ConfigLayout, CutPolicy, FitMode, MassOrdering, ParametersRecord, Reconstruction, Scenario,
    SmearLevel, Smearing, Systematics, UserRecord, VariablesRecord, SYSTEMATIC_PARAMETERS,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Test that the written files match the records the builders produce
#[test]
fn test_written_records_parse_back() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path().join("json"));
    let combination = Combination::new(
        Channel::Tau,
        Reconstruction::NnFitFull,
        MassOrdering::Inverted,
        Systematics::Systematics,
        CutPolicy::MuonFree,
    );

    let report = generate_combination(&layout, &combination).unwrap();
    assert_eq!(report.created().count(), 8);

    let user: UserRecord =
        serde_json::from_str(&fs::read_to_string(layout.user_path(&combination, FitMode::Fixed)).unwrap())
            .unwrap();
    assert_eq!(user.user.npoints, 15);
    assert_eq!(user.user.reco, Reconstruction::NnFitFull);

    let classes: ClassesRecord = serde_json::from_str(
        &fs::read_to_string(layout.classes_path(
            CutPolicy::MuonFree,
            Reconstruction::NnFitFull,
            None,
        ))
        .unwrap(),
    )
    .unwrap();
    assert_eq!(classes.classes[0].reconstructions.energy, "NNFitTrack_Energy");
    assert_eq!(classes.classes[1].reconstructions.energy, "NNFitShower_Energy");

    let parameters: ParametersRecord = serde_json::from_str(
        &fs::read_to_string(layout.parameters_path(
            MassOrdering::Inverted,
            Systematics::Systematics,
            FitMode::Fixed,
        ))
        .unwrap(),
    )
    .unwrap();
    let free: Vec<&str> = parameters
        .parameters
        .iter()
        .filter(|(_, p)| !p.fixed)
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(free, SYSTEMATIC_PARAMETERS.to_vec());
}

/// Test the JSON text layout: 4-space indentation and field names of the fitter
#[test]
fn test_json_layout() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let combination = Combination::new(
        Channel::Std,
        Reconstruction::Mc,
        MassOrdering::Normal,
        Systematics::NoSystematics,
        CutPolicy::HardCut,
    );
    generate_combination(&layout, &combination).unwrap();

    let text = fs::read_to_string(layout.user_path(&combination, FitMode::Free)).unwrap();
    assert!(text.starts_with("{\n    \"user\": {\n        \"parname\": \"TauNorm\","));

    let user = read_json(&layout.user_path(&combination, FitMode::Free));
    assert_eq!(user["user"]["npoints"], 1);
    assert_eq!(user["user"]["parmin"], 0.5);
    assert_eq!(user["user"]["parmax"], 0.5);
    assert_eq!(user["user"]["type"], "free");
    assert_eq!(user["user"]["smear_level"], "0");
    assert_eq!(user["user"]["is_smeared"], false);

    let variables = read_json(&layout.variables_path(Channel::Std, None, Scenario::Nominal));
    assert_eq!(variables["variables"]["MClabel"], "ANTARES");
    assert_eq!(variables["variables"]["Experiment_Type"], "Std");
    assert_eq!(variables["variables"]["exposure_nyears"], 12.433);

    let binning = read_json(&layout.binning_path(15));
    let edges = binning["binning"]["custom_EbinsReco"].as_array().unwrap();
    assert_eq!(edges.len(), 16);
    assert_eq!(edges[15], 1000.0);

    let template = read_json(&layout.template_path(MassOrdering::Normal));
    assert_eq!(template["parameters"]["Dm31"]["vModel"], 0.002517);
    assert_eq!(template["parameters"]["TauNorm"]["prior_sigma"], 0.2);
}

/// Test that only the variables record of an asymmetric combination carries the asymmetry tag
#[test]
fn test_smeared_asymmetric_names() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let smearing = Smearing {
        level: SmearLevel::Percent(50),
        asymmetry: Asymmetry::new(2.0, 0.5).unwrap(),
    };
    let combination = Combination::new(
        Channel::Tau,
        Reconstruction::Smeared,
        MassOrdering::Normal,
        Systematics::NoSystematics,
        CutPolicy::MuonFree,
    )
    .with_smearing(smearing);

    generate_combination(&layout, &combination).unwrap();

    let user_path = dir
        .path()
        .join("USER/User_Smeared_50_TAU_NO_muon_free_no_systematics_fixed.json");
    assert!(user_path.is_file());
    let user = read_json(&user_path);
    assert_eq!(user["user"]["is_smeared"], true);
    assert_eq!(user["user"]["smear_level"], "50");

    let variables_path = dir
        .path()
        .join("ANTARES/variables_ANTARES_TAU_Smeared_50_0.5_2.0.json");
    let variables: VariablesRecord =
        serde_json::from_str(&fs::read_to_string(variables_path).unwrap()).unwrap();
    assert_eq!(variables.variables.mc_label, "ANTARES_Smeared_50_0.5_2.0");
    assert_eq!(
        variables.variables.selected_events_filename,
        vec!["antares_smeared_50_0.5_2.0.root".to_string()]
    );

    assert!(dir
        .path()
        .join("ANTARES/classes_ANTARES_muon_free_Smeared_50.json")
        .is_file());
}

/// Test that a second full run writes nothing and leaves the files untouched
#[test]
fn test_rerun_is_a_no_op() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let combinations = Combination::all(CutPolicy::IsAafit, &[SmearLevel::Antares]);

    let first = generate_all(&layout, &combinations).unwrap();
    assert!(first.created().count() > 0);

    let edited = layout.parameters_path(MassOrdering::Normal, Systematics::Systematics, FitMode::Free);
    fs::write(&edited, "{}").unwrap();

    let second = generate_all(&layout, &combinations).unwrap();
    assert_eq!(second.created().count(), 0);
    assert_eq!(second.skipped().count(), first.artifacts.len());
    assert_eq!(fs::read_to_string(&edited).unwrap(), "{}");
}

/// Test that a failing combination aborts the run after the earlier ones were written
#[test]
fn test_failure_stops_generation() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let good = Combination::new(
        Channel::Tau,
        Reconstruction::Mc,
        MassOrdering::Normal,
        Systematics::NoSystematics,
        CutPolicy::MuonFree,
    );
    let bad = Combination::new(
        Channel::Tau,
        Reconstruction::Smeared,
        MassOrdering::Normal,
        Systematics::NoSystematics,
        CutPolicy::MuonFree,
    );
    let after = good.clone().with_scenario(Scenario::Realistic);

    assert!(generate_all(&layout, &[good.clone(), bad, after]).is_err());
    assert!(layout.user_path(&good, FitMode::Fixed).is_file());
    assert!(!layout
        .variables_path(Channel::Tau, None, Scenario::Realistic)
        .exists());
}

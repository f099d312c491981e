use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use super::*;

fn combination(ordering: MassOrdering, systematics: Systematics) -> Combination {
    Combination::new(
        Channel::Tau,
        Reconstruction::NnFitFull,
        ordering,
        systematics,
        CutPolicy::MuonFree,
    )
}

fn free_parameters(record: &ParametersRecord) -> Vec<&str> {
    record
        .parameters
        .iter()
        .filter(|(_, p)| !p.fixed)
        .map(|(name, _)| name.as_str())
        .collect()
}

#[test]
fn test_normal_ordering_without_systematics() {
    let record =
        build_parameters(MassOrdering::Normal, Systematics::NoSystematics, FitMode::Fixed).unwrap();
    let template = parameter_template(MassOrdering::Normal);

    assert!(record.parameters[SCANNED_PARAMETER].fixed);
    for (name, parameter) in &record.parameters {
        assert_eq!(parameter.fixed, template[name].fixed, "{}", name);
    }
    assert!(free_parameters(&record).is_empty());
}

#[test]
fn test_inverted_ordering_with_systematics() {
    let record =
        build_parameters(MassOrdering::Inverted, Systematics::Systematics, FitMode::Fixed).unwrap();
    let template = parameter_template(MassOrdering::Inverted);

    assert_eq!(SYSTEMATIC_PARAMETERS.len(), 12);
    assert_eq!(free_parameters(&record), SYSTEMATIC_PARAMETERS.to_vec());
    for (name, parameter) in &record.parameters {
        if !SYSTEMATIC_PARAMETERS.contains(&name.as_str()) {
            assert_eq!(parameter.fixed, template[name].fixed, "{}", name);
        }
    }
}

#[test]
fn test_templates_differ_only_in_oscillation_model() {
    let normal = parameter_template(MassOrdering::Normal);
    let inverted = parameter_template(MassOrdering::Inverted);

    assert_eq!(normal.len(), 17);
    assert!(normal.keys().eq(inverted.keys()));
    assert_eq!(inverted["Dm31"].model, -2.4238e-03);
    assert_eq!(inverted["DeltaCP"].model, 282.0);
    assert_eq!(inverted["Theta23"].model, 49.3);
    for (name, parameter) in &normal {
        assert_eq!(parameter.data, inverted[name].data, "{}", name);
    }
    for name in SYSTEMATIC_PARAMETERS.iter().skip(2) {
        assert_eq!(normal[*name], inverted[*name]);
    }
}

#[test]
fn test_every_parameter_has_five_fields() {
    let json = to_json_bytes(&build_template(MassOrdering::Normal)).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    for (name, entry) in value["parameters"].as_object().unwrap() {
        let mut keys: Vec<&str> = entry.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["fixed", "prior", "prior_mean", "prior_sigma", "vData", "vModel"],
            "{}",
            name
        );
    }
}

#[test]
fn test_nnfit_full_track_override() {
    let classes = build_classes(Reconstruction::NnFitFull, CutPolicy::MuonFree).classes;
    let tracks = &classes[0];
    let showers = &classes[1];

    assert_eq!(tracks.name, "tracks");
    assert_eq!(tracks.reconstructions.energy, "NNFitTrack_Energy");
    assert_eq!(tracks.reconstructions.cos_zenith, "NNFitTrack_cos_zenith");
    assert_eq!(showers.name, "showers");
    assert_eq!(showers.reconstructions.energy, "NNFitShower_Energy");
    assert_eq!(showers.reconstructions.cos_zenith, "NNFitShower_cos_zenith");
    assert!(tracks.general_cut.ends_with("&& (cos_zenith_recoTrue < 0)"));
}

#[test]
fn test_free_mode_collapses_scan() {
    let combo = combination(MassOrdering::Normal, Systematics::NoSystematics).with_scan_points(21);
    let free = build_user(&combo, FitMode::Free).user;
    assert_eq!(free.npoints, 1);
    assert_eq!((free.parmin, free.parmax), (0.5, 0.5));

    let fixed = build_user(&combo, FitMode::Fixed).user;
    assert_eq!(fixed.npoints, 21);
    assert_eq!((fixed.parmin, fixed.parmax), (0.0, 2.0));
}

#[test]
fn test_user_record_fields() {
    let combo = combination(MassOrdering::Inverted, Systematics::Systematics);
    let user = build_user(&combo, FitMode::Fixed).user;
    assert_eq!(user.parname, "TauNorm");
    assert_eq!(user.npoints, 15);
    assert!(user.both_octants);
    assert!(!user.is_smeared);
    assert_eq!(user.smear_level, UNSMEARED_LEVEL);

    let value = serde_json::to_value(build_user(&combo, FitMode::Free)).unwrap();
    assert_eq!(value["user"]["type"], "free");
    assert_eq!(value["user"]["ordering"], "IO");
    assert_eq!(value["user"]["experiment"], "TAU");
    assert_eq!(value["user"]["reco"], "NNFit_full");
    assert_eq!(value["user"]["systematics"], "systematics");
    assert_eq!(value["user"]["cut_option"], "muon_free");
}

/// The fitter appends `_percent` to any level other than the named detectors
/// and reads its output from the directory tree created ahead of the fit
fn fitter_output_dir(base: &std::path::Path, user: &UserSettings) -> std::path::PathBuf {
    let level = match user.smear_level.as_str() {
        "orca6" | "orca115" | "antares" => user.smear_level.clone(),
        other => format!("{}_percent", other),
    };
    base.join("output")
        .join("ANTARES")
        .join(user.cut_option.to_string())
        .join("smeared")
        .join(level)
        .join(user.systematics.to_string())
        .join(user.experiment.to_string())
        .join(user.ordering.to_string())
        .join(user.fit_mode.to_string())
}

#[test]
fn test_smeared_user_matches_output_dirs() {
    let base = std::path::Path::new("runs");
    let smearings = [
        Smearing::new(SmearLevel::Percent(50)),
        Smearing::new(SmearLevel::Orca6),
        Smearing {
            level: SmearLevel::Antares,
            asymmetry: Asymmetry::new(1.0, 0.5).unwrap(),
        },
    ];

    for smearing in smearings {
        let combination = Combination::new(
            Channel::Std,
            Reconstruction::Smeared,
            MassOrdering::Inverted,
            Systematics::Systematics,
            CutPolicy::IsAafit,
        )
        .with_smearing(smearing);

        for mode in FitMode::ALL {
            let user = build_user(&combination, mode).user;
            assert_eq!(user.smear_level, smearing.level.to_string());
            assert_eq!(
                fitter_output_dir(base, &user),
                smeared_output_dir(
                    base,
                    CutPolicy::IsAafit,
                    smearing.level,
                    Systematics::Systematics,
                    Channel::Std,
                    MassOrdering::Inverted,
                    mode,
                )
            );
        }
    }
}

#[test]
fn test_records_round_trip() {
    let combo = Combination::new(
        Channel::Std,
        Reconstruction::Smeared,
        MassOrdering::Inverted,
        Systematics::Systematics,
        CutPolicy::HardCut,
    )
    .with_smearing(Smearing {
        level: SmearLevel::Orca115,
        asymmetry: Asymmetry::new(1.0, 0.5).unwrap(),
    });

    let user = build_user(&combo, FitMode::Fixed);
    let parsed: UserRecord = serde_json::from_slice(&to_json_bytes(&user).unwrap()).unwrap();
    assert_eq!(parsed, user);

    let variables = build_variables(combo.channel, combo.smearing.as_ref(), combo.scenario);
    let parsed: VariablesRecord =
        serde_json::from_slice(&to_json_bytes(&variables).unwrap()).unwrap();
    assert_eq!(parsed, variables);

    let classes = build_classes(combo.reconstruction, combo.cut);
    let parsed: ClassesRecord = serde_json::from_slice(&to_json_bytes(&classes).unwrap()).unwrap();
    assert_eq!(parsed, classes);

    let parameters = build_parameters(combo.ordering, combo.systematics, FitMode::Free).unwrap();
    let parsed: ParametersRecord =
        serde_json::from_slice(&to_json_bytes(&parameters).unwrap()).unwrap();
    assert_eq!(parsed, parameters);

    let binning = build_binning(combo.energy_bins);
    let parsed: BinningRecord = serde_json::from_slice(&to_json_bytes(&binning).unwrap()).unwrap();
    assert_eq!(parsed, binning);
}

#[test]
fn test_serialized_key_order() {
    let text = String::from_utf8(to_json_bytes(&build_binning(3)).unwrap()).unwrap();
    let first = text.find("nEbinsTrue").unwrap();
    let last = text.find("custom_EbinsReco").unwrap();
    assert!(first < last);
    assert!(text.contains("\n        \"custom\": true,"));

    let text =
        String::from_utf8(to_json_bytes(&build_template(MassOrdering::Normal)).unwrap()).unwrap();
    assert!(text.find("\"Dm21\"").unwrap() < text.find("\"ShowerNorm\"").unwrap());
}

#[test]
fn test_generate_twice_writes_once() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let combo = combination(MassOrdering::Normal, Systematics::NoSystematics);

    let first = generate_combination(&layout, &combo).unwrap();
    assert_eq!(first.created().count(), 8);
    assert_eq!(first.skipped().count(), 0);

    let path = layout.user_path(&combo, FitMode::Fixed);
    let before = fs::read(&path).unwrap();

    let second = generate_combination(&layout, &combo).unwrap();
    assert_eq!(second.created().count(), 0);
    assert_eq!(second.skipped().count(), 8);
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_generate_write_order() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let combo = combination(MassOrdering::Inverted, Systematics::Systematics);

    let report = generate_combination(&layout, &combo).unwrap();
    let paths: Vec<_> = report.artifacts.iter().map(|a| a.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            layout.user_path(&combo, FitMode::Fixed),
            layout.user_path(&combo, FitMode::Free),
            layout.variables_path(Channel::Tau, None, Scenario::Nominal),
            layout.classes_path(CutPolicy::MuonFree, Reconstruction::NnFitFull, None),
            layout.template_path(MassOrdering::Inverted),
            layout.parameters_path(MassOrdering::Inverted, Systematics::Systematics, FitMode::Fixed),
            layout.parameters_path(MassOrdering::Inverted, Systematics::Systematics, FitMode::Free),
            layout.binning_path(DEFAULT_ENERGY_BINS),
        ]
    );
}

#[test]
fn test_shared_records_are_skipped_across_combinations() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path());
    let combinations = [
        combination(MassOrdering::Normal, Systematics::NoSystematics),
        combination(MassOrdering::Normal, Systematics::Systematics),
    ];

    let report = generate_all(&layout, &combinations).unwrap();
    // variables, classes, template and binning are shared by both combinations
    assert_eq!(report.created().count(), 12);
    assert_eq!(report.skipped().count(), 4);
}

#[test]
fn test_invalid_combinations_write_nothing() {
    let dir = tempdir().unwrap();
    let layout = ConfigLayout::new(dir.path().join("json"));

    let missing_level = Combination::new(
        Channel::Std,
        Reconstruction::Smeared,
        MassOrdering::Normal,
        Systematics::NoSystematics,
        CutPolicy::MuonFree,
    );
    assert!(matches!(
        generate_combination(&layout, &missing_level),
        Err(GenerateError::MissingSmearLevel)
    ));

    let stray_level = combination(MassOrdering::Normal, Systematics::NoSystematics)
        .with_smearing(Smearing::new(SmearLevel::Orca6));
    assert!(matches!(
        generate_combination(&layout, &stray_level),
        Err(GenerateError::InvalidCombination(_))
    ));

    let realistic_smeared = missing_level
        .with_smearing(Smearing::new(SmearLevel::Orca6))
        .with_scenario(Scenario::Realistic);
    assert!(matches!(
        generate_combination(&layout, &realistic_smeared),
        Err(GenerateError::InvalidCombination(_))
    ));

    assert!(!layout.root().exists());
}

#[test]
fn test_all_combinations() {
    let combinations = Combination::all(CutPolicy::MuonFree, &SmearLevel::CATALOG);
    assert_eq!(combinations.len(), 5 * 2 * 2 * 2 + 2 * 2 * 2 * 9);
    assert!(combinations.iter().all(|c| c.validate().is_ok()));
    assert_eq!(
        combinations
            .iter()
            .filter(|c| c.reconstruction == Reconstruction::Smeared)
            .count(),
        72
    );
}

fn any_combination() -> impl Strategy<Value = Combination> {
    (
        prop::sample::select(Channel::ALL.to_vec()),
        prop::sample::select(Reconstruction::UNSMEARED.to_vec()),
        prop::sample::select(MassOrdering::ALL.to_vec()),
        prop::sample::select(Systematics::ALL.to_vec()),
        prop::sample::select(CutPolicy::ALL.to_vec()),
        1usize..50,
    )
        .prop_map(|(channel, reco, ordering, systematics, cut, points)| {
            Combination::new(channel, reco, ordering, systematics, cut).with_scan_points(points)
        })
}

proptest! {
    #[test]
    fn prop_scanned_parameter_follows_mode(combo in any_combination()) {
        for mode in FitMode::ALL {
            let record = build_parameters(combo.ordering, combo.systematics, mode).unwrap();
            prop_assert_eq!(record.parameters[SCANNED_PARAMETER].fixed, mode == FitMode::Fixed);
            prop_assert_eq!(record.parameters.len(), 17);
        }
    }

    #[test]
    fn prop_user_record_round_trips(combo in any_combination()) {
        for mode in FitMode::ALL {
            let user = build_user(&combo, mode);
            let parsed: UserRecord =
                serde_json::from_slice(&to_json_bytes(&user).unwrap()).unwrap();
            prop_assert_eq!(parsed, user);
        }
    }
}

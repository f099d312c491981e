//! Base records the builders start from.

use indexmap::IndexMap;

use super::options::{Channel, MassOrdering};
use super::records::{Parameter, Variables};

/// Parameter whose normalization is scanned
pub const SCANNED_PARAMETER: &str = "TauNorm";

/// Parameters released when systematics are enabled
pub const SYSTEMATIC_PARAMETERS: [&str; 12] = [
    "Dm31",
    "Theta23",
    "EnergyScale",
    "ZenithSlope",
    "EnergySlope",
    "NumuNumubarSkew",
    "NueNuebarSkew",
    "NumuNueSkew",
    "NCscale",
    "MuonNorm",
    "TrackNorm",
    "ShowerNorm",
];

fn entry(data: f64, model: f64, fixed: bool, prior: bool, sigma: f64) -> Parameter {
    Parameter {
        data,
        model,
        fixed,
        prior,
        prior_mean: model,
        prior_sigma: sigma,
    }
}

/// Data always follows normal ordering; the model follows `ordering`
pub fn parameter_template(ordering: MassOrdering) -> IndexMap<String, Parameter> {
    let oscillation = match ordering {
        MassOrdering::Normal => [
            ("Dm21", entry(7.42e-05, 7.42e-05, true, false, 2.1e-06)),
            ("Dm31", entry(2.517e-03, 2.517e-03, true, false, 2.1e-05)),
            ("DeltaCP", entry(197.0, 197.0, true, false, 27.0)),
            ("Theta13", entry(8.57, 8.57, true, true, 0.12)),
            ("Theta12", entry(33.44, 33.44, true, false, 0.77)),
            ("Theta23", entry(49.2, 49.2, true, false, 2.0)),
        ],
        MassOrdering::Inverted => [
            ("Dm21", entry(7.42e-05, 7.42e-05, true, false, 2.1e-06)),
            ("Dm31", entry(2.517e-03, -2.4238e-03, true, false, 2.1e-05)),
            ("DeltaCP", entry(197.0, 282.0, true, false, 27.0)),
            ("Theta13", entry(8.57, 8.60, true, true, 0.12)),
            ("Theta12", entry(33.44, 33.45, true, false, 0.77)),
            // Octant left free under inverted ordering
            ("Theta23", entry(49.2, 49.3, false, false, 2.0)),
        ],
    };

    let nuisance = [
        ("EnergyScale", entry(1.0, 1.0, true, true, 0.05)),
        ("ZenithSlope", entry(0.0, 0.0, true, true, 0.07)),
        ("EnergySlope", entry(0.0, 0.0, true, true, 0.3)),
        ("NumuNumubarSkew", entry(0.0, 0.0, true, true, 0.1)),
        ("NueNuebarSkew", entry(0.0, 0.0, true, true, 0.1)),
        ("NumuNueSkew", entry(0.0, 0.0, true, true, 0.03)),
        ("NCscale", entry(1.0, 1.0, true, true, 0.1)),
        (SCANNED_PARAMETER, entry(1.0, 1.0, true, true, 0.2)),
        ("MuonNorm", entry(1.0, 1.0, true, false, 0.05)),
        ("TrackNorm", entry(1.0, 1.0, true, false, 0.1)),
        ("ShowerNorm", entry(1.0, 1.0, true, false, 0.1)),
    ];

    oscillation
        .into_iter()
        .chain(nuisance)
        .map(|(name, parameter)| (name.to_string(), parameter))
        .collect()
}

/// Fixed ANTARES experiment description for `channel`
pub fn base_variables(channel: Channel) -> Variables {
    Variables {
        mc_label: "ANTARES".to_string(),
        selected_events_filename: vec!["antares_w_nnfit_FINAL1.root".to_string()],
        exposure_nyears: 12.433,
        output_path: "output".to_string(),
        flux_path: "flux/Honda2014_frj-solmin-aa_ORCA6_hist.root".to_string(),
        by_path: "xsection/dummy_by_ORCA6.root".to_string(),
        crossfile_interacting_events_path: "xsection/xsection_gsg_v5r1_SWIM.root".to_string(),
        crossfile_resp_matrix_path: "xsection/xsection_gsg_v5r1_SWIM.root".to_string(),
        prem_table: "prem_default.txt".to_string(),
        extensive_output: true,
        enable_mc_error: true,
        use_w2_method: true,
        plot_eff_mass: false,
        verbose: false,
        set_muons: false,
        enable_smear_machine: false,
        analysis_type: "Asimov".to_string(),
        experiment_type: channel.experiment_type().to_string(),
        pseudo_experiment_seed: 11,
        set_bootstrap: false,
        bootstrap_seed: 1,
        bootstrap_fraction: 1.0,
    }
}

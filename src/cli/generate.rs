use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use nutau::generate::{
    create_output_dirs, generate_all, Asymmetry, Channel, Combination, ConfigLayout, CutPolicy,
    MassOrdering, Reconstruction, Scenario, SmearLevel, Smearing, Systematics,
    DEFAULT_ENERGY_BINS,
};

use super::config::GenerationConfig;

const DEFAULT_JSON_ROOT: &str = "json";

/// Options of the generate command after flag parsing
pub struct GenerateArgs {
    pub channel: Channel,
    pub reconstruction: Option<Reconstruction>,
    pub ordering: MassOrdering,
    pub systematics: Systematics,
    pub cut: Option<CutPolicy>,
    pub smear_level: Option<String>,
    pub asymmetry: (f64, f64),
    pub scenario: Scenario,
    pub points: Option<usize>,
    pub bins: Option<usize>,
    pub json_root: Option<PathBuf>,
    pub all: bool,
}

/// `0` stands for no smearing
fn parse_smear_level(text: &str) -> Result<Option<SmearLevel>> {
    if text == "0" {
        return Ok(None);
    }
    let level = text
        .parse::<SmearLevel>()
        .with_context(|| format!("Invalid smear level: {}", text))?;
    Ok(Some(level))
}

fn resolve_cut(flag: Option<CutPolicy>, config: &GenerationConfig) -> Result<CutPolicy> {
    match (flag, &config.cut) {
        (Some(cut), _) => Ok(cut),
        (None, Some(text)) => text
            .parse::<CutPolicy>()
            .with_context(|| format!("Invalid cut in config file: {}", text)),
        (None, None) => Ok(CutPolicy::MuonFree),
    }
}

/// Write the configuration records of one or all combinations
pub fn run(config: &GenerationConfig, args: GenerateArgs) -> Result<()> {
    let cut = resolve_cut(args.cut, config)?;
    let json_root = args
        .json_root
        .or_else(|| config.json_root.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_ROOT));
    let points = args.points.or(config.scan_points);
    let bins = args
        .bins
        .or(config.energy_bins)
        .unwrap_or(DEFAULT_ENERGY_BINS);
    let level = args
        .smear_level
        .as_deref()
        .map(parse_smear_level)
        .transpose()?
        .flatten();

    let mut combinations = if args.all {
        let levels = match level {
            Some(level) => vec![level],
            None => SmearLevel::CATALOG.to_vec(),
        };
        Combination::all(cut, &levels)
    } else {
        let reconstruction = args.reconstruction.unwrap_or(if level.is_some() {
            Reconstruction::Smeared
        } else {
            Reconstruction::Mc
        });
        let mut combination = Combination::new(
            args.channel,
            reconstruction,
            args.ordering,
            args.systematics,
            cut,
        )
        .with_scenario(args.scenario);
        let (energy, direction) = args.asymmetry;
        match level {
            Some(level) => {
                combination = combination.with_smearing(Smearing {
                    level,
                    asymmetry: Asymmetry::new(energy, direction)?,
                });
            }
            None if (energy, direction) != (1.0, 1.0) => {
                bail!("Asymmetry factors need a smear level");
            }
            None => {}
        }
        vec![combination]
    };

    for combination in &mut combinations {
        combination.energy_bins = bins;
        combination.scan_points = points;
    }

    info!(
        "Generating {} combination(s) under {}",
        combinations.len(),
        json_root.display()
    );
    let layout = ConfigLayout::new(json_root);
    let report = generate_all(&layout, &combinations).context("Record generation failed")?;

    println!("{}", report.format_colored());
    Ok(())
}

/// Create the fit-output and plot directory trees
pub fn run_directories(
    config: &GenerationConfig,
    base: PathBuf,
    cut: Option<CutPolicy>,
    smear_levels: Vec<String>,
) -> Result<()> {
    let cut = resolve_cut(cut, config)?;
    let levels = if smear_levels.is_empty() {
        SmearLevel::CATALOG.to_vec()
    } else {
        let mut levels = Vec::with_capacity(smear_levels.len());
        for text in &smear_levels {
            if let Some(level) = parse_smear_level(text)? {
                levels.push(level);
            }
        }
        levels
    };

    let report = create_output_dirs(&base, cut, &levels)
        .with_context(|| format!("Failed to create directories under {}", base.display()))?;

    println!(
        "Directories under {}: {} created, {} already present",
        base.display(),
        report.created.len(),
        report.existing.len()
    );
    Ok(())
}

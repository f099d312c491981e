use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;

use nutau::classify::with_labels;
use nutau::events::read_event_files;
use nutau::schema::{columns, summary_columns};
use nutau::summary::{add_presence_flag, flag_summary, run_counts, write_run_counts_csv};

use super::config::IoConfig;
use super::events::reader_config;

const NNFIT_PRESENCE: [(&str, &str); 2] = [
    ("NNFitTrack_cos_zenith", "NNFitTrack_flag"),
    ("NNFitShower_cos_zenith", "NNFitShower_flag"),
];

/// Reconstruction-flag efficiency per flavour and topology
pub fn run_flags(
    io: &IoConfig,
    inputs: Vec<PathBuf>,
    flags: Vec<String>,
    run_column: String,
    nnfit_presence: bool,
    csv: Option<PathBuf>,
) -> Result<()> {
    let events = read_event_files::<_, &str>(&inputs, None, &reader_config(io))
        .context("Failed to read event files")?;
    let mut events = with_labels(&events).context("Classification failed")?;

    if nnfit_presence {
        for (source, flag) in NNFIT_PRESENCE {
            events = add_presence_flag(&events, source, flag)?;
        }
    }

    let flags: Vec<String> = if flags.is_empty() {
        summary_columns::RECONSTRUCTION_FLAGS
            .iter()
            .map(|f| f.to_string())
            .collect()
    } else {
        flags
    };

    let summary = flag_summary(&events, &flags, &run_column)?;
    if let Some(path) = csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        summary.write_csv(file)?;
    }

    println!("{}", summary);
    Ok(())
}

/// Distinct runs per particle type and interaction type
pub fn run_runs(
    io: &IoConfig,
    inputs: Vec<PathBuf>,
    type_column: String,
    run_column: String,
    csv: Option<PathBuf>,
) -> Result<()> {
    let projection = [
        type_column.as_str(),
        columns::INTERACTION_TYPE,
        run_column.as_str(),
    ];
    let events = read_event_files(&inputs, Some(&projection[..]), &reader_config(io))
        .context("Failed to read event files")?;

    let counts = run_counts(&events, &type_column, columns::INTERACTION_TYPE, &run_column)?;
    if let Some(path) = csv {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_run_counts_csv(&counts, file)?;
    }

    println!("{:>6} {:>16} {:>8}", "Type", "interaction_type", "Runs");
    for count in &counts {
        println!(
            "{:>6} {:>16} {:>8}",
            count.particle_type, count.interaction_type, count.runs
        );
    }
    Ok(())
}

use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;

use nutau::classify::apply_all_masks;
use nutau::events::{
    left_join, rename_columns, write_events, CompressionType, EventReader, ReaderConfig,
    WriterConfig,
};
use nutau::generate::SmearLevel;
use nutau::schema::summary_columns;
use nutau::smear::{smear_events, SmearConfig};

use super::config::IoConfig;

pub(super) fn reader_config(io: &IoConfig) -> ReaderConfig {
    let mut config = ReaderConfig::default();
    if let Some(batch_size) = io.batch_size {
        config.batch_size = batch_size;
    }
    config
}

fn writer_config(io: &IoConfig) -> WriterConfig {
    let mut config = WriterConfig::default();
    if let Some(level) = io.compression_level {
        config.compression = CompressionType::Zstd(level);
    }
    config
}

/// Add flavour and topology labels to an event file
pub fn run_classify(io: &IoConfig, input: PathBuf, output: PathBuf) -> Result<()> {
    let mut events = EventReader::open_with_config(&input, reader_config(io))
        .and_then(|reader| reader.read_all())
        .with_context(|| format!("Failed to read {}", input.display()))?;

    apply_all_masks(&mut events).context("Classification failed")?;

    let rows = write_events(&output, &events, writer_config(io))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Classified {} events into {}", rows, output.display());
    Ok(())
}

/// Add smeared energy and cos(zenith) columns to an event file
pub fn run_smear(
    io: &IoConfig,
    input: PathBuf,
    output: PathBuf,
    level: &str,
    asymmetry: (f64, f64),
    seed: u64,
) -> Result<()> {
    let level = level
        .parse::<SmearLevel>()
        .with_context(|| format!("Invalid smear level: {}", level))?;
    let Some(fraction) = level.fraction() else {
        bail!("Smear level {} has no constant relative resolution", level);
    };

    let events = EventReader::open_with_config(&input, reader_config(io))
        .and_then(|reader| reader.read_all())
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let (energy_factor, direction_factor) = asymmetry;
    let config = SmearConfig::new(fraction)
        .with_asymmetry(energy_factor, direction_factor)
        .with_seed(seed);
    let (smeared, stats) = smear_events(&events, &config).context("Smearing failed")?;

    write_events(&output, &smeared, writer_config(io))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Smeared {} events at {} ({} extra cos(zenith) draws)",
        stats.rows, level, stats.resamples
    );
    Ok(())
}

/// Left-join a reconstruction file onto an event file
pub fn run_merge(
    io: &IoConfig,
    left: PathBuf,
    right: PathBuf,
    output: PathBuf,
    keys: Vec<String>,
    nnfit: bool,
) -> Result<()> {
    let read = |path: &PathBuf| {
        EventReader::open_with_config(path, reader_config(io))
            .and_then(|reader| reader.read_all())
            .with_context(|| format!("Failed to read {}", path.display()))
    };
    let left_events = read(&left)?;
    let mut right_events = read(&right)?;

    if nnfit {
        right_events = rename_columns(&right_events, &summary_columns::NNFIT_RENAMES)?;
    }

    let keys: Vec<&str> = if keys.is_empty() {
        summary_columns::MERGE_KEYS.to_vec()
    } else {
        keys.iter().map(String::as_str).collect()
    };

    let merged = left_join(&left_events, &right_events, &keys).context("Merge failed")?;
    let rows = write_events(&output, &merged, writer_config(io))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Merged {} rows into {}", rows, output.display());
    Ok(())
}

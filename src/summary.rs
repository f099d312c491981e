//! # Reconstruction Summaries
//!
//! Per-category tables computed from classified event tables:
//!
//! - [`flag_summary`]: for each (flavour, topology) pair, the fraction of
//!   events each reconstruction algorithm succeeded on, and how many runs
//!   contribute events to the pair.
//! - [`run_counts`]: number of distinct runs per (type, interaction type),
//!   used to check that no simulation file went missing.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use arrow::array::{Array, BooleanArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::{debug, info};

use crate::events::columns::{
    float64_column, int64_column, optional_string_column, required_column, value_at, with_column,
};
use crate::events::EventError;
use crate::schema::columns;

/// Per-row success values of a flag column; nulls count as failures
fn flag_values(batch: &RecordBatch, name: &str) -> Result<Vec<f64>, EventError> {
    let column = required_column(batch, name)?;
    if column.data_type() == &DataType::Boolean {
        let flags = column
            .as_any()
            .downcast_ref::<BooleanArray>()
            .ok_or_else(|| EventError::InvalidColumnType {
                column: name.to_string(),
                expected: "boolean",
            })?;
        return Ok((0..flags.len())
            .map(|i| if flags.is_valid(i) && flags.value(i) { 1.0 } else { 0.0 })
            .collect());
    }
    let values = float64_column(batch, name)?;
    Ok((0..values.len())
        .map(|i| value_at(&values, i).unwrap_or(0.0))
        .collect())
}

/// Add a Boolean `flag` column that is true wherever `source` is not null
///
/// NNFit tables carry no success flag; a fitted angle marks a successful fit.
pub fn add_presence_flag(
    batch: &RecordBatch,
    source: &str,
    flag: &str,
) -> Result<RecordBatch, EventError> {
    let column = required_column(batch, source)?;
    let present = BooleanArray::from((0..column.len()).map(|i| column.is_valid(i)).collect::<Vec<_>>());
    with_column(batch, flag, Arc::new(present))
}

/// One (flavour, topology) group of a [`FlagSummary`]
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSummaryRow {
    /// Flavour label
    pub flavour: String,
    /// Topology label
    pub topology: String,
    /// Events in the group
    pub events: usize,
    /// Fraction of events with each flag set, in the order of [`FlagSummary::flags`]
    pub fractions: Vec<f64>,
    /// Distinct runs with at least one event in the group
    pub runs: usize,
    /// Difference between the runs in the group and all runs in the table
    pub missing_runs: usize,
}

/// Reconstruction efficiency per (flavour, topology)
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSummary {
    /// Flag columns summarised
    pub flags: Vec<String>,
    /// Groups sorted by flavour then topology
    pub rows: Vec<FlagSummaryRow>,
}

#[derive(Default)]
struct GroupAccumulator {
    events: usize,
    sums: Vec<f64>,
    runs: HashSet<i64>,
}

/// Summarise reconstruction flags per (flavour, topology)
///
/// The table must already carry the label columns written by
/// [`apply_all_masks`](crate::classify::apply_all_masks). Rows without a
/// flavour or topology label are left out, as are their runs from the group
/// counts; they still count towards the total number of runs.
pub fn flag_summary<S: AsRef<str>>(
    batch: &RecordBatch,
    flag_columns: &[S],
    run_column: &str,
) -> Result<FlagSummary, EventError> {
    let flavours = optional_string_column(batch, columns::FLAVOUR_LABEL)
        .ok_or_else(|| EventError::ColumnNotFound(columns::FLAVOUR_LABEL.to_string()))?;
    let topologies = optional_string_column(batch, columns::TOPOLOGY_LABEL)
        .ok_or_else(|| EventError::ColumnNotFound(columns::TOPOLOGY_LABEL.to_string()))?;
    let runs = int64_column(batch, run_column)?;
    let flags = flag_columns
        .iter()
        .map(|name| flag_values(batch, name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<(String, String), GroupAccumulator> = BTreeMap::new();
    let mut all_runs: HashSet<i64> = HashSet::new();

    for row in 0..batch.num_rows() {
        let run = value_at(&runs, row);
        if let Some(run) = run {
            all_runs.insert(run);
        }
        if flavours.is_null(row) || topologies.is_null(row) {
            continue;
        }
        let key = (
            flavours.value(row).to_string(),
            topologies.value(row).to_string(),
        );
        let group = groups.entry(key).or_insert_with(|| GroupAccumulator {
            sums: vec![0.0; flags.len()],
            ..Default::default()
        });
        group.events += 1;
        for (sum, values) in group.sums.iter_mut().zip(&flags) {
            *sum += values[row];
        }
        if let Some(run) = run {
            group.runs.insert(run);
        }
    }

    let total_runs = all_runs.len();
    let rows = groups
        .into_iter()
        .map(|((flavour, topology), group)| {
            let fractions = group
                .sums
                .iter()
                .map(|sum| sum / group.events as f64)
                .collect();
            FlagSummaryRow {
                flavour,
                topology,
                events: group.events,
                fractions,
                runs: group.runs.len(),
                missing_runs: group.runs.len().abs_diff(total_runs),
            }
        })
        .collect::<Vec<_>>();

    info!(
        "Summarised {} flags over {} groups ({} runs)",
        flag_columns.len(),
        rows.len(),
        total_runs
    );

    Ok(FlagSummary {
        flags: flag_columns.iter().map(|f| f.as_ref().to_string()).collect(),
        rows,
    })
}

impl FlagSummary {
    /// Write the summary as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), EventError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec!["Flavour type".to_string(), "Event type".to_string()];
        header.extend(self.flags.iter().cloned());
        header.extend(["Events", "Runs", "Missing runs"].map(String::from));
        csv_writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.flavour.clone(), row.topology.clone()];
            record.extend(row.fractions.iter().map(|f| format!("{:.6}", f)));
            record.push(row.events.to_string());
            record.push(row.runs.to_string());
            record.push(row.missing_runs.to_string());
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for FlagSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<10} {:<12}", "Flavour", "Event type")?;
        for flag in &self.flags {
            write!(f, " {:>16}", flag)?;
        }
        writeln!(f, " {:>10} {:>6} {:>8}", "Events", "Runs", "Missing")?;

        for row in &self.rows {
            write!(f, "{:<10} {:<12}", row.flavour, row.topology)?;
            for fraction in &row.fractions {
                write!(f, " {:>16.4}", fraction)?;
            }
            writeln!(
                f,
                " {:>10} {:>6} {:>8}",
                row.events, row.runs, row.missing_runs
            )?;
        }
        Ok(())
    }
}

/// Distinct runs for one (type, interaction type) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCount {
    /// Signed particle code
    pub particle_type: i64,
    /// Interaction type code
    pub interaction_type: i64,
    /// Number of distinct runs
    pub runs: usize,
}

/// Count distinct runs per (type, interaction type); rows with a null key are skipped
pub fn run_counts(
    batch: &RecordBatch,
    type_column: &str,
    interaction_column: &str,
    run_column: &str,
) -> Result<Vec<RunCount>, EventError> {
    let types = int64_column(batch, type_column)?;
    let interactions = int64_column(batch, interaction_column)?;
    let runs = int64_column(batch, run_column)?;

    let mut groups: BTreeMap<(i64, i64), HashSet<i64>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let (Some(t), Some(i), Some(run)) = (
            value_at(&types, row),
            value_at(&interactions, row),
            value_at(&runs, row),
        ) else {
            continue;
        };
        groups.entry((t, i)).or_default().insert(run);
    }
    debug!("{} (type, interaction type) groups", groups.len());

    Ok(groups
        .into_iter()
        .map(|((particle_type, interaction_type), runs)| RunCount {
            particle_type,
            interaction_type,
            runs: runs.len(),
        })
        .collect())
}

/// Write run counts as CSV with a header row
pub fn write_run_counts_csv<W: Write>(counts: &[RunCount], writer: W) -> Result<(), EventError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Type", "interaction_type", "Number of files"])?;
    for count in counts {
        csv_writer.write_record([
            count.particle_type.to_string(),
            count.interaction_type.to_string(),
            count.runs.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

//! Row predicates over event tables.
//!
//! Every mask has one entry per row. A null input value never satisfies a
//! predicate, so the corresponding mask entry is `false`.

use arrow::array::{Array, BooleanArray, Float64Array, Int64Array};
use arrow::record_batch::RecordBatch;

use super::{Flavour, Topology};
use crate::events::columns::{boolean_column, float64_column, int64_column, value_at};
use crate::events::EventError;
use crate::schema::{columns, FIRST_TAU_RUN};

/// Generator interaction type of tau events with a track-like signature
const TAU_TRACK_INTERACTION: i64 = 2;
/// Generator interaction type of tau events with a charged-current shower
const TAU_SHOWER_INTERACTION: i64 = 3;

/// The three columns the flavour and topology predicates read
struct EventCodes {
    pdg: Int64Array,
    interaction: Int64Array,
    is_cc: BooleanArray,
}

impl EventCodes {
    fn load(batch: &RecordBatch) -> Result<Self, EventError> {
        Ok(Self {
            pdg: int64_column(batch, columns::TYPE)?,
            interaction: int64_column(batch, columns::INTERACTION_TYPE)?,
            is_cc: boolean_column(batch, columns::IS_CC)?,
        })
    }

    fn flavour(&self, row: usize) -> Option<Flavour> {
        value_at(&self.pdg, row).and_then(Flavour::from_pdg)
    }

    fn interaction_is(&self, row: usize, code: i64) -> bool {
        value_at(&self.interaction, row) == Some(code)
    }

    fn charged_current(&self, row: usize) -> Option<bool> {
        if self.is_cc.is_null(row) {
            None
        } else {
            Some(self.is_cc.value(row))
        }
    }

    fn topology_matches(&self, row: usize, topology: Topology) -> bool {
        let flavour = self.flavour(row);
        let is_cc = self.charged_current(row);
        match topology {
            Topology::Track => {
                (flavour == Some(Flavour::Muon) && is_cc == Some(true))
                    || (flavour == Some(Flavour::Tau)
                        && self.interaction_is(row, TAU_TRACK_INTERACTION))
            }
            Topology::ShowerNc => flavour.is_some() && is_cc == Some(false),
            Topology::ShowerCc => {
                (flavour == Some(Flavour::Electron)
                    || (flavour == Some(Flavour::Tau)
                        && self.interaction_is(row, TAU_SHOWER_INTERACTION)))
                    && is_cc == Some(true)
            }
        }
    }

    fn len(&self) -> usize {
        self.pdg.len()
    }
}

fn collect_mask(len: usize, predicate: impl Fn(usize) -> bool) -> BooleanArray {
    BooleanArray::from((0..len).map(predicate).collect::<Vec<bool>>())
}

fn float_mask(
    batch: &RecordBatch,
    column: &str,
    predicate: impl Fn(f64) -> bool,
) -> Result<BooleanArray, EventError> {
    let values: Float64Array = float64_column(batch, column)?;
    Ok(collect_mask(values.len(), |row| {
        value_at(&values, row).map_or(false, &predicate)
    }))
}

/// Rows whose absolute `type` code belongs to `flavour`
pub fn flavour_mask(batch: &RecordBatch, flavour: Flavour) -> Result<BooleanArray, EventError> {
    let pdg = int64_column(batch, columns::TYPE)?;
    Ok(collect_mask(pdg.len(), |row| {
        value_at(&pdg, row).and_then(Flavour::from_pdg) == Some(flavour)
    }))
}

/// Electron-neutrino events (|type| == 12)
pub fn nue_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    flavour_mask(batch, Flavour::Electron)
}

/// Muon-neutrino events (|type| == 14)
pub fn numu_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    flavour_mask(batch, Flavour::Muon)
}

/// Tau-neutrino events (|type| == 16)
pub fn nutau_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    flavour_mask(batch, Flavour::Tau)
}

/// Rows matching a topology predicate
///
/// The predicates are not mutually exclusive: a tau event with interaction
/// type 2 that is not flagged charged-current matches both
/// [`Topology::Track`] and [`Topology::ShowerNc`].
pub fn topology_mask(batch: &RecordBatch, topology: Topology) -> Result<BooleanArray, EventError> {
    let codes = EventCodes::load(batch)?;
    Ok(collect_mask(codes.len(), |row| {
        codes.topology_matches(row, topology)
    }))
}

/// (muon and charged-current) or (tau and interaction type 2)
pub fn track_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    topology_mask(batch, Topology::Track)
}

/// Any recognised flavour and not charged-current
pub fn shower_nc_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    topology_mask(batch, Topology::ShowerNc)
}

/// (electron or (tau and interaction type 3)) and charged-current
pub fn shower_cc_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    topology_mask(batch, Topology::ShowerCc)
}

/// 10 < energy_true < 100 GeV
pub fn low_energy_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    float_mask(batch, columns::ENERGY_TRUE, |e| e > 10.0 && e < 100.0)
}

/// 20 < energy_true < 40 GeV
pub fn energy_region_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    float_mask(batch, columns::ENERGY_TRUE, |e| e > 20.0 && e < 40.0)
}

/// cos_zenith_true < 0
pub fn upgoing_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    float_mask(batch, columns::COS_ZENITH_TRUE, |c| c < 0.0)
}

/// Runs recorded after tau production started in the simulation
pub fn run_cut_mask(batch: &RecordBatch) -> Result<BooleanArray, EventError> {
    let runs = int64_column(batch, columns::RUN_ID)?;
    Ok(collect_mask(runs.len(), |row| {
        value_at(&runs, row).map_or(false, |run| run > FIRST_TAU_RUN)
    }))
}

/// Label a run by its duration given in years: under three hours is a short run
pub fn run_duration_label(duration_years: f64) -> &'static str {
    let hours = duration_years * 365.25 * 24.0;
    if hours < 3.0 {
        "short run"
    } else {
        "long run"
    }
}

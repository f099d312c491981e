use std::sync::Arc;

use arrow::array::{Array, BooleanArray, StringArray};
use arrow::record_batch::RecordBatch;
use log::debug;

use super::masks::{nue_mask, numu_mask, nutau_mask, shower_cc_mask, shower_nc_mask, track_mask};
use super::{Flavour, Topology};
use crate::events::columns::{optional_string_column, with_column};
use crate::events::EventError;
use crate::schema::columns;

/// Row predicate used to assign a label
pub type MaskFn = fn(&RecordBatch) -> Result<BooleanArray, EventError>;

/// A label and the predicate selecting the rows that receive it
#[derive(Clone, Copy)]
pub struct LabelRule {
    /// Text written to the label column
    pub label: &'static str,
    /// Rows to label
    pub mask: MaskFn,
}

/// Flavour rules in application order
pub const FLAVOUR_RULES: [LabelRule; 3] = [
    LabelRule {
        label: Flavour::Electron.label(),
        mask: nue_mask,
    },
    LabelRule {
        label: Flavour::Muon.label(),
        mask: numu_mask,
    },
    LabelRule {
        label: Flavour::Tau.label(),
        mask: nutau_mask,
    },
];

/// Topology rules in application order. A row matching several rules keeps
/// the label of the last one.
pub const TOPOLOGY_RULES: [LabelRule; 3] = [
    LabelRule {
        label: Topology::Track.label(),
        mask: track_mask,
    },
    LabelRule {
        label: Topology::ShowerNc.label(),
        mask: shower_nc_mask,
    },
    LabelRule {
        label: Topology::ShowerCc.label(),
        mask: shower_cc_mask,
    },
];

/// Write `rules` into the label column `column`, in order, last write wins
///
/// Rows matched by no rule keep their previous label, or null when the
/// column did not exist yet.
pub fn apply_labels(
    batch: &RecordBatch,
    column: &str,
    rules: &[LabelRule],
) -> Result<RecordBatch, EventError> {
    let mut labels: Vec<Option<&str>> = match optional_string_column(batch, column) {
        Some(existing) => (0..existing.len())
            .map(|row| (!existing.is_null(row)).then(|| existing.value(row)))
            .collect(),
        None => vec![None; batch.num_rows()],
    };

    for rule in rules {
        let mask = (rule.mask)(batch)?;
        let mut matched = 0usize;
        for (row, label) in labels.iter_mut().enumerate() {
            if mask.is_valid(row) && mask.value(row) {
                *label = Some(rule.label);
                matched += 1;
            }
        }
        debug!("{}: {} rows labelled {}", column, matched, rule.label);
    }

    let labels = StringArray::from(labels);
    with_column(batch, column, Arc::new(labels))
}

/// Return a copy of `batch` with the flavour and topology label columns
pub fn with_labels(batch: &RecordBatch) -> Result<RecordBatch, EventError> {
    let flavoured = apply_labels(batch, columns::FLAVOUR_LABEL, &FLAVOUR_RULES)?;
    apply_labels(&flavoured, columns::TOPOLOGY_LABEL, &TOPOLOGY_RULES)
}

/// Add or overwrite the `Flavour type` and `Event type` columns of `batch`
///
/// Flavours are applied electron, muon, tau; topologies track, shower-NC,
/// shower-CC. Physics columns are never modified. On error `batch` is left
/// unchanged.
pub fn apply_all_masks(batch: &mut RecordBatch) -> Result<(), EventError> {
    *batch = with_labels(batch)?;
    Ok(())
}

//! # Event Classification
//!
//! Flavour and topology predicates over event tables, and the ordered
//! application of their labels.
//!
//! Flavour depends only on the absolute PDG code in `type`. Topology also
//! reads `interaction_type` and `is_cc`:
//!
//! | Topology | Predicate |
//! |----------|-----------|
//! | `tracks` | (muon and CC) or (tau and interaction type 2) |
//! | `showers_nc` | electron, muon or tau and not CC |
//! | `showers_cc` | (electron or (tau and interaction type 3)) and CC |
//!
//! The topology predicates overlap. [`apply_all_masks`] writes them in the
//! order above, so the last matching predicate decides the label.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutau::classify::apply_all_masks;
//! use nutau::events::EventReader;
//!
//! let mut events = EventReader::open("full_nutau_sample.parquet")?.read_all()?;
//! apply_all_masks(&mut events)?;
//! assert!(events.column_by_name("Event type").is_some());
//! # Ok::<(), nutau::events::EventError>(())
//! ```

mod apply;
mod flavour;
mod masks;
mod topology;


pub use apply::{
    apply_all_masks, apply_labels, with_labels, LabelRule, MaskFn, FLAVOUR_RULES, TOPOLOGY_RULES,
};
pub use flavour::Flavour;
pub use masks::{
    energy_region_mask, flavour_mask, low_energy_mask, nue_mask, numu_mask, nutau_mask,
    run_cut_mask, run_duration_label, shower_cc_mask, shower_nc_mask, topology_mask, track_mask,
    upgoing_mask,
};
pub use topology::Topology;

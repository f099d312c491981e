use std::fmt;
use std::str::FromStr;

use crate::events::EventError;

/// Visible signature of an event in the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topology {
    /// Elongated muon-like track
    Track,
    /// Neutral-current shower
    ShowerNc,
    /// Charged-current shower
    ShowerCc,
}

impl Topology {
    /// Application order of the topology labels; later entries overwrite earlier ones
    pub const ALL: [Topology; 3] = [Topology::Track, Topology::ShowerNc, Topology::ShowerCc];

    /// Label written to the topology column
    pub const fn label(self) -> &'static str {
        match self {
            Self::Track => "tracks",
            Self::ShowerNc => "showers_nc",
            Self::ShowerCc => "showers_cc",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topology {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topology| topology.label() == s)
            .ok_or_else(|| EventError::UnknownLabel(s.to_string()))
    }
}

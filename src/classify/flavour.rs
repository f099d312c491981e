use std::fmt;
use std::str::FromStr;

use crate::events::EventError;

/// Neutrino flavour, decided by the absolute PDG code of the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flavour {
    /// |type| == 12
    Electron,
    /// |type| == 14
    Muon,
    /// |type| == 16
    Tau,
}

impl Flavour {
    /// All flavours, in the order their labels are applied
    pub const ALL: [Flavour; 3] = [Flavour::Electron, Flavour::Muon, Flavour::Tau];

    /// Flavour of a signed PDG code; codes outside {12, 14, 16} have none
    pub fn from_pdg(code: i64) -> Option<Self> {
        match code.abs() {
            12 => Some(Self::Electron),
            14 => Some(Self::Muon),
            16 => Some(Self::Tau),
            _ => None,
        }
    }

    /// Absolute PDG code of the neutrino
    pub const fn pdg(self) -> i64 {
        match self {
            Self::Electron => 12,
            Self::Muon => 14,
            Self::Tau => 16,
        }
    }

    /// Label written to the flavour column
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electron => "electron",
            Self::Muon => "muon",
            Self::Tau => "tau",
        }
    }
}

impl fmt::Display for Flavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Flavour {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flavour| flavour.label() == s)
            .ok_or_else(|| EventError::UnknownLabel(s.to_string()))
    }
}

use std::path::PathBuf;

/// Errors that can occur while building or writing configuration records
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Channel text other than STD or TAU
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Reconstruction algorithm without a branch table entry
    #[error("Unknown reconstruction algorithm: {0}")]
    UnknownReconstruction(String),

    /// Mass ordering other than NO or IO
    #[error("Unknown mass ordering: {0}")]
    UnknownOrdering(String),

    /// Cut policy without a selection expression
    #[error("Unknown cut policy: {0}")]
    UnknownCutPolicy(String),

    /// Fit mode other than fixed or free
    #[error("Unknown fit mode: {0}")]
    UnknownFitMode(String),

    /// Systematics option other than systematics or no_systematics
    #[error("Unknown systematics option: {0}")]
    UnknownSystematics(String),

    /// Smear level that is neither named nor a percentage
    #[error("Unknown smear level: {0}")]
    UnknownSmearLevel(String),

    /// Scenario other than nominal or realistic
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Parameter missing from the parameter table
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// The Smeared reconstruction was requested without a smear level
    #[error("Reconstruction Smeared requires a smear level")]
    MissingSmearLevel,

    /// Asymmetry factor that is not a positive number
    #[error("Invalid asymmetry factor: {0}")]
    InvalidAsymmetry(String),

    /// Options that cannot be combined
    #[error("Invalid combination: {0}")]
    InvalidCombination(String),

    /// I/O error on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

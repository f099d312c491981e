//! # Detector-Resolution Smearing
//!
//! Emulates a detector with a constant relative resolution by drawing the
//! reconstructed energy and cosine zenith from Gaussians centred on the true
//! values:
//!
//! ```text
//! energy_smeared     ~ N(E, level * f_E * |E|)
//! cos_zenith_smeared ~ N(c, level * f_D * |c|), redrawn until -1 <= x <= 1
//! ```
//!
//! `f_E` and `f_D` are the energy and direction asymmetry factors (1.0 for the
//! symmetric case). Rows with a null true value get a null smeared value.

use std::sync::Arc;

use arrow::array::{Array, Float64Array};
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::events::columns::{float64_column, with_column};
use crate::events::EventError;
use crate::schema::columns;

/// Default seed, the one the ROOT TRandom3 generator starts from
pub const DEFAULT_SEED: u64 = 4357;

/// Parameters of a smearing run
#[derive(Debug, Clone, PartialEq)]
pub struct SmearConfig {
    /// Relative resolution, e.g. 0.1 for 10 %
    pub level: f64,
    /// Multiplier on the energy resolution
    pub energy_factor: f64,
    /// Multiplier on the direction resolution
    pub direction_factor: f64,
    /// RNG seed
    pub seed: u64,
    /// Draws allowed per row before the cosine zenith is declared unphysical
    pub max_attempts: usize,
}

impl SmearConfig {
    /// Symmetric smearing at `level`
    pub fn new(level: f64) -> Self {
        Self {
            level,
            energy_factor: 1.0,
            direction_factor: 1.0,
            seed: DEFAULT_SEED,
            max_attempts: 10_000,
        }
    }

    /// Set the energy and direction asymmetry factors
    pub fn with_asymmetry(mut self, energy_factor: f64, direction_factor: f64) -> Self {
        self.energy_factor = energy_factor;
        self.direction_factor = direction_factor;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), EventError> {
        let checks = [
            ("level", self.level),
            ("energy factor", self.energy_factor),
            ("direction factor", self.direction_factor),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(EventError::SmearingError(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.max_attempts == 0 {
            return Err(EventError::SmearingError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Totals of a smearing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmearStats {
    /// Rows smeared
    pub rows: usize,
    /// Cosine-zenith draws rejected for falling outside [-1, 1]
    pub resamples: usize,
}

/// Stateful smearer; one RNG stream across all batches it is given
pub struct Smearer {
    config: SmearConfig,
    rng: StdRng,
    stats: SmearStats,
}

impl Smearer {
    /// Create a smearer, rejecting negative or non-finite resolutions
    pub fn new(config: SmearConfig) -> Result<Self, EventError> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            rng,
            stats: SmearStats::default(),
        })
    }

    /// Totals so far
    pub fn stats(&self) -> SmearStats {
        self.stats
    }

    fn gaussian(mean: f64, sigma: f64) -> Result<Normal<f64>, EventError> {
        Normal::new(mean, sigma).map_err(|e| {
            EventError::SmearingError(format!("N({}, {}) is not a valid Gaussian: {}", mean, sigma, e))
        })
    }

    fn smear_energy(&mut self, energy: f64) -> Result<f64, EventError> {
        let sigma = self.config.level * self.config.energy_factor * energy.abs();
        Ok(Self::gaussian(energy, sigma)?.sample(&mut self.rng))
    }

    fn smear_cos_zenith(&mut self, cos_zenith: f64) -> Result<f64, EventError> {
        let sigma = self.config.level * self.config.direction_factor * cos_zenith.abs();
        let normal = Self::gaussian(cos_zenith, sigma)?;
        for attempt in 0..self.config.max_attempts {
            let value = normal.sample(&mut self.rng);
            if (-1.0..=1.0).contains(&value) {
                self.stats.resamples += attempt;
                return Ok(value);
            }
        }
        Err(EventError::SmearingError(format!(
            "no physical cos(zenith) drawn around {} after {} attempts",
            cos_zenith, self.config.max_attempts
        )))
    }

    /// Return `batch` with `energy_smeared` and `cos_zenith_smeared` added or replaced
    pub fn smear_batch(&mut self, batch: &RecordBatch) -> Result<RecordBatch, EventError> {
        let energy = float64_column(batch, columns::ENERGY_TRUE)?;
        let cos_zenith = float64_column(batch, columns::COS_ZENITH_TRUE)?;

        let mut smeared_energy = Vec::with_capacity(energy.len());
        let mut smeared_cos_zenith = Vec::with_capacity(cos_zenith.len());
        for row in 0..batch.num_rows() {
            smeared_energy.push(if energy.is_null(row) {
                None
            } else {
                Some(self.smear_energy(energy.value(row))?)
            });
            smeared_cos_zenith.push(if cos_zenith.is_null(row) {
                None
            } else {
                Some(self.smear_cos_zenith(cos_zenith.value(row))?)
            });
        }
        self.stats.rows += batch.num_rows();
        debug!(
            "Smeared {} rows ({} resamples so far)",
            batch.num_rows(),
            self.stats.resamples
        );

        let with_energy = with_column(
            batch,
            columns::ENERGY_SMEARED,
            Arc::new(Float64Array::from(smeared_energy)),
        )?;
        with_column(
            &with_energy,
            columns::COS_ZENITH_SMEARED,
            Arc::new(Float64Array::from(smeared_cos_zenith)),
        )
    }
}

/// Smear a single table in one go
pub fn smear_events(
    batch: &RecordBatch,
    config: &SmearConfig,
) -> Result<(RecordBatch, SmearStats), EventError> {
    let mut smearer = Smearer::new(config.clone())?;
    let smeared = smearer.smear_batch(batch)?;
    let stats = smearer.stats();
    info!(
        "Smeared {} events at level {} ({} extra cos(zenith) draws)",
        stats.rows, config.level, stats.resamples
    );
    Ok((smeared, stats))
}

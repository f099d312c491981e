use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use nutau::generate::{Channel, CutPolicy, MassOrdering, Reconstruction, Scenario, Systematics};

mod config;
mod count;
mod events;
mod generate;

pub use config::Config;

/// nutau - tau-appearance event classification and fit configuration
#[derive(Parser)]
#[command(name = "nutau")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Analysis channel.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ChannelArg {
    /// Standard oscillation
    #[value(name = "STD")]
    Std,
    /// Tau appearance
    #[default]
    #[value(name = "TAU")]
    Tau,
}

/// Reconstruction algorithm read by the fit.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RecoArg {
    /// Monte Carlo truth
    #[value(name = "MC")]
    Mc,
    /// AAFit with dE/dX energy
    #[value(name = "AAFit_dedx")]
    AaFitDedx,
    /// AAFit with ANN energy
    #[value(name = "AAFit_ann")]
    AaFitAnn,
    /// NNFit energy and direction
    #[value(name = "NNFit_full")]
    NnFitFull,
    /// NNFit direction with true energy
    #[value(name = "NNFit_dir")]
    NnFitDir,
    /// Smeared true values (needs --smear-level)
    #[value(name = "Smeared")]
    Smeared,
}

/// Mass ordering of the model.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OrderArg {
    /// Normal ordering
    #[default]
    #[value(name = "NO")]
    Normal,
    /// Inverted ordering
    #[value(name = "IO")]
    Inverted,
}

/// Whether systematic parameters float.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SystematicsArg {
    /// Only the tau normalization varies
    #[default]
    #[value(name = "no_systematics", alias = "0")]
    NoSystematics,
    /// Systematic parameters float
    #[value(name = "systematics", alias = "1")]
    Systematics,
}

/// Event selection on top of the class cut.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CutArg {
    /// Up-going events
    #[value(name = "muon_free")]
    MuonFree,
    /// Up-going by the NNFit shower direction
    #[value(name = "is_nnfit")]
    IsNnfit,
    /// Up-going with a successful AAFit
    #[value(name = "is_aafit")]
    IsAafit,
    /// Well up-going with a successful BBFit
    #[value(name = "hard_cut")]
    HardCut,
}

/// Detector scenario.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ScenarioArg {
    /// Selected events as reconstructed
    #[default]
    Nominal,
    /// Muons and the smearing machine enabled
    Realistic,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Std => Channel::Std,
            ChannelArg::Tau => Channel::Tau,
        }
    }
}

impl From<RecoArg> for Reconstruction {
    fn from(arg: RecoArg) -> Self {
        match arg {
            RecoArg::Mc => Reconstruction::Mc,
            RecoArg::AaFitDedx => Reconstruction::AaFitDedx,
            RecoArg::AaFitAnn => Reconstruction::AaFitAnn,
            RecoArg::NnFitFull => Reconstruction::NnFitFull,
            RecoArg::NnFitDir => Reconstruction::NnFitDir,
            RecoArg::Smeared => Reconstruction::Smeared,
        }
    }
}

impl From<OrderArg> for MassOrdering {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Normal => MassOrdering::Normal,
            OrderArg::Inverted => MassOrdering::Inverted,
        }
    }
}

impl From<SystematicsArg> for Systematics {
    fn from(arg: SystematicsArg) -> Self {
        match arg {
            SystematicsArg::NoSystematics => Systematics::NoSystematics,
            SystematicsArg::Systematics => Systematics::Systematics,
        }
    }
}

impl From<CutArg> for CutPolicy {
    fn from(arg: CutArg) -> Self {
        match arg {
            CutArg::MuonFree => CutPolicy::MuonFree,
            CutArg::IsNnfit => CutPolicy::IsNnfit,
            CutArg::IsAafit => CutPolicy::IsAafit,
            CutArg::HardCut => CutPolicy::HardCut,
        }
    }
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Nominal => Scenario::Nominal,
            ScenarioArg::Realistic => Scenario::Realistic,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the configuration records of one combination, or of all of them
    Generate {
        /// Analysis channel
        #[arg(long, default_value = "TAU", value_enum)]
        channel: ChannelArg,

        /// Reconstruction algorithm (Smeared when a smear level is given)
        #[arg(long, value_enum)]
        reco: Option<RecoArg>,

        /// Mass ordering of the model
        #[arg(long, default_value = "NO", value_enum)]
        order: OrderArg,

        /// Systematics option
        #[arg(long, default_value = "no_systematics", value_enum)]
        systematics: SystematicsArg,

        /// Cut policy (default: config file, then muon_free)
        #[arg(long, value_enum)]
        cut: Option<CutArg>,

        /// Smear level: orca6, orca115, antares or a percentage; 0 for none
        #[arg(long, value_name = "LEVEL")]
        smear_level: Option<String>,

        /// Energy resolution factor of asymmetric smearing
        #[arg(long, default_value_t = 1.0)]
        asym_energy: f64,

        /// Direction resolution factor of asymmetric smearing
        #[arg(long, default_value_t = 1.0)]
        asym_direction: f64,

        /// Detector scenario
        #[arg(long, default_value = "nominal", value_enum)]
        scenario: ScenarioArg,

        /// Scan points of fixed mode (default: 21, or 15 with systematics)
        #[arg(long)]
        points: Option<usize>,

        /// Log-spaced reconstructed-energy edges
        #[arg(long)]
        bins: Option<usize>,

        /// Root of the USER, ANTARES and PARAMETERS directories
        #[arg(long, value_name = "DIR")]
        json_root: Option<PathBuf>,

        /// Generate every combination of the cut policy
        #[arg(long)]
        all: bool,
    },

    /// Create the fit-output and plot directory trees
    Directories {
        /// Base directory of the trees
        #[arg(long, value_name = "DIR", default_value = ".")]
        base: PathBuf,

        /// Cut policy (default: config file, then muon_free)
        #[arg(long, value_enum)]
        cut: Option<CutArg>,

        /// Smear levels to create directories for (default: all)
        #[arg(long = "smear-level", value_name = "LEVEL")]
        smear_levels: Vec<String>,
    },

    /// Add flavour and topology labels to an event file
    Classify {
        /// Input Parquet event file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output Parquet event file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Add smeared energy and cos(zenith) columns to an event file
    Smear {
        /// Input Parquet event file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output Parquet event file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Percentage smear level, e.g. 10 or 10_percent
        #[arg(long, value_name = "LEVEL")]
        level: String,

        /// Energy resolution factor
        #[arg(long, default_value_t = 1.0)]
        asym_energy: f64,

        /// Direction resolution factor
        #[arg(long, default_value_t = 1.0)]
        asym_direction: f64,

        /// RNG seed
        #[arg(long, default_value_t = nutau::smear::DEFAULT_SEED)]
        seed: u64,
    },

    /// Left-join a reconstruction file onto an event file
    Merge {
        /// Left Parquet file; every row is kept
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Right Parquet file
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        /// Output Parquet file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Join keys (default: RunID, Frame, TriggCounter)
        #[arg(long = "key", value_name = "COLUMN")]
        keys: Vec<String>,

        /// Rename the NNFit TrigCount and EventID columns of the right file
        #[arg(long)]
        nnfit: bool,
    },

    /// Reconstruction-flag efficiency per flavour and topology
    CountFlags {
        /// Input Parquet event files
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Flag columns (default: the six reconstruction flags)
        #[arg(long = "flag", value_name = "COLUMN")]
        flags: Vec<String>,

        /// Run identifier column
        #[arg(long, default_value = nutau::schema::columns::RUN_ID)]
        run_column: String,

        /// Derive NNFit flags from fitted cos(zenith) presence
        #[arg(long)]
        nnfit_presence: bool,

        /// CSV output path
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Distinct runs per particle type and interaction type
    CountRuns {
        /// Input Parquet event files
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Particle type column
        #[arg(long, default_value = nutau::schema::summary_columns::TYPE)]
        type_column: String,

        /// Run identifier column
        #[arg(long, default_value = nutau::schema::summary_columns::RUN_ID)]
        run_column: String,

        /// CSV output path
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            channel,
            reco,
            order,
            systematics,
            cut,
            smear_level,
            asym_energy,
            asym_direction,
            scenario,
            points,
            bins,
            json_root,
            all,
        } => generate::run(
            &config.generation,
            generate::GenerateArgs {
                channel: channel.into(),
                reconstruction: reco.map(Reconstruction::from),
                ordering: order.into(),
                systematics: systematics.into(),
                cut: cut.map(CutPolicy::from),
                smear_level,
                asymmetry: (asym_energy, asym_direction),
                scenario: scenario.into(),
                points,
                bins,
                json_root,
                all,
            },
        ),
        Commands::Directories {
            base,
            cut,
            smear_levels,
        } => generate::run_directories(
            &config.generation,
            base,
            cut.map(CutPolicy::from),
            smear_levels,
        ),
        Commands::Classify { input, output } => events::run_classify(&config.io, input, output),
        Commands::Smear {
            input,
            output,
            level,
            asym_energy,
            asym_direction,
            seed,
        } => events::run_smear(
            &config.io,
            input,
            output,
            &level,
            (asym_energy, asym_direction),
            seed,
        ),
        Commands::Merge {
            left,
            right,
            output,
            keys,
            nnfit,
        } => events::run_merge(&config.io, left, right, output, keys, nnfit),
        Commands::CountFlags {
            inputs,
            flags,
            run_column,
            nnfit_presence,
            csv,
        } => count::run_flags(&config.io, inputs, flags, run_column, nnfit_presence, csv),
        Commands::CountRuns {
            inputs,
            type_column,
            run_column,
            csv,
        } => count::run_runs(&config.io, inputs, type_column, run_column, csv),
    }
}

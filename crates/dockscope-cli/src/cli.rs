use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "DockScope CLI - Inspect AutoDock Vina / AutoDock4 docking results: scores, poses, torsions, RMSD, docking boxes and PLIP interactions.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to an analysis configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.box-padding=4.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse one or more docking results and print scores, poses and per-pose metrics as JSON.
    Summary(SummaryArgs),
    /// Print the ATOM/HETATM lines of a single model.
    Extract(ExtractArgs),
    /// Split a multi-model file into one file per pose.
    Split(SplitArgs),
    /// Align a PLIP interaction list to a pose and count interactions by type.
    Interactions(InteractionsArgs),
    /// Compute a blind-docking search box around a pose.
    #[command(name = "box")]
    DockingBox(BoxArgs),
    /// Step through the poses of a file on a timer.
    Play(PlayArgs),
}

/// Arguments for the `summary` subcommand.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Docking result files (PDBQT or PDB).
    #[arg(short, long = "input", required = true, num_args = 1.., value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// 1-based model that RMSD values are measured against.
    #[arg(short, long, value_name = "MODEL", value_parser = clap::value_parser!(u64).range(1..))]
    pub reference: Option<u64>,

    /// Write the JSON report to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Docking result file.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// 1-based model number.
    #[arg(short, long, value_name = "MODEL", value_parser = clap::value_parser!(u64).range(1..))]
    pub model: u64,

    /// Write the extracted lines to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `split` subcommand.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Docking result file.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives `<stem>_pose_<n>.pdbqt` files.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,
}

/// Arguments for the `interactions` subcommand.
#[derive(Args, Debug)]
pub struct InteractionsArgs {
    /// PLIP interaction list in JSON format.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// 0-based pose index to align interactions to.
    #[arg(short, long, default_value_t = 0, value_name = "INDEX")]
    pub pose: usize,

    /// Interaction types to keep. Defaults to every PLIP type.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Keep only interactions whose `position` matches the pose number.
    #[arg(long)]
    pub by_position: bool,
}

/// Arguments for the `box` subcommand.
#[derive(Args, Debug)]
pub struct BoxArgs {
    /// Docking result or ligand file.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// 1-based model to box. Defaults to the best-scoring pose.
    #[arg(short, long, value_name = "MODEL", value_parser = clap::value_parser!(u64).range(1..))]
    pub model: Option<u64>,

    /// Padding in Angstroms added on each side of the ligand extent.
    #[arg(long, value_name = "FLOAT")]
    pub padding: Option<f64>,
}

/// Arguments for the `play` subcommand.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Docking result file.
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Milliseconds between pose changes.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Number of pose changes before stopping. Defaults to one full cycle.
    #[arg(long, value_name = "INT")]
    pub ticks: Option<usize>,
}

use crate::profile::ProfileKind;
use clap::{Args, Parser, Subcommand};
use nebkit::workflows::transition::{DEFAULT_FINAL_MARKER, DEFAULT_INITIAL_MARKER};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "nebkit - Prepare, inspect and post-process nudged elastic band calculations of ion migration in battery materials.",
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

    /// Use this directory for workflow profiles instead of the configured one
    #[arg(long, global = true, value_name = "DIR")]
    pub profile_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store and inspect workflow-manager profiles (launchpad, fireworker, queue).
    Config(ConfigArgs),
    /// Find the ion that migrates between an initial and a final structure.
    Migration(MigrationArgs),
    /// Write the input geometries for a calculation.
    Setup(SetupArgs),
    /// Structure utilities for NEB post-processing.
    Util(UtilArgs),
}

/// Where the values of a new profile come from.
#[derive(Args, Debug, Clone)]
pub struct ProfileSourceArgs {
    /// Import the profile from an existing YAML file instead of asking for values.
    #[arg(short, long, value_name = "PATH", conflicts_with = "set_values")]
    pub file: Option<PathBuf>,

    /// Name under which the profile is stored.
    #[arg(short, long, default_value = "base")]
    pub name: String,

    /// Answer a question non-interactively. Can be used multiple times.
    /// Example: -S host=db.example.org -S port=27017
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Store the connection details of the workflow database server.
    Launchpad(ProfileSourceArgs),
    /// Store the identity and VASP command of a fireworker.
    Fworker(ProfileSourceArgs),
    /// Store the queue adapter of a fireworker.
    Queue(ProfileSourceArgs),
    /// Install the job-script template used by a fireworker's queue adapter.
    Jobscript {
        /// Shell script template with `$${...}` placeholders.
        #[arg(required = true, value_name = "TEMPLATE")]
        template: PathBuf,
        /// Fireworker the template belongs to.
        #[arg(short, long, default_value = "base")]
        name: String,
    },
    /// Print a stored profile.
    Show {
        #[arg(value_enum)]
        kind: ProfileKind,
        #[arg(short, long, default_value = "base")]
        name: String,
    },
    /// List stored profiles, of one kind or of all kinds.
    List {
        #[arg(value_enum)]
        kind: Option<ProfileKind>,
    },
    /// Show the directory profiles are stored in.
    Root,
    /// Persist a custom directory for storing profiles.
    SetRoot {
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the profile directory to its default, OS-specific location.
    ResetRoot,
}

#[derive(Args, Debug)]
pub struct MigrationArgs {
    /// Structure before the hop (POSCAR/CONTCAR format).
    #[arg(value_name = "INITIAL")]
    pub initial: PathBuf,

    /// Structure after the hop.
    #[arg(value_name = "FINAL")]
    pub final_: PathBuf,
}

#[derive(Args, Debug)]
pub struct SetupArgs {
    #[command(subcommand)]
    pub command: SetupCommands,
}

#[derive(Subcommand, Debug)]
pub enum SetupCommands {
    /// Write the initial, final and (for migrations) host geometries of a transition.
    Transition(TransitionArgs),
}

#[derive(Args, Debug)]
pub struct TransitionArgs {
    /// Directory holding the end-point structures; outputs are written here.
    #[arg(value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Initial structure. Found by file name in DIR if omitted.
    #[arg(long, value_name = "PATH")]
    pub initial: Option<PathBuf>,

    /// Final structure. Found by file name in DIR if omitted.
    #[arg(long = "final", value_name = "PATH")]
    pub final_: Option<PathBuf>,

    /// Marker in the file name of the initial structure.
    #[arg(long, default_value = DEFAULT_INITIAL_MARKER)]
    pub initial_contains: String,

    /// Marker in the file name of the final structure.
    #[arg(long, default_value = DEFAULT_FINAL_MARKER)]
    pub final_contains: String,

    /// The transition is a single-ion migration; also write the host structure.
    #[arg(short, long)]
    pub migration: bool,
}

#[derive(Args, Debug)]
pub struct UtilArgs {
    #[command(subcommand)]
    pub command: UtilCommands,
}

#[derive(Subcommand, Debug)]
pub enum UtilCommands {
    /// Merge the images of a finished NEB run into a single structure.
    Path {
        /// Directory with the numbered image directories (00, 01, ...).
        #[arg(value_name = "NEB_DIR", default_value = ".")]
        neb_dir: PathBuf,
        /// Output file for the merged structure.
        #[arg(short, long, value_name = "PATH", default_value = "neb_path.vasp")]
        output: PathBuf,
    },
    /// Expand a structure into a diagonal supercell.
    Supercell {
        /// Structure file to expand.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Expansion factors, e.g. 223, 2x2x3 or "10 1 1".
        #[arg(value_name = "FACTORS")]
        factors: String,
    },
}

//! yaml-tidy cli interface

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Append log output to this file instead of writing it to stderr
    ///
    /// The log level is read from YAML_TIDY_LOG (default: info for a log
    /// file, warn for stderr).
    #[clap(long = "log-file", global(true))]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite all yaml files below a directory in place
    #[command(alias = "fmt")]
    Format(FormatCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct FormatCommand {
    /// Directory to search for .yml and .yaml files
    #[clap(long = "path")]
    pub path: PathBuf,

    /// Directory names that are not descended into
    #[clap(long = "skip-dirs", num_args = 0.., default_values = [".github"])]
    pub skip_dirs: Vec<String>,

    /// File names that are never touched
    #[clap(long = "skip-list", num_args = 0.., default_values = ["requirements.yml"])]
    pub skip_list: Vec<String>,

    /// How directory names are compared against --skip-dirs
    #[arg(long = "skip-dir-match", default_value_t)]
    pub skip_dir_match: SkipDirMatch,

    #[clap(flatten)]
    pub mapping: MappingArgs,

    /// Number of worker threads (0: one per cpu)
    #[clap(short = 'j', long = "jobs", default_value_t = 0)]
    pub jobs: usize,

    /// Report which files would change without writing them
    #[clap(long = "dry-run")]
    pub dry_run: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct MappingArgs {
    /// File with one `module_name: collection.prefix` per line
    #[clap(short = 'm', long = "mapping-file")]
    pub file: Option<PathBuf>,

    /// Qualify the modules shipped in ansible.builtin
    #[clap(long = "builtin-mapping")]
    pub builtin: bool,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum SkipDirMatch {
    #[default]
    Exact,
    Substring,
}

impl std::fmt::Display for SkipDirMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipDirMatch::Exact => f.write_str("exact"),
            SkipDirMatch::Substring => f.write_str("substring"),
        }
    }
}

impl From<SkipDirMatch> for yaml_tidy::walk::DirMatch {
    fn from(value: SkipDirMatch) -> Self {
        match value {
            SkipDirMatch::Exact => Self::Exact,
            SkipDirMatch::Substring => Self::Substring,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// List the formatting rules in the order they run
    Rules,
    /// Print the mapping table as it was loaded
    Mapping(MappingArgs),
}

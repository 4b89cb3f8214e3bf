//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Haiku archive builder CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to root (default: haiku.toml)
    #[arg(short = 'C', long, default_value = "haiku.toml")]
    pub config: PathBuf,

    /// Increase logging verbosity (-v for debug output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Which part of the build pipeline to run
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// pages, then tags, then manifest
    #[default]
    All,
    /// Build entry pages from inbox files
    Pages,
    /// Rebuild the tag index
    Tags,
    /// Rebuild the manifest
    Manifest,
}

impl Phase {
    pub const fn runs_pages(self) -> bool {
        matches!(self, Self::All | Self::Pages)
    }
    pub const fn runs_tags(self) -> bool {
        matches!(self, Self::All | Self::Tags)
    }
    pub const fn runs_manifest(self) -> bool {
        matches!(self, Self::All | Self::Manifest)
    }
}

/// How a phase treats output that already exists
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write new output, never overwrite an existing entry
    #[default]
    Create,
    /// Overwrite existing output
    Rebuild,
    /// Remove generated output
    Clean,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the project layout with a default template and config
    Init,

    /// Split inbox files into dated daily batch files
    Split {
        /// Inbox file or directory
        #[arg(long)]
        src: PathBuf,

        /// Destination directory for batch files
        #[arg(long)]
        dst: PathBuf,

        /// Date of the first batch (yyyymmdd or yyyy-mm-dd)
        #[arg(long)]
        startdate: String,

        /// Number of entries per day file (default: [split.per_day])
        #[arg(short, long)]
        number: Option<usize>,

        /// Show what would be written without writing files
        #[arg(long)]
        dry_run: bool,

        /// Leave source files in place instead of archiving them
        #[arg(long)]
        keep_source: bool,
    },

    /// Build pages from the inbox, then the tag index and manifest
    Build {
        /// Which phase(s) to run
        #[arg(long, value_enum, default_value_t = Phase::All)]
        phase: Phase,

        /// Mode of operation
        #[arg(long, value_enum, default_value_t = Mode::Create)]
        mode: Mode,

        /// Title override for every built entry
        #[arg(long)]
        title: Option<String>,

        /// Date override for every built entry (yyyy-mm-dd or yyyymmdd)
        #[arg(long)]
        date: Option<String>,

        /// Page template, relative to the working directory
        /// (default: <assets>/haiku.template.html)
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Recompute the current-entry summary from existing records
    Current,
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init)
    }
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split_command() {
        let cli = Cli::try_parse_from([
            "haiku", "split", "--src", "inbox/", "--dst", "/tmp/out", "--startdate", "20171201",
            "--number", "3", "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Split { src, dst, startdate, number, dry_run, keep_source } => {
                assert_eq!(src, PathBuf::from("inbox/"));
                assert_eq!(dst, PathBuf::from("/tmp/out"));
                assert_eq!(startdate, "20171201");
                assert_eq!(number, Some(3));
                assert!(dry_run);
                assert!(!keep_source);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::try_parse_from(["haiku", "build"]).unwrap();
        assert!(cli.is_build());
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Build { phase, mode, title, date, template } => {
                assert_eq!(phase, Phase::All);
                assert_eq!(mode, Mode::Create);
                assert!(title.is_none() && date.is_none() && template.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_build_phase_and_verbose() {
        let cli =
            Cli::try_parse_from(["haiku", "build", "--phase", "tags", "--mode", "clean", "-v"])
                .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Build { phase, mode, .. } => {
                assert_eq!(phase, Phase::Tags);
                assert_eq!(mode, Mode::Clean);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_phase_selection() {
        assert!(Phase::All.runs_pages() && Phase::All.runs_tags() && Phase::All.runs_manifest());
        assert!(Phase::Tags.runs_tags());
        assert!(!Phase::Tags.runs_pages());
        assert!(!Phase::Manifest.runs_tags());
    }

    #[test]
    fn test_split_requires_startdate() {
        let result = Cli::try_parse_from(["haiku", "split", "--src", "a", "--dst", "b"]);
        assert!(result.is_err());
    }
}

//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print every archived entry
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a directory into a ZIP archive
    Create(CreateArgs),
    /// Generate shell completion scripts
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Completion { .. } => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Directory to archive
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Exclude directories with this name (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Do not exclude node_modules and .git
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Store entries without compression
    #[arg(long, conflicts_with = "compression_level")]
    pub store: bool,

    /// Do not record Unix permissions in the archive
    #[arg(long)]
    pub no_permissions: bool,

    /// JSON config file with sourceRoot, destinationPath and exclude
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_excludes() {
        let cli = Cli::try_parse_from([
            "dirpack", "create", "backend", "deploy.zip", "-x", "dist", "-x", "build",
        ])
        .unwrap();

        let Commands::Create(args) = cli.command else {
            panic!("expected create command");
        };
        assert_eq!(args.source, Some(PathBuf::from("backend")));
        assert_eq!(args.output, Some(PathBuf::from("deploy.zip")));
        assert_eq!(args.exclude, vec!["dist", "build"]);
        assert!(!args.no_default_excludes);
    }

    #[test]
    fn test_parse_create_from_config_only() {
        let cli = Cli::try_parse_from(["dirpack", "create", "-c", "dirpack.json"]).unwrap();

        let Commands::Create(args) = cli.command else {
            panic!("expected create command");
        };
        assert!(args.source.is_none());
        assert!(args.output.is_none());
        assert_eq!(args.config, Some(PathBuf::from("dirpack.json")));
    }

    #[test]
    fn test_compression_level_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["dirpack", "create", "a", "b.zip", "-l", "0"]).is_err());
        assert!(Cli::try_parse_from(["dirpack", "create", "a", "b.zip", "-l", "10"]).is_err());
    }

    #[test]
    fn test_store_conflicts_with_level() {
        let result =
            Cli::try_parse_from(["dirpack", "create", "a", "b.zip", "--store", "-l", "5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dirpack", "-q", "-v", "create", "a", "b.zip"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_names() {
        let cli = Cli::try_parse_from(["dirpack", "completion", "bash"]).unwrap();
        assert_eq!(cli.command.name(), "completion");
    }
}

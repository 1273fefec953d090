use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "hgs",
    about = "hgs - read-only Mercurial working-directory inspector",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Layout config file (defaults to <root>/.hg/hgs.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start repository discovery here instead of the current directory
    #[arg(short = 'R', long, global = true, value_name = "PATH")]
    pub repository: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the root of the current working directory
    Root,
    /// Print the current branch name
    Branch,
    /// Print the working directory parents
    Parents,
    /// Show changed files in the working directory
    Status(StatusArgs),
    /// Show the contents of the dirstate
    #[command(name = "debugdirstate")]
    DebugDirstate(DebugDirstateArgs),
}

#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Show status of all files
    #[arg(short = 'A', long)]
    pub all: bool,
    /// Show only modified files
    #[arg(short, long)]
    pub modified: bool,
    /// Show only added files
    #[arg(short, long)]
    pub added: bool,
    /// Show only removed files
    #[arg(short, long)]
    pub removed: bool,
    /// Show only deleted (but tracked) files
    #[arg(short, long)]
    pub deleted: bool,
    /// Show only unknown (not tracked) files
    #[arg(short, long)]
    pub unknown: bool,
    /// Show only ignored files
    #[arg(short, long)]
    pub ignored: bool,
    /// Show only files without changes
    #[arg(short, long)]
    pub clean: bool,
    /// Hide status prefix
    #[arg(short, long)]
    pub no_status: bool,
    /// Show source of copied files
    #[arg(short = 'C', long)]
    pub copies: bool,
}

#[derive(Args, Debug, Default)]
pub struct DebugDirstateArgs {
    /// Do not display the saved mtime
    #[arg(long)]
    pub nodates: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root() {
        let cli = Cli::try_parse_from(["hgs", "root"]).unwrap();
        assert!(matches!(cli.command, Command::Root));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_status_defaults() {
        let cli = Cli::try_parse_from(["hgs", "status"]).unwrap();
        match cli.command {
            Command::Status(args) => {
                assert!(!args.all && !args.modified && !args.clean && !args.no_status);
            }
            _ => panic!("expected Status"),
        }
    }

    #[test]
    fn parse_status_short_flags() {
        let cli = Cli::try_parse_from(["hgs", "status", "-mar", "-n", "-C"]).unwrap();
        match cli.command {
            Command::Status(args) => {
                assert!(args.modified && args.added && args.removed);
                assert!(args.no_status && args.copies);
                assert!(!args.clean && !args.deleted && !args.unknown && !args.ignored);
            }
            _ => panic!("expected Status"),
        }
    }

    #[test]
    fn parse_status_long_flags() {
        let cli = Cli::try_parse_from(["hgs", "status", "--all", "--ignored", "--clean"]).unwrap();
        match cli.command {
            Command::Status(args) => assert!(args.all && args.ignored && args.clean),
            _ => panic!("expected Status"),
        }
    }

    #[test]
    fn parse_debugdirstate_nodates() {
        let cli = Cli::try_parse_from(["hgs", "debugdirstate", "--nodates"]).unwrap();
        match cli.command {
            Command::DebugDirstate(args) => assert!(args.nodates),
            _ => panic!("expected DebugDirstate"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hgs", "branch", "--format", "json", "-v", "--config", "/tmp/hgs.toml", "-R", "/repo",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Branch));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/hgs.toml")));
        assert_eq!(cli.repository, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(Cli::try_parse_from(["hgs", "commit"]).is_err());
    }
}

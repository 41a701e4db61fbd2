//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Plan-driven, idempotent rewrites of MDX documentation pages
#[derive(Parser, Debug)]
#[command(name = "mdxfix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .mdxfix.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Root that plan paths are relative to (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub docs_root: Option<PathBuf>,

    /// Show what would change without writing or deleting files
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Do not collapse blank-line runs in changed files
    #[arg(long, global = true)]
    pub no_normalize: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite the Terraform planfiles page
    Planfiles,

    /// Add purpose sentences and info callouts to Terraform command pages
    CommandDocs,

    /// Run a built-in plan by name or a plan TOML file
    Apply {
        /// Built-in plan name or path to a plan file
        #[arg(value_hint = ValueHint::FilePath)]
        plan: String,
    },

    /// List built-in plans, or print one as TOML
    Plans {
        /// Plan to print
        name: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

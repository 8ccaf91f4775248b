//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::TaxonomyKind;

/// Three-level checkable taxonomy pickers: expertise and location selection
#[derive(Parser, Debug)]
#[command(name = "treepick")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project directory for local config (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which picker to operate on
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerArg {
    Expertise,
    Location,
}

impl From<PickerArg> for TaxonomyKind {
    fn from(arg: PickerArg) -> Self {
        match arg {
            PickerArg::Expertise => TaxonomyKind::Expertise,
            PickerArg::Location => TaxonomyKind::Location,
        }
    }
}

/// Output shape for `selected`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectedFormat {
    /// One line per root with its branches and leaves
    #[default]
    Nested,
    /// Roots, root/branch pairs and root/branch/leaf triples
    Flat,
    /// Nested projection as JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show picker as checkbox tree
    Tree {
        #[arg(value_enum)]
        picker: PickerArg,
        /// Ignore expansion state and show every node
        #[arg(short, long)]
        all: bool,
    },

    /// Toggle a node: <root> [branch] [leaf]
    Toggle {
        #[arg(value_enum)]
        picker: PickerArg,
        /// Node path segments
        #[arg(num_args = 1..=3, required = true)]
        path: Vec<String>,
    },

    /// Expand/collapse a node: <root> [branch]
    Expand {
        #[arg(value_enum)]
        picker: PickerArg,
        /// Node path segments
        #[arg(num_args = 1..=2, required = true)]
        path: Vec<String>,
    },

    /// Print the current selection
    Selected {
        #[arg(value_enum)]
        picker: PickerArg,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = SelectedFormat::Nested)]
        format: SelectedFormat,
    },

    /// Pick a node interactively (fzf) and toggle it
    Pick {
        #[arg(value_enum)]
        picker: PickerArg,
    },

    /// Print onboarding payload (JSON) from both pickers
    Submit,

    /// Clear stored picker state
    Reset {
        /// Picker to reset (default: both)
        #[arg(value_enum)]
        picker: Option<PickerArg>,
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

//! CLI argument definitions using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Royal succession trees: lookup, line of succession and tree dumps
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Family definition file (default: built-in House of Windsor)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub family: Option<PathBuf>,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Measure ages as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Debug output, repeat for more (-d, -dd, -ddd)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Traversal order for listing members.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Order {
    /// Level by level
    #[default]
    Bfs,
    /// Pre-order depth first
    Dfs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the family tree
    Tree,

    /// Find a member by name (case-insensitive)
    Search {
        /// Member name
        name: String,
        /// Search depth first instead of breadth first
        #[arg(long)]
        dfs: bool,
    },

    /// Show the line of succession
    Succession,

    /// Show a member's place in the line of succession
    Position {
        /// Member name
        name: String,
    },

    /// List every member
    List {
        /// Traversal order
        #[arg(long, value_enum, default_value_t = Order::Bfs)]
        order: Order,
    },

    /// Add a member as the youngest child of a parent (this session only)
    Add {
        /// Parent name
        #[arg(long)]
        parent: String,
        /// New member name
        #[arg(long)]
        name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        born: NaiveDate,
        /// Title
        #[arg(long, default_value = "")]
        title: String,
        /// Member is deceased
        #[arg(long)]
        deceased: bool,
        /// Date of death (YYYY-MM-DD)
        #[arg(long, requires = "deceased")]
        died: Option<NaiveDate>,
    },

    /// Detach a member and their descendants (this session only)
    Remove {
        /// Member name
        name: String,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

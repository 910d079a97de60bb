use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "taxon",
    about = "An interactive editor for item-classification knowledge schemas",
    version,
    author,
    long_about = None
)]
pub struct TaxonCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Path to a gateway configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage item types
    Types {
        #[command(subcommand)]
        action: TypeAction,
    },

    /// Manage properties
    Props {
        #[command(subcommand)]
        action: PropAction,
    },

    /// Manage the possible values of a property
    Values {
        /// Property name
        property: String,

        #[command(subcommand)]
        action: ValueAction,
    },

    /// Declare a property applicable to a type
    Assign {
        /// Type id
        type_id: u64,

        /// Property name
        property: String,
    },

    /// Withdraw a property from a type
    Unassign {
        /// Type id
        type_id: u64,

        /// Property name
        property: String,
    },

    /// Assign a possible value to a type's property
    Set {
        /// Type id
        type_id: u64,

        /// Property name
        property: String,

        /// Value to assign (must be in the property's domain)
        value: String,
    },

    /// Remove an assigned value from a type's property
    Unset {
        /// Type id
        type_id: u64,

        /// Property name
        property: String,

        /// Value to remove
        value: String,
    },

    /// Show the dependent-selection chain for a type
    Show {
        /// Type id (defaults to the first type)
        #[arg(short, long)]
        type_id: Option<u64>,

        /// Property to focus (defaults to the first applicable property)
        #[arg(short, long)]
        property: Option<String>,
    },

    /// Run the completeness audit
    Check,

    /// Classify an item from property values
    Classify {
        /// Use the learned-model classifier instead of the rule-based one
        #[arg(long)]
        ai: bool,

        /// property=value pairs fed to the classifier
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        values: Vec<String>,

        /// Pick values interactively, walking each property's domain
        #[arg(short, long)]
        interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum TypeAction {
    /// List all item types
    List,
    /// Create a type
    Add { name: String },
    /// Delete a type and cascade its assignments
    Rm { id: u64 },
}

#[derive(Subcommand)]
pub enum PropAction {
    /// List all properties
    List,
    /// Create a property
    Add { name: String },
    /// Delete a property and cascade its values and assignments
    Rm { id: u64 },
}

#[derive(Subcommand)]
pub enum ValueAction {
    /// List the property's possible values
    List,
    /// Add a value to the property's domain
    Add { value: String },
    /// Remove a value from the domain and from every assignment using it
    Rm { value: String },
}

//! Command-line argument definitions for the WordStream CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Each [`Command`] names one pipeline stage; configuration
//! file selection and logging verbosity apply to all of them.

use clap::{Parser, Subcommand};

/// Command-line arguments for the WordStream layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out a dataset and write the placed words and bands as JSON
    Layout {
        /// Path to the dataset JSON file
        #[arg(help = "Path to the input dataset")]
        input: String,

        /// Path to the output layout file
        #[arg(short, long, default_value = "boxes.json")]
        output: String,

        /// Indent the output JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Turn a raw corpus (.txt, .csv, .tsv or .json) into a dataset
    Preprocess {
        /// Path to the corpus file
        #[arg(help = "Path to the input corpus")]
        input: String,

        /// Path to the output dataset file
        #[arg(short, long, default_value = "dataset.json")]
        output: String,

        /// Dataset name; defaults to the input file stem
        #[arg(long)]
        name: Option<String>,

        /// Indent the output JSON
        #[arg(long)]
        pretty: bool,
    },
}

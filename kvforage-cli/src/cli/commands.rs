// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kvforage", version, about = "Async key-value store over pluggable drivers")]
pub struct Cli {
    /// Directory holding persistent databases
    #[arg(long, global = true, env = "KVFORAGE_DATA_DIR", default_value = "./kvforage-data")]
    pub data_dir: PathBuf,

    /// Database name
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Store name within the database
    #[arg(long = "store", global = true)]
    pub store_name: Option<String>,

    /// Driver to try, in order; repeat for fallbacks
    #[arg(long = "driver", global = true)]
    pub drivers: Vec<String>,

    /// JSON store configuration file; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print the value stored under KEY
    Get { key: String },

    /// Store VALUE under KEY; VALUE is parsed as JSON, else kept as text
    Set { key: String, value: String },

    /// Remove KEY
    Remove { key: String },

    /// List every key of the store
    Keys,

    /// Count the keys of the store
    Length,

    /// Print the key at INDEX
    Key { index: usize },

    /// Print every entry of the store
    Iterate,

    /// Remove every key of the store
    Clear,

    /// Drop the store, or with --whole-database every store of the database
    Drop {
        #[arg(long)]
        whole_database: bool,
    },

    /// List registered drivers
    Drivers,

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

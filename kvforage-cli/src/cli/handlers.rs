// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for kvforage

use colored::Colorize;

use super::commands::{Cli, Commands};
use super::output::{DriverRow, OutputFormatter};
use kvforage::{DropOptions, Forage, StoreConfig, Value, MEMORY_DRIVER};

/// Run a store command to completion on a current-thread runtime
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(execute(&cli)) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e)
        }
    }
}

/// Build the store configuration from the config file and flags
pub fn store_config(cli: &Cli) -> Result<StoreConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::new(),
    };
    if let Some(name) = &cli.name {
        config = config.name(name.as_str());
    }
    if let Some(store_name) = &cli.store_name {
        config = config.store_name(store_name.as_str());
    }
    if !cli.drivers.is_empty() {
        config = config.driver(cli.drivers.clone());
    }
    Ok(config)
}

/// Parse a value argument as JSON, falling back to plain text
pub fn parse_value(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::from(raw),
    }
}

async fn execute(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let store = Forage::with_data_dir(cli.data_dir.clone(), store_config(cli)?);
    log::debug!("Opened {:?} under {:?}", store, cli.data_dir);
    let format = cli.format;

    let output = match &cli.command {
        Commands::Get { key } => {
            let value = store.get_item(key).await?;
            OutputFormatter::item(key, value.as_ref(), format)
        }
        Commands::Set { key, value } => {
            let stored = store.set_item(key, parse_value(value)).await?;
            OutputFormatter::item(key, Some(&stored), format)
        }
        Commands::Remove { key } => {
            store.remove_item(key).await?;
            OutputFormatter::message(&format!("Removed '{}'", key), format)
        }
        Commands::Keys => OutputFormatter::keys(&store.keys().await?, format),
        Commands::Length => OutputFormatter::count(store.length().await?, format),
        Commands::Key { index } => {
            let key = store.key(*index).await?;
            OutputFormatter::key_at(*index, key.as_deref(), format)
        }
        Commands::Iterate => {
            let mut entries = Vec::new();
            let _: Option<()> = store
                .iterate(|value, key, iteration| {
                    entries.push((iteration, key, value));
                    None
                })
                .await?;
            OutputFormatter::entries(&entries, format)
        }
        Commands::Clear => {
            store.clear().await?;
            OutputFormatter::message("Store cleared", format)
        }
        Commands::Drop { whole_database } => {
            let config = store.current_config();
            if *whole_database {
                store
                    .drop_instance(DropOptions::database(config.name.clone()))
                    .await?;
                OutputFormatter::message(&format!("Dropped database '{}'", config.name), format)
            } else {
                store.drop_instance(DropOptions::own_store()).await?;
                OutputFormatter::message(
                    &format!("Dropped store '{}/{}'", config.name, config.store_name),
                    format,
                )
            }
        }
        Commands::Drivers => {
            if let Err(e) = store.ready().await {
                log::warn!("No driver could be bound: {}", e);
            }
            let bound = store.driver();
            let default_order = store.registry().default_order();
            let rows: Vec<DriverRow> = store
                .registry()
                .driver_names()
                .into_iter()
                .map(|name| DriverRow {
                    supported: store.supports(&name),
                    priority: default_order.iter().position(|n| *n == name).map(|p| p + 1),
                    bound: bound.as_deref() == Some(name.as_str()),
                    name,
                })
                .collect();
            OutputFormatter::drivers(&rows, format)
        }
        Commands::Version => format!("kvforage {}", kvforage::VERSION),
    };

    if cli.drivers.is_empty() && store.driver().as_deref() == Some(MEMORY_DRIVER) {
        eprintln!(
            "{}",
            format!(
                "Warning: {:?} could not be opened; data is held in memory and not persisted",
                cli.data_dir
            )
            .yellow()
        );
    }

    Ok(output)
}

// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use kvforage::Value;

use super::commands::OutputFormat;

/// One line of the `drivers` listing
#[derive(Debug, Clone, PartialEq)]
pub struct DriverRow {
    pub name: String,
    pub supported: bool,
    /// 1-based position in the default order, if listed there
    pub priority: Option<usize>,
    pub bound: bool,
}

/// Formats command results as tables or JSON
pub struct OutputFormatter;

impl OutputFormatter {
    pub fn item(key: &str, value: Option<&Value>, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&serde_json::json!({
                "key": key,
                "value": value.map(Value::to_json).unwrap_or(serde_json::Value::Null),
            })),
            OutputFormat::Table => match value {
                None => format!("{}", format!("No value stored under '{}'", key).yellow()),
                Some(value) => {
                    let mut table = Self::table(&["Key", "Type", "Value"]);
                    table.add_row(vec![
                        key.to_string(),
                        value.type_name().to_string(),
                        value.to_string(),
                    ]);
                    table.to_string()
                }
            },
        }
    }

    pub fn keys(keys: &[String], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&serde_json::json!({ "keys": keys })),
            OutputFormat::Table => {
                if keys.is_empty() {
                    return format!("{}", "Store is empty".yellow());
                }
                let mut table = Self::table(&["#", "Key"]);
                for (index, key) in keys.iter().enumerate() {
                    table.add_row(vec![index.to_string(), key.clone()]);
                }
                format!("{}\n{} keys", table, keys.len())
            }
        }
    }

    pub fn count(length: usize, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&serde_json::json!({ "length": length })),
            OutputFormat::Table => format!("{} {}", "Length:".bold(), length),
        }
    }

    pub fn key_at(index: usize, key: Option<&str>, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                Self::to_json(&serde_json::json!({ "index": index, "key": key }))
            }
            OutputFormat::Table => match key {
                Some(key) => key.to_string(),
                None => format!("{}", format!("No key at index {}", index).yellow()),
            },
        }
    }

    pub fn entries(entries: &[(u32, String, Value)], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = entries
                    .iter()
                    .map(|(iteration, key, value)| {
                        serde_json::json!({
                            "iteration": iteration,
                            "key": key,
                            "value": value.to_json(),
                        })
                    })
                    .collect();
                Self::to_json(&serde_json::json!({ "entries": rows }))
            }
            OutputFormat::Table => {
                if entries.is_empty() {
                    return format!("{}", "Store is empty".yellow());
                }
                let mut table = Self::table(&["#", "Key", "Type", "Value"]);
                for (iteration, key, value) in entries {
                    table.add_row(vec![
                        iteration.to_string(),
                        key.clone(),
                        value.type_name().to_string(),
                        value.to_string(),
                    ]);
                }
                table.to_string()
            }
        }
    }

    pub fn drivers(rows: &[DriverRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                let drivers: Vec<serde_json::Value> = rows
                    .iter()
                    .map(|row| {
                        serde_json::json!({
                            "name": row.name,
                            "supported": row.supported,
                            "priority": row.priority,
                            "bound": row.bound,
                        })
                    })
                    .collect();
                Self::to_json(&serde_json::json!({ "drivers": drivers }))
            }
            OutputFormat::Table => {
                let mut table = Self::table(&["Driver", "Supported", "Priority", "Bound"]);
                for row in rows {
                    let supported = if row.supported {
                        Cell::new("yes").fg(Color::Green)
                    } else {
                        Cell::new("no").fg(Color::Red)
                    };
                    table.add_row(vec![
                        Cell::new(&row.name),
                        supported,
                        Cell::new(row.priority.map_or("-".to_string(), |p| p.to_string())),
                        Cell::new(if row.bound { "*" } else { "" }),
                    ]);
                }
                table.to_string()
            }
        }
    }

    pub fn message(message: &str, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&serde_json::json!({
                "status": "success",
                "message": message,
            })),
            OutputFormat::Table => format!("{}", format!("✅ {}", message).green()),
        }
    }

    fn table(header: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            header
                .iter()
                .map(|col| Cell::new(col).fg(Color::Green))
                .collect::<Vec<Cell>>(),
        );
        table
    }

    fn to_json(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize results to JSON\"}".to_string()
        })
    }
}

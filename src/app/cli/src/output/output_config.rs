// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::Write;

use serde::Serialize;

use super::records_writers::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Suppresses the informational messages on STDERR
    pub quiet: bool,
    /// Number of `-v` flags
    pub verbosity_level: u8,
    /// Whether STDOUT is attended by a human
    pub is_tty: bool,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            verbosity_level: 0,
            is_tty: false,
            format: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
}

impl OutputConfig {
    pub fn get_records_writer(&self, format: RecordsFormat) -> Box<dyn RecordsWriter> {
        match self.format {
            OutputFormat::Table => Box::new(TableWriter::new(format)),
            OutputFormat::Json => Box::new(JsonArrayWriter::new(std::io::stdout())),
        }
    }

    /// Writes a single result object, a two-column table in table mode
    pub fn write_object<T: Serialize>(&self, title: &str, value: &T) -> Result<(), std::io::Error> {
        match self.format {
            OutputFormat::Json => {
                let mut stdout = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, value)?;
                writeln!(stdout)?;
                Ok(())
            }
            OutputFormat::Table => {
                let fields = match serde_json::to_value(value)? {
                    serde_json::Value::Object(map) => map,
                    other => {
                        let mut map = serde_json::Map::new();
                        map.insert(title.to_string(), other);
                        map
                    }
                };

                let mut writer = TableWriter::new(RecordsFormat::new(vec![
                    ColumnFormat::new(title).with_style_spec("l"),
                    ColumnFormat::new("").with_style_spec("r"),
                ]));
                for (key, value) in fields {
                    writer.write_row(&serde_json::Value::Null, vec![key, scalar_to_string(&value)])?;
                }
                writer.finish()
            }
        }
    }

    /// Informational message on STDERR
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{msg}");
        }
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

// Copyright JobStats contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::Write;

use prettytable::{Cell, Row, Table};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Sink for tabular command output. Every row is given both as a JSON
/// record and as display cells, the writer picks what it renders.
pub trait RecordsWriter {
    fn write_row(&mut self, record: &serde_json::Value, cells: Vec<String>) -> Result<(), std::io::Error>;

    fn finish(&mut self) -> Result<(), std::io::Error>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct RecordsFormat {
    column_formats: Vec<ColumnFormat>,
}

impl RecordsFormat {
    pub fn new(column_formats: Vec<ColumnFormat>) -> Self {
        Self { column_formats }
    }

    pub fn column_formats(&self) -> &[ColumnFormat] {
        &self.column_formats
    }
}

#[derive(Debug, Clone)]
pub struct ColumnFormat {
    title: String,
    style_spec: Option<String>,
    null_value: Option<String>,
    max_len: Option<usize>,
}

impl ColumnFormat {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            style_spec: None,
            null_value: None,
            max_len: None,
        }
    }

    pub fn with_style_spec(self, style_spec: impl Into<String>) -> Self {
        Self {
            style_spec: Some(style_spec.into()),
            ..self
        }
    }

    pub fn with_null_value(self, null_value: impl Into<String>) -> Self {
        Self {
            null_value: Some(null_value.into()),
            ..self
        }
    }

    pub fn with_max_len(self, max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..self
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn get_style_spec(&self) -> &str {
        self.style_spec.as_deref().unwrap_or("")
    }

    pub fn format(&self, value: String) -> String {
        if value.is_empty() {
            return self.null_value.clone().unwrap_or_default();
        }
        match self.max_len {
            Some(max_len) if value.chars().count() > max_len => {
                let mut truncated: String = value.chars().take(max_len.saturating_sub(1)).collect();
                truncated.push('…');
                truncated
            }
            _ => value,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct TableWriter {
    format: RecordsFormat,
    rows_written: usize,
    table: Table,
}

impl TableWriter {
    // TODO: prettytable is hard to print out into a generic Writer
    // as it wants tty output to implement term::Terminal trait
    pub fn new(format: RecordsFormat) -> Self {
        let mut table = Table::new();
        table.set_format(Self::get_table_format());

        let header = format
            .column_formats()
            .iter()
            .map(|c| Cell::new(c.title()).style_spec("bc"))
            .collect();
        table.set_titles(Row::new(header));

        Self {
            format,
            rows_written: 0,
            table,
        }
    }

    pub fn get_table_format() -> prettytable::format::TableFormat {
        use prettytable::format::*;

        FormatBuilder::new()
            .column_separator('│')
            .borders('│')
            .separators(&[LinePosition::Top], LineSeparator::new('─', '┬', '┌', '┐'))
            .separators(
                &[LinePosition::Title],
                LineSeparator::new('─', '┼', '├', '┤'),
            )
            .separators(
                &[LinePosition::Bottom],
                LineSeparator::new('─', '┴', '└', '┘'),
            )
            .padding(1, 1)
            .build()
    }
}

impl RecordsWriter for TableWriter {
    fn write_row(&mut self, _record: &serde_json::Value, cells: Vec<String>) -> Result<(), std::io::Error> {
        let row = cells
            .into_iter()
            .zip(self.format.column_formats())
            .map(|(value, column)| Cell::new(&column.format(value)).style_spec(column.get_style_spec()))
            .collect();

        self.table.add_row(Row::new(row));
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), std::io::Error> {
        // BUG: Header doesn't render when there are no data rows in the table
        // so we add an empty row
        if self.rows_written == 0 {
            let row = self.table.add_empty_row();
            for _ in 0..self.format.column_formats().len() {
                row.add_cell(Cell::new(""));
            }
        }

        self.table.printstd();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Writes all records as one JSON array once finished
pub struct JsonArrayWriter<W> {
    out: W,
    records: Vec<serde_json::Value>,
}

impl<W: Write> JsonArrayWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: Vec::new(),
        }
    }
}

impl<W: Write> RecordsWriter for JsonArrayWriter<W> {
    fn write_row(&mut self, record: &serde_json::Value, _cells: Vec<String>) -> Result<(), std::io::Error> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), std::io::Error> {
        serde_json::to_writer_pretty(&mut self.out, &self.records)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

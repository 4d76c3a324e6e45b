//! Passive report model. Rendering is left to whoever consumes it; the
//! types serialize with serde for the JSON output of the CLI.

use serde::Serialize;

use crate::error::{Error, Result};

/// Separator between several values inside one table cell. A constant so
/// report output does not depend on the platform it was produced on.
pub const LINE_SEPARATOR: &str = "\n";

/// Message under the empty table of an issue section that found nothing.
pub const NO_ISSUES_FOUND: &str = "No issues found";

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub description: String,
    pub content: Vec<ReportContent>,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            content: Vec::new(),
        }
    }

    pub fn add_table(&mut self, table: ReportTable) {
        self.content.push(ReportContent::Table(table));
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.content.push(ReportContent::Note(note.into()));
    }

    pub fn tables(&self) -> impl Iterator<Item = &ReportTable> {
        self.content.iter().filter_map(|content| match content {
            ReportContent::Table(table) => Some(table),
            ReportContent::Note(_) => None,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ReportContent {
    Table(ReportTable),
    Note(String),
}

/// Table with fixed columns; every row has one value per column.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = values.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(Error::TableShapeMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Human-readable size: bytes below 1 KB, otherwise rounded to the
/// largest unit that stays below 1024.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    for unit in ["KB", "MB"] {
        let rounded = value.round();
        if rounded < 1024.0 {
            return format!("{rounded} {unit}");
        }
        value /= 1024.0;
    }
    format!("{} GB", value.round())
}

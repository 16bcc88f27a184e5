use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord, Writer};
use tracing::warn;

use crate::parser::WordData;

/// Columns appended to the input header, in order.
pub const EXTRA_COLUMNS: [&str; 3] = ["year_used", "etym", "year_accurate"];

/// Index of the word column in every data row.
const WORD_FIELD: usize = 2;

/// A data row that has a word to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    pub fields: Vec<String>,
}

impl WordRow {
    /// Hands the fields back when the row is too short to carry a word.
    pub fn from_fields(fields: Vec<String>) -> Result<Self, Vec<String>> {
        if fields.len() <= WORD_FIELD {
            return Err(fields);
        }
        Ok(WordRow { fields })
    }

    pub fn word(&self) -> &str {
        &self.fields[WORD_FIELD]
    }
}

/// An input row with the three derived values appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    pub fields: Vec<String>,
    pub data: WordData,
}

impl EnrichedRow {
    pub fn new(row: WordRow, data: WordData) -> Self {
        EnrichedRow {
            fields: row.fields,
            data,
        }
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut out = self.fields.clone();
        out.push(self.data.year.to_string());
        out.push(self.data.etymology.to_string());
        out.push(bool_field(self.data.is_accurate).to_string());
        out
    }
}

fn bool_field(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Parsed input: the header plus every row that carries a word.
pub struct InputTable {
    pub header: Vec<String>,
    pub rows: Vec<WordRow>,
    pub skipped: usize,
}

/// Read the whole input table. Fails only if the file cannot be opened or
/// has no header; short, blank or undecodable rows are logged and skipped.
pub fn read_input(path: &Path) -> Result<InputTable> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to open input {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let header = record_fields(
        reader
            .headers()
            .with_context(|| format!("Failed to read header of {}", path.display()))?,
    );
    if header.is_empty() {
        bail!("Input {} has no header row", path.display());
    }

    let mut rows = Vec::new();
    let mut skipped = 0;

    // the csv reader drops blank lines without yielding a record
    for line in blank_row_lines(&bytes) {
        warn!("Skipping malformed row: [] (line {})", line);
        skipped += 1;
    }

    for (i, record) in reader.records().enumerate() {
        let fields = match record {
            Ok(r) => record_fields(&r),
            Err(e) => {
                warn!("Skipping unreadable row {}: {}", i + 1, e);
                skipped += 1;
                continue;
            }
        };
        match WordRow::from_fields(fields) {
            Ok(row) => rows.push(row),
            Err(fields) => {
                warn!("Skipping malformed row: {:?}", fields);
                skipped += 1;
            }
        }
    }

    Ok(InputTable {
        header,
        rows,
        skipped,
    })
}

fn record_fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// 1-based line numbers of empty lines after the header that sit outside
/// quoted fields.
fn blank_row_lines(bytes: &[u8]) -> Vec<usize> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let mut blanks = Vec::new();
    let mut in_quotes = false;
    let mut seen_header = false;

    for (i, line) in body.split(|&b| b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() && !in_quotes {
            if seen_header {
                blanks.push(i + 1);
            }
            continue;
        }
        seen_header = true;
        // "" escapes flip twice, leaving the state unchanged
        if line.iter().filter(|&&b| b == b'"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
    }
    blanks
}

/// Output sink: writes the extended header on creation, then one record per row.
pub struct OutputTable {
    writer: Writer<File>,
}

impl OutputTable {
    pub fn create(path: &Path, input_header: &[String]) -> Result<Self> {
        let mut writer = Writer::from_path(path)
            .with_context(|| format!("Failed to create output {}", path.display()))?;
        let header: Vec<&str> = input_header
            .iter()
            .map(String::as_str)
            .chain(EXTRA_COLUMNS)
            .collect();
        writer.write_record(&header)?;
        Ok(OutputTable { writer })
    }

    pub fn write(&mut self, row: &EnrichedRow) -> Result<()> {
        self.writer.write_record(row.to_record())?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

// ── Tests ──

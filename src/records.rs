use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::ConfigError;

/// Header names of the columns the validator reads and writes.
#[derive(Debug, Clone)]
pub struct Columns {
    pub id: String,
    pub name: String,
    pub address: String,
    pub matched: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            id: "BID".to_string(),
            name: "Business Name".to_string(),
            address: "Full Address".to_string(),
            matched: "Matched Place".to_string(),
        }
    }
}

/// Rows `[offset, offset + limit)` of the input, not counting the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct Window {
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub business_name: String,
    /// Business name and address together, used as the search query.
    pub full_address: String,
    pub matched_place: Option<String>,
    fields: StringRecord,
}

impl Record {
    #[cfg(test)]
    pub fn new(
        id: impl Into<String>,
        business_name: impl Into<String>,
        full_address: impl Into<String>,
    ) -> Self {
        let (id, business_name, full_address) =
            (id.into(), business_name.into(), full_address.into());
        let fields = StringRecord::from(vec![&*id, &*business_name, &*full_address]);
        Self {
            id,
            business_name,
            full_address,
            matched_place: None,
            fields,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    headers: StringRecord,
    matched_index: Option<usize>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn load(path: &Path, columns: &Columns, window: Window) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input: {}", path.display()))?;
        Self::read(file, columns, window)
            .with_context(|| format!("Failed to read input: {}", path.display()))
    }

    pub fn read<R: Read>(reader: R, columns: &Columns, window: Window) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers()?.clone();

        let index = |name: &str| {
            headers
                .iter()
                .position(|x| x == name)
                .ok_or_else(|| ConfigError::MissingColumn(name.to_string()))
        };
        let id = index(&columns.id)?;
        let name = index(&columns.name)?;
        let address = index(&columns.address)?;
        let matched_index = headers.iter().position(|x| x == columns.matched);

        let mut records = Vec::new();
        let rows = reader
            .records()
            .enumerate()
            .skip(window.offset)
            .take(window.limit.unwrap_or(usize::MAX));
        for (line, row) in rows {
            // +2: 1-indexed plus the header row
            let fields = row.with_context(|| format!("Failed to parse CSV line {}", line + 2))?;
            let field = |i: usize| fields.get(i).unwrap_or_default().to_string();
            records.push(Record {
                id: field(id),
                business_name: field(name),
                full_address: field(address),
                matched_place: None,
                fields: fields.clone(),
            });
        }

        Ok(Self {
            headers,
            matched_index,
            records,
        })
    }

    pub fn save(&self, path: &Path, columns: &Columns) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output: {}", path.display()))?;
        self.write(file, columns)
            .with_context(|| format!("Failed to write output: {}", path.display()))
    }

    /// Writes every record in the window with all original columns. The
    /// matched column replaces an existing one of the same name, otherwise
    /// it is appended.
    pub fn write<W: Write>(&self, writer: W, columns: &Columns) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);

        let mut headers = self.headers.clone();
        if self.matched_index.is_none() {
            headers.push_field(&columns.matched);
        }
        writer.write_record(&headers)?;

        for record in &self.records {
            let matched = record.matched_place.as_deref().unwrap_or_default();
            let row: StringRecord = match self.matched_index {
                Some(i) => record
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(j, x)| if j == i { matched } else { x })
                    .collect(),
                None => {
                    let mut row = record.fields.clone();
                    row.push_field(matched);
                    row
                }
            };
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

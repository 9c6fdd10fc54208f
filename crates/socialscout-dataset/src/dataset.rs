//! In-memory tabular dataset backed by a CSV file.
//!
//! Cells are kept as strings so columns this crate does not know about
//! round-trip unchanged, in their original order.

use std::fs;
use std::path::Path;

use socialscout_core::{ColumnNames, CompanyRecord, TextEncoding};

use crate::encoding::{decode_with_fallback, encode};
use crate::error::DatasetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    encoding: TextEncoding,
}

impl Dataset {
    /// Reads `path`, decoding with the first encoding of `chain` that
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read,
    /// [`DatasetError::Decode`] if no encoding in `chain` decodes it, or
    /// [`DatasetError::Csv`] if it is not valid CSV.
    pub fn load(path: &Path, chain: &[TextEncoding]) -> Result<Self, DatasetError> {
        let bytes = fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let Some((text, encoding)) = decode_with_fallback(&bytes, chain) else {
            return Err(DatasetError::Decode {
                path: path.display().to_string(),
                tried: chain
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        };

        let mut dataset = Self::from_csv_str(&text)?;
        dataset.encoding = encoding;
        tracing::info!(
            path = %path.display(),
            %encoding,
            rows = dataset.len(),
            columns = dataset.headers.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parses CSV text with a header row. Short rows are padded with empty
    /// cells; long rows keep their extra cells under generated headers.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Csv`] on malformed CSV.
    pub fn from_csv_str(text: &str) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            while headers.len() < row.len() {
                headers.push(format!("column_{}", headers.len() + 1));
            }
            rows.push(row);
        }
        for row in &mut rows {
            row.resize(headers.len(), String::new());
        }

        Ok(Self {
            headers,
            rows,
            encoding: TextEncoding::Utf8,
        })
    }

    /// Serializes the dataset as CSV text.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Csv`] if writing fails.
    pub fn to_csv_string(&self) -> Result<String, DatasetError> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| DatasetError::Csv(e.into_error().into()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Writes the dataset to `path` in `encoding`. The file is written next
    /// to the target and renamed into place, so an interrupted save never
    /// leaves a truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if serialization or any file operation fails.
    pub fn save(&self, path: &Path, encoding: TextEncoding) -> Result<(), DatasetError> {
        let encoded = encode(&self.to_csv_string()?, encoding);
        if encoded.lossy {
            tracing::warn!(
                path = %path.display(),
                %encoding,
                "characters without a representation in the target encoding were dropped"
            );
        }

        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        fs::write(&tmp_path, &encoded.bytes).map_err(|e| DatasetError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| DatasetError::io(path, e))?;

        tracing::debug!(path = %path.display(), rows = self.len(), "dataset saved");
        Ok(())
    }

    /// Encoding the dataset was decoded with.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Appends `name` as an empty column unless it already exists.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Checks the company-name column exists and appends missing platform
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingColumn`] when the company-name column
    /// is absent; `source` names the dataset in the message.
    pub fn prepare_columns(&mut self, cols: &ColumnNames, source: &str) -> Result<(), DatasetError> {
        if self.column_index(&cols.company_name).is_none() {
            return Err(DatasetError::MissingColumn {
                column: cols.company_name.clone(),
                path: source.to_string(),
            });
        }
        self.ensure_column(&cols.profile_url);
        self.ensure_column(&cols.follower_count);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Sets a cell, appending the column if needed. Out-of-range rows are
    /// ignored.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<String>) {
        let col = self.ensure_column(column);
        if let Some(cells) = self.rows.get_mut(row) {
            cells[col] = value.into();
        }
    }

    /// The row at `row` viewed through `cols`.
    #[must_use]
    pub fn record(&self, row: usize, cols: &ColumnNames) -> Option<CompanyRecord> {
        if row >= self.rows.len() {
            return None;
        }
        let cell = |column: &str| {
            self.get(row, column)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Some(CompanyRecord {
            company_name: cell(&cols.company_name).unwrap_or_default(),
            website_url: cell(&cols.website_url),
            profile_url: cell(&cols.profile_url),
            follower_count: cell(&cols.follower_count).and_then(|v| parse_stored_count(&v)),
        })
    }

    /// Records an accepted profile. The count is always written, `0`
    /// included, so a URL never appears without a count.
    pub fn write_profile(&mut self, row: usize, cols: &ColumnNames, url: &str, follower_count: u64) {
        self.set(row, &cols.profile_url, url);
        self.set(row, &cols.follower_count, follower_count.to_string());
    }

    /// Empties both profile cells of a row.
    pub fn clear_profile(&mut self, row: usize, cols: &ColumnNames) {
        self.set(row, &cols.profile_url, "");
        self.set(row, &cols.follower_count, "");
    }
}

/// Reads a stored count, tolerating float renderings such as `"1234.0"`
/// left behind by spreadsheet tools.
fn parse_stored_count(value: &str) -> Option<u64> {
    let value = value.replace(',', "");
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let float = value.parse::<f64>().ok()?;
    if !float.is_finite() || float < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = float.floor() as u64;
    Some(count)
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;

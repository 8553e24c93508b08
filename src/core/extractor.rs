use crate::adapters::calamine_reader::CalamineReader;
use crate::core::source;
use crate::domain::model::{Fill, RecordField, RecordSet, SheetRecord, SENTINEL};
use crate::domain::ports::SpreadsheetReader;
use crate::utils::error::{CatalogError, Result};
use std::marker::PhantomData;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding<F> {
    pub field: F,
    pub index: usize,
    pub fill: Fill,
}

/// Which spreadsheet column feeds which record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap<F> {
    bindings: Vec<ColumnBinding<F>>,
}

impl<F: RecordField> ColumnMap<F> {
    pub fn from_pairs<I: IntoIterator<Item = (F, usize)>>(pairs: I) -> Self {
        let bindings = pairs
            .into_iter()
            .map(|(field, index)| ColumnBinding {
                field,
                index,
                fill: field.fill(),
            })
            .collect();
        Self { bindings }
    }

    pub fn defaults() -> Self {
        Self::from_pairs(F::default_columns())
    }

    pub fn bindings(&self) -> &[ColumnBinding<F>] {
        &self.bindings
    }
}

impl<F: RecordField> Default for ColumnMap<F> {
    fn default() -> Self {
        Self::defaults()
    }
}

pub fn coalesce(value: &str) -> String {
    if value.is_empty() {
        SENTINEL.to_string()
    } else {
        value.to_string()
    }
}

/// Value of `row[index]` under the given fill policy. Never panics on short rows.
pub fn cell_value(row: &[String], index: usize, fill: Fill) -> String {
    match (row.get(index), fill) {
        (Some(value), _) => coalesce(value),
        (None, Fill::Sentinel) => SENTINEL.to_string(),
        (None, Fill::EmptyWhenAbsent) => String::new(),
    }
}

/// Maps rows of the first matching sheet into records of type `R`.
#[derive(Debug, Clone)]
pub struct SheetExtractor<R: SheetRecord> {
    candidates: Vec<String>,
    header_rows: usize,
    columns: ColumnMap<R::Field>,
    _record: PhantomData<fn() -> R>,
}

impl<R: SheetRecord> SheetExtractor<R> {
    pub fn new(candidates: Vec<String>, header_rows: usize, columns: ColumnMap<R::Field>) -> Self {
        Self {
            candidates,
            header_rows,
            columns,
            _record: PhantomData,
        }
    }

    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Result<RecordSet<R>> {
        let path = path.as_ref();
        let bytes = source::read_local(path)?;
        self.extract_bytes(&path.display().to_string(), &bytes)
    }

    /// `location` only labels errors; the workbook is read from `bytes`.
    pub fn extract_bytes(&self, location: &str, bytes: &[u8]) -> Result<RecordSet<R>> {
        let reader = CalamineReader::open(location, bytes)?;
        self.extract_from(reader)
    }

    /// Consumes the reader so the document is released on every return path.
    pub fn extract_from<D: SpreadsheetReader>(&self, mut reader: D) -> Result<RecordSet<R>> {
        let (position, sheet, rows) = self.locate_sheet(&mut reader)?;
        if position > 0 {
            tracing::info!("Found {} data in sheet: {}", R::KIND, sheet);
        } else {
            tracing::debug!("Found {} data in sheet: {}", R::KIND, sheet);
        }

        let records: RecordSet<R> = rows
            .iter()
            .skip(self.header_rows)
            .map(|row| self.build_record(row))
            .collect();

        tracing::debug!(
            "Extracted {} {} records from '{}' ({} header rows skipped)",
            records.len(),
            R::KIND,
            sheet,
            self.header_rows.min(rows.len())
        );
        Ok(records)
    }

    fn locate_sheet<D: SpreadsheetReader>(
        &self,
        reader: &mut D,
    ) -> Result<(usize, String, Vec<Vec<String>>)> {
        for (position, candidate) in self.candidates.iter().enumerate() {
            match reader.rows(candidate) {
                Ok(rows) => {
                    let sheet = reader
                        .resolve_sheet(candidate)
                        .unwrap_or_else(|| candidate.clone());
                    return Ok((position, sheet, rows));
                }
                Err(CatalogError::SheetNotFound { .. }) => {
                    tracing::debug!("Sheet '{}' not present, trying next candidate", candidate);
                }
                Err(e) => return Err(e),
            }
        }

        Err(CatalogError::SheetNotFound {
            attempted: self.candidates.clone(),
        })
    }

    fn build_record(&self, row: &[String]) -> R {
        let mut record = R::default();
        for binding in self.columns.bindings() {
            record.assign(binding.field, cell_value(row, binding.index, binding.fill));
        }
        record
    }
}

//! CSV decoding for master-data import.

use csv::{ReaderBuilder, StringRecord, Trim};
use master_data_sdk::RawRow;

use super::error::DomainError;
use super::row::RowError;

/// Decode `bytes` into one entry per data record, keyed by header name.
///
/// Records may be shorter or longer than the header; missing cells are
/// absent from the row and extra cells are ignored. A record that cannot be
/// decoded (for example invalid UTF-8) becomes a row error so the rest of the
/// batch still imports.
///
/// # Errors
/// [`DomainError::InvalidCsv`] when the header row cannot be read.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Result<RawRow, RowError>>, DomainError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);
    let headers = reader.headers().map_err(DomainError::InvalidCsv)?.clone();

    Ok(reader
        .records()
        .map(|record| {
            record
                .map(|r| to_row(&headers, &r))
                .map_err(|e| RowError::Unreadable(e.to_string()))
        })
        .collect())
}

fn to_row(headers: &StringRecord, record: &StringRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.to_owned(), v.to_owned()))
        .collect()
}

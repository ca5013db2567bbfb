//! CSV input/output for panel frames.

use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Writer};

use crate::error::{Error, Result};
use crate::frame::{Column, PanelFrame};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(value);
        }
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Read a CSV file with a header row into a frame.
///
/// Column types are inferred per column: datetime (`%Y-%m-%d`, optionally
/// with a time part) when every value parses as one, float when every value
/// parses as one, string otherwise.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<PanelFrame> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(Error::Csv)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(Error::Csv)?;
        if record.len() != headers.len() {
            return Err(Error::Format(format!(
                "expected {} fields, found {}",
                headers.len(),
                record.len()
            )));
        }
        for (i, field) in record.iter().enumerate() {
            raw_columns[i].push(field.to_string());
        }
    }

    let mut frame = PanelFrame::new();
    for (header, raw) in headers.into_iter().zip(raw_columns) {
        frame.add_column(header, infer_column(raw))?;
    }
    Ok(frame)
}

fn infer_column(raw: Vec<String>) -> Column {
    if !raw.is_empty() {
        if let Some(values) = raw
            .iter()
            .map(|v| parse_datetime(v))
            .collect::<Option<Vec<_>>>()
        {
            return Column::DateTime(values);
        }
        if let Some(values) = raw
            .iter()
            .map(|v| v.parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()
        {
            return Column::Float64(values);
        }
    }
    Column::Str(raw)
}

/// Write a frame to a CSV file with a header row.
pub fn write_csv<P: AsRef<Path>>(frame: &PanelFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref()).map_err(Error::Io)?;
    let mut writer = Writer::from_writer(file);

    writer
        .write_record(frame.column_names())
        .map_err(Error::Csv)?;
    for row in 0..frame.row_count() {
        let mut record = Vec::with_capacity(frame.column_count());
        for name in frame.column_names() {
            let cell = match frame.column(name)? {
                Column::Float64(values) => values[row].to_string(),
                Column::Str(values) => values[row].clone(),
                Column::DateTime(values) => {
                    values[row].format("%Y-%m-%d %H:%M:%S").to_string()
                }
            };
            record.push(cell);
        }
        writer.write_record(&record).map_err(Error::Csv)?;
    }
    writer.flush().map_err(Error::Io)?;
    Ok(())
}

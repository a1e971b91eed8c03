use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use common::{BacktestError, PricePoint, PriceSeries, Result};

const DATE_HEADERS: [&str; 3] = ["date", "timestamp", "datetime"];
const CLOSE_HEADERS: [&str; 3] = ["close", "adj close", "adj_close"];
const MIN_TIMESTAMP_DIGITS: usize = 9;

/// Load closing prices from a CSV file
///
/// The date and close columns are found by header name (`date`/`timestamp`,
/// `close`/`adj close`, case-insensitive). Without recognizable headers the
/// first two columns are taken as date and close, and a first row whose
/// first field is a date is read as data. Blank closes are skipped.
pub fn load_csv(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).map_err(|e| BacktestError::DataLoadError(e.to_string()))?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let mut records = csv_reader.records();
    let first = match records.next() {
        Some(record) => record.map_err(|e| BacktestError::CsvError(e.to_string()))?,
        None => return PriceSeries::new(vec![]),
    };

    let date_col = find_column(&first, &DATE_HEADERS);
    let close_col = find_column(&first, &CLOSE_HEADERS);
    let first_is_data = date_col.is_none()
        && close_col.is_none()
        && first.get(0).is_some_and(|field| parse_date(field).is_ok());
    let date_idx = date_col.unwrap_or(0);
    let close_idx = close_col.unwrap_or(1);

    let leading = first_is_data.then_some(first);
    let mut points = Vec::new();
    for result in leading.into_iter().map(Ok::<_, csv::Error>).chain(records) {
        let record = result.map_err(|e| BacktestError::CsvError(e.to_string()))?;
        if let Some(point) = parse_record(&record, date_idx, close_idx)? {
            points.push(point);
        }
    }

    PriceSeries::new(points)
}

/// Price point from one CSV row, `None` for short rows or blank closes
fn parse_record(
    record: &csv::StringRecord,
    date_idx: usize,
    close_idx: usize,
) -> Result<Option<PricePoint>> {
    let (Some(date_field), Some(close_field)) = (record.get(date_idx), record.get(close_idx))
    else {
        return Ok(None);
    };
    if close_field.is_empty() {
        return Ok(None);
    }

    let date = parse_date(date_field)?;
    let close: f64 = close_field.parse().map_err(|_| {
        BacktestError::CsvError(format!("Invalid close price on {}: {}", date, close_field))
    })?;
    Ok(Some(PricePoint::new(date, close)))
}

/// Load closing prices from a JSON array of `{"date", "close"}` objects
pub fn load_json(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path).map_err(|e| BacktestError::DataLoadError(e.to_string()))?;
    let series: PriceSeries = serde_json::from_reader(BufReader::new(file))?;
    Ok(series)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

/// Parse a trading date from various formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    for fmt in &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Unix timestamp (seconds)
    if s.len() >= MIN_TIMESTAMP_DIGITS {
        if let Ok(ts) = s.parse::<i64>() {
            if let Some(dt) = DateTime::from_timestamp(ts, 0) {
                return Ok(dt.date_naive());
            }
        }
    }

    Err(BacktestError::CsvError(format!("Unable to parse date: {}", s)))
}

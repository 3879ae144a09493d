//! CSV file data adapter.
//!
//! Expects a header row followed by `date,open,high,low,close,volume` rows,
//! dates as `YYYY-MM-DD`.

use crate::domain::error::RiskfoldError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_record(record: &csv::StringRecord, line: u64) -> Result<OhlcvBar, RiskfoldError> {
        let date_str = field(record, 0, "date", line)?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            RiskfoldError::Data {
                reason: format!("line {}: invalid date {:?}: {}", line, date_str, e),
            }
        })?;

        Ok(OhlcvBar {
            date,
            open: parse_field(record, 1, "open", line)?,
            high: parse_field(record, 2, "high", line)?,
            low: parse_field(record, 3, "low", line)?,
            close: parse_field(record, 4, "close", line)?,
            volume: parse_field(record, 5, "volume", line)?,
        })
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<&'r str, RiskfoldError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| RiskfoldError::Data {
            reason: format!("line {}: missing {} column", line, name),
        })
}

fn parse_field<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<T, RiskfoldError>
where
    T: FromStr,
    T::Err: Display,
{
    field(record, index, name, line)?
        .parse()
        .map_err(|e| RiskfoldError::Data {
            reason: format!("line {}: invalid {} value: {}", line, name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, RiskfoldError> {
        let content = fs::read_to_string(&self.path).map_err(|e| RiskfoldError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| RiskfoldError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map_or(0, |p| p.line());
            let bar = Self::parse_record(&record, line)?;

            if start_date.is_some_and(|start| bar.date < start)
                || end_date.is_some_and(|end| bar.date > end)
            {
                continue;
            }
            bars.push(bar);
        }

        Ok(PriceSeries::new(bars))
    }
}

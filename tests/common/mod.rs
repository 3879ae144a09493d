#![allow(dead_code)]

use chrono::NaiveDate;
use riskfold::domain::error::RiskfoldError;
pub use riskfold::domain::ohlcv::{OhlcvBar, PriceSeries};
use riskfold::domain::portfolio::PortfolioConfig;
use riskfold::domain::strategy::{IndicatorParams, TrendParams, TrendStrategy};
use riskfold::ports::data_port::DataPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, RiskfoldError> {
        if let Some(reason) = &self.error {
            return Err(RiskfoldError::Data {
                reason: reason.clone(),
            });
        }
        Ok(PriceSeries::new(
            self.bars
                .iter()
                .filter(|b| start_date.is_none_or(|s| b.date >= s))
                .filter(|b| end_date.is_none_or(|e| b.date <= e))
                .cloned()
                .collect(),
        ))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// One bar per day from `start_date` with the given closes. High and low sit
/// one point either side of the close; volume is constant.
pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

/// A steady climb of `step` per bar.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64, step: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + step * i as f64).collect();
    bars_from_closes(start_date, &closes)
}

/// Rises for `up` bars, then falls for `down` bars.
pub fn generate_rise_and_fall(start_date: &str, up: usize, down: usize, step: f64) -> Vec<OhlcvBar> {
    let mut closes: Vec<f64> = (0..up).map(|i| 100.0 + step * i as f64).collect();
    let peak = closes.last().copied().unwrap_or(100.0);
    closes.extend((1..=down).map(|i| peak - step * i as f64));
    bars_from_closes(start_date, &closes)
}

pub fn write_bars_csv(path: &Path, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(path, content).unwrap();
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

pub fn frictionless_config() -> PortfolioConfig {
    PortfolioConfig {
        initial_capital: 10_000.0,
        risk_per_trade: 0.01,
        transaction_cost_rate: 0.0,
        slippage_rate: 0.0,
    }
}

/// Short periods so small fixtures get past warm-up quickly.
pub fn fast_strategy() -> TrendStrategy {
    TrendStrategy::new(
        IndicatorParams {
            ema_fast: 3,
            ema_slow: 6,
            sma_period: 3,
            atr_period: 3,
            adx_period: 3,
        },
        TrendParams {
            adx_threshold: 20.0,
            atr_stop_multiple: 2.0,
            reward_risk: 2.0,
            obv_lookback: 2,
        },
    )
}

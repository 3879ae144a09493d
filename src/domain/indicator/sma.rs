//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(data[i-n+1..=i]). Warmup: first (n-1) values are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(data: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Sma(period);
    if period == 0 || data.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let values = data
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect();

    IndicatorSeries::padded(indicator_type, period - 1, values)
}

//! Shared helper functions for indicator calculations.

use std::collections::HashMap;

use crate::domain::indicator::adx::calculate_adx;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::obv::calculate_obv;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{true_range, PriceSeries};

/// True range for bars 1..n, so the result is one element shorter than the input.
pub fn true_range_series(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    (1..highs.len())
        .map(|i| true_range(highs[i], lows[i], closes[i - 1]))
        .collect()
}

/// Arithmetic mean of `values[..period]`.
pub fn seed_mean(values: &[f64], period: usize) -> f64 {
    values[..period].iter().sum::<f64>() / period as f64
}

/// Wilder smoothing step: (prev * (n-1) + x) / n
pub fn wilder_step(prev: f64, x: f64, period: usize) -> f64 {
    (prev * (period - 1) as f64 + x) / period as f64
}

pub(crate) fn same_length(series: &[&[f64]]) -> bool {
    series.windows(2).all(|pair| pair[0].len() == pair[1].len())
}

pub fn compute_indicator(series: &PriceSeries, indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(&series.closes(), period),
        IndicatorType::Ema(period) => calculate_ema(&series.closes(), period),
        IndicatorType::Atr(period) => {
            calculate_atr(&series.highs(), &series.lows(), &series.closes(), period)
        }
        IndicatorType::Adx(period) => {
            calculate_adx(&series.highs(), &series.lows(), &series.closes(), period)
        }
        IndicatorType::Obv => calculate_obv(&series.closes(), &series.volumes()),
    }
}

pub fn compute_indicators(
    series: &PriceSeries,
    indicator_types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    indicator_types
        .iter()
        .map(|&indicator_type| (indicator_type, compute_indicator(series, indicator_type)))
        .collect()
}

//! Average True Range indicator (Wilder).
//!
//! TR is defined from the second bar onward. The first ATR is the mean of the
//! first n TR values, then ATR[i] = (ATR[i-1]*(n-1) + TR[i]) / n.
//! Warmup: the first n bars are undefined. Needs at least n+1 bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{same_length, seed_mean, true_range_series, wilder_step};

pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Atr(period);
    if period == 0 || highs.len() < period + 1 || !same_length(&[highs, lows, closes]) {
        return IndicatorSeries::empty(indicator_type);
    }

    let tr = true_range_series(highs, lows, closes);
    let mut atr = seed_mean(&tr, period);
    let mut values = Vec::with_capacity(tr.len() - period + 1);
    values.push(atr);

    for &x in &tr[period..] {
        atr = wilder_step(atr, x, period);
        values.push(atr);
    }

    IndicatorSeries::padded(indicator_type, period, values)
}

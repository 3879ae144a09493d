//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first raw value, then
//! EMA[i] = (x[i] - EMA[i-1]) * k + EMA[i-1].
//! No warmup: every index is defined. The period only sizes k and acts as a
//! minimum-data guard.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(data: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 || data.is_empty() || data.len() < period {
        return IndicatorSeries::empty(indicator_type);
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(data.len());
    let mut ema = data[0];
    values.push(ema);

    for &x in &data[1..] {
        ema = (x - ema) * k + ema;
        values.push(ema);
    }

    IndicatorSeries::padded(indicator_type, 0, values)
}

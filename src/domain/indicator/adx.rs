//! ADX: Average Directional Index (Wilder).
//!
//! 1. +DM / -DM and TR from consecutive bars (defined from the second bar on)
//! 2. Seed smoothed +DM, -DM and TR with the mean of their first n values
//! 3. Wilder-smooth all three from the (n+1)-th movement onward
//! 4. +DI = 100 * s(+DM) / s(TR), -DI = 100 * s(-DM) / s(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX starts at the first DX and is Wilder-smoothed DX afterwards
//!
//! A zero smoothed TR gives both DIs as 0, and a zero DI sum gives DX = 0,
//! so flat stretches read as "no trend" instead of NaN.
//!
//! Warmup: n+1 leading values are undefined. Needs at least 2n bars.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{same_length, seed_mean, true_range_series, wilder_step};

pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Adx(period);
    let n = highs.len();
    if period == 0 || n < 2 * period || n < 2 || !same_length(&[highs, lows, closes]) {
        return IndicatorSeries::empty(indicator_type);
    }

    let (plus_dm, minus_dm) = directional_movement(highs, lows);
    let tr = true_range_series(highs, lows, closes);

    let mut smoothed_tr = seed_mean(&tr, period);
    let mut smoothed_plus = seed_mean(&plus_dm, period);
    let mut smoothed_minus = seed_mean(&minus_dm, period);

    let mut values: Vec<f64> = Vec::with_capacity(tr.len().saturating_sub(period));
    for i in period..tr.len() {
        smoothed_tr = wilder_step(smoothed_tr, tr[i], period);
        smoothed_plus = wilder_step(smoothed_plus, plus_dm[i], period);
        smoothed_minus = wilder_step(smoothed_minus, minus_dm[i], period);

        let dx = directional_index(smoothed_plus, smoothed_minus, smoothed_tr);
        let adx = match values.last() {
            None => dx,
            Some(&prev) => wilder_step(prev, dx, period),
        };
        values.push(adx);
    }

    IndicatorSeries::padded(indicator_type, n - values.len(), values)
}

/// (+DM, -DM) for bars 1..n.
fn directional_movement(highs: &[f64], lows: &[f64]) -> (Vec<f64>, Vec<f64>) {
    (1..highs.len())
        .map(|i| {
            let up = highs[i] - highs[i - 1];
            let down = lows[i - 1] - lows[i];
            let plus = if up > down && up > 0.0 { up } else { 0.0 };
            let minus = if down > up && down > 0.0 { down } else { 0.0 };
            (plus, minus)
        })
        .unzip()
}

fn directional_index(smoothed_plus: f64, smoothed_minus: f64, smoothed_tr: f64) -> f64 {
    if smoothed_tr == 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * smoothed_plus / smoothed_tr;
    let minus_di = 100.0 * smoothed_minus / smoothed_tr;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / di_sum
    }
}

//! OBV (On-Balance Volume) indicator implementation.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Calculate OBV (On-Balance Volume) indicator.
///
/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period. Mismatched or empty inputs give an empty series.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> IndicatorSeries {
    if closes.is_empty() || closes.len() != volumes.len() {
        return IndicatorSeries::empty(IndicatorType::Obv);
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut obv = volumes[0];
    values.push(obv);

    for i in 1..closes.len() {
        if closes[i] > closes[i - 1] {
            obv += volumes[i];
        } else if closes[i] < closes[i - 1] {
            obv -= volumes[i];
        }
        values.push(obv);
    }

    IndicatorSeries::padded(IndicatorType::Obv, 0, values)
}

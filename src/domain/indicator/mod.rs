//! Technical indicator implementations.
//!
//! Every indicator is a pure function from one or more equal-length numeric
//! slices to an [`IndicatorSeries`] of the same length. Indices inside the
//! warm-up window hold `None`. An empty series means the indicator could not
//! be computed at all (too little history, zero period, mismatched inputs).
//!
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: the computed values

pub mod adx;
pub mod atr;
pub mod ema;
pub mod obv;
pub mod sma;

use std::fmt;

pub const DEFAULT_ATR_PERIOD: usize = 14;
pub const DEFAULT_ADX_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Atr(usize),
    Adx(usize),
    Obv,
}

impl IndicatorType {
    /// Number of leading `None` entries in a non-empty output.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorType::Sma(period) => period.saturating_sub(1),
            IndicatorType::Ema(_) | IndicatorType::Obv => 0,
            IndicatorType::Atr(period) => *period,
            IndicatorType::Adx(period) => period + 1,
        }
    }

    /// Fewest bars for which the indicator returns a non-empty series.
    /// A zero period never yields one, so it reports `usize::MAX`.
    pub fn minimum_bars(&self) -> usize {
        match self {
            IndicatorType::Sma(0)
            | IndicatorType::Ema(0)
            | IndicatorType::Atr(0)
            | IndicatorType::Adx(0) => usize::MAX,
            IndicatorType::Sma(period) | IndicatorType::Ema(period) => *period,
            IndicatorType::Atr(period) => period + 1,
            IndicatorType::Adx(period) => (2 * period).max(2),
            IndicatorType::Obv => 1,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// Left-pads `values` with `warmup` undefined entries.
    pub(crate) fn padded(indicator_type: IndicatorType, warmup: usize, values: Vec<f64>) -> Self {
        let mut padded = Vec::with_capacity(warmup + values.len());
        padded.resize(warmup, None);
        padded.extend(values.into_iter().map(Some));
        IndicatorSeries {
            indicator_type,
            values: padded,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, or `None` when out of range or still warming up.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    pub fn undefined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

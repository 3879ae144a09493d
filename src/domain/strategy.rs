//! Reference trend-following signal layer.
//!
//! Entry needs all four filters to agree on the current bar:
//! - fast EMA above slow EMA
//! - close above its SMA
//! - ADX at or above the threshold
//! - OBV higher than it was `obv_lookback` bars ago
//!
//! The stop sits `atr_stop_multiple` ATRs under the close and the target
//! `reward_risk` times that distance above it. The signal exit fires when the
//! fast EMA drops below the slow EMA.

use std::collections::HashMap;

use crate::domain::indicator::{
    DEFAULT_ADX_PERIOD, DEFAULT_ATR_PERIOD, IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::position::OpenTrade;
use crate::ports::signal_port::SignalPort;

/// What the signal layer sees at one step.
#[derive(Debug, Clone, Copy)]
pub struct BarContext<'a> {
    pub index: usize,
    pub bar: &'a OhlcvBar,
    pub indicators: &'a HashMap<IndicatorType, IndicatorSeries>,
}

impl BarContext<'_> {
    /// Indicator value at this bar, `None` while warming up or if not computed.
    pub fn value(&self, indicator_type: IndicatorType) -> Option<f64> {
        self.value_at(indicator_type, self.index)
    }

    /// Indicator value `bars_back` bars before this one.
    pub fn lookback(&self, indicator_type: IndicatorType, bars_back: usize) -> Option<f64> {
        let index = self.index.checked_sub(bars_back)?;
        self.value_at(indicator_type, index)
    }

    fn value_at(&self, indicator_type: IndicatorType, index: usize) -> Option<f64> {
        self.indicators.get(&indicator_type)?.get(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntrySignal {
    pub stop_loss: f64,
    pub take_profit: f64,
    /// ATR recorded on the open trade.
    pub atr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub sma_period: usize,
    pub atr_period: usize,
    pub adx_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_fast: 20,
            ema_slow: 50,
            sma_period: 20,
            atr_period: DEFAULT_ATR_PERIOD,
            adx_period: DEFAULT_ADX_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendParams {
    pub adx_threshold: f64,
    pub atr_stop_multiple: f64,
    pub reward_risk: f64,
    pub obv_lookback: usize,
}

impl Default for TrendParams {
    fn default() -> Self {
        TrendParams {
            adx_threshold: 25.0,
            atr_stop_multiple: 2.0,
            reward_risk: 2.0,
            obv_lookback: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendStrategy {
    pub periods: IndicatorParams,
    pub params: TrendParams,
}

impl TrendStrategy {
    pub fn new(periods: IndicatorParams, params: TrendParams) -> Self {
        Self { periods, params }
    }

    fn fast(&self) -> IndicatorType {
        IndicatorType::Ema(self.periods.ema_fast)
    }

    fn slow(&self) -> IndicatorType {
        IndicatorType::Ema(self.periods.ema_slow)
    }

    fn atr(&self) -> IndicatorType {
        IndicatorType::Atr(self.periods.atr_period)
    }

    fn adx(&self) -> IndicatorType {
        IndicatorType::Adx(self.periods.adx_period)
    }

    fn sma(&self) -> IndicatorType {
        IndicatorType::Sma(self.periods.sma_period)
    }

    fn obv_rising(&self, ctx: &BarContext<'_>) -> Option<bool> {
        let now = ctx.value(IndicatorType::Obv)?;
        let then = ctx.lookback(IndicatorType::Obv, self.params.obv_lookback)?;
        Some(now > then)
    }
}

impl SignalPort for TrendStrategy {
    fn indicators(&self) -> Vec<IndicatorType> {
        vec![
            self.fast(),
            self.slow(),
            self.sma(),
            self.atr(),
            self.adx(),
            IndicatorType::Obv,
        ]
    }

    fn should_enter(&self, ctx: &BarContext<'_>) -> Option<EntrySignal> {
        let close = ctx.bar.close;
        let fast = ctx.value(self.fast())?;
        let slow = ctx.value(self.slow())?;
        let sma = ctx.value(self.sma())?;
        let adx = ctx.value(self.adx())?;
        let atr = ctx.value(self.atr())?;

        let trending = fast > slow && close > sma && adx >= self.params.adx_threshold;
        if !trending || !self.obv_rising(ctx)? {
            return None;
        }

        let risk = self.params.atr_stop_multiple * atr;
        if risk <= 0.0 {
            return None;
        }
        Some(EntrySignal {
            stop_loss: close - risk,
            take_profit: close + self.params.reward_risk * risk,
            atr,
        })
    }

    fn should_exit(&self, ctx: &BarContext<'_>, _trade: &OpenTrade) -> bool {
        match (ctx.value(self.fast()), ctx.value(self.slow())) {
            (Some(fast), Some(slow)) => fast < slow,
            _ => false,
        }
    }
}

//! Simulation driver: a deterministic fold over one price series.
//!
//! Per bar, in order:
//! 1. LONG: exit on a stop/target hit at the close, else on the exit signal
//! 2. FLAT at the start of the bar: ask for an entry signal and try to buy
//! 3. Record one equity point at the close
//!
//! A bar that closes a trade never opens one. A position still open after
//! the last bar stays open; its value is in the final equity point.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::error::RiskfoldError;
use super::execution::{EntryFill, EntryOutcome, SkipReason};
use super::indicator::{IndicatorSeries, IndicatorType};
use super::indicator_helpers::compute_indicators;
use super::ohlcv::PriceSeries;
use super::portfolio::{Portfolio, PortfolioConfig};
use super::position::ExitReason;
use super::strategy::BarContext;
use crate::ports::signal_port::SignalPort;

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub portfolio: Portfolio,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    pub entries: Vec<EntryFill>,
    /// Entry signals the portfolio declined, with the bar date.
    pub skipped: Vec<(NaiveDate, SkipReason)>,
}

/// Most bars any requested indicator needs before it yields a value.
pub fn minimum_bars(indicator_types: &[IndicatorType]) -> usize {
    indicator_types
        .iter()
        .map(IndicatorType::minimum_bars)
        .max()
        .unwrap_or(1)
}

pub fn run_simulation(
    series: &PriceSeries,
    signals: &dyn SignalPort,
    config: PortfolioConfig,
) -> Result<SimulationResult, RiskfoldError> {
    let indicator_types = signals.indicators();
    let minimum = minimum_bars(&indicator_types);
    if series.len() < minimum {
        return Err(RiskfoldError::InsufficientData {
            bars: series.len(),
            minimum,
        });
    }

    let indicators = compute_indicators(series, &indicator_types);
    let mut portfolio = Portfolio::new(config);
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for (index, bar) in series.bars().iter().enumerate() {
        let ctx = BarContext {
            index,
            bar,
            indicators: &indicators,
        };

        let was_flat = portfolio.is_flat();
        if let Some(trade) = portfolio.open_trade() {
            let reason = portfolio.check_triggers(bar.close).or_else(|| {
                signals
                    .should_exit(&ctx, trade)
                    .then_some(ExitReason::Signal)
            });
            if let Some(reason) = reason {
                portfolio.sell(bar.close, reason, bar.date);
            }
        }

        if was_flat {
            if let Some(signal) = signals.should_enter(&ctx) {
                match portfolio.buy(
                    bar.close,
                    signal.stop_loss,
                    signal.take_profit,
                    signal.atr,
                    bar.date,
                ) {
                    EntryOutcome::Executed(fill) => entries.push(fill),
                    EntryOutcome::Skipped(reason) => skipped.push((bar.date, reason)),
                }
            }
        }

        portfolio.record_equity(bar.date, bar.close);
    }

    debug!(skipped = skipped.len(), "declined entry signals");
    info!(
        bars = series.len(),
        trades = portfolio.closed_trades().len(),
        open = !portfolio.is_flat(),
        equity = portfolio.equity(),
        "simulation complete"
    );

    Ok(SimulationResult {
        portfolio,
        indicators,
        entries,
        skipped,
    })
}

//! Trade execution and fill simulation.
//!
//! Implements risk-budget position sizing and long entry/exit with slippage
//! and proportional transaction costs. Nothing here returns an error: an
//! entry or exit that cannot happen leaves the portfolio untouched and says
//! why through [`EntryOutcome`] / [`ExitOutcome`].

use chrono::NaiveDate;
use tracing::{debug, info};

use super::portfolio::Portfolio;
use super::position::{ClosedTrade, Direction, ExitReason, OpenTrade};

/// Long entry (buy): execution_price = market_price * (1 + slippage_rate)
pub fn apply_slippage_long_entry(market_price: f64, slippage_rate: f64) -> f64 {
    market_price * (1.0 + slippage_rate)
}

/// Long exit (sell): execution_price = market_price * (1 - slippage_rate)
pub fn apply_slippage_long_exit(market_price: f64, slippage_rate: f64) -> f64 {
    market_price * (1.0 - slippage_rate)
}

/// Notional plus transaction cost for buying `quantity` at `execution_price`.
pub fn entry_cost(execution_price: f64, quantity: i64, transaction_cost_rate: f64) -> f64 {
    execution_price * quantity as f64 * (1.0 + transaction_cost_rate)
}

/// Notional minus transaction cost for selling `quantity` at `execution_price`.
pub fn exit_proceeds(execution_price: f64, quantity: i64, transaction_cost_rate: f64) -> f64 {
    execution_price * quantity as f64 * (1.0 - transaction_cost_rate)
}

/// Whole units to buy so that hitting the stop loses at most
/// `equity * risk_per_trade`, capped by what cash can pay for.
///
/// Returns 0 when `entry_price <= stop_loss_price`.
pub fn calculate_position_size(portfolio: &Portfolio, entry_price: f64, stop_loss_price: f64) -> i64 {
    if entry_price <= stop_loss_price {
        return 0;
    }

    let config = &portfolio.config;
    let capital_to_risk = portfolio.equity * config.risk_per_trade;
    let risk_per_share = entry_price - stop_loss_price;
    let cost_per_share =
        entry_price * (1.0 + config.transaction_cost_rate + config.slippage_rate);
    if cost_per_share <= 0.0 {
        return 0;
    }
    let max_affordable_shares = portfolio.cash / cost_per_share;

    let shares = (capital_to_risk / risk_per_share)
        .min(max_affordable_shares)
        .floor();
    if shares.is_finite() && shares > 0.0 {
        shares as i64
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A trade is already open.
    PositionOpen,
    /// Stop-loss at or above the entry price.
    InvalidStop,
    /// The risk budget or cash buys less than one unit.
    ZeroQuantity,
    /// Cash does not cover the slipped price plus transaction cost.
    InsufficientFunds,
}

/// Event data for a filled entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFill {
    pub quantity: i64,
    pub execution_price: f64,
    /// Notional plus transaction cost, debited from cash.
    pub cost: f64,
    pub transaction_cost: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Executed(EntryFill),
    Skipped(SkipReason),
}

impl EntryOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, EntryOutcome::Executed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExitOutcome {
    Executed(ClosedTrade),
    NoPosition,
}

impl ExitOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, ExitOutcome::Executed(_))
    }
}

/// Open a long position (FLAT -> LONG).
///
/// 1. Refuse if a trade is already open
/// 2. Size the trade; refuse on an invalid stop or zero quantity
/// 3. Apply slippage, compute cost including transaction cost
/// 4. Refuse if cash does not cover the cost
/// 5. Debit cash, store the open trade, mark equity at `price`
pub fn enter_long(
    portfolio: &mut Portfolio,
    price: f64,
    stop_loss: f64,
    take_profit: f64,
    atr: f64,
    date: NaiveDate,
) -> EntryOutcome {
    let skip = |reason: SkipReason| {
        debug!(target: "riskfold::trade", ?reason, price, stop_loss, %date, "entry skipped");
        EntryOutcome::Skipped(reason)
    };

    if portfolio.open_trade.is_some() {
        return skip(SkipReason::PositionOpen);
    }
    if price <= stop_loss {
        return skip(SkipReason::InvalidStop);
    }

    let quantity = calculate_position_size(portfolio, price, stop_loss);
    if quantity <= 0 {
        return skip(SkipReason::ZeroQuantity);
    }

    let config = &portfolio.config;
    let execution_price = apply_slippage_long_entry(price, config.slippage_rate);
    let cost = entry_cost(execution_price, quantity, config.transaction_cost_rate);
    let transaction_cost = cost - execution_price * quantity as f64;

    if portfolio.cash < cost {
        return skip(SkipReason::InsufficientFunds);
    }

    portfolio.cash -= cost;
    portfolio.open_trade = Some(OpenTrade {
        entry_price: execution_price,
        quantity,
        stop_loss,
        take_profit,
        atr_at_entry: atr,
        entry_date: date,
        direction: Direction::Long,
    });
    portfolio.mark_to_market(price);

    info!(
        target: "riskfold::trade",
        %date,
        quantity,
        price = execution_price,
        stop_loss,
        take_profit,
        "BUY"
    );

    EntryOutcome::Executed(EntryFill {
        quantity,
        execution_price,
        cost,
        transaction_cost,
        stop_loss,
        take_profit,
        date,
    })
}

/// Close the open long position (LONG -> FLAT).
///
/// 1. Apply exit slippage, compute proceeds net of transaction cost
/// 2. Credit cash
/// 3. PnL = proceeds - entry notional including entry transaction cost;
///    percent is the fill-to-fill price change
/// 4. Append the closed trade and clear the open trade
pub fn exit_long(
    portfolio: &mut Portfolio,
    price: f64,
    reason: ExitReason,
    date: NaiveDate,
) -> ExitOutcome {
    let Some(trade) = portfolio.open_trade.take() else {
        debug!(target: "riskfold::trade", %date, %reason, "exit skipped: no open position");
        return ExitOutcome::NoPosition;
    };

    let rate = portfolio.config.transaction_cost_rate;
    let exit_price = apply_slippage_long_exit(price, portfolio.config.slippage_rate);
    let proceeds = exit_proceeds(exit_price, trade.quantity, rate);
    let basis = entry_cost(trade.entry_price, trade.quantity, rate);
    let pnl = proceeds - basis;
    let pnl_pct = (exit_price - trade.entry_price) / trade.entry_price * 100.0;

    portfolio.cash += proceeds;
    portfolio.mark_to_market(price);

    info!(
        target: "riskfold::trade",
        %date,
        quantity = trade.quantity,
        price = exit_price,
        %reason,
        pnl,
        pnl_pct,
        "SELL"
    );

    let closed = ClosedTrade {
        quantity: trade.quantity,
        entry_price: trade.entry_price,
        exit_price,
        entry_date: trade.entry_date,
        exit_date: date,
        entry_cost: basis,
        proceeds,
        pnl,
        pnl_pct,
        reason,
    };
    portfolio.closed_trades.push(closed.clone());

    ExitOutcome::Executed(closed)
}

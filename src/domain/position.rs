//! Open trade tracking and the closed-trade record.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
        }
    }
}

/// The single position a portfolio may hold.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenTrade {
    /// Fill price after slippage.
    pub entry_price: f64,
    pub quantity: i64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// ATR at entry. Kept for reference only; sizing does not read it.
    pub atr_at_entry: f64,
    pub entry_date: NaiveDate,
    pub direction: Direction,
}

impl OpenTrade {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    /// Price-only pnl against the fill price, before exit costs.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.entry_price)
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        price >= self.take_profit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Signal,
    Other(String),
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "stop-loss"),
            ExitReason::TakeProfit => write!(f, "take-profit"),
            ExitReason::Signal => write!(f, "signal-exit"),
            ExitReason::Other(reason) => write!(f, "{}", reason),
        }
    }
}

impl From<&str> for ExitReason {
    fn from(reason: &str) -> Self {
        match reason {
            "stop-loss" => ExitReason::StopLoss,
            "take-profit" => ExitReason::TakeProfit,
            "signal-exit" => ExitReason::Signal,
            other => ExitReason::Other(other.to_string()),
        }
    }
}

/// Trade log entry, appended once per completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub quantity: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    /// Entry notional plus entry transaction cost.
    pub entry_cost: f64,
    /// Exit notional minus exit transaction cost.
    pub proceeds: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub reason: ExitReason,
}

impl ClosedTrade {
    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

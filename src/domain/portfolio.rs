//! Portfolio state and equity tracking.
//!
//! A portfolio is either FLAT (no open trade) or LONG (exactly one open
//! trade). Holdings are read off the open trade, so "holdings > 0 iff an open
//! trade exists" holds by construction. Trade execution lives in
//! [`super::execution`]; the `buy`/`sell` methods here delegate to it.

use chrono::NaiveDate;

use super::execution::{self, EntryOutcome, ExitOutcome};
use super::position::{ClosedTrade, ExitReason, OpenTrade};

/// Risk and cost parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    pub initial_capital: f64,
    /// Fraction of equity put at risk per trade (0.01 = 1%).
    pub risk_per_trade: f64,
    /// Proportional fee on notional (0.001 = 0.1%).
    pub transaction_cost_rate: f64,
    /// Proportional price degradation on every fill (0.0005 = 0.05%).
    pub slippage_rate: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        PortfolioConfig {
            initial_capital: 10_000.0,
            risk_per_trade: 0.01,
            transaction_cost_rate: 0.0,
            slippage_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    /// `None` for the opening point holding the initial capital.
    pub date: Option<NaiveDate>,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub config: PortfolioConfig,
    pub(crate) cash: f64,
    pub(crate) equity: f64,
    pub(crate) open_trade: Option<OpenTrade>,
    pub(crate) closed_trades: Vec<ClosedTrade>,
    pub(crate) equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(config: PortfolioConfig) -> Self {
        let initial_capital = config.initial_capital;
        Portfolio {
            config,
            cash: initial_capital,
            equity: initial_capital,
            open_trade: None,
            closed_trades: Vec::new(),
            equity_curve: vec![EquityPoint {
                date: None,
                equity: initial_capital,
            }],
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Equity as of the last mark-to-market.
    pub fn equity(&self) -> f64 {
        self.equity
    }

    pub fn initial_capital(&self) -> f64 {
        self.config.initial_capital
    }

    pub fn holdings(&self) -> i64 {
        self.open_trade.as_ref().map_or(0, |t| t.quantity)
    }

    pub fn open_trade(&self) -> Option<&OpenTrade> {
        self.open_trade.as_ref()
    }

    pub fn is_flat(&self) -> bool {
        self.open_trade.is_none()
    }

    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed_trades
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    pub fn calculate_position_size(&self, entry_price: f64, stop_loss_price: f64) -> i64 {
        execution::calculate_position_size(self, entry_price, stop_loss_price)
    }

    pub fn buy(
        &mut self,
        price: f64,
        stop_loss: f64,
        take_profit: f64,
        atr: f64,
        date: NaiveDate,
    ) -> EntryOutcome {
        execution::enter_long(self, price, stop_loss, take_profit, atr, date)
    }

    pub fn sell(&mut self, price: f64, reason: ExitReason, date: NaiveDate) -> ExitOutcome {
        execution::exit_long(self, price, reason, date)
    }

    /// cash + holdings valued at `price`.
    pub fn total_equity(&self, price: f64) -> f64 {
        let position_value = self
            .open_trade
            .as_ref()
            .map_or(0.0, |t| t.market_value(price));
        self.cash + position_value
    }

    /// Refresh the stored equity used for sizing.
    pub fn mark_to_market(&mut self, price: f64) -> f64 {
        self.equity = self.total_equity(price);
        self.equity
    }

    /// Mark to market and append one point to the equity curve.
    pub fn record_equity(&mut self, date: NaiveDate, price: f64) {
        let equity = self.mark_to_market(price);
        self.equity_curve.push(EquityPoint {
            date: Some(date),
            equity,
        });
    }

    pub fn realized_pnl(&self) -> f64 {
        self.closed_trades.iter().map(|t| t.pnl).sum()
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.open_trade
            .as_ref()
            .map_or(0.0, |t| t.unrealized_pnl(price))
    }

    /// Exit reason if `price` hits the open trade's stop or target.
    /// The stop wins when both are hit.
    pub fn check_triggers(&self, price: f64) -> Option<ExitReason> {
        let trade = self.open_trade.as_ref()?;
        if trade.should_stop_loss(price) {
            Some(ExitReason::StopLoss)
        } else if trade.should_take_profit(price) {
            Some(ExitReason::TakeProfit)
        } else {
            None
        }
    }
}

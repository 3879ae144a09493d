//! Run summary computed from the trade log and the equity curve.

use super::portfolio::{EquityPoint, Portfolio};

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_equity: f64,
    pub total_return: f64,
    pub realized_pnl: f64,
    /// Deepest peak-to-trough fall as a fraction of the peak.
    pub max_drawdown: f64,
    /// Longest run of equity points spent below a prior peak.
    pub max_drawdown_duration: usize,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub avg_holding_days: f64,
}

impl Metrics {
    pub fn compute(portfolio: &Portfolio) -> Self {
        let equity_curve = portfolio.equity_curve();
        let trades = portfolio.closed_trades();
        let initial_capital = portfolio.initial_capital();

        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(initial_capital);
        let total_return = if initial_capital > 0.0 {
            (final_equity - initial_capital) / initial_capital
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(equity_curve);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut total_days = 0i64;

        for trade in trades {
            if trade.pnl > 0.0 {
                trades_won += 1;
                total_wins += trade.pnl;
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
                total_losses += trade.pnl.abs();
            }
            total_days += trade.holding_days();
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };
        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };
        let avg_holding_days = if total_trades > 0 {
            total_days as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            final_equity,
            total_return,
            realized_pnl: portfolio.realized_pnl(),
            max_drawdown,
            max_drawdown_duration,
            total_trades,
            trades_won,
            trades_lost,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            avg_holding_days,
        }
    }
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, usize) {
    let Some(first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    let mut current_duration = 0usize;
    let mut max_duration = 0usize;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_duration = 0;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
            current_duration += 1;
            max_duration = max_duration.max(current_duration);
        }
    }

    (max_dd, max_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::PortfolioConfig;
    use crate::domain::position::{ClosedTrade, ExitReason};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_portfolio(equity: &[f64], pnls: &[f64]) -> Portfolio {
        let mut portfolio = Portfolio::new(PortfolioConfig {
            initial_capital: 10_000.0,
            ..PortfolioConfig::default()
        });
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for (i, &pnl) in pnls.iter().enumerate() {
            portfolio.closed_trades.push(ClosedTrade {
                quantity: 10,
                entry_price: 100.0,
                exit_price: 100.0 + pnl / 10.0,
                entry_date: start,
                exit_date: start + chrono::Duration::days(2 * (i as i64 + 1)),
                entry_cost: 1_000.0,
                proceeds: 1_000.0 + pnl,
                pnl,
                pnl_pct: pnl / 10.0,
                reason: ExitReason::Signal,
            });
        }
        for (i, &e) in equity.iter().enumerate() {
            portfolio.equity_curve.push(EquityPoint {
                date: Some(start + chrono::Duration::days(i as i64)),
                equity: e,
            });
        }
        portfolio
    }

    #[test]
    fn empty_run() {
        let m = Metrics::compute(&make_portfolio(&[], &[]));
        assert_relative_eq!(m.final_equity, 10_000.0);
        assert_eq!(m.total_return, 0.0);
        assert_eq!(m.total_trades, 0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.profit_factor, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
    }

    #[test]
    fn total_return_from_last_point() {
        let m = Metrics::compute(&make_portfolio(&[10_500.0, 11_000.0], &[]));
        assert_relative_eq!(m.total_return, 0.1);
        assert_relative_eq!(m.final_equity, 11_000.0);
    }

    #[test]
    fn drawdown_depth_and_duration() {
        // curve: 10000 (initial), 12000, 9000, 10000, 13000, 12350
        let m = Metrics::compute(&make_portfolio(
            &[12_000.0, 9_000.0, 10_000.0, 13_000.0, 12_350.0],
            &[],
        ));
        assert_relative_eq!(m.max_drawdown, 0.25);
        assert_eq!(m.max_drawdown_duration, 2);
    }

    #[test]
    fn trade_statistics() {
        let m = Metrics::compute(&make_portfolio(&[], &[300.0, -100.0, 100.0, 0.0]));
        assert_eq!(m.total_trades, 4);
        assert_eq!(m.trades_won, 2);
        assert_eq!(m.trades_lost, 1);
        assert_relative_eq!(m.win_rate, 0.5);
        assert_relative_eq!(m.profit_factor, 4.0);
        assert_relative_eq!(m.avg_win, 200.0);
        assert_relative_eq!(m.avg_loss, 100.0);
        assert_relative_eq!(m.realized_pnl, 300.0);
        // holding days 2, 4, 6, 8
        assert_relative_eq!(m.avg_holding_days, 5.0);
    }

    #[test]
    fn profit_factor_without_losses_is_infinite() {
        let m = Metrics::compute(&make_portfolio(&[], &[50.0]));
        assert!(m.profit_factor.is_infinite());
    }
}

//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    INDICATORS_SECTION, PORTFOLIO_SECTION, STRATEGY_SECTION, validate_indicator_config,
    validate_portfolio_config, validate_strategy_config,
};
use crate::domain::error::RiskfoldError;
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::portfolio::PortfolioConfig;
use crate::domain::position::ClosedTrade;
use crate::domain::simulation::{SimulationResult, run_simulation};
use crate::domain::strategy::{IndicatorParams, TrendParams, TrendStrategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::signal_port::SignalPort;

#[derive(Parser, Debug)]
#[command(
    name = "riskfold",
    about = "Technical indicators and risk-sized trade simulation"
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the trend strategy over a CSV price file
    Simulate {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// First bar date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last bar date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Write the closed-trade log to this CSV file
        #[arg(long)]
        trades: Option<PathBuf>,
    },
    /// Print the strategy's indicator values as CSV
    Indicators {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Only print the last N bars
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Every parameter one run needs, validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub portfolio: PortfolioConfig,
    pub indicators: IndicatorParams,
    pub strategy: TrendParams,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, RiskfoldError> {
        Ok(Settings {
            portfolio: validate_portfolio_config(config)?,
            indicators: validate_indicator_config(config)?,
            strategy: validate_strategy_config(config)?,
        })
    }

    pub fn trend_strategy(&self) -> TrendStrategy {
        TrendStrategy::new(self.indicators.clone(), self.strategy.clone())
    }
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Simulate {
            data,
            config,
            start,
            end,
            trades,
        } => run_simulate(&data, config.as_deref(), start, end, trades.as_deref()),
        Command::Indicators { data, config, tail } => {
            run_indicators(&data, config.as_deref(), tail)
        }
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    // A second call in the same process keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, RiskfoldError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, RiskfoldError> {
    match path {
        Some(path) => Settings::from_config(&load_config(path)?),
        None => Ok(Settings::default()),
    }
}

fn load_series(
    data: &Path,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PriceSeries, RiskfoldError> {
    let series = CsvAdapter::new(data.to_path_buf()).fetch_ohlcv(start, end)?;
    match (series.bars().first(), series.bars().last()) {
        (Some(first), Some(last)) => info!(
            path = %data.display(),
            bars = series.len(),
            first = %first.date,
            last = %last.date,
            "loaded price data"
        ),
        _ => warn!(path = %data.display(), "no bars in range"),
    }
    Ok(series)
}

fn run_simulate(
    data: &Path,
    config: Option<&Path>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    trades_out: Option<&Path>,
) -> Result<(), RiskfoldError> {
    let settings = load_settings(config)?;
    let series = load_series(data, start, end)?;
    let strategy = settings.trend_strategy();

    let result = run_simulation(&series, &strategy, settings.portfolio.clone())?;
    let metrics = Metrics::compute(&result.portfolio);

    println!("{}", format_summary(&result, &metrics));
    println!();
    println!("{}", format_trade_log(result.portfolio.closed_trades()));

    if let Some(path) = trades_out {
        let file = std::fs::File::create(path)?;
        write_trades_csv(file, result.portfolio.closed_trades())?;
        info!(path = %path.display(), "trade log written");
    }
    Ok(())
}

fn run_indicators(
    data: &Path,
    config: Option<&Path>,
    tail: Option<usize>,
) -> Result<(), RiskfoldError> {
    let settings = load_settings(config)?;
    let series = load_series(data, None, None)?;
    write_indicator_table(io::stdout().lock(), &series, &settings.trend_strategy(), tail)
}

fn run_validate(path: &Path) -> Result<(), RiskfoldError> {
    let adapter = load_config(path)?;
    let known = [PORTFOLIO_SECTION, INDICATORS_SECTION, STRATEGY_SECTION];
    for section in adapter.sections() {
        if !known.contains(&section.as_str()) {
            warn!(section = %section, "unknown config section ignored");
        }
    }

    let settings = Settings::from_config(&adapter)?;
    let strategy = settings.trend_strategy();
    let names: Vec<String> = strategy
        .indicators()
        .iter()
        .map(ToString::to_string)
        .collect();

    println!("Configuration is valid: {}", path.display());
    println!("  Initial capital:  {:.2}", settings.portfolio.initial_capital);
    println!(
        "  Risk per trade:   {:.2}%",
        settings.portfolio.risk_per_trade * 100.0
    );
    println!("  Indicators:       {}", names.join(", "));
    Ok(())
}

pub fn format_summary(result: &SimulationResult, metrics: &Metrics) -> String {
    let portfolio = &result.portfolio;
    let mut lines = vec![
        "=== Simulation Summary ===".to_string(),
        format!("Initial Capital:  {:.2}", portfolio.initial_capital()),
        format!("Final Equity:     {:.2}", metrics.final_equity),
        format!("Total Return:     {:.2}%", metrics.total_return * 100.0),
        format!("Realized P&L:     {:.2}", metrics.realized_pnl),
        format!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0),
        format!("Drawdown Bars:    {}", metrics.max_drawdown_duration),
        format!("Total Trades:     {}", metrics.total_trades),
        format!("Win Rate:         {:.1}%", metrics.win_rate * 100.0),
        format!("Profit Factor:    {:.2}", metrics.profit_factor),
        format!("Avg Win:          {:.2}", metrics.avg_win),
        format!("Avg Loss:         {:.2}", metrics.avg_loss),
        format!("Avg Holding Days: {:.1}", metrics.avg_holding_days),
        format!("Skipped Signals:  {}", result.skipped.len()),
    ];
    if let Some(trade) = portfolio.open_trade() {
        lines.push(format!(
            "Open Position:    {} x {} @ {:.2} since {} (stop {:.2}, target {:.2})",
            trade.direction,
            trade.quantity,
            trade.entry_price,
            trade.entry_date,
            trade.stop_loss,
            trade.take_profit
        ));
    }
    lines.join("\n")
}

pub fn format_trade_log(trades: &[ClosedTrade]) -> String {
    if trades.is_empty() {
        return "No closed trades.".to_string();
    }
    let mut lines = vec![format!(
        "{:<10}  {:<10}  {:>6}  {:>10}  {:>10}  {:>10}  {:>8}  {}",
        "Entry", "Exit", "Qty", "Entry Px", "Exit Px", "P&L", "P&L %", "Reason"
    )];
    for t in trades {
        lines.push(format!(
            "{:<10}  {:<10}  {:>6}  {:>10.2}  {:>10.2}  {:>10.2}  {:>7.2}%  {}",
            t.entry_date, t.exit_date, t.quantity, t.entry_price, t.exit_price, t.pnl, t.pnl_pct,
            t.reason
        ));
    }
    lines.join("\n")
}

pub fn write_trades_csv<W: io::Write>(
    writer: W,
    trades: &[ClosedTrade],
) -> Result<(), RiskfoldError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "entry_date",
        "exit_date",
        "quantity",
        "entry_price",
        "exit_price",
        "entry_cost",
        "proceeds",
        "pnl",
        "pnl_pct",
        "reason",
    ])
    .map_err(io::Error::from)?;
    for t in trades {
        wtr.write_record([
            t.entry_date.to_string(),
            t.exit_date.to_string(),
            t.quantity.to_string(),
            format!("{:.4}", t.entry_price),
            format!("{:.4}", t.exit_price),
            format!("{:.4}", t.entry_cost),
            format!("{:.4}", t.proceeds),
            format!("{:.4}", t.pnl),
            format!("{:.4}", t.pnl_pct),
            t.reason.to_string(),
        ])
        .map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per bar: date, close, then each indicator the strategy reads.
/// Undefined values are left blank.
pub fn write_indicator_table<W: io::Write>(
    writer: W,
    series: &PriceSeries,
    signals: &dyn SignalPort,
    tail: Option<usize>,
) -> Result<(), RiskfoldError> {
    let types = signals.indicators();
    let indicators = compute_indicators(series, &types);
    for t in &types {
        if indicators.get(t).is_none_or(|s| s.is_empty()) {
            warn!(indicator = %t, bars = series.len(), "not enough bars to compute");
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["date".to_string(), "close".to_string()];
    header.extend(types.iter().map(ToString::to_string));
    wtr.write_record(&header).map_err(io::Error::from)?;

    let skip = tail.map_or(0, |n| series.len().saturating_sub(n));
    for (i, bar) in series.bars().iter().enumerate().skip(skip) {
        let mut row = vec![bar.date.to_string(), format!("{:.4}", bar.close)];
        row.extend(types.iter().map(|t| {
            indicators
                .get(t)
                .and_then(|s| s.get(i))
                .map_or_else(String::new, |v| format!("{:.4}", v))
        }));
        wtr.write_record(&row).map_err(io::Error::from)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::ExitReason;

    fn trade(pnl: f64, reason: ExitReason) -> ClosedTrade {
        let entry_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        ClosedTrade {
            quantity: 20,
            entry_price: 100.0,
            exit_price: 100.0 + pnl / 20.0,
            entry_date,
            exit_date: entry_date + chrono::Duration::days(3),
            entry_cost: 2_000.0,
            proceeds: 2_000.0 + pnl,
            pnl,
            pnl_pct: pnl / 20.0,
            reason,
        }
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "riskfold",
            "-vv",
            "simulate",
            "--data",
            "bars.csv",
            "--start",
            "2024-01-01",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Simulate {
                data, start, end, ..
            } => {
                assert_eq!(data, PathBuf::from("bars.csv"));
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(end, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_bad_date() {
        let parsed = Cli::try_parse_from([
            "riskfold", "simulate", "--data", "bars.csv", "--end", "01/02/2024",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn no_config_means_defaults() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn trade_log_lists_each_trade() {
        let log = format_trade_log(&[
            trade(200.0, ExitReason::TakeProfit),
            trade(-40.0, ExitReason::StopLoss),
        ]);
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("take-profit"));
        assert!(lines[1].contains("200.00"));
        assert!(lines[2].contains("stop-loss"));
    }

    #[test]
    fn empty_trade_log() {
        assert_eq!(format_trade_log(&[]), "No closed trades.");
    }

    #[test]
    fn trades_csv_has_header_and_rows() {
        let mut out = Vec::new();
        write_trades_csv(&mut out, &[trade(200.0, ExitReason::Signal)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("entry_date,exit_date,quantity"));
        assert_eq!(
            lines[1],
            "2024-01-02,2024-01-05,20,100.0000,110.0000,2000.0000,2200.0000,200.0000,10.0000,signal-exit"
        );
    }
}

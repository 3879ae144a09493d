//! CLI integration tests.
//!
//! Tests cover:
//! - Settings from INI files on disk, defaults for absent keys
//! - Validation failures and their exit codes
//! - Indicator table output with and without --tail
//! - Full `simulate` and `validate` commands against temp files

mod common;

use clap::Parser;
use common::*;
use riskfold::cli::{self, Cli, Settings};
use riskfold::domain::error::RiskfoldError;
use riskfold::domain::indicator::IndicatorType;
use riskfold::ports::signal_port::SignalPort;
use std::process::ExitCode;

const VALID_INI: &str = r#"
[portfolio]
initial_capital = 25000
risk_per_trade = 0.02
transaction_cost = 0.001
slippage = 0.0005

[indicators]
ema_fast = 3
ema_slow = 6
sma_period = 3
atr_period = 3
adx_period = 3

[strategy]
adx_threshold = 20
atr_stop_multiple = 2
reward_risk = 2
obv_lookback = 2
"#;

fn run_cli(args: &[&str]) -> ExitCode {
    cli::run(Cli::try_parse_from(args).unwrap())
}

mod settings {
    use super::*;

    #[test]
    fn loads_every_section_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(dir.path(), "riskfold.ini", VALID_INI);

        let settings = cli::load_settings(Some(path.as_path())).unwrap();
        assert_eq!(settings.portfolio.initial_capital, 25_000.0);
        assert_eq!(settings.portfolio.risk_per_trade, 0.02);
        assert_eq!(settings.portfolio.transaction_cost_rate, 0.001);
        assert_eq!(settings.portfolio.slippage_rate, 0.0005);
        assert_eq!(settings.indicators, fast_strategy().periods);
        assert_eq!(settings.strategy, fast_strategy().params);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(dir.path(), "partial.ini", "[portfolio]\ninitial_capital = 5000\n");

        let settings = cli::load_settings(Some(path.as_path())).unwrap();
        let defaults = Settings::default();
        assert_eq!(settings.portfolio.initial_capital, 5_000.0);
        assert_eq!(
            settings.portfolio.risk_per_trade,
            defaults.portfolio.risk_per_trade
        );
        assert_eq!(settings.indicators, defaults.indicators);
        assert_eq!(settings.strategy, defaults.strategy);
    }

    #[test]
    fn strategy_reads_configured_periods() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(dir.path(), "riskfold.ini", VALID_INI);
        let strategy = cli::load_settings(Some(path.as_path())).unwrap().trend_strategy();

        let wanted = strategy.indicators();
        assert_eq!(wanted.len(), 6);
        assert!(wanted.contains(&IndicatorType::Ema(3)));
        assert!(wanted.contains(&IndicatorType::Ema(6)));
        assert!(wanted.contains(&IndicatorType::Adx(3)));
    }

    #[test]
    fn invalid_value_is_config_error_with_exit_code_2() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_file(dir.path(), "bad.ini", "[portfolio]\nrisk_per_trade = 2\n");

        let err = cli::load_settings(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, RiskfoldError::ConfigInvalid { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }

    #[test]
    fn missing_file_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = cli::load_settings(Some(dir.path().join("absent.ini").as_path())).unwrap_err();
        assert!(matches!(err, RiskfoldError::ConfigParse { .. }));
    }
}

mod indicator_table {
    use super::*;

    fn table(tail: Option<usize>) -> Vec<String> {
        let series = PriceSeries::new(generate_bars("2024-01-01", 10, 100.0, 2.0));
        let mut out = Vec::new();
        cli::write_indicator_table(&mut out, &series, &fast_strategy(), tail).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn header_names_each_indicator() {
        let lines = table(None);
        assert_eq!(
            lines[0],
            "date,close,EMA(3),EMA(6),SMA(3),ATR(3),ADX(3),OBV"
        );
        assert_eq!(lines.len(), 11);
    }

    #[test]
    fn warmup_cells_are_blank() {
        let lines = table(None);
        // First bar: EMAs and OBV are defined, SMA/ATR/ADX are not.
        assert_eq!(
            lines[1],
            "2024-01-01,100.0000,100.0000,100.0000,,,,1000.0000"
        );
        assert!(!lines[10].contains(",,"));
    }

    #[test]
    fn tail_keeps_last_rows() {
        let lines = table(Some(3));
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2024-01-08,"));
        assert!(lines[3].starts_with("2024-01-10,"));
        assert!(lines[3].contains(",3.0000,"));
    }

    #[test]
    fn tail_longer_than_series_keeps_all() {
        assert_eq!(table(Some(100)).len(), 11);
    }
}

mod commands {
    use super::*;

    #[test]
    fn simulate_succeeds_and_writes_trade_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("bars.csv");
        write_bars_csv(&data, &generate_bars("2024-01-01", 30, 100.0, 2.0));
        let config = write_file(dir.path(), "riskfold.ini", VALID_INI);
        let trades = dir.path().join("trades.csv");

        let code = run_cli(&[
            "riskfold",
            "simulate",
            "--data",
            data.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--trades",
            trades.to_str().unwrap(),
        ]);
        assert_eq!(code, ExitCode::SUCCESS);

        let log = std::fs::read_to_string(&trades).unwrap();
        let rows: Vec<&str> = log.lines().collect();
        assert!(rows[0].starts_with("entry_date,"));
        assert!(rows.len() > 1);
        assert!(rows[1..].iter().all(|r| r.ends_with("take-profit")));
    }

    #[test]
    fn simulate_with_too_few_bars_exits_5() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("bars.csv");
        write_bars_csv(&data, &generate_bars("2024-01-01", 10, 100.0, 1.0));

        let code = run_cli(&["riskfold", "simulate", "--data", data.to_str().unwrap()]);
        assert_eq!(code, ExitCode::from(5));
    }

    #[test]
    fn simulate_with_missing_data_exits_3() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("absent.csv");
        let code = run_cli(&["riskfold", "simulate", "--data", data.to_str().unwrap()]);
        assert_eq!(code, ExitCode::from(3));
    }

    #[test]
    fn validate_accepts_good_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = write_file(dir.path(), "riskfold.ini", VALID_INI);
        let code = run_cli(&["riskfold", "validate", "--config", config.to_str().unwrap()]);
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn validate_rejects_slow_ema_shorter_than_fast() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = write_file(
            dir.path(),
            "bad.ini",
            "[indicators]\nema_fast = 50\nema_slow = 20\n",
        );
        let code = run_cli(&["riskfold", "validate", "--config", config.to_str().unwrap()]);
        assert_eq!(code, ExitCode::from(2));
    }
}

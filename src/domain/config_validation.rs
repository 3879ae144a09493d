//! Configuration loading and validation.
//!
//! Each loader reads one INI section through a [`ConfigPort`], falls back to
//! the type's default for absent keys and rejects values that do not parse
//! or are out of range.

use std::fmt::Display;
use std::str::FromStr;

use crate::domain::error::RiskfoldError;
use crate::domain::portfolio::PortfolioConfig;
use crate::domain::strategy::{IndicatorParams, TrendParams};
use crate::ports::config_port::ConfigPort;

pub const PORTFOLIO_SECTION: &str = "portfolio";
pub const INDICATORS_SECTION: &str = "indicators";
pub const STRATEGY_SECTION: &str = "strategy";

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> RiskfoldError {
    RiskfoldError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn read<T>(config: &dyn ConfigPort, section: &str, key: &str, default: T) -> Result<T, RiskfoldError>
where
    T: FromStr,
    T::Err: Display,
{
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| invalid(section, key, format!("cannot parse {:?}: {}", raw, e))),
    }
}

fn read_period(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, RiskfoldError> {
    let value: i64 = read(config, section, key, default as i64)?;
    if value < 1 {
        return Err(invalid(section, key, format!("{} must be at least 1", key)));
    }
    usize::try_from(value).map_err(|e| invalid(section, key, e.to_string()))
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<PortfolioConfig, RiskfoldError> {
    let s = PORTFOLIO_SECTION;
    let defaults = PortfolioConfig::default();

    let initial_capital = read(config, s, "initial_capital", defaults.initial_capital)?;
    if !(initial_capital > 0.0) || !initial_capital.is_finite() {
        return Err(invalid(s, "initial_capital", "initial_capital must be positive"));
    }

    let risk_per_trade = read(config, s, "risk_per_trade", defaults.risk_per_trade)?;
    if !(risk_per_trade > 0.0 && risk_per_trade <= 1.0) {
        return Err(invalid(s, "risk_per_trade", "risk_per_trade must be in (0, 1]"));
    }

    let transaction_cost_rate =
        read(config, s, "transaction_cost", defaults.transaction_cost_rate)?;
    if !(transaction_cost_rate >= 0.0 && transaction_cost_rate < 1.0) {
        return Err(invalid(s, "transaction_cost", "transaction_cost must be in [0, 1)"));
    }

    let slippage_rate = read(config, s, "slippage", defaults.slippage_rate)?;
    if !(slippage_rate >= 0.0 && slippage_rate < 1.0) {
        return Err(invalid(s, "slippage", "slippage must be in [0, 1)"));
    }

    Ok(PortfolioConfig {
        initial_capital,
        risk_per_trade,
        transaction_cost_rate,
        slippage_rate,
    })
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<IndicatorParams, RiskfoldError> {
    let s = INDICATORS_SECTION;
    let defaults = IndicatorParams::default();

    let params = IndicatorParams {
        ema_fast: read_period(config, s, "ema_fast", defaults.ema_fast)?,
        ema_slow: read_period(config, s, "ema_slow", defaults.ema_slow)?,
        sma_period: read_period(config, s, "sma_period", defaults.sma_period)?,
        atr_period: read_period(config, s, "atr_period", defaults.atr_period)?,
        adx_period: read_period(config, s, "adx_period", defaults.adx_period)?,
    };

    if params.ema_slow < params.ema_fast {
        return Err(invalid(
            s,
            "ema_slow",
            format!(
                "ema_slow ({}) must not be shorter than ema_fast ({})",
                params.ema_slow, params.ema_fast
            ),
        ));
    }
    Ok(params)
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<TrendParams, RiskfoldError> {
    let s = STRATEGY_SECTION;
    let defaults = TrendParams::default();

    let adx_threshold = read(config, s, "adx_threshold", defaults.adx_threshold)?;
    if !(adx_threshold >= 0.0) {
        return Err(invalid(s, "adx_threshold", "adx_threshold must be non-negative"));
    }

    let atr_stop_multiple = read(config, s, "atr_stop_multiple", defaults.atr_stop_multiple)?;
    if !(atr_stop_multiple > 0.0) {
        return Err(invalid(s, "atr_stop_multiple", "atr_stop_multiple must be positive"));
    }

    let reward_risk = read(config, s, "reward_risk", defaults.reward_risk)?;
    if !(reward_risk > 0.0) {
        return Err(invalid(s, "reward_risk", "reward_risk must be positive"));
    }

    Ok(TrendParams {
        adx_threshold,
        atr_stop_multiple,
        reward_risk,
        obv_lookback: read_period(config, s, "obv_lookback", defaults.obv_lookback)?,
    })
}

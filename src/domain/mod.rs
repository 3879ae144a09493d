//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod indicator;
pub mod indicator_helpers;
pub mod strategy;
pub mod simulation;
pub mod metrics;
pub mod error;
pub mod config_validation;

//! Domain error types.
//!
//! Only the outer layers (data loading, configuration, CLI) fail with an
//! error. Indicator and portfolio operations report degenerate input through
//! empty series and skip outcomes instead.

/// Top-level error type for riskfold.
#[derive(Debug, thiserror::Error)]
pub enum RiskfoldError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RiskfoldError> for std::process::ExitCode {
    fn from(err: &RiskfoldError) -> Self {
        let code: u8 = match err {
            RiskfoldError::Io(_) => 1,
            RiskfoldError::ConfigParse { .. }
            | RiskfoldError::ConfigInvalid { .. } => 2,
            RiskfoldError::Data { .. } => 3,
            RiskfoldError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

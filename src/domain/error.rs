//! Domain error types.

/// Top-level error type for finsight.
#[derive(Debug, thiserror::Error)]
pub enum FinsightError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("unknown currency code {code}")]
    UnknownCurrency { code: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{provider} request failed: {reason}")]
    Provider { provider: String, reason: String },

    #[error("{provider} request timed out")]
    Timeout { provider: String },

    #[error("{provider} returned HTTP {status}")]
    Upstream { provider: String, status: u16 },

    #[error("no data available for {symbol}")]
    Unavailable { symbol: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FinsightError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        FinsightError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from a remote collaborator rather than the caller.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            FinsightError::Provider { .. }
                | FinsightError::Timeout { .. }
                | FinsightError::Upstream { .. }
        )
    }
}

impl From<&FinsightError> for std::process::ExitCode {
    fn from(err: &FinsightError) -> Self {
        let code: u8 = match err {
            FinsightError::Io(_) | FinsightError::Csv(_) => 1,
            FinsightError::ConfigParse { .. }
            | FinsightError::ConfigMissing { .. }
            | FinsightError::ConfigInvalid { .. } => 2,
            FinsightError::Provider { .. }
            | FinsightError::Timeout { .. }
            | FinsightError::Upstream { .. } => 3,
            FinsightError::InvalidInput { .. } => 4,
            FinsightError::UnknownCurrency { .. } | FinsightError::Unavailable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

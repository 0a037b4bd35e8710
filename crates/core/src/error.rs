//! Core TTL map error types (pure - no I/O variants).

use thiserror::Error;

/// Core TTL map errors (pure - no I/O variants).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TtlMapCoreError {
    #[error("Sweep interval must be positive")]
    InvalidSweepInterval,

    #[error("Unknown read policy: {0} (expected \"sweep\" or \"strict\")")]
    InvalidReadPolicy(String),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnvValue { var: String, value: String },
}

pub type Result<T> = std::result::Result<T, TtlMapCoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sweep_interval_display() {
        assert_eq!(
            TtlMapCoreError::InvalidSweepInterval.to_string(),
            "Sweep interval must be positive"
        );
    }

    #[test]
    fn test_invalid_read_policy_display() {
        let error = TtlMapCoreError::InvalidReadPolicy("lazy".to_string());
        assert_eq!(
            error.to_string(),
            "Unknown read policy: lazy (expected \"sweep\" or \"strict\")"
        );
    }

    #[test]
    fn test_invalid_env_value_display() {
        let error = TtlMapCoreError::InvalidEnvValue {
            var: "TTLMAP_TTL_MS".to_string(),
            value: "soon".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid value for TTLMAP_TTL_MS: \"soon\"");
    }
}

// Standard library imports

// Third party imports
use thiserror::Error;

/// Audit pipeline errors
#[derive(Debug, Error)]
pub enum AuditError {
    /// RPC failure on a prerequisite call (account listing, slot fetch)
    #[error("Rpc error: {0}")]
    Rpc(String),
    /// Program address could not be parsed
    #[error("Invalid program address: {0}")]
    InvalidProgramAddress(String),
    /// Malformed or out-of-range scan configuration
    #[error("Config error: {0}")]
    Config(String),
    /// Anything else
    #[error("Other error: {0}")]
    Other(String),
}

/// Common result type for the audit pipeline
pub type AuditResult<T> = Result<T, AuditError>;

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;

    /// Test AuditError
    #[test]
    fn test_audit_error() {
        let error = AuditError::Config("thresholds must ascend".to_string());
        assert_eq!(error.to_string(), "Config error: thresholds must ascend");
    }
}

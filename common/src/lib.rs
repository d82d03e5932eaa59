// Re-exports for common crate
pub mod prelude {
    // External types
    pub use solana_program::pubkey::Pubkey;

    // Common modules
    pub use crate::config;
    pub use crate::error;
    pub use crate::types;

    // Flattened re-exports
    pub use crate::config::{RiskThresholds, RiskWeights, ScanConfig};
    pub use crate::error::{AuditError, AuditResult};
    pub use crate::types::*;
}

// Modules paths
pub mod config;
pub mod error;
pub mod types;

// Third party imports
use serde::{Deserialize, Serialize};

// Internal imports
use crate::error::{AuditError, AuditResult};

/// Per-indicator score weights. Each weight scales a 0-100 sub-score,
/// weights are additive across indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Weight for the inactivity indicator
    pub inactivity: f64,
    /// Weight for an unclassifiable PDA
    pub orphaned_pda: f64,
    /// Weight for an account owned by a foreign program
    pub authority_mismatch: f64,
    /// Weight for balance above the rent-exempt minimum
    pub rent: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            inactivity: 0.3,
            orphaned_pda: 0.25,
            authority_mismatch: 0.25,
            rent: 0.2,
        }
    }
}

/// Ascending confidence-score cutoffs for the discrete risk levels.
/// A score below `medium` maps to Low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: 25.0,
            medium: 50.0,
            high: 75.0,
            critical: 90.0,
        }
    }
}

/// Full configuration for one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Slots without activity before an account counts as inactive
    pub inactivity_threshold_slots: u64,
    /// Indicator weights
    pub weights: RiskWeights,
    /// Risk level cutoffs
    pub thresholds: RiskThresholds,
    /// Max addresses per activity-lookup batch
    pub max_accounts_per_batch: usize,
    /// Pause between batches, the sole rate limit against the RPC
    pub delay_between_batches_ms: u64,
    /// Attempts per activity lookup before giving up
    pub retry_attempts: u32,
    /// Fixed pause between retry attempts
    pub retry_delay_ms: u64,
    /// Node cap for the presentation graph
    pub max_graph_nodes: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            // ~30 days of slots at ~2.5 slots/sec
            inactivity_threshold_slots: 6_480_000,
            weights: RiskWeights::default(),
            thresholds: RiskThresholds::default(),
            max_accounts_per_batch: 25,
            delay_between_batches_ms: 200,
            retry_attempts: 3,
            retry_delay_ms: 500,
            max_graph_nodes: 100,
        }
    }
}

impl ScanConfig {
    /// Validate configuration once at scan start. Violations are fatal.
    pub fn validate(&self) -> AuditResult<()> {
        let weights = [
            ("inactivity", self.weights.inactivity),
            ("orphaned_pda", self.weights.orphaned_pda),
            ("authority_mismatch", self.weights.authority_mismatch),
            ("rent", self.weights.rent),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(AuditError::Config(format!(
                    "weight {} must be finite and >= 0, got {}",
                    name, w
                )));
            }
        }

        let t = &self.thresholds;
        let cutoffs = [t.low, t.medium, t.high, t.critical];
        if cutoffs.iter().any(|c| !c.is_finite() || *c < 0.0 || *c > 100.0) {
            return Err(AuditError::Config(
                "thresholds must lie in [0, 100]".to_string(),
            ));
        }
        if !(t.low < t.medium && t.medium < t.high && t.high < t.critical) {
            return Err(AuditError::Config(
                "thresholds must be strictly ascending low < medium < high < critical"
                    .to_string(),
            ));
        }

        if self.max_accounts_per_batch == 0 {
            return Err(AuditError::Config(
                "max_accounts_per_batch must be >= 1".to_string(),
            ));
        }
        if self.max_graph_nodes == 0 {
            return Err(AuditError::Config(
                "max_graph_nodes must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

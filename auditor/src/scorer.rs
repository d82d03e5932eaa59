// External imports
use solana_program::pubkey::Pubkey;

// Standard library imports
use std::collections::BTreeMap;

// Internal imports
use audit_common::prelude::*;

/// Evaluate every risk indicator for one classified account and fold the
/// emitted weights into a profile. Pure and deterministic: identical input
/// always produces an identical profile.
pub fn score_account(
    program: &Pubkey,
    classified: &ClassifiedAccount,
    current_slot: u64,
    rent_exempt_minimum: u64,
    config: &ScanConfig,
) -> RiskProfile {
    let account = &classified.account;
    let mut indicators: Vec<RiskIndicator> = Vec::new();

    // Inactivity. Unknown activity scores the same as maximal staleness:
    // an account we cannot observe is treated as dormant, never as safe.
    let staleness = match account.last_activity_slot {
        None => None,
        Some(last) => Some(current_slot.saturating_sub(last)),
    };
    let inactive = match staleness {
        None => true,
        Some(age) => age > config.inactivity_threshold_slots,
    };
    if inactive {
        let reason = match staleness {
            None => "no activity ever observed for this account".to_string(),
            Some(age) => format!("no activity for {} slots", age),
        };
        indicators.push(RiskIndicator {
            kind: RiskIndicatorKind::Inactivity,
            reason,
            weight: config.weights.inactivity * 100.0,
        });
    }

    // Orphaned PDA: off-curve with no recoverable derivation.
    if classified.is_unclassified_pda() {
        indicators.push(RiskIndicator {
            kind: RiskIndicatorKind::OrphanedPda,
            reason: "PDA with no recoverable derivation seeds".to_string(),
            weight: config.weights.orphaned_pda * 100.0,
        });
    }

    // Authority mismatch: the account is held by a foreign program.
    if account.owner != *program {
        indicators.push(RiskIndicator {
            kind: RiskIndicatorKind::AuthorityMismatch,
            reason: format!("account owned by foreign program {}", account.owner),
            weight: config.weights.authority_mismatch * 100.0,
        });
    }

    // Rent recoverable: balance above the rent-exempt minimum. Sub-score
    // scales with the recoverable amount and saturates at 100.
    let recoverable_lamports = account.lamports.saturating_sub(rent_exempt_minimum);
    if recoverable_lamports > 0 {
        let sub_score = (lamports_to_sol(recoverable_lamports) * 10.0).min(100.0);
        indicators.push(RiskIndicator {
            kind: RiskIndicatorKind::RentRecoverable,
            reason: format!(
                "{} lamports above the rent-exempt minimum",
                recoverable_lamports
            ),
            weight: config.weights.rent * sub_score,
        });
    }

    let total: f64 = indicators.iter().map(|i| i.weight).sum();
    let confidence_score = total.min(100.0);
    let risk_level = level_for(confidence_score, &config.thresholds);

    // Recoverable value is only claimed once risk crosses the reporting
    // threshold; lower-risk accounts report zero even when the rent
    // indicator fired.
    let estimated_recoverable_sol = if risk_level >= RiskLevel::High {
        lamports_to_sol(recoverable_lamports)
    } else {
        0.0
    };

    RiskProfile {
        address: account.address,
        risk_level,
        confidence_score,
        indicators,
        estimated_recoverable_sol,
    }
}

/// Map a confidence score to a discrete level, checking cutoffs from the
/// top down. Anything below the medium cutoff is Low.
fn level_for(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if score >= thresholds.critical {
        RiskLevel::Critical
    } else if score >= thresholds.high {
        RiskLevel::High
    } else if score >= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Fold aggregate statistics over the finished profiles. "Active" and
/// "dormant" are independent categories and may overlap with the rest.
pub fn summarize(profiles: &BTreeMap<String, RiskProfile>) -> ScanSummary {
    profiles
        .values()
        .fold(ScanSummary::default(), |mut summary, profile| {
            summary.total_accounts += 1;
            if profile.risk_level == RiskLevel::Low {
                summary.active_accounts += 1;
            }
            if profile.is_dormant() {
                summary.dormant_accounts += 1;
            }
            if profile.risk_level >= RiskLevel::High {
                summary.high_risk_accounts += 1;
            }
            summary.total_recoverable_sol += profile.estimated_recoverable_sol;
            summary
        })
}

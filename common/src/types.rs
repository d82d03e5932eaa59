// External imports
use solana_program::native_token::LAMPORTS_PER_SOL;
use solana_program::pubkey::Pubkey;

// Standard library imports
use std::collections::BTreeMap;

// Third party imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One program-owned account as returned by the account listing.
/// Immutable for the duration of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account address
    pub address: Pubkey,
    /// Owner program of the account
    pub owner: Pubkey,
    /// Balance in lamports
    pub lamports: u64,
    /// Raw account data
    pub data: Vec<u8>,
    /// Whether the account holds executable code
    pub executable: bool,
    /// Slot of the most recent observed activity, if known
    pub last_activity_slot: Option<u64>,
}

/// An account snapshot plus the result of PDA classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedAccount {
    /// The underlying account
    pub account: AccountSnapshot,
    /// True when the address is off the ed25519 curve
    pub is_pda: bool,
    /// Recovered derivation seeds, present only when the search succeeded
    pub derivation_seeds: Option<Vec<String>>,
    /// Bump byte matching `derivation_seeds`
    pub derivation_bump: Option<u8>,
}

impl ClassifiedAccount {
    /// True for a PDA whose derivation could not be recovered.
    /// Inconclusive, not proven orphaned.
    pub fn is_unclassified_pda(&self) -> bool {
        self.is_pda && self.derivation_seeds.is_none()
    }
}

/// The kind of risk signal an indicator represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskIndicatorKind {
    /// No recent activity, or none ever observed
    Inactivity,
    /// PDA with no recoverable derivation path
    OrphanedPda,
    /// Account owned by a program other than the audited one
    AuthorityMismatch,
    /// Balance above the rent-exempt minimum
    RentRecoverable,
    /// Authority referencing an address outside the current account set
    LegacyAuthority,
}

/// One weighted risk signal on an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskIndicator {
    /// Signal kind
    pub kind: RiskIndicatorKind,
    /// Human readable explanation
    pub reason: String,
    /// Additive score weight, >= 0
    pub weight: f64,
}

/// Discrete risk levels, totally ordered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// The scored risk assessment for one account.
/// Derived deterministically from one ClassifiedAccount plus configuration;
/// never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Account address
    pub address: Pubkey,
    /// Discrete risk level
    pub risk_level: RiskLevel,
    /// Combined indicator weight, capped to [0, 100]
    pub confidence_score: f64,
    /// Indicators that fired, in evaluation order
    pub indicators: Vec<RiskIndicator>,
    /// Recoverable balance in SOL, non-zero only for High/Critical
    pub estimated_recoverable_sol: f64,
}

impl RiskProfile {
    /// True when an inactivity indicator fired
    pub fn is_dormant(&self) -> bool {
        self.indicators
            .iter()
            .any(|i| i.kind == RiskIndicatorKind::Inactivity)
    }
}

/// Privilege an authority holds over an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Privilege {
    Owner,
    Signer,
    Writable,
}

/// A single authority relation between an account and some address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityEdge {
    /// The account the privilege applies to
    pub account_address: Pubkey,
    /// The address holding the privilege
    pub authority_address: Pubkey,
    /// Kind of privilege
    pub privilege: Privilege,
    /// False when the authority is absent from the current account set
    pub is_active: bool,
}

/// Node kind in the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// The audited program itself (exactly one per graph)
    Program,
    /// A program-owned account
    Account,
}

/// Relation carried by a graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeRelation {
    /// Program owns the account
    Owns,
    /// Account was derived from the program via recovered seeds
    DerivedFrom,
    /// Third party authority over the account
    Authority,
}

/// Presentation projection of a classified, scored account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Base58 address, unique node id
    pub id: String,
    /// Display label
    pub label: String,
    /// Node kind
    pub kind: NodeKind,
    /// Whether this node is a PDA
    pub is_pda: bool,
    /// Risk level, absent when scoring was skipped
    pub risk_level: Option<RiskLevel>,
    /// Confidence score, absent when scoring was skipped
    pub confidence_score: Option<f64>,
}

/// Presentation projection of a relation between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Relation kind
    pub relation: EdgeRelation,
    /// Carried over from the underlying authority edge
    pub is_active: bool,
}

/// The assembled node/edge graph for visualization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Aggregate statistics folded over the risk profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Accounts scanned
    pub total_accounts: usize,
    /// Accounts at Low risk
    pub active_accounts: usize,
    /// Accounts carrying an inactivity indicator
    pub dormant_accounts: usize,
    /// Accounts at High or Critical risk
    pub high_risk_accounts: usize,
    /// Sum of recoverable balances across profiles, in SOL
    pub total_recoverable_sol: f64,
}

/// The finished output of one scan. Immutable once produced; the unit of
/// persistence and the input to the report layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// The audited program
    pub program_address: Pubkey,
    /// Wall clock time the scan finished
    pub scan_timestamp: DateTime<Utc>,
    /// Ledger slot the scan was evaluated against
    pub slot: u64,
    /// Aggregate statistics
    pub summary: ScanSummary,
    /// One profile per scanned account, keyed by base58 address
    pub risk_profiles: BTreeMap<String, RiskProfile>,
    /// Filtered presentation graph
    pub graph: RelationshipGraph,
    /// All derived authority edges, legacy ones flagged inactive
    pub authority_edges: Vec<AuthorityEdge>,
}

impl ScanResult {
    /// Profiles at or above a minimum risk level, for the report layer.
    pub fn profiles_at_or_above(&self, min_level: RiskLevel) -> Vec<&RiskProfile> {
        self.risk_profiles
            .values()
            .filter(|p| p.risk_level >= min_level)
            .collect()
    }
}

/// Convert a lamport amount to SOL for display
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

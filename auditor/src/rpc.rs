// Third party imports
use anyhow::Result;
use async_trait::async_trait;

// Internal imports
use audit_common::prelude::*;

/// The upstream RPC collaborator the scan runs against.
///
/// Account listing and slot lookup are prerequisites: any error there
/// aborts the scan. Activity lookup is best-effort enrichment and may
/// legitimately return `None` for an address with no observed history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgramRpc: Send + Sync + 'static {
    /// All accounts currently owned by the program
    async fn list_program_accounts(&self, program: Pubkey) -> Result<Vec<AccountSnapshot>>;

    /// Current ledger slot
    async fn current_slot(&self) -> Result<u64>;

    /// Slot of the most recent transaction touching `address`, if any
    async fn last_activity_slot(&self, address: Pubkey) -> Result<Option<u64>>;

    /// Minimum balance for rent exemption at the given data length.
    /// Infallible by contract; implementations cache the rent schedule.
    async fn minimum_rent_exempt_balance(&self, data_len: usize) -> u64;
}

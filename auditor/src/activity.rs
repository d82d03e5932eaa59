// External imports
use solana_program::pubkey::Pubkey;

// Standard library imports
use std::collections::HashMap;
use std::time::Duration;

// Third party imports
use futures::future::join_all;
use tracing::{debug, warn};

// Internal imports
use audit_common::prelude::*;

use crate::rpc::ProgramRpc;

/// Batched, rate-limited activity lookups against the RPC collaborator.
///
/// Addresses are partitioned into batches of at most
/// `max_accounts_per_batch`; lookups inside a batch run concurrently,
/// batches run strictly in sequence with a configured pause between them.
/// A lookup that exhausts its retries resolves to `None` — the scorer
/// treats unknown activity as maximal inactivity, so losing a lookup
/// degrades the scan instead of failing it.
pub struct ActivityFetcher<'a> {
    rpc: &'a dyn ProgramRpc,
    config: &'a ScanConfig,
}

impl<'a> ActivityFetcher<'a> {
    pub fn new(rpc: &'a dyn ProgramRpc, config: &'a ScanConfig) -> Self {
        Self { rpc, config }
    }

    /// Resolve the last-activity slot for every address. Never fails;
    /// unresolved addresses map to `None`.
    pub async fn fetch_all(&self, addresses: &[Pubkey]) -> HashMap<Pubkey, Option<u64>> {
        let mut activity = HashMap::with_capacity(addresses.len());
        let batch_size = self.config.max_accounts_per_batch.max(1);

        for (index, batch) in addresses.chunks(batch_size).enumerate() {
            if index > 0 && self.config.delay_between_batches_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_between_batches_ms))
                    .await;
            }

            let lookups = batch.iter().map(|address| self.lookup_with_retry(*address));
            let results = join_all(lookups).await;

            for (address, slot) in batch.iter().zip(results) {
                activity.insert(*address, slot);
            }
            debug!(
                "activity batch {} done ({} addresses)",
                index + 1,
                batch.len()
            );
        }

        activity
    }

    /// One lookup with a bounded number of attempts and a fixed pause
    /// between them. Exhaustion yields `None`.
    async fn lookup_with_retry(&self, address: Pubkey) -> Option<u64> {
        let attempts = self.config.retry_attempts.max(1);
        for attempt in 1..=attempts {
            match self.rpc.last_activity_slot(address).await {
                Ok(slot) => return slot,
                Err(err) if attempt < attempts => {
                    debug!(
                        "activity lookup for {} failed (attempt {}/{}): {}",
                        address, attempt, attempts, err
                    );
                    if self.config.retry_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms))
                            .await;
                    }
                }
                Err(err) => {
                    warn!(
                        "activity lookup for {} gave up after {} attempts: {}",
                        address, attempts, err
                    );
                }
            }
        }
        None
    }
}

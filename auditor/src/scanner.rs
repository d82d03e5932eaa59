// External imports
use solana_program::pubkey::Pubkey;

// Standard library imports
use std::collections::BTreeMap;
use std::sync::Arc;

// Third party imports
use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

// Internal imports
use audit_common::prelude::*;

use crate::activity::ActivityFetcher;
use crate::rpc::ProgramRpc;
use crate::{authority, classifier, graph, scorer};

/// Drives one full audit pass over a program's account set.
///
/// Stages run strictly in sequence; inside the classification and
/// activity stages independent per-account work runs concurrently under
/// the batch-size bound. Prerequisite RPC calls (slot, account listing)
/// abort the scan on failure; per-account activity lookups degrade to
/// "unknown" instead.
pub struct ProgramScanner {
    rpc: Arc<dyn ProgramRpc>,
    config: ScanConfig,
}

impl ProgramScanner {
    pub fn new(rpc: Arc<dyn ProgramRpc>, config: ScanConfig) -> Self {
        Self { rpc, config }
    }

    /// Run the full pipeline and assemble the immutable result.
    pub async fn scan(&self, program: Pubkey) -> Result<ScanResult> {
        self.config.validate()?;

        let slot = self
            .rpc
            .current_slot()
            .await
            .context("failed to fetch current slot")?;
        let accounts = self
            .rpc
            .list_program_accounts(program)
            .await
            .with_context(|| format!("failed to list accounts owned by {}", program))?;
        info!(
            "scanning {} accounts owned by {} at slot {}",
            accounts.len(),
            program,
            slot
        );

        let classified = self.classify_all(program, accounts).await;
        let pda_count = classified.iter().filter(|c| c.is_pda).count();
        let recovered = classified
            .iter()
            .filter(|c| c.derivation_seeds.is_some())
            .count();
        info!(
            "classified {} accounts: {} PDAs, {} with recovered seeds",
            classified.len(),
            pda_count,
            recovered
        );

        let addresses: Vec<Pubkey> = classified.iter().map(|c| c.account.address).collect();
        let fetcher = ActivityFetcher::new(self.rpc.as_ref(), &self.config);
        let activity = fetcher.fetch_all(&addresses).await;

        // Attach activity before scoring; snapshots stay untouched after this
        let classified: Vec<ClassifiedAccount> = classified
            .into_iter()
            .map(|mut c| {
                c.account.last_activity_slot =
                    activity.get(&c.account.address).copied().flatten();
                c
            })
            .collect();

        let mut risk_profiles = BTreeMap::new();
        for c in &classified {
            let rent_minimum = self
                .rpc
                .minimum_rent_exempt_balance(c.account.data.len())
                .await;
            let profile = scorer::score_account(&program, c, slot, rent_minimum, &self.config);
            risk_profiles.insert(profile.address.to_string(), profile);
        }

        let mut authority_edges = authority::map_authorities(&program, &classified);
        let legacy = authority::detect_legacy(&program, &authority_edges, &classified);
        if !legacy.is_empty() {
            warn!("{} legacy authority edges detected", legacy.len());
            for edge in &mut authority_edges {
                if legacy.contains(edge) {
                    edge.is_active = false;
                }
            }
        }

        let full_graph = graph::assemble_graph(&program, &classified, &risk_profiles, &authority_edges);
        let graph = graph::filter_graph(full_graph, self.config.max_graph_nodes);

        let summary = scorer::summarize(&risk_profiles);
        info!(
            "scan of {} finished: {} high-risk accounts, {:.4} SOL recoverable",
            program, summary.high_risk_accounts, summary.total_recoverable_sol
        );

        Ok(ScanResult {
            program_address: program,
            scan_timestamp: Utc::now(),
            slot,
            summary,
            risk_profiles,
            graph,
            authority_edges,
        })
    }

    /// Classify the whole set, batch by batch. Each account is an
    /// independent unit of work; the derivation search is CPU-bound so it
    /// runs on the blocking pool.
    async fn classify_all(
        &self,
        program: Pubkey,
        accounts: Vec<AccountSnapshot>,
    ) -> Vec<ClassifiedAccount> {
        let batch_size = self.config.max_accounts_per_batch.max(1);
        let mut classified = Vec::with_capacity(accounts.len());
        let mut pending = accounts.into_iter().peekable();

        while pending.peek().is_some() {
            let batch: Vec<AccountSnapshot> = pending.by_ref().take(batch_size).collect();
            let handles: Vec<_> = batch
                .into_iter()
                .map(|account| {
                    tokio::task::spawn_blocking(move || {
                        classifier::classify_account(&program, account)
                    })
                })
                .collect();

            for joined in join_all(handles).await {
                match joined {
                    Ok(result) => classified.push(result),
                    Err(err) => warn!("classification task failed: {}", err),
                }
            }
        }

        classified
    }
}

/// Module tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MockProgramRpc;
    use anyhow::anyhow;
    use solana_program::rent::Rent;

    const PROGRAM_BYTES: [u8; 32] = [7u8; 32];

    fn program_id() -> Pubkey {
        Pubkey::new_from_array(PROGRAM_BYTES)
    }

    fn snapshot(address: Pubkey, lamports: u64) -> AccountSnapshot {
        AccountSnapshot {
            address,
            owner: program_id(),
            lamports,
            data: vec![0u8; 64],
            executable: false,
            last_activity_slot: None,
        }
    }

    fn fast_config() -> ScanConfig {
        let mut config = ScanConfig::default();
        config.delay_between_batches_ms = 0;
        config.retry_delay_ms = 0;
        config.inactivity_threshold_slots = 1_000;
        config
    }

    fn rpc_with_accounts(accounts: Vec<AccountSnapshot>) -> MockProgramRpc {
        let mut rpc = MockProgramRpc::new();
        rpc.expect_current_slot().returning(|| Ok(500_000));
        rpc.expect_list_program_accounts()
            .return_once(move |_| Ok(accounts));
        rpc.expect_minimum_rent_exempt_balance()
            .returning(|len| Rent::default().minimum_balance(len));
        rpc
    }

    /// Test a full scan over a mixed account set
    #[tokio::test]
    async fn test_scan_end_to_end() {
        let program = program_id();
        let (pda, _) = Pubkey::find_program_address(&[b"vault"], &program);
        let accounts = vec![
            snapshot(pda, 5_000_000),
            snapshot(Pubkey::new_unique(), 2_000_000_000),
        ];

        let mut rpc = rpc_with_accounts(accounts);
        rpc.expect_last_activity_slot()
            .returning(|_| Ok(Some(499_900)));

        let scanner = ProgramScanner::new(Arc::new(rpc), fast_config());
        let result = scanner.scan(program).await.unwrap();

        assert_eq!(result.program_address, program);
        assert_eq!(result.slot, 500_000);
        assert_eq!(result.risk_profiles.len(), 2);
        assert_eq!(result.summary.total_accounts, 2);
        // Every profile corresponds to exactly one node besides the program
        assert_eq!(result.graph.nodes.len(), 3);

        let pda_profile = &result.risk_profiles[&pda.to_string()];
        assert!(!pda_profile.is_dormant());

        // The recovered PDA produced a signer edge back to the program
        assert!(result
            .authority_edges
            .iter()
            .any(|e| e.privilege == Privilege::Signer && e.authority_address == program));
    }

    /// Test that a failing account listing aborts the scan
    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let mut rpc = MockProgramRpc::new();
        rpc.expect_current_slot().returning(|| Ok(500_000));
        rpc.expect_list_program_accounts()
            .returning(|_| Err(anyhow!("rpc unreachable")));

        let scanner = ProgramScanner::new(Arc::new(rpc), fast_config());
        assert!(scanner.scan(program_id()).await.is_err());
    }

    /// Test that a failing slot fetch aborts the scan
    #[tokio::test]
    async fn test_slot_failure_is_fatal() {
        let mut rpc = MockProgramRpc::new();
        rpc.expect_current_slot()
            .returning(|| Err(anyhow!("rpc unreachable")));

        let scanner = ProgramScanner::new(Arc::new(rpc), fast_config());
        assert!(scanner.scan(program_id()).await.is_err());
    }

    /// Test that invalid configuration fails before any RPC call
    #[tokio::test]
    async fn test_invalid_config_is_fatal() {
        let rpc = MockProgramRpc::new();
        let mut config = fast_config();
        config.weights.inactivity = -1.0;

        let scanner = ProgramScanner::new(Arc::new(rpc), config);
        assert!(scanner.scan(program_id()).await.is_err());
    }

    /// Test that activity lookup failures degrade instead of aborting,
    /// and score as maximal inactivity
    #[tokio::test]
    async fn test_activity_failure_degrades() {
        let program = program_id();
        let address = Pubkey::new_unique();
        let mut rpc = rpc_with_accounts(vec![snapshot(address, 2_000_000)]);
        rpc.expect_last_activity_slot()
            .returning(|_| Err(anyhow!("lookup failed")));

        let mut config = fast_config();
        config.retry_attempts = 2;
        let scanner = ProgramScanner::new(Arc::new(rpc), config);
        let result = scanner.scan(program).await.unwrap();

        let profile = &result.risk_profiles[&address.to_string()];
        assert!(profile.is_dormant());
        assert_eq!(result.summary.dormant_accounts, 1);
    }

    /// Test that the finished result serializes for the report layer
    #[tokio::test]
    async fn test_scan_result_serializes() {
        let program = program_id();
        let mut rpc = rpc_with_accounts(vec![snapshot(Pubkey::new_unique(), 2_000_000)]);
        rpc.expect_last_activity_slot().returning(|_| Ok(None));

        let scanner = ProgramScanner::new(Arc::new(rpc), fast_config());
        let result = scanner.scan(program).await.unwrap();

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("risk_profiles"));
    }

    /// Test the graph cap is honored on large account sets
    #[tokio::test]
    async fn test_graph_cap_applied() {
        let program = program_id();
        let accounts: Vec<AccountSnapshot> = (0..10)
            .map(|_| snapshot(Pubkey::new_unique(), 2_000_000))
            .collect();

        let mut rpc = rpc_with_accounts(accounts);
        rpc.expect_last_activity_slot().returning(|_| Ok(None));

        let mut config = fast_config();
        config.max_graph_nodes = 4;
        let scanner = ProgramScanner::new(Arc::new(rpc), config);
        let result = scanner.scan(program).await.unwrap();

        assert_eq!(result.graph.nodes.len(), 4);
        assert_eq!(result.graph.nodes[0].kind, NodeKind::Program);
        // Profiles are never filtered, only the presentation graph is
        assert_eq!(result.risk_profiles.len(), 10);
    }
}

// External imports
use solana_program::pubkey::Pubkey;

// Standard library imports
use std::collections::{HashMap, HashSet};

// Internal imports
use audit_common::prelude::*;

/// Derive authority edges from the classified account set.
///
/// One Owner edge per account whose owner differs from itself — current
/// ownership is definitionally active. One Signer edge per successfully
/// classified PDA, since the program can sign for it via the recovered
/// seeds.
pub fn map_authorities(program: &Pubkey, accounts: &[ClassifiedAccount]) -> Vec<AuthorityEdge> {
    let mut edges = Vec::new();

    for classified in accounts {
        let account = &classified.account;
        if account.owner != account.address {
            edges.push(AuthorityEdge {
                account_address: account.address,
                authority_address: account.owner,
                privilege: Privilege::Owner,
                is_active: true,
            });
        }
        if classified.is_pda && classified.derivation_seeds.is_some() {
            edges.push(AuthorityEdge {
                account_address: account.address,
                authority_address: *program,
                privilege: Privilege::Signer,
                is_active: true,
            });
        }
    }

    edges
}

/// Edges whose authority is absent from the current account set and is not
/// the program itself. These are dangling/legacy authorities: reported,
/// never auto-removed.
pub fn detect_legacy(
    program: &Pubkey,
    edges: &[AuthorityEdge],
    accounts: &[ClassifiedAccount],
) -> Vec<AuthorityEdge> {
    let present: HashSet<Pubkey> = accounts
        .iter()
        .map(|classified| classified.account.address)
        .collect();

    edges
        .iter()
        .filter(|edge| {
            edge.authority_address != *program && !present.contains(&edge.authority_address)
        })
        .cloned()
        .collect()
}

/// Depth-bounded trace of ownership chains starting at `start`, following
/// Owner edges backward (account to its owner) and branching over multiple
/// owners. A branch terminates when its depth is exhausted, no further
/// owner edge exists, or extending it would revisit an address already in
/// that chain. Iterative with an explicit work list; the chain itself
/// serves as the per-branch visited set.
pub fn build_authority_chains(
    start: &Pubkey,
    edges: &[AuthorityEdge],
    max_depth: usize,
) -> Vec<Vec<Pubkey>> {
    let mut owners: HashMap<Pubkey, Vec<Pubkey>> = HashMap::new();
    for edge in edges {
        if edge.privilege == Privilege::Owner {
            owners
                .entry(edge.account_address)
                .or_default()
                .push(edge.authority_address);
        }
    }

    let mut chains = Vec::new();
    let mut work: Vec<Vec<Pubkey>> = vec![vec![*start]];

    while let Some(chain) = work.pop() {
        let Some(&tip) = chain.last() else {
            continue;
        };
        let hops = chain.len() - 1;

        let mut extended = false;
        if hops < max_depth {
            if let Some(next) = owners.get(&tip) {
                for owner in next {
                    if !chain.contains(owner) {
                        let mut branch = chain.clone();
                        branch.push(*owner);
                        work.push(branch);
                        extended = true;
                    }
                }
            }
        }

        if !extended {
            chains.push(chain);
        }
    }

    chains
}

// External imports
use solana_program::pubkey::Pubkey;

// Standard library imports
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

// Internal imports
use audit_common::prelude::*;

/// Compose the relationship graph: one synthetic node for the program,
/// one node per classified account, and edges for ownership, recovered
/// PDA derivations, and third-party authorities.
pub fn assemble_graph(
    program: &Pubkey,
    accounts: &[ClassifiedAccount],
    profiles: &BTreeMap<String, RiskProfile>,
    authority_edges: &[AuthorityEdge],
) -> RelationshipGraph {
    let program_id = program.to_string();
    let mut nodes = Vec::with_capacity(accounts.len() + 1);
    nodes.push(GraphNode {
        id: program_id.clone(),
        label: "program".to_string(),
        kind: NodeKind::Program,
        is_pda: false,
        risk_level: None,
        confidence_score: None,
    });

    let mut edges = Vec::new();

    for classified in accounts {
        let account = &classified.account;
        let id = account.address.to_string();
        // Risk reference is absent when scoring was skipped for this account
        let profile = profiles.get(&id);
        nodes.push(GraphNode {
            id: id.clone(),
            label: short_label(&id),
            kind: NodeKind::Account,
            is_pda: classified.is_pda,
            risk_level: profile.map(|p| p.risk_level),
            confidence_score: profile.map(|p| p.confidence_score),
        });

        if account.owner == *program {
            edges.push(GraphEdge {
                from: program_id.clone(),
                to: id.clone(),
                relation: EdgeRelation::Owns,
                is_active: true,
            });
        }
        if classified.is_pda && classified.derivation_seeds.is_some() {
            edges.push(GraphEdge {
                from: program_id.clone(),
                to: id.clone(),
                relation: EdgeRelation::DerivedFrom,
                is_active: true,
            });
        }
    }

    // Third-party authorities only; program ownership/signing is already
    // covered by the edges above.
    for edge in authority_edges {
        if edge.authority_address != *program {
            edges.push(GraphEdge {
                from: edge.authority_address.to_string(),
                to: edge.account_address.to_string(),
                relation: EdgeRelation::Authority,
                is_active: edge.is_active,
            });
        }
    }

    RelationshipGraph { nodes, edges }
}

/// Size-bounded filtering for visualization. At or under the cap the
/// graph passes through untouched. Over the cap the program node is always
/// retained, the rest are stable-sorted by descending confidence and cut
/// to `cap - 1`, and edges with a dropped endpoint are removed. Lossy by
/// design, and presentation-only: the profile set is never filtered.
pub fn filter_graph(graph: RelationshipGraph, max_nodes: usize) -> RelationshipGraph {
    if graph.nodes.len() <= max_nodes {
        return graph;
    }

    let mut program_node = None;
    let mut rest = Vec::with_capacity(graph.nodes.len());
    for node in graph.nodes {
        if node.kind == NodeKind::Program && program_node.is_none() {
            program_node = Some(node);
        } else {
            rest.push(node);
        }
    }

    // Stable sort: ties keep their original order
    rest.sort_by(|a, b| {
        let a_score = a.confidence_score.unwrap_or(0.0);
        let b_score = b.confidence_score.unwrap_or(0.0);
        b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal)
    });
    rest.truncate(max_nodes.saturating_sub(1));

    let mut nodes = Vec::with_capacity(max_nodes);
    nodes.extend(program_node);
    nodes.extend(rest);

    let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .into_iter()
        .filter(|e| kept.contains(e.from.as_str()) && kept.contains(e.to.as_str()))
        .collect();

    RelationshipGraph { nodes, edges }
}

/// Truncated base58 label for display
fn short_label(id: &str) -> String {
    if id.len() <= 8 {
        id.to_string()
    } else {
        format!("{}..{}", &id[..4], &id[id.len() - 4..])
    }
}

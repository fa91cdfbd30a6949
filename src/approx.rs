//! Polynomial-time approximations of the extension search.
//!
//! Two complementary strategies: seed-grown greedy mappings ranked and
//! merged after the fact, and an assignment-solver loop that commits edges
//! into a working copy so later copies can reuse them. Neither guarantees
//! optimality; both stay polynomial where the exact sweep explodes.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use crate::heuristic::{self, HeuristicType};
use crate::{hungarian, to_edge_list, Edge, EdgeMap, Multigraph};

/// A complete pattern-to-target mapping grown from one seed pair, with the
/// edge additions it would require against the original target.
struct SeedConfiguration {
    total_cost: usize,
    cost_matrix: Vec<Vec<u8>>,
    mapping: Vec<usize>,
}

/// Greedy seed-growth approximation.
///
/// Grows one configuration per (pattern vertex, target vertex) seed pair,
/// ranks all of them by cost, then accepts the cheapest ones whose target
/// vertices are disjoint from every previously accepted configuration,
/// stopping at `copies`. Accepted cost matrices are merged cell-wise by
/// maximum, so overlapping requirements are only paid once.
pub fn run_greedy_seed(copies: usize, pattern: &Multigraph, target: &Multigraph) -> Vec<Edge> {
    let k = pattern.vertex_count();
    let num_targets = target.vertex_count();
    if k == 0 || k > num_targets {
        return Vec::new();
    }

    let configurations: Vec<SeedConfiguration> = (0..k * num_targets)
        .into_par_iter()
        .map(|seed| grow_seed(pattern, target, seed / num_targets, seed % num_targets))
        .collect();
    debug!(
        "seed growth: ranked {} configurations",
        configurations.len()
    );

    let mut used = vec![false; num_targets];
    let mut accepted: Vec<SeedConfiguration> = Vec::with_capacity(copies);
    for configuration in configurations
        .into_iter()
        .sorted_by_key(|c| c.total_cost)
    {
        if accepted.len() >= copies {
            break;
        }
        if configuration.mapping.iter().any(|&g| used[g]) {
            continue;
        }
        for &g in &configuration.mapping {
            used[g] = true;
        }
        accepted.push(configuration);
    }
    info!(
        "seed growth: accepted {} of {} requested copies",
        accepted.len(),
        copies
    );

    let mut merged = EdgeMap::new();
    for configuration in &accepted {
        for (i, row) in configuration.cost_matrix.iter().enumerate() {
            for (j, &needed) in row.iter().enumerate() {
                if needed > 0 {
                    let slot = merged.entry((i, j)).or_insert(0);
                    if needed > *slot {
                        *slot = needed;
                    }
                }
            }
        }
    }
    to_edge_list(&merged)
}

/// Grow a full mapping from the seed pair by repeatedly attaching the
/// unmapped (pattern, target) vertex pair with the smallest bidirectional
/// deficit against everything mapped so far.
fn grow_seed(
    pattern: &Multigraph,
    target: &Multigraph,
    seed_pattern: usize,
    seed_target: usize,
) -> SeedConfiguration {
    let k = pattern.vertex_count();
    let num_targets = target.vertex_count();

    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut used_targets: HashSet<usize> = HashSet::new();
    mapping.insert(seed_pattern, seed_target);
    used_targets.insert(seed_target);

    while mapping.len() < k {
        let mut best: Option<(usize, usize)> = None;
        let mut best_cost = usize::MAX;
        for v1 in 0..k {
            if mapping.contains_key(&v1) {
                continue;
            }
            for v2 in 0..num_targets {
                if used_targets.contains(&v2) {
                    continue;
                }
                let cost = attachment_cost(pattern, target, &mapping, v1, v2);
                if cost < best_cost {
                    best_cost = cost;
                    best = Some((v1, v2));
                }
            }
        }
        // k <= num_targets guarantees a free target vertex remains
        let (v1, v2) = best.expect("unmapped pair available");
        mapping.insert(v1, v2);
        used_targets.insert(v2);
    }

    let mut cost_matrix = vec![vec![0u8; num_targets]; num_targets];
    let mut total_cost = 0usize;
    for i in 0..k {
        for j in 0..k {
            let gi = mapping[&i];
            let gj = mapping[&j];
            let required = pattern.edges(i, j);
            let present = target.edges(gi, gj);
            if required > present {
                let missing = required - present;
                cost_matrix[gi][gj] = missing;
                total_cost += missing as usize;
            }
        }
    }

    SeedConfiguration {
        total_cost,
        cost_matrix,
        mapping: (0..k).map(|i| mapping[&i]).collect(),
    }
}

/// Deficit incurred by extending the partial mapping with v1 -> v2, summed
/// over both edge directions against every already-mapped pair.
fn attachment_cost(
    pattern: &Multigraph,
    target: &Multigraph,
    mapping: &HashMap<usize, usize>,
    v1: usize,
    v2: usize,
) -> usize {
    let mut cost = 0usize;
    for (&m1, &m2) in mapping.iter() {
        let forward = pattern.edges(m1, v1).saturating_sub(target.edges(m2, v2));
        let backward = pattern.edges(v1, m1).saturating_sub(target.edges(v2, m2));
        cost += forward as usize + backward as usize;
    }
    cost
}

/// Assignment-based approximation.
///
/// Walks the first `copies` k-combinations of the target's vertices in
/// lexicographic order. For each subset it scores the candidate vertices
/// with the selected heuristic against the current working copy, lets the
/// assignment solver pick the bijection, then writes every deficit into the
/// working copy so later copies see (and reuse) edges committed by earlier
/// ones.
pub fn run_assignment(
    copies: usize,
    pattern: &Multigraph,
    target: &Multigraph,
    heuristic: HeuristicType,
) -> Vec<Edge> {
    let k = pattern.vertex_count();
    let mut working = target.clone();
    let mut required = EdgeMap::new();

    for subset in target.combinations(k).take(copies) {
        let weights = heuristic::create_weight_matrix(pattern, &working, &subset, heuristic);
        let assignment = hungarian::solve(&weights);

        for u in 0..k {
            for v in 0..k {
                let g_source = subset[assignment[u]];
                let g_destination = subset[assignment[v]];
                let needed = pattern.edges(u, v);
                let present = working.edges(g_source, g_destination);
                if needed > present {
                    let missing = needed - present;
                    working.ensure_edges(g_source, g_destination, needed);
                    let slot = required.entry((g_source, g_destination)).or_insert(0);
                    if missing > *slot {
                        *slot = missing;
                    }
                }
            }
        }
    }

    info!(
        "assignment search ({}): {} distinct edges required",
        heuristic,
        required.len()
    );
    to_edge_list(&required)
}

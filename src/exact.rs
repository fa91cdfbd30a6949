//! Exact extension search.
//!
//! Two-phase batch algorithm: precompute the missing edges of every single
//! embedding, then sweep all ways of picking n vertex-distinct embeddings,
//! sharing added edges between copies by max-merge. Guarantees the optimal
//! total but costs O(C(|V_G|, k) * k!) per phase-1 table and an exponential
//! phase-2 sweep; practical only for small patterns and copy counts.

use std::sync::Mutex;

use log::{debug, info};
use rayon::prelude::*;

use crate::iter::{Combinations, Sequences};
use crate::{to_edge_list, Edge, EdgeMap, Multigraph};

/// Missing edges per embedding, indexed [permutation rank][combination rank].
type MissingEdgeTable = Vec<Vec<Vec<Edge>>>;

/// Find the smallest edge addition that gives `target` `copies`
/// vertex-distinct embeddings of `pattern`.
///
/// An empty result means no extension is needed; it is also returned when
/// no configuration of `copies` distinct target subsets exists (the
/// feasibility precondition is the caller's to check).
pub fn run(copies: usize, pattern: &Multigraph, target: &Multigraph) -> Vec<Edge> {
    let table = compute_missing_edges(pattern, target);
    find_minimal_extension(copies, &table)
}

/// Phase 1: for every (permutation of pattern vertices, k-subset of target
/// vertices), record how many edges each pattern pair lacks in the target.
fn compute_missing_edges(pattern: &Multigraph, target: &Multigraph) -> MissingEdgeTable {
    let k = pattern.vertex_count();
    let num_combs = target.combinations_count(k) as usize;

    let mut table = Vec::new();
    for perm in pattern.permutations() {
        let mut row = Vec::with_capacity(num_combs);
        for comb in target.combinations(k) {
            let mut missing = Vec::new();
            for i in 0..k {
                for j in 0..k {
                    let required = pattern.edges(perm[i], perm[j]);
                    let present = target.edges(comb[i], comb[j]);
                    if required > present {
                        missing.push(Edge::new(comb[i], comb[j], required - present));
                    }
                }
            }
            row.push(missing);
        }
        table.push(row);
    }

    debug!(
        "missing-edge table: {} permutations x {} combinations",
        table.len(),
        table.first().map_or(0, |row| row.len())
    );
    table
}

/// Phase 2: sweep every choice of `copies` distinct combination ranks
/// crossed with every sequence of permutation ranks, max-merging the copies'
/// edge requirements, and keep the cheapest configuration.
fn find_minimal_extension(copies: usize, table: &MissingEdgeTable) -> Vec<Edge> {
    let num_perms = table.len();
    let num_combs = table.first().map_or(0, |row| row.len());
    if num_combs == 0 {
        return Vec::new();
    }

    // Best (total cost, edge list) found so far; both fields live under a
    // single lock.
    let best: Mutex<(usize, Vec<Edge>)> = Mutex::new((usize::MAX, Vec::new()));

    Combinations::new(num_combs, copies)
        .par_bridge()
        .for_each(|subsets| {
            let mut merged = EdgeMap::new();
            for perms in Sequences::new(num_perms, copies) {
                merged.clear();
                let bound = best.lock().unwrap().0;
                let mut running = 0usize;
                let mut abandoned = false;

                for copy in 0..copies {
                    for edge in &table[perms[copy]][subsets[copy]] {
                        let slot = merged.entry((edge.source, edge.destination)).or_insert(0);
                        if edge.count > *slot {
                            // only the increase over what earlier copies
                            // already demanded is new cost
                            running += (edge.count - *slot) as usize;
                            *slot = edge.count;
                        }
                    }
                    if running >= bound {
                        abandoned = true;
                        break;
                    }
                }
                if abandoned {
                    continue;
                }

                let edges = to_edge_list(&merged);
                let mut guard = best.lock().unwrap();
                if running < guard.0 {
                    *guard = (running, edges);
                }
            }
        });

    let (cost, edges) = best.into_inner().unwrap();
    if cost == usize::MAX {
        return Vec::new();
    }
    info!("exact search: minimal extension adds {} edges", cost);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::total_edge_count;

    fn graph(rows: Vec<Vec<u8>>) -> Multigraph {
        Multigraph::from_adjacency(rows).unwrap()
    }

    #[test]
    fn single_missing_edge() {
        let pattern = graph(vec![vec![0, 1], vec![0, 0]]);
        let target = Multigraph::new(2);
        let result = run(1, &pattern, &target);
        assert_eq!(result, vec![Edge::new(0, 1, 1)]);
    }

    #[test]
    fn identical_graphs_need_nothing() {
        let rows = vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]];
        let pattern = graph(rows.clone());
        let target = graph(rows);
        assert!(run(1, &pattern, &target).is_empty());
    }

    #[test]
    fn two_disjoint_copies_cost_two() {
        let pattern = graph(vec![vec![0, 1], vec![0, 0]]);
        let target = Multigraph::new(3);
        let result = run(2, &pattern, &target);
        // two vertex-distinct single-edge embeddings in a 3-vertex target
        // always overlap in one vertex but never in an edge
        assert_eq!(total_edge_count(&result), 2);
    }

    #[test]
    fn overlapping_requirements_share_by_max() {
        // both pattern edges live on one vertex pair; two embeddings into a
        // 4-vertex empty target can land them on the same target pair, so
        // the optimum is 5 added edges, not 10
        let pattern = graph(vec![vec![0, 3, 0], vec![2, 0, 0], vec![0, 0, 0]]);
        let target = Multigraph::new(4);
        let result = run(2, &pattern, &target);
        assert_eq!(total_edge_count(&result), 5);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn sharing_reuses_existing_edges() {
        // the target already carries the triple edge on (1, 0), so every
        // optimal configuration orients both copies to reuse it and only the
        // double edge on (0, 1) is ever added, once
        let pattern = graph(vec![vec![0, 3, 0], vec![2, 0, 0], vec![0, 0, 0]]);
        let mut target = Multigraph::new(4);
        target.add_edges(1, 0, 3).unwrap();
        let result = run(2, &pattern, &target);
        assert_eq!(total_edge_count(&result), 2);
        assert_eq!(result, vec![Edge::new(0, 1, 2)]);
    }

    #[test]
    fn multiedge_deficits_counted_in_full() {
        let pattern = graph(vec![vec![0, 2, 1], vec![1, 0, 0], vec![0, 1, 0]]);
        let target = graph(vec![vec![0, 1, 0], vec![0, 0, 0], vec![0, 0, 0]]);
        let result = run(1, &pattern, &target);
        // pattern has 5 edges, target contributes at most 1 under the best
        // mapping
        assert_eq!(total_edge_count(&result), 4);
    }

    #[test]
    fn self_loops_participate() {
        let pattern = graph(vec![vec![2, 0], vec![0, 0]]);
        let target = Multigraph::new(2);
        let result = run(1, &pattern, &target);
        assert_eq!(total_edge_count(&result), 2);
        assert!(result
            .iter()
            .all(|edge| edge.source == edge.destination));
    }

    #[test]
    fn infeasible_copy_count_degrades_to_empty() {
        let pattern = graph(vec![vec![0, 1], vec![0, 0]]);
        let target = Multigraph::new(2);
        // only one 2-subset exists, so two vertex-distinct copies cannot
        assert!(run(2, &pattern, &target).is_empty());
    }

    #[test]
    fn empty_pattern_needs_nothing() {
        let pattern = Multigraph::new(0);
        let target = Multigraph::new(3);
        assert!(run(1, &pattern, &target).is_empty());
    }
}

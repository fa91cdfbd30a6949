//! Vertex-similarity heuristics for the assignment-based search.
//!
//! Every builder returns a k x k matrix of non-negative scores where
//! `matrix[i][j]` estimates the penalty of mapping pattern vertex `i` onto
//! target vertex `subset[j]`; lower is better. The assignment solver turns
//! the matrix into a pattern-to-subset bijection.

use std::str::FromStr;

use crate::Multigraph;

/// k x k dissimilarity matrix consumed by the assignment solver.
pub type WeightMatrix = Vec<Vec<f64>>;

/// Selector for the six interchangeable cost functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeuristicType {
    #[default]
    DegreeDifference,
    DirectedDegree,
    DirectedDegreeIgnoreSurplus,
    NeighborHistogram,
    StructureMatching,
    GreedyNeighbor,
}

impl FromStr for HeuristicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "degree" => Ok(HeuristicType::DegreeDifference),
            "directed" => Ok(HeuristicType::DirectedDegree),
            "directed_ignore" => Ok(HeuristicType::DirectedDegreeIgnoreSurplus),
            "histogram" => Ok(HeuristicType::NeighborHistogram),
            "structure" => Ok(HeuristicType::StructureMatching),
            "greedy" => Ok(HeuristicType::GreedyNeighbor),
            _ => Err(format!(
                "unknown heuristic: {}. Use degree, directed, directed_ignore, histogram, \
                 structure or greedy",
                s
            )),
        }
    }
}

impl std::fmt::Display for HeuristicType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HeuristicType::DegreeDifference => "degree",
            HeuristicType::DirectedDegree => "directed",
            HeuristicType::DirectedDegreeIgnoreSurplus => "directed_ignore",
            HeuristicType::NeighborHistogram => "histogram",
            HeuristicType::StructureMatching => "structure",
            HeuristicType::GreedyNeighbor => "greedy",
        };
        f.write_str(name)
    }
}

/// Build the cost matrix for mapping `pattern` onto the ordered `subset` of
/// `target`'s vertices with the selected heuristic.
pub fn create_weight_matrix(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
    heuristic: HeuristicType,
) -> WeightMatrix {
    match heuristic {
        HeuristicType::DegreeDifference => degree_difference(pattern, target, subset),
        HeuristicType::DirectedDegree => directed_degree(pattern, target, subset),
        HeuristicType::DirectedDegreeIgnoreSurplus => {
            directed_degree_ignore_surplus(pattern, target, subset)
        }
        HeuristicType::NeighborHistogram => neighbor_histogram(pattern, target, subset),
        HeuristicType::StructureMatching => structure_matching(pattern, target, subset),
        HeuristicType::GreedyNeighbor => greedy_neighbor(pattern, target, subset),
    }
}

fn abs_diff(a: usize, b: usize) -> f64 {
    a.abs_diff(b) as f64
}

fn deficit(required: usize, available: usize) -> f64 {
    required.saturating_sub(available) as f64
}

/// Absolute difference of total degrees.
pub fn degree_difference(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
) -> WeightMatrix {
    let k = pattern.vertex_count();
    let pattern_degrees = pattern.degrees();
    let target_degrees = target.degrees();

    (0..k)
        .map(|i| {
            subset
                .iter()
                .map(|&g| abs_diff(pattern_degrees[i], target_degrees[g]))
                .collect()
        })
        .collect()
}

/// In- and out-degree differences, both counted in full.
pub fn directed_degree(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
) -> WeightMatrix {
    let k = pattern.vertex_count();
    let pattern_in = pattern.in_degrees();
    let pattern_out = pattern.out_degrees();
    let target_in = target.in_degrees();
    let target_out = target.out_degrees();

    (0..k)
        .map(|i| {
            subset
                .iter()
                .map(|&g| abs_diff(pattern_in[i], target_in[g]) + abs_diff(pattern_out[i], target_out[g]))
                .collect()
        })
        .collect()
}

/// Like [`directed_degree`] but surplus capacity in the target is free:
/// only the shortfall on each side is penalized.
pub fn directed_degree_ignore_surplus(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
) -> WeightMatrix {
    let k = pattern.vertex_count();
    let pattern_in = pattern.in_degrees();
    let pattern_out = pattern.out_degrees();
    let target_in = target.in_degrees();
    let target_out = target.out_degrees();

    (0..k)
        .map(|i| {
            subset
                .iter()
                .map(|&g| {
                    deficit(pattern_in[i], target_in[g]) + deficit(pattern_out[i], target_out[g])
                })
                .collect()
        })
        .collect()
}

/// L1 distance between per-vertex neighborhood histograms.
///
/// A vertex's histogram is indexed by the total degree of each of its
/// combined neighbors, and each neighbor contributes its edge multiplicity
/// to its degree's bucket.
pub fn neighbor_histogram(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
) -> WeightMatrix {
    let k = pattern.vertex_count();
    let pattern_degrees = pattern.degrees();
    let target_degrees = target.degrees();
    let max_degree = pattern_degrees
        .iter()
        .chain(target_degrees.iter())
        .copied()
        .max()
        .unwrap_or(0);

    let histogram = |graph: &Multigraph, degrees: &[usize], v: usize| {
        let mut buckets = vec![0usize; max_degree + 1];
        for (neighbor, multiplicity) in graph.neighbors(v) {
            buckets[degrees[neighbor]] += multiplicity;
        }
        buckets
    };

    let mut matrix = vec![vec![0.0; k]; k];
    for i in 0..k {
        let pattern_hist = histogram(pattern, &pattern_degrees, i);
        for (j, &g) in subset.iter().enumerate() {
            let target_hist = histogram(target, &target_degrees, g);
            matrix[i][j] = pattern_hist
                .iter()
                .zip(target_hist.iter())
                .map(|(&a, &b)| abs_diff(a, b))
                .sum();
        }
    }
    matrix
}

/// Directed triangle participation of every vertex, by direct 2-hop
/// enumeration: all closed walks v -> m -> j -> v.
fn triangle_counts(graph: &Multigraph) -> Vec<usize> {
    let v = graph.vertex_count();
    let mut triangles = vec![0usize; v];
    for i in 0..v {
        for j in 0..v {
            if graph.edges(j, i) == 0 {
                continue;
            }
            let two_hop: usize = (0..v)
                .map(|m| graph.edges(i, m) as usize * graph.edges(m, j) as usize)
                .sum();
            triangles[i] += two_hop;
        }
    }
    triangles
}

/// Equal-weight blend of degree difference and triangle deficit.
pub fn structure_matching(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
) -> WeightMatrix {
    let k = pattern.vertex_count();
    let pattern_degrees = pattern.degrees();
    let target_degrees = target.degrees();
    let pattern_triangles = triangle_counts(pattern);
    let target_triangles = triangle_counts(target);

    (0..k)
        .map(|i| {
            subset
                .iter()
                .map(|&g| {
                    0.5 * abs_diff(pattern_degrees[i], target_degrees[g])
                        + 0.5 * deficit(pattern_triangles[i], target_triangles[g])
                })
                .collect()
        })
        .collect()
}

/// Greedy pairing of out-neighborhoods.
///
/// Each pattern out-neighbor takes the cheapest still-unused target
/// out-neighbor by total-degree difference; neighbors left over on either
/// side are penalized by their own total degree.
pub fn greedy_neighbor(
    pattern: &Multigraph,
    target: &Multigraph,
    subset: &[usize],
) -> WeightMatrix {
    let k = pattern.vertex_count();
    let pattern_degrees = pattern.degrees();
    let target_degrees = target.degrees();

    let mut matrix = vec![vec![0.0; k]; k];
    for i in 0..k {
        let pattern_neighbors = pattern.out_neighbors(i);
        for (j, &g) in subset.iter().enumerate() {
            let target_neighbors = target.out_neighbors(g);
            matrix[i][j] = greedy_pairing_cost(
                &pattern_neighbors,
                &target_neighbors,
                &pattern_degrees,
                &target_degrees,
            );
        }
    }
    matrix
}

fn greedy_pairing_cost(
    pattern_neighbors: &[(usize, usize)],
    target_neighbors: &[(usize, usize)],
    pattern_degrees: &[usize],
    target_degrees: &[usize],
) -> f64 {
    let mut used = vec![false; target_neighbors.len()];
    let mut cost = 0.0;

    for &(p_vertex, _) in pattern_neighbors {
        let mut best: Option<usize> = None;
        let mut best_cost = f64::INFINITY;
        for (idx, &(g_vertex, _)) in target_neighbors.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let pair_cost = abs_diff(pattern_degrees[p_vertex], target_degrees[g_vertex]);
            if pair_cost < best_cost {
                best_cost = pair_cost;
                best = Some(idx);
            }
        }
        match best {
            Some(idx) => {
                used[idx] = true;
                cost += best_cost;
            }
            None => cost += pattern_degrees[p_vertex] as f64,
        }
    }

    for (idx, &(g_vertex, _)) in target_neighbors.iter().enumerate() {
        if !used[idx] {
            cost += target_degrees[g_vertex] as f64;
        }
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Multigraph {
        // 0 -> 1 (x2), 1 -> 2
        Multigraph::from_adjacency(vec![vec![0, 2, 0], vec![0, 0, 1], vec![0, 0, 0]]).unwrap()
    }

    fn target() -> Multigraph {
        // 0 -> 1, 1 -> 2, 2 -> 0, 3 isolated
        Multigraph::from_adjacency(vec![
            vec![0, 1, 0, 0],
            vec![0, 0, 1, 0],
            vec![1, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap()
    }

    #[test]
    fn degree_difference_values() {
        let matrix = degree_difference(&pattern(), &target(), &[0, 1, 3]);
        // pattern degrees: [2, 3, 1]; target degrees for subset: [2, 2, 0]
        assert_eq!(matrix[0], vec![0.0, 0.0, 2.0]);
        assert_eq!(matrix[1], vec![1.0, 1.0, 3.0]);
        assert_eq!(matrix[2], vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn directed_degree_counts_both_directions() {
        let matrix = directed_degree(&pattern(), &target(), &[3, 1, 2]);
        // pattern vertex 0: in 0, out 2; target vertex 3: in 0, out 0
        assert_eq!(matrix[0][0], 2.0);
        // target vertex 1: in 1, out 1 -> |0-1| + |2-1| = 2
        assert_eq!(matrix[0][1], 2.0);
    }

    #[test]
    fn surplus_is_free_when_ignored() {
        let rich = Multigraph::from_adjacency(vec![vec![0, 3], vec![3, 0]]).unwrap();
        let poor = Multigraph::from_adjacency(vec![vec![0, 1], vec![0, 0]]).unwrap();
        let full = directed_degree(&poor, &rich, &[0, 1]);
        let clamped = directed_degree_ignore_surplus(&poor, &rich, &[0, 1]);
        // the rich target exceeds the pattern everywhere, so deficits vanish
        assert!(full[0][0] > 0.0);
        assert_eq!(clamped[0][0], 0.0);
        assert_eq!(clamped[1][1], 0.0);
    }

    #[test]
    fn neighbor_histogram_identical_vertices_cost_zero() {
        let g = target();
        let matrix = neighbor_histogram(&g, &g, &[0, 1, 2, 3]);
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row[i], 0.0);
        }
    }

    #[test]
    fn neighbor_histogram_weights_by_multiplicity() {
        // vertex 0 has one neighbor of degree 3 reached with multiplicity 2
        let p = pattern();
        let hist_cost = neighbor_histogram(&p, &p, &[0, 1, 2]);
        assert_eq!(hist_cost[0][0], 0.0);
        assert!(hist_cost[0][2] > 0.0);
    }

    #[test]
    fn triangle_counts_on_directed_cycle() {
        // 0 -> 1 -> 2 -> 0 gives every vertex one closed 3-walk
        let cycle =
            Multigraph::from_adjacency(vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]).unwrap();
        assert_eq!(triangle_counts(&cycle), vec![1, 1, 1]);
        let acyclic = pattern();
        assert_eq!(triangle_counts(&acyclic), vec![0, 0, 0]);
    }

    #[test]
    fn structure_matching_blends_degree_and_triangles() {
        let cycle =
            Multigraph::from_adjacency(vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]).unwrap();
        let empty = Multigraph::new(3);
        let matrix = structure_matching(&cycle, &empty, &[0, 1, 2]);
        // degree diff 2, triangle deficit 1 -> 0.5 * 2 + 0.5 * 1
        assert_eq!(matrix[0][0], 1.5);
    }

    #[test]
    fn greedy_neighbor_empty_neighborhoods_match_free() {
        let empty = Multigraph::new(2);
        let matrix = greedy_neighbor(&empty, &empty, &[0, 1]);
        assert_eq!(matrix, vec![vec![0.0; 2]; 2]);
    }

    #[test]
    fn greedy_neighbor_penalizes_unmatched() {
        let p = pattern();
        let empty = Multigraph::new(4);
        let matrix = greedy_neighbor(&p, &empty, &[0, 1, 2]);
        // pattern vertex 0's only out-neighbor (degree 3) has no partner
        assert_eq!(matrix[0][0], 3.0);
        // pattern vertex 2 has no out-neighbors and neither does the target
        assert_eq!(matrix[2][0], 0.0);
    }

    #[test]
    fn dispatcher_and_selector_round_trip() {
        for name in [
            "degree",
            "directed",
            "directed_ignore",
            "histogram",
            "structure",
            "greedy",
        ] {
            let heuristic: HeuristicType = name.parse().unwrap();
            assert_eq!(heuristic.to_string(), name);
            let matrix = create_weight_matrix(&pattern(), &target(), &[0, 1, 2], heuristic);
            assert_eq!(matrix.len(), 3);
            assert!(matrix.iter().flatten().all(|&c| c >= 0.0));
        }
        assert!("voronoi".parse::<HeuristicType>().is_err());
        assert_eq!(HeuristicType::default(), HeuristicType::DegreeDifference);
    }
}

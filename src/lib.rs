use std::collections::BTreeMap;

pub mod approx;
pub mod error;
pub mod exact;
pub mod heuristic;
pub mod hungarian;
pub mod iter;
pub mod parser;

pub use error::GraphError;

use crate::iter::{count_combinations, count_permutations, Combinations, Permutations};

/// In/out degree pair of a single vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Degree {
    pub in_degree: usize,
    pub out_degree: usize,
}

impl Degree {
    pub fn total(&self) -> usize {
        self.in_degree + self.out_degree
    }
}

/// A required multiplicity increase on one directed vertex pair.
///
/// Produced only by the search algorithms; `count` is the number of parallel
/// edges to add on top of whatever the target graph already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: usize,
    pub destination: usize,
    pub count: u8,
}

impl Edge {
    pub fn new(source: usize, destination: usize, count: u8) -> Self {
        Edge {
            source,
            destination,
            count,
        }
    }
}

/// Max-merge map from (source, destination) to required multiplicity.
///
/// Ordered keys keep merge results and emitted edge lists deterministic.
pub type EdgeMap = BTreeMap<(usize, usize), u8>;

/// Flatten an edge map into an edge list, ascending by (source, destination).
pub fn to_edge_list(map: &EdgeMap) -> Vec<Edge> {
    map.iter()
        .map(|(&(source, destination), &count)| Edge::new(source, destination, count))
        .collect()
}

/// Total number of edges an edge list asks to add.
pub fn total_edge_count(edges: &[Edge]) -> usize {
    edges.iter().map(|e| e.count as usize).sum()
}

/// Directed multigraph over a fixed vertex set {0, .., V-1}.
///
/// `adj[i][j]` holds the number of parallel edges i -> j, capped at
/// `u8::MAX`. The shape is immutable after construction; only edge
/// multiplicities change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multigraph {
    vertex_count: usize,
    edge_count: usize,
    adj: Vec<Vec<u8>>,
}

impl Multigraph {
    /// An edgeless graph with the given number of vertices.
    pub fn new(vertices: usize) -> Self {
        Multigraph {
            vertex_count: vertices,
            edge_count: 0,
            adj: vec![vec![0; vertices]; vertices],
        }
    }

    /// Build a graph from a preloaded adjacency table; the edge count is
    /// recomputed from the matrix sum.
    pub fn from_adjacency(adj: Vec<Vec<u8>>) -> Result<Self, GraphError> {
        let vertex_count = adj.len();
        for (row, entries) in adj.iter().enumerate() {
            if entries.len() != vertex_count {
                return Err(GraphError::NotSquare {
                    row,
                    found: entries.len(),
                    expected: vertex_count,
                });
            }
        }
        let edge_count = adj
            .iter()
            .flat_map(|row| row.iter())
            .map(|&w| w as usize)
            .sum();
        Ok(Multigraph {
            vertex_count,
            edge_count,
            adj,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Multiplicity of the directed edge source -> destination.
    pub fn edges(&self, source: usize, destination: usize) -> u8 {
        self.adj[source][destination]
    }

    /// Add `count` parallel edges; fails instead of wrapping past the
    /// 8-bit multiplicity cap.
    pub fn add_edges(
        &mut self,
        source: usize,
        destination: usize,
        count: u8,
    ) -> Result<(), GraphError> {
        let current = self.adj[source][destination];
        let updated = current.checked_add(count).ok_or(GraphError::EdgeOverflow {
            source,
            destination,
            current,
            added: count,
        })?;
        self.adj[source][destination] = updated;
        self.edge_count += count as usize;
        Ok(())
    }

    /// Raise the multiplicity of source -> destination to at least
    /// `required`. Used by searches that grow a working copy in place.
    pub fn ensure_edges(&mut self, source: usize, destination: usize, required: u8) {
        let current = self.adj[source][destination];
        if required > current {
            self.adj[source][destination] = required;
            self.edge_count += (required - current) as usize;
        }
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.adj.iter().map(|row| row[v] as usize).sum()
    }

    pub fn out_degree(&self, v: usize) -> usize {
        self.adj[v].iter().map(|&w| w as usize).sum()
    }

    pub fn degree(&self, v: usize) -> Degree {
        Degree {
            in_degree: self.in_degree(v),
            out_degree: self.out_degree(v),
        }
    }

    /// Total (in + out) degree of every vertex.
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.vertex_count)
            .map(|v| self.in_degree(v) + self.out_degree(v))
            .collect()
    }

    pub fn in_degrees(&self) -> Vec<usize> {
        (0..self.vertex_count).map(|v| self.in_degree(v)).collect()
    }

    pub fn out_degrees(&self) -> Vec<usize> {
        (0..self.vertex_count).map(|v| self.out_degree(v)).collect()
    }

    /// Out-neighbors of `v` as (vertex, multiplicity), ascending by vertex.
    pub fn out_neighbors(&self, v: usize) -> Vec<(usize, usize)> {
        self.adj[v]
            .iter()
            .enumerate()
            .filter(|(_, &w)| w > 0)
            .map(|(u, &w)| (u, w as usize))
            .collect()
    }

    /// In-neighbors of `v` as (vertex, multiplicity), ascending by vertex.
    pub fn in_neighbors(&self, v: usize) -> Vec<(usize, usize)> {
        self.adj
            .iter()
            .enumerate()
            .filter(|(_, row)| row[v] > 0)
            .map(|(u, row)| (u, row[v] as usize))
            .collect()
    }

    /// Combined neighbors of `v`: each adjacent vertex once, with its in and
    /// out multiplicities summed. Ascending by vertex.
    pub fn neighbors(&self, v: usize) -> Vec<(usize, usize)> {
        (0..self.vertex_count)
            .filter_map(|u| {
                let weight = self.adj[v][u] as usize + self.adj[u][v] as usize;
                (weight > 0).then_some((u, weight))
            })
            .collect()
    }

    /// Lazy enumeration of all orderings of this graph's vertices.
    pub fn permutations(&self) -> Permutations {
        Permutations::new(self.vertex_count)
    }

    /// Lazy enumeration of all increasing k-subsets of this graph's vertices.
    pub fn combinations(&self, k: usize) -> Combinations {
        Combinations::new(self.vertex_count, k)
    }

    pub fn permutations_count(&self) -> u64 {
        count_permutations(self.vertex_count)
    }

    pub fn combinations_count(&self, k: usize) -> u64 {
        count_combinations(self.vertex_count, k)
    }

    pub fn adjacency(&self) -> &[Vec<u8>] {
        &self.adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let g = Multigraph::new(3);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.edges(0, 2), 0);
    }

    #[test]
    fn from_adjacency_recomputes_edge_count() {
        let g = Multigraph::from_adjacency(vec![vec![0, 2], vec![1, 0]]).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.edges(0, 1), 2);
        assert_eq!(g.edges(1, 0), 1);
    }

    #[test]
    fn from_adjacency_rejects_ragged_rows() {
        let err = Multigraph::from_adjacency(vec![vec![0, 1], vec![0]]).unwrap_err();
        assert!(matches!(
            err,
            GraphError::NotSquare {
                row: 1,
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn add_edges_updates_count() {
        let mut g = Multigraph::new(2);
        g.add_edges(0, 1, 2).unwrap();
        g.add_edges(0, 1, 1).unwrap();
        assert_eq!(g.edges(0, 1), 3);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn add_edges_rejects_overflow() {
        let mut g = Multigraph::new(2);
        g.add_edges(0, 1, 250).unwrap();
        let err = g.add_edges(0, 1, 10).unwrap_err();
        assert!(matches!(err, GraphError::EdgeOverflow { .. }));
        // failed addition must leave the graph untouched
        assert_eq!(g.edges(0, 1), 250);
        assert_eq!(g.edge_count(), 250);
    }

    #[test]
    fn ensure_edges_only_raises() {
        let mut g = Multigraph::new(2);
        g.ensure_edges(0, 1, 3);
        assert_eq!(g.edges(0, 1), 3);
        assert_eq!(g.edge_count(), 3);
        g.ensure_edges(0, 1, 2);
        assert_eq!(g.edges(0, 1), 3);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn degrees_are_row_and_column_sums() {
        let g = Multigraph::from_adjacency(vec![
            vec![0, 2, 0],
            vec![0, 0, 1],
            vec![3, 0, 0],
        ])
        .unwrap();
        assert_eq!(g.out_degree(0), 2);
        assert_eq!(g.in_degree(0), 3);
        assert_eq!(
            g.degree(2),
            Degree {
                in_degree: 1,
                out_degree: 3
            }
        );
        assert_eq!(g.degrees(), vec![5, 3, 4]);
        assert_eq!(g.in_degrees(), vec![3, 2, 1]);
        assert_eq!(g.out_degrees(), vec![2, 1, 3]);
    }

    #[test]
    fn neighbor_lists_ascending() {
        let g = Multigraph::from_adjacency(vec![
            vec![0, 2, 0],
            vec![0, 0, 1],
            vec![3, 0, 0],
        ])
        .unwrap();
        assert_eq!(g.out_neighbors(0), vec![(1, 2)]);
        assert_eq!(g.in_neighbors(0), vec![(2, 3)]);
        assert_eq!(g.neighbors(0), vec![(1, 2), (2, 3)]);
        assert_eq!(g.neighbors(2), vec![(0, 3), (1, 1)]);
    }

    #[test]
    fn clone_is_independent() {
        let g = Multigraph::from_adjacency(vec![vec![0, 1], vec![0, 0]]).unwrap();
        let mut copy = g.clone();
        copy.add_edges(1, 0, 4).unwrap();
        assert_eq!(g.edges(1, 0), 0);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(copy.edge_count(), 5);
    }

    #[test]
    fn combinatorial_counts() {
        let g = Multigraph::new(5);
        assert_eq!(g.permutations_count(), 120);
        assert_eq!(g.combinations_count(2), 10);
        assert_eq!(g.combinations_count(0), 1);
        assert_eq!(g.combinations_count(6), 0);
    }

    #[test]
    fn edge_list_ordering() {
        let mut map = EdgeMap::new();
        map.insert((2, 0), 1);
        map.insert((0, 1), 3);
        map.insert((0, 0), 2);
        let edges = to_edge_list(&map);
        assert_eq!(
            edges,
            vec![Edge::new(0, 0, 2), Edge::new(0, 1, 3), Edge::new(2, 0, 1)]
        );
        assert_eq!(total_edge_count(&edges), 6);
    }
}

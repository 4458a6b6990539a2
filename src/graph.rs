//! Dependency graph over registered objects.
//!
//! Nodes are registration orders (`0..n`). An edge `dependent -> dependency`
//! states that `dependent` must be wired after `dependency`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A dependency cycle, as node ids with the first node repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub path: Vec<usize>,
}

/// Adjacency-list graph keyed by registration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::DependencyGraph;
///
/// // 0 depends on 1, 1 depends on 2.
/// let mut graph = DependencyGraph::with_capacity(3, 2);
/// graph.add_node();
/// graph.add_node();
/// graph.add_node();
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 2);
///
/// assert_eq!(graph.topological_order().unwrap(), vec![2, 1, 0]);
///
/// graph.add_edge(2, 0);
/// assert_eq!(graph.topological_order().unwrap_err().path, vec![0, 1, 2, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependencies: Vec<Vec<usize>>,
    dependents: Vec<Vec<usize>>,
    edge_count: usize,
    edges_per_node: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the node table; `edges` is spread as a per-node hint.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            dependencies: Vec::with_capacity(nodes),
            dependents: Vec::with_capacity(nodes),
            edge_count: 0,
            edges_per_node: if nodes == 0 { 0 } else { edges.div_ceil(nodes) },
        }
    }

    /// Adds the next node and returns its id.
    pub fn add_node(&mut self) -> usize {
        self.dependencies.push(Vec::with_capacity(self.edges_per_node));
        self.dependents.push(Vec::with_capacity(self.edges_per_node));
        self.dependencies.len() - 1
    }

    /// Ensures nodes `0..count` exist.
    pub fn ensure_nodes(&mut self, count: usize) {
        while self.dependencies.len() < count {
            self.add_node();
        }
    }

    /// Records that `dependent` needs `dependency`. Repeated edges are ignored.
    ///
    /// # Panics
    ///
    /// Panics if either node does not exist.
    pub fn add_edge(&mut self, dependent: usize, dependency: usize) {
        assert!(
            dependent < self.node_count() && dependency < self.node_count(),
            "edge {} -> {} references a missing node",
            dependent,
            dependency
        );
        if self.dependencies[dependent].contains(&dependency) {
            return;
        }
        self.dependencies[dependent].push(dependency);
        self.dependents[dependency].push(dependent);
        self.edge_count += 1;
    }

    pub fn node_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn dependencies_of(&self, node: usize) -> &[usize] {
        self.dependencies.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dependents_of(&self, node: usize) -> &[usize] {
        self.dependents.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Orders nodes so every node follows all of its dependencies.
    ///
    /// Among nodes that are ready at the same time the lowest id comes first,
    /// which makes the order deterministic. Fails with one concrete [`Cycle`]
    /// when no order exists.
    pub fn topological_order(&self) -> Result<Vec<usize>, Cycle> {
        let count = self.node_count();
        let mut pending: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .enumerate()
            .filter(|(_, waiting)| **waiting == 0)
            .map(|(node, _)| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &dependent in &self.dependents[node] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() == count {
            return Ok(order);
        }
        Err(self.find_cycle(&pending))
    }

    // Every node with pending > 0 still waits on another such node, so walking
    // dependency edges inside that set must revisit a node.
    fn find_cycle(&self, pending: &[usize]) -> Cycle {
        let blocked = |node: usize| pending[node] > 0;
        let Some(start) = (0..self.node_count()).find(|&node| blocked(node)) else {
            return Cycle { path: Vec::new() };
        };

        let mut position = vec![usize::MAX; self.node_count()];
        let mut walk = Vec::new();
        let mut current = start;
        loop {
            if position[current] != usize::MAX {
                let mut path = walk[position[current]..].to_vec();
                path.push(current);
                return Cycle { path };
            }
            position[current] = walk.len();
            walk.push(current);
            current = match self.dependencies[current].iter().copied().find(|&next| blocked(next)) {
                Some(next) => next,
                None => return Cycle { path: walk },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: usize, edges: &[(usize, usize)]) -> DependencyGraph {
        let mut graph = DependencyGraph::with_capacity(nodes, edges.len());
        graph.ensure_nodes(nodes);
        for &(from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    #[test]
    fn independent_nodes_keep_registration_order() {
        assert_eq!(graph(4, &[]).topological_order().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn dependencies_come_first_with_lowest_id_ties() {
        // 0 -> 2, 1 -> 2, 3 -> 0
        let order = graph(4, &[(0, 2), (1, 2), (3, 0)]).topological_order().unwrap();
        assert_eq!(order, vec![2, 0, 1, 3]);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let g = graph(2, &[(0, 1), (0, 1)]);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.dependents_of(1), &[0]);
        assert_eq!(g.topological_order().unwrap(), vec![1, 0]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let cycle = graph(2, &[(1, 1)]).topological_order().unwrap_err();
        assert_eq!(cycle.path, vec![1, 1]);
    }

    #[test]
    fn cycle_behind_a_tail_is_reported_without_the_tail() {
        // 0 -> 1 -> 2 -> 3 -> 1
        let cycle = graph(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]).topological_order().unwrap_err();
        assert_eq!(cycle.path, vec![1, 2, 3, 1]);
    }

    #[test]
    fn empty_graph_orders_trivially() {
        assert!(DependencyGraph::new().topological_order().unwrap().is_empty());
    }

    #[test]
    fn unknown_nodes_have_no_neighbours() {
        let g = graph(1, &[]);
        assert!(g.dependencies_of(5).is_empty());
        assert!(g.dependents_of(5).is_empty());
    }
}

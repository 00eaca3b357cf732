// src/graph/coupling.rs
//! Afferent and Efferent coupling computation.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Coupling metrics for a single file node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coupling {
    /// Afferent coupling (fan-in): files that depend ON this file.
    afferent: usize,
    /// Efferent coupling (fan-out): files this file depends ON.
    efferent: usize,
}

impl Coupling {
    #[must_use]
    pub fn new(afferent: usize, efferent: usize) -> Self {
        Self { afferent, efferent }
    }

    /// Instability Index: I = Cₑ / (Cₐ + Cₑ).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn instability(&self) -> f64 {
        let total = self.afferent + self.efferent;
        if total == 0 {
            return 0.0;
        }
        self.efferent as f64 / total as f64
    }

    #[must_use]
    pub fn afferent(&self) -> usize {
        self.afferent
    }

    #[must_use]
    pub fn efferent(&self) -> usize {
        self.efferent
    }
}

/// Computes coupling for every node of a dependency graph.
///
/// Duplicate edges are counted once; self edges are ignored.
pub fn compute_coupling<K, I>(edges: I) -> HashMap<K, Coupling>
where
    K: Eq + Hash + Copy,
    I: IntoIterator<Item = (K, K)>,
{
    let unique: HashSet<(K, K)> = edges.into_iter().filter(|(a, b)| a != b).collect();

    let mut afferent: HashMap<K, usize> = HashMap::new();
    let mut efferent: HashMap<K, usize> = HashMap::new();
    let mut all_nodes: HashSet<K> = HashSet::new();

    for (from, to) in unique {
        all_nodes.insert(from);
        all_nodes.insert(to);

        *efferent.entry(from).or_insert(0) += 1;
        *afferent.entry(to).or_insert(0) += 1;
    }

    all_nodes
        .into_iter()
        .map(|node| {
            let ca = afferent.get(&node).copied().unwrap_or(0);
            let ce = efferent.get(&node).copied().unwrap_or(0);
            (node, Coupling::new(ca, ce))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_coupling() {
        let edges = [("a", "hub"), ("b", "hub"), ("c", "hub"), ("hub", "types")];

        let coupling = compute_coupling(edges);

        let hub = coupling.get("hub").copied().unwrap_or_default();
        assert_eq!(hub.afferent(), 3);
        assert_eq!(hub.efferent(), 1);
        assert!((hub.instability() - 0.25).abs() < f64::EPSILON);

        let a = coupling.get("a").copied().unwrap_or_default();
        assert_eq!(a.afferent(), 0);
        assert_eq!(a.efferent(), 1);
        assert!((a.instability() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_and_self_edges() {
        let edges = [(1, 2), (1, 2), (2, 2)];
        let coupling = compute_coupling(edges);
        assert_eq!(coupling[&1].efferent(), 1);
        assert_eq!(coupling[&2].afferent(), 1);
        assert_eq!(coupling[&2].efferent(), 0);
    }

    #[test]
    fn test_isolated_instability_is_zero() {
        assert!(Coupling::default().instability().abs() < f64::EPSILON);
    }
}

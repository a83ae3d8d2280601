use std::cmp::Ordering;

use crate::graph::node::NodeId;
use crate::states::euclidean_distance;

/// Spatially searchable bag of graph nodes. Queries run over the state
/// vectors recorded at insertion, scanning in insertion order so results
/// are deterministic given an identical insertion history.
#[derive(Clone, Debug)]
pub struct SearchableSet {
    entries: Vec<(NodeId, Vec<f64>)>,
}

impl SearchableSet {
    ///a set always starts from its distinguished initial node
    pub fn new(initial: NodeId, vals: Vec<f64>) -> Self {
        SearchableSet {
            entries: vec![(initial, vals)],
        }
    }

    pub fn initial_node(&self) -> NodeId {
        self.entries[0].0
    }

    pub fn insert(&mut self, id: NodeId, vals: Vec<f64>) {
        self.entries.push((id, vals));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    ///k nearest nodes by state vector distance, ties broken by insertion order
    pub fn knn_search(&self, query: &[f64], k: usize) -> Vec<NodeId> {
        let mut scored: Vec<(f64, usize)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(order, (_, vals))| (euclidean_distance(vals, query), order))
            .collect();
        scored.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        scored
            .into_iter()
            .take(k)
            .map(|(_, order)| self.entries[order].0)
            .collect()
    }

    ///all nodes within `radius` of the query, in insertion order
    pub fn radius_search(&self, query: &[f64], radius: f64) -> Vec<NodeId> {
        self.entries
            .iter()
            .filter(|(_, vals)| euclidean_distance(vals, query) <= radius)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(points: &[f64]) -> SearchableSet {
        let mut set = SearchableSet::new(NodeId(0), vec![points[0]]);
        for (ii, &p) in points.iter().enumerate().skip(1) {
            set.insert(NodeId(ii as u32), vec![p]);
        }
        set
    }

    #[test]
    fn test_initial_node() {
        let set = set_of(&[5., 1., 9.]);
        assert_eq!(set.initial_node(), NodeId(0));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_knn_nearest_first() {
        let set = set_of(&[0., 10., 4., 6.]);
        let found = set.knn_search(&[5.], 3);
        assert_eq!(found, vec![NodeId(2), NodeId(3), NodeId(0)]);
    }

    #[test]
    fn test_knn_ties_break_by_insertion_order() {
        let set = set_of(&[4., 6., 5.]);
        //nodes 0 and 1 are equidistant from the query
        let found = set.knn_search(&[5.], 3);
        assert_eq!(found, vec![NodeId(2), NodeId(0), NodeId(1)]);
    }

    #[test]
    fn test_knn_with_k_beyond_len() {
        let set = set_of(&[1., 2.]);
        assert_eq!(set.knn_search(&[0.], 10).len(), 2);
    }

    #[test]
    fn test_radius_search_inclusive() {
        let set = set_of(&[0., 2., 5., -2.]);
        let found = set.radius_search(&[0.], 2.);
        assert_eq!(found, vec![NodeId(0), NodeId(1), NodeId(3)]);
    }

    #[test]
    fn test_queries_deterministic() {
        let a = set_of(&[3., 1., 4., 1.5, 9.]);
        let b = set_of(&[3., 1., 4., 1.5, 9.]);
        assert_eq!(a.knn_search(&[2.], 4), b.knn_search(&[2.], 4));
        assert_eq!(a.radius_search(&[2.], 1.5), b.radius_search(&[2.], 1.5));
    }
}

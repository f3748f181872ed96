use crate::instance::DistanceMatrix;
use crate::tour::Tour;
use ordered_float::OrderedFloat;

/// Greedy Nearest Neighbor construction
///
/// Builds a tour by repeatedly visiting the nearest unvisited node.
/// Ties go to the lowest node index.
pub struct NearestNeighborHeuristic {
    pub start: usize,
}

impl NearestNeighborHeuristic {
    pub fn new(start: usize) -> Self {
        NearestNeighborHeuristic { start }
    }

    fn find_nearest(
        &self,
        distances: &DistanceMatrix,
        current: usize,
        visited: &[bool],
    ) -> Option<usize> {
        (0..distances.n())
            .filter(|&n| !visited[n])
            .min_by_key(|&n| OrderedFloat(distances.distance(current, n)))
    }

    /// Build the tour. `start` must be a valid node index.
    pub fn construct(&self, distances: &DistanceMatrix) -> Tour {
        let n = distances.n();
        debug_assert!(self.start < n);

        let mut tour = Vec::with_capacity(n);
        let mut visited = vec![false; n];

        tour.push(self.start);
        visited[self.start] = true;
        let mut current = self.start;

        while let Some(next) = self.find_nearest(distances, current, &visited) {
            tour.push(next);
            visited[next] = true;
            current = next;
        }

        Tour::from_nodes_unchecked(tour)
    }
}

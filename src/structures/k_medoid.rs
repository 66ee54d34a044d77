use std::path::Path;

use log::debug;

use crate::error::SearchError;
use crate::float_score::FloatScore;
use crate::structures::ElementId;
use crate::structures::ScoreStructure;
use crate::structures::data_points::DataPoints;

/// Euclidean k-medoid on a point cloud.
///
/// `f(S) = -sum_v min_{s in S} ||v - s||`, the negated assignment cost, so
/// adding a medoid can only help and the maximizer is the cheapest medoid
/// set. Unassigned points (only possible for the empty set) pay the largest
/// pairwise distance, which keeps `f` monotone and submodular from the empty
/// set up. The pairwise distance matrix is computed once in `finalize`; each
/// depth keeps a rolling row of per-point minima, the same scheme the graph
/// farness objective uses for distances.
#[derive(Debug)]
pub struct EuclidianKMedoid {
    data: DataPoints,
    dist: Vec<Vec<f64>>,
    dist_cap: f64,

    depth: usize,
    min_dist: Vec<Vec<f64>>,
    temp_min: Vec<f64>,
}

impl EuclidianKMedoid {
    #[must_use]
    pub fn new(data: DataPoints) -> Self {
        Self {
            data,
            dist: Vec::new(),
            dist_cap: 0.0,
            depth: 0,
            min_dist: Vec::new(),
            temp_min: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SearchError> {
        Ok(Self::new(DataPoints::from_path(path)?))
    }

    #[must_use]
    pub fn data(&self) -> &DataPoints {
        &self.data
    }

    fn negated_sum_of_min(left: &[f64], row_c: &[f64]) -> FloatScore {
        let mut sum = 0.0f64;
        for (l, c) in left.iter().zip(row_c) {
            sum += l.min(*c);
        }
        FloatScore::new(-sum)
    }
}

impl ScoreStructure for EuclidianKMedoid {
    type SF = FloatScore;

    fn n(&self) -> usize {
        self.data.n()
    }

    fn finalize(&mut self) {
        let n = self.data.n();
        self.dist = vec![vec![0.0f64; n]; n];
        self.dist_cap = 0.0;
        for i in 0..n {
            for j in i + 1..n {
                let d = self.data.euclidean_distance(i, j);
                self.dist[i][j] = d;
                self.dist[j][i] = d;
                self.dist_cap = self.dist_cap.max(d);
            }
        }
        self.temp_min = vec![self.dist_cap; n];

        debug!(
            "k-medoid: {} points in {} dimensions",
            n,
            self.data.dimensionality()
        );
    }

    fn initialize_helping_structures(&mut self, k: usize) {
        let n = self.data.n();
        // with nothing chosen every point sits at the distance cap
        self.min_dist = vec![vec![self.dist_cap; n]; k + 1];
        self.depth = 0;
    }

    fn visit_new_depth(&mut self, s: &[ElementId], s_size: usize) {
        self.depth += 1;
        debug_assert_eq!(self.depth, s_size);

        let c = s[s_size - 1] as usize;
        let (prev, cur) = self.min_dist.split_at_mut(self.depth);
        for ((m, p), d) in cur[0].iter_mut().zip(&prev[self.depth - 1]).zip(&self.dist[c]) {
            *m = p.min(*d);
        }
    }

    fn return_from_last_depth(&mut self) {
        self.depth -= 1;
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn evaluate_empty_set(&mut self) -> FloatScore {
        FloatScore::new(-(self.data.n() as f64) * self.dist_cap)
    }

    fn evaluate_1d(&mut self, s: &[ElementId], s_size: usize) -> FloatScore {
        let c = s[s_size - 1] as usize;
        Self::negated_sum_of_min(&self.min_dist[self.depth], &self.dist[c])
    }

    fn evaluate_2d(&mut self, s: &[ElementId], s_size: usize) -> FloatScore {
        let c1 = s[s_size - 2] as usize;
        let c2 = s[s_size - 1] as usize;

        let row = &self.min_dist[self.depth];
        let mut sum = 0.0f64;
        for ((m, d1), d2) in row.iter().zip(&self.dist[c1]).zip(&self.dist[c2]) {
            sum += m.min(*d1).min(*d2);
        }
        FloatScore::new(-sum)
    }

    fn evaluate_xd(&mut self, s: &[ElementId], s_size: usize) -> FloatScore {
        let n_new = s_size - self.depth;
        debug_assert!(n_new >= 1);
        if n_new == 1 {
            return self.evaluate_1d(s, s_size);
        }
        if n_new == 2 {
            return self.evaluate_2d(s, s_size);
        }

        let base = &self.min_dist[self.depth];
        let first = &self.dist[s[self.depth] as usize];
        for ((t, b), d) in self.temp_min.iter_mut().zip(base).zip(first) {
            *t = b.min(*d);
        }
        for j in 1..n_new - 1 {
            let row = &self.dist[s[self.depth + j] as usize];
            for (t, d) in self.temp_min.iter_mut().zip(row) {
                *t = t.min(*d);
            }
        }
        Self::negated_sum_of_min(&self.temp_min, &self.dist[s[s_size - 1] as usize])
    }

    fn evaluate_general(&mut self, s: &[ElementId], s_size: usize) -> FloatScore {
        match s_size {
            0 => self.evaluate_empty_set(),
            1 => FloatScore::new(-self.dist[s[0] as usize].iter().sum::<f64>()),
            _ => {
                let first = &self.dist[s[0] as usize];
                let second = &self.dist[s[1] as usize];
                for ((t, a), b) in self.temp_min.iter_mut().zip(first).zip(second) {
                    *t = a.min(*b);
                }
                for j in 2..s_size - 1 {
                    let row = &self.dist[s[j] as usize];
                    for (t, d) in self.temp_min.iter_mut().zip(row) {
                        *t = t.min(*d);
                    }
                }
                if s_size == 2 {
                    return FloatScore::new(-self.temp_min.iter().sum::<f64>());
                }
                Self::negated_sum_of_min(&self.temp_min, &self.dist[s[s_size - 1] as usize])
            }
        }
    }

    fn max_reachable_score(&self) -> FloatScore {
        FloatScore::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clusters() -> EuclidianKMedoid {
        let mut km = EuclidianKMedoid::new(DataPoints::new(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 0.0],
            vec![10.0, 1.0],
        ]));
        km.finalize();
        km.initialize_helping_structures(2);
        km
    }

    #[test]
    fn one_medoid_per_cluster() {
        let mut km = two_clusters();
        assert_eq!(km.evaluate_general(&[0, 2], 2), FloatScore::new(-2.0));
        assert_eq!(km.evaluate_general(&[1, 3], 2), FloatScore::new(-2.0));
        // both medoids in one cluster leaves the other paying ~10 each
        assert!(km.evaluate_general(&[0, 1], 2) < FloatScore::new(-19.0));
    }

    #[test]
    fn rolling_state_matches_general() {
        let mut km = two_clusters();
        let s = [1, 2];

        let expected = km.evaluate_general(&s, 2);
        assert_eq!(km.evaluate_2d(&s, 2), expected);

        km.visit_new_depth(&s[..1], 1);
        assert_eq!(km.evaluate_1d(&s, 2), expected);
        assert_eq!(km.evaluate_xd(&s, 2), expected);

        km.return_from_last_depth();
        assert_eq!(km.depth(), 0);
    }

    #[test]
    fn adding_medoids_never_hurts() {
        let mut km = two_clusters();
        let f0 = km.evaluate_empty_set();
        let f1 = km.evaluate_general(&[0], 1);
        let f2 = km.evaluate_general(&[0, 3], 2);
        assert!(f0 < f1);
        assert!(f2 >= f1);
        assert!(f2 <= km.max_reachable_score());
    }
}

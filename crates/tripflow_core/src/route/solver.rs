use crate::constants::DEFAULT_TWO_OPT_PASS_LIMIT;
use crate::geo::DistanceMatrix;

const MIN_TOUR_SIZE_FOR_2OPT: usize = 4;

/// Capability interface for single-vehicle tour construction so any TSP
/// backend can substitute for the bundled heuristic.
///
/// The tour always starts at index 0 (callers arrange the forced start
/// there). `fixed_end == Some(e)` pins the final stop for an open path
/// whose return edge is never charged; `None` solves a closed cycle rooted
/// at 0. A `None` result means no feasible ordering was found.
pub trait TourSolver {
    fn solve(&self, matrix: &DistanceMatrix, fixed_end: Option<usize>) -> Option<Vec<usize>>;
}

/// Cheapest-arc-first construction followed by 2-opt improvement, bounded
/// by a pass budget so worst-case latency stays predictable.
#[derive(Clone, Copy, Debug)]
pub struct GreedySolver {
    pass_limit: usize,
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self {
            pass_limit: DEFAULT_TWO_OPT_PASS_LIMIT,
        }
    }
}

impl GreedySolver {
    pub fn new(pass_limit: usize) -> Self {
        Self { pass_limit }
    }
}

impl TourSolver for GreedySolver {
    fn solve(&self, matrix: &DistanceMatrix, fixed_end: Option<usize>) -> Option<Vec<usize>> {
        let n = matrix.len();
        if n == 0 {
            return None;
        }
        if let Some(end) = fixed_end
            && (end == 0 || end >= n)
        {
            return None;
        }
        if n == 1 {
            return Some(vec![0]);
        }

        let mut tour = match fixed_end {
            Some(end) => nearest_neighbor_path(matrix, end),
            None => nearest_neighbor_cycle(matrix),
        };

        match fixed_end {
            Some(_) => two_opt_path(matrix, &mut tour, self.pass_limit),
            None => two_opt_cycle(matrix, &mut tour, self.pass_limit),
        }

        Some(tour)
    }
}

fn nearest_neighbor_cycle(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);

    let mut current = 0;
    visited[0] = true;
    tour.push(0);

    while tour.len() < n {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .min_by_key(|&j| matrix.meters(current, j));
        let Some(next) = next else { break };
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    tour
}

fn nearest_neighbor_path(matrix: &DistanceMatrix, end: usize) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);

    let mut current = 0;
    visited[0] = true;
    visited[end] = true;
    tour.push(0);

    while tour.len() < n - 1 {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .min_by_key(|&j| matrix.meters(current, j));
        let Some(next) = next else { break };
        visited[next] = true;
        tour.push(next);
        current = next;
    }

    tour.push(end);
    tour
}

/// 2-opt on a cycle rooted at index 0. Segment reversals may touch the
/// closing edge back to the start; the root itself never moves.
fn two_opt_cycle(matrix: &DistanceMatrix, tour: &mut [usize], pass_limit: usize) {
    let n = tour.len();
    if n < MIN_TOUR_SIZE_FOR_2OPT {
        return;
    }

    for _ in 0..pass_limit {
        let mut improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                let after_j = tour[(j + 1) % n];
                let before_i = tour[i - 1];
                let delta = matrix.meters(before_i, tour[j]) + matrix.meters(tour[i], after_j)
                    - matrix.meters(before_i, tour[i])
                    - matrix.meters(tour[j], after_j);
                if delta < 0 {
                    tour[i..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

/// 2-opt on an open path; both endpoints stay fixed, no closing edge.
fn two_opt_path(matrix: &DistanceMatrix, tour: &mut [usize], pass_limit: usize) {
    let n = tour.len();
    if n < MIN_TOUR_SIZE_FOR_2OPT {
        return;
    }

    for _ in 0..pass_limit {
        let mut improved = false;
        for i in 1..n - 2 {
            for j in i + 1..n - 1 {
                let delta = matrix.meters(tour[i - 1], tour[j]) + matrix.meters(tour[i], tour[j + 1])
                    - matrix.meters(tour[i - 1], tour[i])
                    - matrix.meters(tour[j], tour[j + 1]);
                if delta < 0 {
                    tour[i..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

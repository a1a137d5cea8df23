use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_ITERATIONS: usize = 100;

/// Partition `coords` into `k` clusters by squared Euclidean distance in
/// raw coordinate space. Seeded and restarted; the lowest-inertia labeling
/// wins, so results are reproducible for a fixed seed.
///
/// Callers must ensure `1 <= k <= coords.len()`.
pub(crate) fn cluster(coords: &[[f64; 2]], k: usize, seed: u64, restarts: usize) -> Vec<usize> {
    if coords.is_empty() || k <= 1 {
        return vec![0; coords.len()];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<(f64, Vec<usize>)> = None;

    for _ in 0..restarts.max(1) {
        let (labels, inertia) = run_once(coords, k, &mut rng);
        if best.as_ref().is_none_or(|(best_inertia, _)| inertia < *best_inertia) {
            best = Some((inertia, labels));
        }
    }

    best.map(|(_, labels)| labels).unwrap_or_default()
}

fn run_once(coords: &[[f64; 2]], k: usize, rng: &mut StdRng) -> (Vec<usize>, f64) {
    let mut centers = seed_centers(coords, k, rng);
    let mut labels = vec![usize::MAX; coords.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;
        for (i, coord) in coords.iter().enumerate() {
            let nearest = nearest_center(coord, &centers);
            if labels[i] != nearest {
                labels[i] = nearest;
                changed = true;
            }
        }

        repair_empty_clusters(coords, &mut labels, &centers, k);
        update_centers(coords, &labels, &mut centers);

        if !changed {
            break;
        }
    }

    let inertia = labels
        .iter()
        .zip(coords)
        .map(|(&label, coord)| sq_dist(coord, &centers[label]))
        .sum();
    (labels, inertia)
}

/// k-means++-style seeding: later centers are drawn with probability
/// proportional to squared distance from the nearest existing center.
fn seed_centers(coords: &[[f64; 2]], k: usize, rng: &mut StdRng) -> Vec<[f64; 2]> {
    let first = rng.random_range(0..coords.len());
    let mut centers = vec![coords[first]];
    let mut nearest_sq = vec![f64::MAX; coords.len()];

    while centers.len() < k {
        let last = centers[centers.len() - 1];
        for (i, coord) in coords.iter().enumerate() {
            let d = sq_dist(coord, &last);
            if d < nearest_sq[i] {
                nearest_sq[i] = d;
            }
        }

        let total: f64 = nearest_sq.iter().sum();
        if total <= 0.0 {
            // All points coincide with a center; any pick works.
            centers.push(coords[rng.random_range(0..coords.len())]);
            continue;
        }

        let mut target = rng.random::<f64>() * total;
        let mut chosen = coords.len() - 1;
        for (i, d) in nearest_sq.iter().enumerate() {
            target -= d;
            if target <= 0.0 {
                chosen = i;
                break;
            }
        }
        centers.push(coords[chosen]);
    }

    centers
}

fn nearest_center(coord: &[f64; 2], centers: &[[f64; 2]]) -> usize {
    let mut best = 0;
    let mut best_d = f64::MAX;
    for (c, center) in centers.iter().enumerate() {
        let d = sq_dist(coord, center);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

/// An empty cluster steals the member of the largest cluster that sits
/// farthest from its own center, so every cluster keeps at least one point.
fn repair_empty_clusters(
    coords: &[[f64; 2]],
    labels: &mut [usize],
    centers: &[[f64; 2]],
    k: usize,
) {
    let mut counts = vec![0usize; k];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    for cluster in 0..k {
        if counts[cluster] > 0 {
            continue;
        }

        let mut donor = 0;
        for c in 0..k {
            if counts[c] > counts[donor] {
                donor = c;
            }
        }
        if counts[donor] <= 1 {
            continue;
        }

        let mut victim = None;
        let mut victim_d = -1.0;
        for (i, coord) in coords.iter().enumerate() {
            if labels[i] == donor {
                let d = sq_dist(coord, &centers[donor]);
                if d > victim_d {
                    victim_d = d;
                    victim = Some(i);
                }
            }
        }
        if let Some(i) = victim {
            labels[i] = cluster;
            counts[donor] -= 1;
            counts[cluster] += 1;
        }
    }
}

fn update_centers(coords: &[[f64; 2]], labels: &[usize], centers: &mut [[f64; 2]]) {
    let k = centers.len();
    let mut sums = vec![[0.0f64; 2]; k];
    let mut counts = vec![0usize; k];

    for (coord, &label) in coords.iter().zip(labels) {
        sums[label][0] += coord[0];
        sums[label][1] += coord[1];
        counts[label] += 1;
    }

    for c in 0..k {
        if counts[c] > 0 {
            centers[c] = [sums[c][0] / counts[c] as f64, sums[c][1] / counts[c] as f64];
        }
    }
}

fn sq_dist(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

mod kmeans;

use crate::constants::{DEFAULT_CLUSTER_RESTARTS, DEFAULT_CLUSTER_SEED};
use crate::error::{Error, Result};
use crate::place::Place;

const FRONT_BACK_WEIGHT: f64 = 0.7;
const MIDDLE_WEIGHT: f64 = 1.0;

/// How places are partitioned into day groups.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SegmentStrategy {
    /// Coordinate clustering; tight geographic clusters may receive
    /// disproportionately many places.
    Cluster,
    /// Sort along the wider coordinate axis and slice with lighter first
    /// and last days (travel days).
    WeightedSpan,
}

impl SegmentStrategy {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "cluster" => Ok(Self::Cluster),
            "weighted-span" => Ok(Self::WeightedSpan),
            _ => Err(Error::invalid_input(format!(
                "Invalid segment strategy: {value} (expected cluster|weighted-span)"
            ))),
        }
    }
}

/// Partitions places into 1-based day groups.
#[derive(Clone, Copy, Debug)]
pub struct DaySegmenter {
    strategy: SegmentStrategy,
    seed: u64,
    restarts: usize,
}

impl Default for DaySegmenter {
    fn default() -> Self {
        Self {
            strategy: SegmentStrategy::Cluster,
            seed: DEFAULT_CLUSTER_SEED,
            restarts: DEFAULT_CLUSTER_RESTARTS,
        }
    }
}

impl DaySegmenter {
    pub fn new(strategy: SegmentStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Assign every place a `day` in `[1, n_days]`. Empty input is a no-op;
    /// a day count exceeding the place count is clamped, never an error.
    pub fn segment(&self, places: Vec<Place>, n_days: usize) -> Vec<Place> {
        if places.is_empty() {
            return places;
        }

        let n_days = if n_days > places.len() {
            log::warn!(
                "segmenter: clamping day count requested={n_days} places={}",
                places.len()
            );
            places.len()
        } else {
            n_days.max(1)
        };

        match self.strategy {
            SegmentStrategy::Cluster => self.cluster_segment(places, n_days),
            SegmentStrategy::WeightedSpan => weighted_segment(places, n_days),
        }
    }

    fn cluster_segment(&self, mut places: Vec<Place>, n_days: usize) -> Vec<Place> {
        let coords: Vec<[f64; 2]> = places.iter().map(|p| [p.lat, p.lng]).collect();
        let labels = kmeans::cluster(&coords, n_days, self.seed, self.restarts);

        for (place, label) in places.iter_mut().zip(labels) {
            place.day = label as u32 + 1;
        }

        log::debug!(
            "segmenter: clustered places={} days={n_days} seed={}",
            places.len(),
            self.seed
        );
        places
    }
}

fn weighted_segment(mut places: Vec<Place>, n_days: usize) -> Vec<Place> {
    if n_days == 1 {
        for place in &mut places {
            place.day = 1;
        }
        return places;
    }

    // Sort along whichever axis has the larger spread to keep each day's
    // slice spatially contiguous.
    let (lat_spread, lng_spread) = coordinate_spreads(&places);
    if lat_spread > lng_spread {
        places.sort_by(|a, b| a.lat.total_cmp(&b.lat));
    } else {
        places.sort_by(|a, b| a.lng.total_cmp(&b.lng));
    }

    let counts = weighted_counts(places.len(), n_days);
    let n_places = places.len();
    let mut start = 0;
    for (day_idx, &count) in counts.iter().enumerate() {
        let end = (start + count).min(n_places);
        for place in &mut places[start..end] {
            place.day = day_idx as u32 + 1;
        }
        start = end;
    }

    log::debug!("segmenter: weighted slices counts={counts:?}");
    places
}

fn coordinate_spreads(places: &[Place]) -> (f64, f64) {
    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lng = f64::MAX;
    let mut max_lng = f64::MIN;

    for place in places {
        min_lat = min_lat.min(place.lat);
        max_lat = max_lat.max(place.lat);
        min_lng = min_lng.min(place.lng);
        max_lng = max_lng.max(place.lng);
    }

    (max_lat - min_lat, max_lng - min_lng)
}

/// Per-day place counts: first and last days weighted lighter when the trip
/// is three days or longer, minimum one place per day, remainder handed to
/// the highest-weight days first (earliest day wins ties).
fn weighted_counts(n_places: usize, n_days: usize) -> Vec<usize> {
    let weights: Vec<f64> = if n_days >= 3 {
        let mut w = vec![MIDDLE_WEIGHT; n_days];
        w[0] = FRONT_BACK_WEIGHT;
        w[n_days - 1] = FRONT_BACK_WEIGHT;
        w
    } else {
        vec![MIDDLE_WEIGHT; n_days]
    };

    let total: f64 = weights.iter().sum();
    let mut counts: Vec<usize> = weights
        .iter()
        .map(|w| (n_places as f64 * (w / total)) as usize)
        .collect();
    for count in &mut counts {
        if *count == 0 {
            *count = 1;
        }
    }

    let mut priority: Vec<usize> = (0..n_days).collect();
    priority.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]).then(a.cmp(&b)));

    let assigned: usize = counts.iter().sum();
    let remainder = n_places.saturating_sub(assigned);
    for i in 0..remainder {
        counts[priority[i % n_days]] += 1;
    }

    counts
}

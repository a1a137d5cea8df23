use std::fmt;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;
const METERS_PER_KM: f64 = 1_000.0;

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in meters (haversine).
    pub fn dist_m(self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), rhs.lat.to_radians());
        let dlat = (rhs.lat - self.lat).to_radians();
        let dlng = (rhs.lng - self.lng).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlng / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * EARTH_RADIUS_M * h.sqrt().asin()
    }

    /// Great-circle distance in kilometers.
    pub fn dist_km(self, rhs: &Self) -> f64 {
        self.dist_m(rhs) / METERS_PER_KM
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-NINETY..=NINETY).contains(&self.lat)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lat), b2.format(self.lng))
    }
}

/// Symmetric pairwise distances in whole meters, zero diagonal.
/// Entries are `trunc(km * 1000)`; sub-meter precision is discarded.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    n: usize,
    meters: Vec<i64>,
}

impl DistanceMatrix {
    pub fn from_points(points: &[GeoPoint]) -> Self {
        let n = points.len();
        let mut meters = vec![0i64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let m = (points[i].dist_km(&points[j]) * METERS_PER_KM) as i64;
                meters[i * n + j] = m;
                meters[j * n + i] = m;
            }
        }
        Self { n, meters }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn meters(&self, i: usize, j: usize) -> i64 {
        self.meters[i * self.n + j]
    }

    /// Distance in kilometers rounded to two decimals, as reported per stop.
    pub fn km_2dp(&self, i: usize, j: usize) -> f64 {
        (self.meters(i, j) as f64 / 10.0).round() / 100.0
    }
}

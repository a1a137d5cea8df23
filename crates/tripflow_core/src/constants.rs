/// Stay-time budget for one day, in minutes (9 hours).
pub const DEFAULT_MAX_DAILY_MINUTES: u32 = 540;

/// An overflow stop farther than this from the next day's first stop stays put.
pub const DEFAULT_RELOCATION_CAP_KM: f64 = 50.0;

/// Stay length assumed when enrichment resolves nothing for a place.
pub const DEFAULT_VISIT_MINUTES: u32 = 60;

/// Category assigned to search candidates that carry none.
pub const DEFAULT_PLACE_TYPE: &str = "tourist_spot";

/// Fixed seed for reproducible day clustering.
pub const DEFAULT_CLUSTER_SEED: u64 = 42;

/// Number of clustering restarts; the lowest-inertia labeling wins.
pub const DEFAULT_CLUSTER_RESTARTS: usize = 10;

/// Improvement-pass budget for the tour solver, bounding per-day latency.
pub const DEFAULT_TWO_OPT_PASS_LIMIT: usize = 64;

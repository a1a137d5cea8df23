//! Multi-day travel itinerary planning on geographic points of interest.
//! Segments places into day groups, orders each day's stops with a greedy
//! tour solver, and shifts overflow stops from overloaded days forward.

mod balance;
mod constants;
mod enrich;
mod error;
mod geo;
mod io;
mod itinerary;
pub mod logging;
mod pipeline;
mod place;
mod route;
mod segment;

pub use balance::ScheduleBalancer;
pub use enrich::{EnrichedInfo, EnrichmentProvider, NoopProvider, SessionCache, enrich_places};
pub use error::{Error, Result};
pub use geo::{DistanceMatrix, GeoPoint};
pub use io::input::{read_places, write_itinerary};
pub use io::options::{LogFormat, LogLevel, PlannerOptions};
pub use itinerary::{DayPlan, Itinerary};
pub use pipeline::TripPlanner;
pub use place::{BestTime, Place, SearchCandidate};
pub use route::{GreedySolver, RouteOptimizer, TourShape, TourSolver};
pub use segment::{DaySegmenter, SegmentStrategy};

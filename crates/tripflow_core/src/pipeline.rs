use crate::balance::ScheduleBalancer;
use crate::enrich::{EnrichmentProvider, SessionCache, enrich_places};
use crate::error::{Error, Result};
use crate::io::options::PlannerOptions;
use crate::itinerary::Itinerary;
use crate::place::Place;
use crate::route::{GreedySolver, RouteOptimizer};
use crate::segment::DaySegmenter;

const ERR_ZERO_DAYS: &str = "day count must be at least 1";
const ERR_INVALID_POINT: &str = "input contains invalid lat/lng values";

/// Composes the planning pipeline: segment into days, order each day's
/// route, rebalance overloaded days forward.
pub struct TripPlanner {
    segmenter: DaySegmenter,
    optimizer: RouteOptimizer<GreedySolver>,
    balancer: ScheduleBalancer,
}

impl Default for TripPlanner {
    fn default() -> Self {
        Self::from_options(&PlannerOptions::default())
    }
}

impl TripPlanner {
    pub fn new(
        segmenter: DaySegmenter,
        optimizer: RouteOptimizer<GreedySolver>,
        balancer: ScheduleBalancer,
    ) -> Self {
        Self {
            segmenter,
            optimizer,
            balancer,
        }
    }

    pub fn from_options(options: &PlannerOptions) -> Self {
        Self {
            segmenter: DaySegmenter::new(options.segment_strategy)
                .with_seed(options.cluster_seed)
                .with_restarts(options.cluster_restarts),
            optimizer: RouteOptimizer::with_solver(
                options.tour_shape,
                GreedySolver::new(options.two_opt_passes),
            ),
            balancer: ScheduleBalancer::new(options.max_daily_min, options.relocation_cap_km),
        }
    }

    /// Plan a trip. Always yields a valid (possibly trivial) itinerary for
    /// degenerate-but-wellformed input; hard errors are reserved for a zero
    /// day count and malformed coordinates.
    pub fn run(&self, places: Vec<Place>, days: u32) -> Result<Itinerary> {
        if days == 0 {
            return Err(Error::invalid_input(ERR_ZERO_DAYS));
        }
        if places.iter().any(|p| !p.point().is_valid()) {
            return Err(Error::invalid_input(ERR_INVALID_POINT));
        }

        log::info!("pipeline: start places={} days={days}", places.len());

        let places = self.segmenter.segment(places, days as usize);
        let mut itinerary = self.optimizer.optimize(places);
        self.balancer.balance(&mut itinerary);

        log::info!("pipeline: done days_out={}", itinerary.len());
        Ok(itinerary)
    }

    /// Like [`run`](Self::run), but resolves stay durations and best-time
    /// labels through the enrichment collaborator first. Enrichment never
    /// fails the pipeline; see [`enrich_places`].
    pub fn run_enriched<P: EnrichmentProvider>(
        &self,
        provider: &P,
        cache: &mut SessionCache,
        places: Vec<Place>,
        days: u32,
    ) -> Result<Itinerary> {
        let places = enrich_places(provider, cache, places);
        self.run(places, days)
    }
}

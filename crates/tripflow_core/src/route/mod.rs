mod solver;

pub use solver::{GreedySolver, TourSolver};

use crate::error::{Error, Result};
use crate::geo::{DistanceMatrix, GeoPoint};
use crate::itinerary::{DayPlan, Itinerary};
use crate::place::Place;

/// Shape of each day's route.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TourShape {
    /// Round trip from a lodging base: the day starts at its northernmost
    /// stop and the solver is free to pick the final edge.
    Closed,
    /// Linear multi-city travel: each day runs between its latitude
    /// extremes, oriented by the trip's overall direction.
    Open,
}

impl TourShape {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "closed" => Ok(Self::Closed),
            "open" => Ok(Self::Open),
            _ => Err(Error::invalid_input(format!(
                "Invalid tour shape: {value} (expected closed|open)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    SouthToNorth,
    NorthToSouth,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Self::SouthToNorth => "south-to-north",
            Self::NorthToSouth => "north-to-south",
        }
    }
}

/// Orders each day's places to minimize intra-day travel distance.
pub struct RouteOptimizer<S = GreedySolver> {
    shape: TourShape,
    solver: S,
}

impl RouteOptimizer<GreedySolver> {
    pub fn new(shape: TourShape) -> Self {
        Self::with_solver(shape, GreedySolver::default())
    }
}

impl<S: TourSolver> RouteOptimizer<S> {
    pub fn with_solver(shape: TourShape, solver: S) -> Self {
        Self { shape, solver }
    }

    /// Build an itinerary from day-assigned places. Places with no day
    /// assignment (leading place has `day == 0`) all land on day 1.
    ///
    /// A day the solver cannot order is omitted from the output; the drop
    /// is logged rather than silent.
    pub fn optimize(&self, mut places: Vec<Place>) -> Itinerary {
        let mut itinerary = Itinerary::new();
        if places.is_empty() {
            return itinerary;
        }

        if places[0].day == 0 {
            for place in &mut places {
                place.day = 1;
            }
        }

        let mut day_seqs: Vec<u32> = places.iter().map(|p| p.day).collect();
        day_seqs.sort_unstable();
        day_seqs.dedup();

        let direction = match self.shape {
            TourShape::Open => {
                let direction = detect_direction(&places, &day_seqs);
                log::info!("optimizer: direction={}", direction.label());
                Some(direction)
            }
            TourShape::Closed => None,
        };

        for &day_seq in &day_seqs {
            let mut day_places: Vec<Place> = places
                .iter()
                .filter(|p| p.day == day_seq)
                .cloned()
                .collect();

            if day_places.len() <= 1 {
                if let Some(only) = day_places.first_mut() {
                    only.visit_order = 1;
                    only.dist_from_prev_km = 0.0;
                }
                itinerary.insert_day(DayPlan {
                    day_seq,
                    places: day_places,
                });
                continue;
            }

            let fixed_end = match direction {
                Some(direction) => {
                    prepare_open_endpoints(&mut day_places, direction);
                    Some(day_places.len() - 1)
                }
                None => {
                    let start = extreme_lat_index(&day_places, 0, true);
                    day_places.swap(0, start);
                    None
                }
            };

            let points: Vec<GeoPoint> = day_places.iter().map(Place::point).collect();
            let matrix = DistanceMatrix::from_points(&points);

            let Some(order) = self.solver.solve(&matrix, fixed_end) else {
                log::warn!(
                    "optimizer: no feasible tour, dropping day day_seq={day_seq} places={}",
                    day_places.len()
                );
                continue;
            };

            let ordered = emit_ordered(&day_places, &matrix, &order);
            log::debug!(
                "optimizer: day ordered day_seq={day_seq} stops={} travel_km={:.2}",
                ordered.len(),
                ordered.iter().map(|p| p.dist_from_prev_km).sum::<f64>()
            );
            itinerary.insert_day(DayPlan {
                day_seq,
                places: ordered,
            });
        }

        itinerary
    }
}

/// Compare the first and last day's mean latitudes once for the whole trip;
/// a lower first day means the trip climbs northward.
fn detect_direction(places: &[Place], day_seqs: &[u32]) -> Direction {
    let first = day_seqs[0];
    let last = day_seqs[day_seqs.len() - 1];

    if mean_lat(places, first) < mean_lat(places, last) {
        Direction::SouthToNorth
    } else {
        Direction::NorthToSouth
    }
}

fn mean_lat(places: &[Place], day_seq: u32) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for place in places.iter().filter(|p| p.day == day_seq) {
        sum += place.lat;
        count += 1;
    }
    sum / count.max(1) as f64
}

/// Swap the direction-consistent latitude extreme to the front and the
/// opposite extreme (re-searched past the new front) to the back.
fn prepare_open_endpoints(day_places: &mut [Place], direction: Direction) {
    let n = day_places.len();
    let start = match direction {
        Direction::SouthToNorth => extreme_lat_index(day_places, 0, false),
        Direction::NorthToSouth => extreme_lat_index(day_places, 0, true),
    };
    day_places.swap(0, start);

    let end = match direction {
        Direction::SouthToNorth => extreme_lat_index(day_places, 1, true),
        Direction::NorthToSouth => extreme_lat_index(day_places, 1, false),
    };
    day_places.swap(n - 1, end);
}

/// Index of the max-latitude (or min-latitude) place at or after `from`;
/// ties keep the earliest index.
fn extreme_lat_index(places: &[Place], from: usize, max: bool) -> usize {
    let mut best = from;
    for i in from + 1..places.len() {
        let better = if max {
            places[i].lat > places[best].lat
        } else {
            places[i].lat < places[best].lat
        };
        if better {
            best = i;
        }
    }
    best
}

/// Walk the solved order: 1-based `visit_order`, distance from the previous
/// stop rounded to two decimals, zero for the first stop.
fn emit_ordered(day_places: &[Place], matrix: &DistanceMatrix, order: &[usize]) -> Vec<Place> {
    let mut ordered = Vec::with_capacity(order.len());
    let mut prev: Option<usize> = None;

    for (rank, &idx) in order.iter().enumerate() {
        let mut place = day_places[idx].clone();
        place.visit_order = rank as u32 + 1;
        place.dist_from_prev_km = match prev {
            Some(prev_idx) => matrix.km_2dp(prev_idx, idx),
            None => 0.0,
        };
        ordered.push(place);
        prev = Some(idx);
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::{RouteOptimizer, TourShape, TourSolver};
    use crate::geo::DistanceMatrix;
    use crate::place::tests::place;
    use crate::place::Place;

    fn day_of(places: &mut [Place], day: u32) {
        for place in places {
            place.day = day;
        }
    }

    #[test]
    fn empty_input_yields_empty_itinerary() {
        let optimizer = RouteOptimizer::new(TourShape::Closed);
        assert!(optimizer.optimize(Vec::new()).is_empty());
    }

    #[test]
    fn unassigned_places_default_to_day_one() {
        let optimizer = RouteOptimizer::new(TourShape::Closed);
        let places = vec![place("a", 37.0, 127.0), place("b", 37.1, 127.1)];
        let itinerary = optimizer.optimize(places);

        assert_eq!(itinerary.len(), 1);
        assert!(itinerary.day(1).is_some());
    }

    #[test]
    fn singleton_day_emits_order_one_and_zero_distance() {
        let optimizer = RouteOptimizer::new(TourShape::Closed);
        let mut places = vec![place("a", 37.0, 127.0)];
        day_of(&mut places, 1);
        let itinerary = optimizer.optimize(places);

        let plan = itinerary.day(1).expect("day 1");
        assert_eq!(plan.places[0].visit_order, 1);
        assert_eq!(plan.places[0].dist_from_prev_km, 0.0);
    }

    #[test]
    fn closed_tour_starts_at_northernmost_place() {
        let optimizer = RouteOptimizer::new(TourShape::Closed);
        let mut places = vec![
            place("a", 37.00, 127.00),
            place("north", 37.90, 127.05),
            place("b", 37.20, 127.10),
            place("c", 37.40, 126.95),
            place("d", 37.10, 127.20),
        ];
        day_of(&mut places, 1);
        let itinerary = optimizer.optimize(places);

        let plan = itinerary.day(1).expect("day 1");
        assert_eq!(plan.places[0].id, "north");
        assert_eq!(plan.places[0].dist_from_prev_km, 0.0);

        let orders: Vec<u32> = plan.places.iter().map(|p| p.visit_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn visit_orders_are_a_gapless_permutation() {
        let optimizer = RouteOptimizer::new(TourShape::Closed);
        let mut places = vec![
            place("a", 37.0, 127.0),
            place("b", 37.3, 127.2),
            place("c", 37.1, 127.4),
            place("d", 37.2, 126.9),
        ];
        day_of(&mut places, 1);
        let itinerary = optimizer.optimize(places);

        let plan = itinerary.day(1).expect("day 1");
        let mut orders: Vec<u32> = plan.places.iter().map(|p| p.visit_order).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn open_path_heading_north_runs_south_extreme_to_north_extreme() {
        let optimizer = RouteOptimizer::new(TourShape::Open);
        // Day 1 sits south of day 2, so the trip heads north.
        let mut day1 = vec![
            place("d1-mid", 35.20, 129.00),
            place("d1-south", 35.00, 129.05),
            place("d1-north", 35.40, 128.95),
        ];
        day_of(&mut day1, 1);
        let mut day2 = vec![place("d2-a", 37.50, 127.00), place("d2-b", 37.60, 127.05)];
        day_of(&mut day2, 2);

        let mut places = day1;
        places.extend(day2);
        let itinerary = optimizer.optimize(places);

        let plan = itinerary.day(1).expect("day 1");
        assert_eq!(plan.places.first().expect("start").id, "d1-south");
        assert_eq!(plan.places.last().expect("end").id, "d1-north");
        let end = plan.places.last().expect("end");
        assert_eq!(end.visit_order, 3);
        assert!(end.dist_from_prev_km > 0.0);
    }

    #[test]
    fn open_path_heading_south_runs_north_extreme_to_south_extreme() {
        let optimizer = RouteOptimizer::new(TourShape::Open);
        let mut day1 = vec![
            place("d1-a", 37.50, 127.00),
            place("d1-b", 37.60, 127.05),
            place("d1-c", 37.40, 126.95),
        ];
        day_of(&mut day1, 1);
        let mut day2 = vec![place("d2-a", 35.10, 129.00), place("d2-b", 35.20, 129.05)];
        day_of(&mut day2, 2);

        let mut places = day1;
        places.extend(day2);
        let itinerary = optimizer.optimize(places);

        let plan = itinerary.day(1).expect("day 1");
        assert_eq!(plan.places.first().expect("start").id, "d1-b");
        assert_eq!(plan.places.last().expect("end").id, "d1-c");
    }

    #[test]
    fn open_path_endpoints_ignore_input_order() {
        let optimizer = RouteOptimizer::new(TourShape::Open);
        let base = vec![
            place("south", 35.00, 129.00),
            place("mid1", 35.20, 129.10),
            place("mid2", 35.30, 128.90),
            place("north", 35.50, 129.05),
        ];

        let mut reversed = base.clone();
        reversed.reverse();

        for mut input in [base, reversed] {
            day_of(&mut input, 1);
            let itinerary = optimizer.optimize(input);
            let plan = itinerary.day(1).expect("day 1");
            // Single-day trip: first == last day, direction is north-to-south.
            assert_eq!(plan.places.first().expect("start").id, "north");
            assert_eq!(plan.places.last().expect("end").id, "south");
        }
    }

    #[test]
    fn infeasible_day_is_dropped_from_output() {
        struct NeverSolves;
        impl TourSolver for NeverSolves {
            fn solve(&self, _: &DistanceMatrix, _: Option<usize>) -> Option<Vec<usize>> {
                None
            }
        }

        let optimizer = RouteOptimizer::with_solver(TourShape::Closed, NeverSolves);
        let mut multi = vec![place("a", 37.0, 127.0), place("b", 37.1, 127.1)];
        day_of(&mut multi, 1);
        let mut single = vec![place("c", 36.0, 128.0)];
        day_of(&mut single, 2);

        let mut places = multi;
        places.extend(single);
        let itinerary = optimizer.optimize(places);

        // Day 1 needed the solver and dropped; day 2 is a singleton and survives.
        assert!(itinerary.day(1).is_none());
        assert!(itinerary.day(2).is_some());
    }

    #[test]
    fn distances_accumulate_from_tour_edges() {
        let optimizer = RouteOptimizer::new(TourShape::Closed);
        let mut places = vec![
            place("a", 37.00, 127.00),
            place("b", 37.05, 127.00),
            place("c", 37.10, 127.00),
        ];
        day_of(&mut places, 1);
        let itinerary = optimizer.optimize(places);

        let plan = itinerary.day(1).expect("day 1");
        assert_eq!(plan.places[0].dist_from_prev_km, 0.0);
        for stop in &plan.places[1..] {
            assert!(stop.dist_from_prev_km > 0.0);
            // ~5.5 km between neighbors; nothing should jump the full span.
            assert!(stop.dist_from_prev_km < 12.0);
        }
    }
}

use crate::constants::{DEFAULT_MAX_DAILY_MINUTES, DEFAULT_RELOCATION_CAP_KM};
use crate::itinerary::Itinerary;
use crate::place::Place;

/// Shifts overflow stops from over-long days onto the following day.
///
/// A single greedy forward sweep: days donate only to their immediate
/// successor, the last day only receives, and no global optimization is
/// attempted. Relocated places are marked unordered (`visit_order == 0`)
/// and need a fresh route-optimization pass before their order is valid.
#[derive(Clone, Copy, Debug)]
pub struct ScheduleBalancer {
    max_daily_min: u32,
    relocation_cap_km: f64,
}

impl Default for ScheduleBalancer {
    fn default() -> Self {
        Self {
            max_daily_min: DEFAULT_MAX_DAILY_MINUTES,
            relocation_cap_km: DEFAULT_RELOCATION_CAP_KM,
        }
    }
}

impl ScheduleBalancer {
    pub fn new(max_daily_min: u32, relocation_cap_km: f64) -> Self {
        Self {
            max_daily_min,
            relocation_cap_km,
        }
    }

    /// Rebalance in ascending `day_seq` order. Per donor day, tail places
    /// pop until stay time fits the budget, only one place remains, or a
    /// pop fails the distance gate (which also ends that day's balancing).
    pub fn balance(&self, itinerary: &mut Itinerary) {
        let day_seqs = itinerary.day_seqs();
        if day_seqs.len() < 2 {
            return;
        }

        for pair in day_seqs.windows(2) {
            let (cur_seq, next_seq) = (pair[0], pair[1]);

            let Some(cur_plan) = itinerary.day_mut(cur_seq) else {
                continue;
            };
            let mut cur_places = std::mem::take(&mut cur_plan.places);
            let next_head = itinerary
                .day(next_seq)
                .and_then(|plan| plan.places.first())
                .map(Place::point);

            let mut total_stay: u32 = cur_places.iter().map(|p| p.duration_min).sum();
            let mut moved: Vec<Place> = Vec::new();

            while total_stay > self.max_daily_min && cur_places.len() > 1 {
                let Some(mut overflow) = cur_places.pop() else {
                    break;
                };
                total_stay = total_stay.saturating_sub(overflow.duration_min);

                // Gate against whatever currently heads the next day; each
                // committed move becomes the new head.
                let gate_target = moved.last().map(Place::point).or(next_head);
                if let Some(target) = gate_target {
                    let dist_km = overflow.point().dist_km(&target);
                    if dist_km > self.relocation_cap_km {
                        log::debug!(
                            "balancer: move rejected day_seq={cur_seq} place={} dist_km={dist_km:.1} cap_km={}",
                            overflow.name,
                            self.relocation_cap_km
                        );
                        cur_places.push(overflow);
                        break;
                    }
                }

                log::info!(
                    "balancer: moved day_seq={cur_seq}->{next_seq} place={} remaining_stay_min={total_stay} cap_min={}",
                    overflow.name,
                    self.max_daily_min
                );
                overflow.day = next_seq;
                overflow.visit_order = 0;
                overflow.dist_from_prev_km = 0.0;
                moved.push(overflow);
            }

            if let Some(cur_plan) = itinerary.day_mut(cur_seq) {
                cur_plan.places = cur_places;
            }
            if !moved.is_empty()
                && let Some(next_plan) = itinerary.day_mut(next_seq)
            {
                // Each move prepended in commit order: the last mover ends
                // up at the very front, as the per-pop insert would leave it.
                moved.reverse();
                moved.append(&mut next_plan.places);
                next_plan.places = moved;
            }
        }
    }
}

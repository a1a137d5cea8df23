use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::place::Place;

/// One day of the itinerary: places listed in visiting order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_seq: u32,
    pub places: Vec<Place>,
}

impl DayPlan {
    /// Pure stay time in minutes; travel time between stops is excluded.
    pub fn stay_minutes(&self) -> u32 {
        self.places.iter().map(|p| p.duration_min).sum()
    }

    pub fn travel_km(&self) -> f64 {
        self.places.iter().map(|p| p.dist_from_prev_km).sum()
    }
}

/// Day-keyed itinerary. `day_seq` is the authoritative ordering key; the
/// `"Day <n>"` strings on the wire are derived from it, never parsed back
/// as truth.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Itinerary {
    days: BTreeMap<u32, DayPlan>,
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_day(&mut self, plan: DayPlan) {
        self.days.insert(plan.day_seq, plan);
    }

    pub fn day(&self, day_seq: u32) -> Option<&DayPlan> {
        self.days.get(&day_seq)
    }

    pub fn day_mut(&mut self, day_seq: u32) -> Option<&mut DayPlan> {
        self.days.get_mut(&day_seq)
    }

    /// Days in ascending `day_seq` order.
    pub fn days(&self) -> impl Iterator<Item = &DayPlan> {
        self.days.values()
    }

    pub fn day_seqs(&self) -> Vec<u32> {
        self.days.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Ordered array-of-arrays view for array-indexed consumers:
    /// `lists[i]` is the ordered place sequence of the i-th day.
    pub fn day_lists(&self) -> Vec<Vec<Place>> {
        self.days.values().map(|plan| plan.places.clone()).collect()
    }

    /// Log per-day and overall metrics. Returns
    /// `(total_travel_km, longest_leg_km, total_stay_min)`.
    pub fn log_metrics(&self) -> (f64, f64, u32) {
        let mut total_km = 0.0;
        let mut longest_leg = 0.0f64;
        let mut total_stay = 0u32;

        for plan in self.days() {
            let day_km = plan.travel_km();
            let day_stay = plan.stay_minutes();
            total_km += day_km;
            total_stay += day_stay;
            for place in &plan.places {
                if place.dist_from_prev_km > longest_leg {
                    longest_leg = place.dist_from_prev_km;
                }
            }
            log::info!(
                "metrics: day_seq={} stops={} stay_min={day_stay} travel_km={day_km:.2}",
                plan.day_seq,
                plan.places.len()
            );
        }

        log::info!(
            "metrics: days={} total_km={total_km:.2} longest_leg_km={longest_leg:.2} stay_min={total_stay}",
            self.len()
        );

        (total_km, longest_leg, total_stay)
    }
}

impl Serialize for Itinerary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for plan in self.days.values() {
            map.serialize_entry(&format!("Day {}", plan.day_seq), plan)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Itinerary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, DayPlan> = BTreeMap::deserialize(deserializer)?;
        let mut days = BTreeMap::new();
        for plan in raw.into_values() {
            days.insert(plan.day_seq, plan);
        }
        Ok(Self { days })
    }
}

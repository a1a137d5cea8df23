use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PLACE_TYPE, DEFAULT_VISIT_MINUTES};
use crate::geo::GeoPoint;

/// Advisory time-of-day label attached by enrichment. Never enforced by
/// scheduling; carried through as metadata.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum BestTime {
    Morning,
    Afternoon,
    Night,
    #[default]
    Anytime,
}

/// A point of interest flowing through the planning pipeline.
///
/// `day == 0` means "not yet assigned to a day"; `visit_order == 0` means
/// "not yet ordered within its day" (also the marker the balancer leaves on
/// relocated places).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u64,
    #[serde(rename = "type", default = "default_place_type")]
    pub place_type: String,
    #[serde(default = "default_visit_minutes")]
    pub duration_min: u32,
    #[serde(default)]
    pub best_time: BestTime,
    #[serde(default)]
    pub day: u32,
    #[serde(default)]
    pub visit_order: u32,
    #[serde(default)]
    pub dist_from_prev_km: f64,
}

impl Place {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Normalize a raw search candidate into a pipeline place.
    /// Candidates without a display name are unusable for enrichment
    /// matching and are discarded.
    pub fn from_candidate(candidate: SearchCandidate) -> Option<Self> {
        if candidate.name.is_empty() {
            return None;
        }
        Some(Self {
            id: candidate.id,
            name: candidate.name,
            lat: candidate.lat,
            lng: candidate.lng,
            rating: candidate.rating,
            reviews: candidate.reviews,
            place_type: DEFAULT_PLACE_TYPE.to_string(),
            duration_min: DEFAULT_VISIT_MINUTES,
            best_time: BestTime::Anytime,
            day: 0,
            visit_order: 0,
            dist_from_prev_km: 0.0,
        })
    }
}

fn default_place_type() -> String {
    DEFAULT_PLACE_TYPE.to_string()
}

fn default_visit_minutes() -> u32 {
    DEFAULT_VISIT_MINUTES
}

/// Candidate record as returned by the external place-search collaborator.
#[derive(Clone, Debug, Deserialize)]
pub struct SearchCandidate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub photo_url: String,
}

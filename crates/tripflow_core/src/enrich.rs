use std::collections::HashMap;

use serde::Deserialize;

use crate::constants::DEFAULT_VISIT_MINUTES;
use crate::error::Result;
use crate::place::{BestTime, Place};

/// Advisory metadata resolved for one place name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct EnrichedInfo {
    pub duration_min: u32,
    pub best_time: BestTime,
}

impl Default for EnrichedInfo {
    fn default() -> Self {
        Self {
            duration_min: DEFAULT_VISIT_MINUTES,
            best_time: BestTime::Anytime,
        }
    }
}

/// External duration/best-time resolution service (LLM-backed in
/// production). Treated as a black box keyed by place name.
pub trait EnrichmentProvider {
    fn lookup(&self, names: &[String]) -> Result<HashMap<String, EnrichedInfo>>;
}

/// Resolves nothing; every place keeps its defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProvider;

impl EnrichmentProvider for NoopProvider {
    fn lookup(&self, _names: &[String]) -> Result<HashMap<String, EnrichedInfo>> {
        Ok(HashMap::new())
    }
}

/// Explicit name-to-info memoization scoped to one planning session.
/// Injected rather than process-global; no eviction, dropped with the
/// session.
#[derive(Clone, Debug, Default)]
pub struct SessionCache {
    entries: HashMap<String, EnrichedInfo>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<EnrichedInfo> {
        self.entries.get(name).copied()
    }

    pub fn insert(&mut self, name: String, info: EnrichedInfo) {
        self.entries.insert(name, info);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collaborator boundary: apply enrichment results to places without ever
/// failing the pipeline. Provider errors are logged and degraded to the
/// documented defaults; names the provider does not know keep their
/// existing `duration_min`/`best_time` values (60 / Anytime for places
/// fresh from search).
pub fn enrich_places<P: EnrichmentProvider>(
    provider: &P,
    cache: &mut SessionCache,
    mut places: Vec<Place>,
) -> Vec<Place> {
    if places.is_empty() {
        return places;
    }

    let unresolved: Vec<String> = places
        .iter()
        .map(|p| p.name.clone())
        .filter(|name| cache.get(name).is_none())
        .collect();

    if !unresolved.is_empty() {
        match provider.lookup(&unresolved) {
            Ok(resolved) => {
                log::debug!(
                    "enricher: resolved names={} requested={}",
                    resolved.len(),
                    unresolved.len()
                );
                for (name, info) in resolved {
                    cache.insert(name, info);
                }
            }
            Err(err) => {
                log::error!("enricher: provider failed, keeping defaults err={err}");
            }
        }
    }

    for place in &mut places {
        if let Some(info) = cache.get(&place.name) {
            place.duration_min = info.duration_min;
            place.best_time = info.best_time;
        }
    }

    places
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::{EnrichedInfo, EnrichmentProvider, NoopProvider, SessionCache, enrich_places};
    use crate::error::{Error, Result};
    use crate::place::tests::place;
    use crate::place::BestTime;

    struct FailingProvider;

    impl EnrichmentProvider for FailingProvider {
        fn lookup(&self, _: &[String]) -> Result<HashMap<String, EnrichedInfo>> {
            Err(Error::enrichment("model timed out"))
        }
    }

    struct CountingProvider {
        calls: Cell<usize>,
        info: EnrichedInfo,
    }

    impl EnrichmentProvider for CountingProvider {
        fn lookup(&self, names: &[String]) -> Result<HashMap<String, EnrichedInfo>> {
            self.calls.set(self.calls.get() + 1);
            Ok(names.iter().map(|n| (n.clone(), self.info)).collect())
        }
    }

    #[test]
    fn provider_failure_keeps_defaults_and_pipeline_alive() {
        let mut cache = SessionCache::new();
        let places = enrich_places(&FailingProvider, &mut cache, vec![place("a", 1.0, 2.0)]);

        assert_eq!(places[0].duration_min, 60);
        assert_eq!(places[0].best_time, BestTime::Anytime);
    }

    #[test]
    fn unknown_names_keep_existing_values() {
        let mut cache = SessionCache::new();
        let places = enrich_places(&NoopProvider, &mut cache, vec![place("a", 1.0, 2.0)]);

        assert_eq!(places[0].duration_min, 60);
        assert_eq!(places[0].best_time, BestTime::Anytime);
    }

    #[test]
    fn resolved_info_is_applied() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            info: EnrichedInfo {
                duration_min: 120,
                best_time: BestTime::Morning,
            },
        };
        let mut cache = SessionCache::new();
        let places = enrich_places(&provider, &mut cache, vec![place("a", 1.0, 2.0)]);

        assert_eq!(places[0].duration_min, 120);
        assert_eq!(places[0].best_time, BestTime::Morning);
    }

    #[test]
    fn cached_names_skip_the_provider() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            info: EnrichedInfo {
                duration_min: 45,
                best_time: BestTime::Night,
            },
        };
        let mut cache = SessionCache::new();

        let places = enrich_places(&provider, &mut cache, vec![place("a", 1.0, 2.0)]);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(cache.len(), 1);

        let places = enrich_places(&provider, &mut cache, places);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(places[0].duration_min, 45);
    }

    #[test]
    fn empty_input_never_calls_the_provider() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            info: EnrichedInfo::default(),
        };
        let mut cache = SessionCache::new();

        let places = enrich_places(&provider, &mut cache, Vec::new());
        assert!(places.is_empty());
        assert_eq!(provider.calls.get(), 0);
    }
}

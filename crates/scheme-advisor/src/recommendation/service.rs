use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::cache::RecommendationCache;
use super::catalog::SchemeCatalog;
use super::domain::{Profile, RecommendationResult, RecommendedScheme, ScoringProfile};
use super::eligibility::EligibilityEngine;
use super::fingerprint::{fingerprint, Fingerprint};
use super::gateway::{GatewayError, ScorerGateway};
use super::presentation::scored_view;
use crate::config::RecommendationConfig;

/// Orchestrator composing the cache, the external scorer, and the rule-engine fallback.
pub struct RecommendationService<G> {
    catalog: Arc<SchemeCatalog>,
    engine: EligibilityEngine,
    cache: RecommendationCache,
    gateway: Arc<G>,
    timeout: Duration,
}

impl<G> RecommendationService<G>
where
    G: ScorerGateway + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        catalog: Arc<SchemeCatalog>,
        config: &RecommendationConfig,
    ) -> Self {
        Self {
            engine: EligibilityEngine::new(Arc::clone(&catalog)),
            cache: RecommendationCache::new(config.cache),
            catalog,
            gateway,
            timeout: config.scorer.timeout,
        }
    }

    pub fn catalog(&self) -> &SchemeCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Recommend schemes for a caller-supplied profile.
    ///
    /// Gateway failures never escape: they switch the request to the rule engine and are
    /// reported through `fallback_used`.
    pub async fn recommend(&self, profile: &Profile) -> RecommendationResult {
        let scoring = match profile.scoring_profile() {
            Ok(scoring) => scoring,
            Err(incomplete) => {
                info!(missing = %incomplete, "profile incomplete, skipping recommendation");
                return RecommendationResult::incomplete(incomplete.missing);
            }
        };

        let key = fingerprint(&scoring);
        if let Some(entry) = self.cache.get(&key) {
            debug!(fingerprint = %key, "recommendation cache hit");
            return RecommendationResult::scored(entry.schemes.as_ref().clone());
        }
        debug!(fingerprint = %key, "recommendation cache miss");

        match self.score(&scoring, &key).await {
            Ok(schemes) => RecommendationResult::scored(schemes),
            Err(error) => {
                warn!(fingerprint = %key, %error, "scorer failed, using eligibility rules");
                RecommendationResult::fallback(self.engine.recommend(profile))
            }
        }
    }

    async fn score(
        &self,
        scoring: &ScoringProfile,
        key: &Fingerprint,
    ) -> Result<Vec<RecommendedScheme>, GatewayError> {
        let scored = self.gateway.call(scoring, self.timeout).await?;
        let schemes: Vec<RecommendedScheme> = scored
            .iter()
            .map(|scheme| scored_view(scheme, &self.catalog))
            .collect();

        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!(purged, "dropped expired cached recommendations");
        }
        if let Some(evicted) = self.cache.put(key.clone(), schemes.clone()) {
            debug!(fingerprint = %evicted, "evicted oldest cached recommendation");
        }
        info!(fingerprint = %key, count = schemes.len(), "scored recommendations cached");
        Ok(schemes)
    }
}

//! Scheme recommendation core: eligibility rules, fingerprinting, the scored-result
//! cache, the external scorer gateway, and the orchestrator tying them together.

pub mod cache;
pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod fingerprint;
pub mod gateway;
pub mod presentation;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{CacheEntry, RecommendationCache};
pub use catalog::{CatalogError, EligibilityCriteria, SchemeCatalog, SchemeRecord};
pub use domain::{
    Category, Gender, LocalityType, Profile, ProfileField, ProfileIncomplete,
    RecommendationBasis, RecommendationResult, RecommendedScheme, SchemeId, ScoredScheme,
    ScoringProfile,
};
pub use eligibility::{
    compute_eligible, is_eligible, EligibilityEngine, EligibilityOutcome, Predicate,
    PredicateCheck,
};
pub use fingerprint::{fingerprint, Fingerprint};
pub use gateway::{GatewayError, ProcessScorer, ScorerGateway};
pub use router::{recommendation_router, ProfileSummary, RecommendationResponse};
pub use service::RecommendationService;

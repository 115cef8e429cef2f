use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::catalog::SchemeRecord;
use super::domain::{Category, Profile, RecommendationResult, SchemeId};
use super::gateway::ScorerGateway;
use super::service::RecommendationService;
use crate::error::AppError;

/// Scoring-relevant echo of the caller's profile. Name and email are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub age: Option<u32>,
    pub category: Option<Category>,
    pub state: Option<String>,
    pub annual_income: Option<u64>,
    #[serde(rename = "isBPL")]
    pub is_bpl: bool,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            age: profile.age,
            category: profile.category,
            state: profile.state.clone(),
            annual_income: profile.annual_income,
            is_bpl: profile.is_bpl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub result: RecommendationResult,
    pub user_profile: ProfileSummary,
}

/// Router builder exposing recommendations and read-only catalog lookups.
pub fn recommendation_router<G>(service: Arc<RecommendationService<G>>) -> Router
where
    G: ScorerGateway + 'static,
{
    Router::new()
        .route("/api/v1/schemes", get(catalog_handler::<G>))
        .route("/api/v1/schemes/recommend", post(recommend_handler::<G>))
        .route("/api/v1/schemes/:scheme_id", get(scheme_handler::<G>))
        .with_state(service)
}

pub(crate) async fn recommend_handler<G>(
    State(service): State<Arc<RecommendationService<G>>>,
    Json(profile): Json<Profile>,
) -> Json<RecommendationResponse>
where
    G: ScorerGateway + 'static,
{
    let result = service.recommend(&profile).await;
    Json(RecommendationResponse {
        result,
        user_profile: ProfileSummary::from(&profile),
    })
}

pub(crate) async fn catalog_handler<G>(
    State(service): State<Arc<RecommendationService<G>>>,
) -> Json<Vec<SchemeRecord>>
where
    G: ScorerGateway + 'static,
{
    Json(service.catalog().schemes().to_vec())
}

pub(crate) async fn scheme_handler<G>(
    State(service): State<Arc<RecommendationService<G>>>,
    Path(scheme_id): Path<String>,
) -> Result<Json<SchemeRecord>, AppError>
where
    G: ScorerGateway + 'static,
{
    let record = service.catalog().require(&SchemeId(scheme_id))?;
    Ok(Json(record.clone()))
}

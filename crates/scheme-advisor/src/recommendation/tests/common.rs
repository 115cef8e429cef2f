use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::config::{CacheConfig, RecommendationConfig, ScorerConfig};
use crate::recommendation::catalog::{EligibilityCriteria, SchemeCatalog, SchemeRecord};
use crate::recommendation::domain::{
    Category, Gender, LocalityType, Profile, SchemeId, ScoredScheme, ScoringProfile,
};
use crate::recommendation::gateway::{GatewayError, ScorerGateway};
use crate::recommendation::service::RecommendationService;

pub(super) fn bihar_student() -> Profile {
    Profile {
        name: Some("Sunita Oraon".to_string()),
        email: Some("sunita@example.org".to_string()),
        age: Some(17),
        gender: Some(Gender::Female),
        category: Some(Category::St),
        state: Some("Bihar".to_string()),
        locality_type: Some(LocalityType::Rural),
        annual_income: Some(200_000),
        is_bpl: false,
    }
}

pub(super) fn rural_senior() -> Profile {
    Profile {
        name: None,
        email: None,
        age: Some(67),
        gender: Some(Gender::Male),
        category: Some(Category::Obc),
        state: Some("Odisha".to_string()),
        locality_type: Some(LocalityType::Rural),
        annual_income: Some(20_000),
        is_bpl: true,
    }
}

pub(super) fn scheme_with(id: &str, criteria: EligibilityCriteria) -> SchemeRecord {
    SchemeRecord {
        id: SchemeId(id.to_string()),
        name: format!("{id} scheme"),
        description: "test scheme".to_string(),
        category: "Education".to_string(),
        criteria,
        benefits: "test benefits".to_string(),
        icon: "📚".to_string(),
    }
}

pub(super) fn ranked() -> Vec<ScoredScheme> {
    vec![
        ScoredScheme {
            name: "SC/ST Post-Matric Scholarship".to_string(),
            category: Some("Education".to_string()),
            score: 0.93,
        },
        ScoredScheme {
            name: "Bihar Student Credit Card".to_string(),
            category: None,
            score: 0.71,
        },
    ]
}

pub(super) fn recommendation_config() -> RecommendationConfig {
    RecommendationConfig {
        scorer: ScorerConfig {
            program: "unused".to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(2),
        },
        cache: CacheConfig {
            ttl: Duration::from_secs(3600),
            capacity: 100,
        },
        catalog_path: None,
    }
}

/// Scorer double returning a configurable outcome and counting invocations.
pub(super) struct StubScorer {
    outcome: Mutex<Result<Vec<ScoredScheme>, GatewayError>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ScoringProfile>>,
}

impl StubScorer {
    pub(super) fn returning(schemes: Vec<ScoredScheme>) -> Self {
        Self {
            outcome: Mutex::new(Ok(schemes)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(super) fn failing(error: GatewayError) -> Self {
        Self {
            outcome: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub(super) fn set_outcome(&self, outcome: Result<Vec<ScoredScheme>, GatewayError>) {
        *self.outcome.lock().expect("outcome mutex poisoned") = outcome;
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_request(&self) -> Option<ScoringProfile> {
        self.last_request
            .lock()
            .expect("request mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl ScorerGateway for StubScorer {
    async fn call(
        &self,
        profile: &ScoringProfile,
        _timeout: Duration,
    ) -> Result<Vec<ScoredScheme>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("request mutex poisoned") = Some(profile.clone());
        tokio::task::yield_now().await;
        self.outcome.lock().expect("outcome mutex poisoned").clone()
    }
}

/// Scorer that never answers; records when its in-flight call is dropped.
#[derive(Default)]
pub(super) struct HangingScorer {
    pub(super) started: AtomicUsize,
    pub(super) cancelled: Arc<AtomicBool>,
}

struct CancelFlag(Arc<AtomicBool>);

impl Drop for CancelFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScorerGateway for HangingScorer {
    async fn call(
        &self,
        _profile: &ScoringProfile,
        timeout: Duration,
    ) -> Result<Vec<ScoredScheme>, GatewayError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _flag = CancelFlag(Arc::clone(&self.cancelled));
        match tokio::time::timeout(timeout, std::future::pending::<()>()).await {
            Ok(()) => Ok(Vec::new()),
            Err(_) => Err(GatewayError::Timeout(timeout)),
        }
    }
}

pub(super) fn build_service<G: ScorerGateway + 'static>(
    gateway: Arc<G>,
) -> RecommendationService<G> {
    RecommendationService::new(
        gateway,
        Arc::new(SchemeCatalog::standard()),
        &recommendation_config(),
    )
}

pub(super) fn scheme_ids(schemes: &[crate::recommendation::RecommendedScheme]) -> Vec<&str> {
    schemes.iter().map(|scheme| scheme.id.0.as_str()).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

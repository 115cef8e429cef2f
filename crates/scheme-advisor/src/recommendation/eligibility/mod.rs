mod rules;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::catalog::{SchemeCatalog, SchemeRecord};
use super::domain::{Profile, RecommendationBasis, RecommendedScheme, SchemeId};

/// Predicate family a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Category,
    Age,
    MaxIncome,
    Gender,
    BelowPovertyLine,
    Locality,
}

/// Result of a single predicate, kept for explainable fallback output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateCheck {
    pub predicate: Predicate,
    pub passed: bool,
    pub note: String,
}

impl PredicateCheck {
    fn pass(predicate: Predicate, note: impl Into<String>) -> Self {
        Self {
            predicate,
            passed: true,
            note: note.into(),
        }
    }

    fn fail(predicate: Predicate, note: impl Into<String>) -> Self {
        Self {
            predicate,
            passed: false,
            note: note.into(),
        }
    }
}

/// Per-scheme evaluation with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub scheme_id: SchemeId,
    pub eligible: bool,
    pub checks: Vec<PredicateCheck>,
}

impl EligibilityOutcome {
    pub fn rationale(&self) -> Vec<String> {
        if self.checks.is_empty() {
            return vec!["no eligibility restrictions".to_string()];
        }
        self.checks
            .iter()
            .filter(|check| check.passed == self.eligible)
            .map(|check| check.note.clone())
            .collect()
    }
}

/// All declared predicates must hold; undeclared ones are unconstrained.
pub fn is_eligible(scheme: &SchemeRecord, profile: &Profile) -> bool {
    evaluate(scheme, profile).eligible
}

/// Eligible schemes in catalog declaration order.
pub fn compute_eligible<'a>(
    profile: &Profile,
    catalog: &'a SchemeCatalog,
) -> Vec<&'a SchemeRecord> {
    catalog
        .schemes()
        .iter()
        .filter(|scheme| is_eligible(scheme, profile))
        .collect()
}

pub fn evaluate(scheme: &SchemeRecord, profile: &Profile) -> EligibilityOutcome {
    let checks = rules::check_criteria(&scheme.criteria, profile);
    let eligible = checks.iter().all(|check| check.passed);
    EligibilityOutcome {
        scheme_id: scheme.id.clone(),
        eligible,
        checks,
    }
}

/// Stateless evaluator bound to the process-wide catalog.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    catalog: Arc<SchemeCatalog>,
}

impl EligibilityEngine {
    pub fn new(catalog: Arc<SchemeCatalog>) -> Self {
        Self { catalog }
    }

    /// Deterministic recommendation list used when the scorer cannot be relied on.
    pub fn recommend(&self, profile: &Profile) -> Vec<RecommendedScheme> {
        self.catalog
            .schemes()
            .iter()
            .filter_map(|scheme| {
                let outcome = evaluate(scheme, profile);
                outcome.eligible.then(|| RecommendedScheme {
                    id: scheme.id.clone(),
                    name: scheme.name.clone(),
                    description: scheme.description.clone(),
                    category: scheme.category.clone(),
                    benefits: scheme.benefits.clone(),
                    icon: scheme.icon.clone(),
                    basis: RecommendationBasis::Eligibility {
                        rationale: outcome.rationale(),
                    },
                })
            })
            .collect()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog schemes and scored recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemeId(pub String);

impl fmt::Display for SchemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Social category used by most scheme eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    General,
    #[serde(rename = "General(EWS)")]
    GeneralEws,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::GeneralEws => "General(EWS)",
            Category::Obc => "OBC",
            Category::Sc => "SC",
            Category::St => "ST",
        }
    }

    pub fn all() -> [Category; 5] {
        [
            Category::General,
            Category::GeneralEws,
            Category::Obc,
            Category::Sc,
            Category::St,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male")]
    Male,
    #[serde(alias = "Female")]
    Female,
    #[serde(alias = "Other")]
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalityType {
    Urban,
    #[serde(rename = "Semi-Urban")]
    SemiUrban,
    Rural,
}

impl LocalityType {
    pub fn label(&self) -> &'static str {
        match self {
            LocalityType::Urban => "Urban",
            LocalityType::SemiUrban => "Semi-Urban",
            LocalityType::Rural => "Rural",
        }
    }
}

/// Citizen attributes supplied by the calling layer for a single request.
///
/// Every attribute is optional on the wire; the orchestrator decides which ones are
/// required and the rule engine treats an absent attribute as failing any predicate
/// that references it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub category: Option<Category>,
    pub state: Option<String>,
    pub locality_type: Option<LocalityType>,
    pub annual_income: Option<u64>,
    #[serde(default, rename = "isBPL")]
    pub is_bpl: bool,
}

impl Profile {
    /// Fields the orchestrator requires before any scoring is attempted.
    pub fn missing_fields(&self) -> Vec<ProfileField> {
        let mut missing = Vec::new();
        if self.age.map(|age| age == 0).unwrap_or(true) {
            missing.push(ProfileField::Age);
        }
        if self.category.is_none() {
            missing.push(ProfileField::Category);
        }
        if self
            .state
            .as_deref()
            .map(|state| state.trim().is_empty())
            .unwrap_or(true)
        {
            missing.push(ProfileField::State);
        }
        if self.annual_income.is_none() {
            missing.push(ProfileField::AnnualIncome);
        }
        missing
    }

    /// Extracts the scoring-relevant subset, failing when a required field is absent.
    pub fn scoring_profile(&self) -> Result<ScoringProfile, ProfileIncomplete> {
        match (self.age, self.category, self.state.as_deref(), self.annual_income) {
            (Some(age), Some(category), Some(state), Some(annual_income))
                if age > 0 && !state.trim().is_empty() =>
            {
                Ok(ScoringProfile {
                    age,
                    category,
                    annual_income,
                    state: state.trim().to_string(),
                    is_bpl: self.is_bpl,
                })
            }
            _ => Err(ProfileIncomplete {
                missing: self.missing_fields(),
            }),
        }
    }
}

/// Required profile attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Age,
    Category,
    State,
    AnnualIncome,
}

impl ProfileField {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::Category => "category",
            ProfileField::State => "state",
            ProfileField::AnnualIncome => "annualIncome",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("profile incomplete: missing {}", format_fields(.missing))]
pub struct ProfileIncomplete {
    pub missing: Vec<ProfileField>,
}

fn format_fields(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(ProfileField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validated subset of a profile sent to the external scorer and used for cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringProfile {
    pub age: u32,
    pub category: Category,
    pub annual_income: u64,
    pub state: String,
    #[serde(rename = "isBPL")]
    pub is_bpl: bool,
}

/// One entry of the scorer's ranked output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredScheme {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub score: f64,
}

/// Why a scheme appears in a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationBasis {
    Score { score: f64 },
    Eligibility { rationale: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedScheme {
    pub id: SchemeId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub benefits: String,
    pub icon: String,
    pub basis: RecommendationBasis,
}

pub const PROFILE_INCOMPLETE_MESSAGE: &str =
    "Please complete your profile to see eligible schemes";

/// Outcome of a recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub schemes: Vec<RecommendedScheme>,
    pub fallback_used: bool,
    pub profile_incomplete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<ProfileField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationResult {
    pub fn scored(schemes: Vec<RecommendedScheme>) -> Self {
        Self {
            schemes,
            fallback_used: false,
            profile_incomplete: false,
            missing_fields: Vec::new(),
            message: None,
        }
    }

    pub fn fallback(schemes: Vec<RecommendedScheme>) -> Self {
        Self {
            fallback_used: true,
            ..Self::scored(schemes)
        }
    }

    pub fn incomplete(missing: Vec<ProfileField>) -> Self {
        Self {
            schemes: Vec::new(),
            fallback_used: false,
            profile_incomplete: true,
            missing_fields: missing,
            message: Some(PROFILE_INCOMPLETE_MESSAGE.to_string()),
        }
    }
}

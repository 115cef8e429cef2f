use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{Category, Gender, LocalityType, SchemeId};

/// Eligibility predicates for a scheme. An absent predicate is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, rename = "isBPL", skip_serializing_if = "is_false")]
    pub requires_bpl: bool,
    #[serde(
        default,
        rename = "localityType",
        skip_serializing_if = "Option::is_none"
    )]
    pub locality_types: Option<Vec<LocalityType>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Static catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub id: SchemeId,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "eligibility")]
    pub criteria: EligibilityCriteria,
    pub benefits: String,
    pub icon: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("scheme '{0}' is not in the catalog")]
    UnknownScheme(SchemeId),
    #[error("scheme id '{0}' is declared more than once")]
    DuplicateId(SchemeId),
    #[error("catalog contains no schemes")]
    Empty,
    #[error("unable to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unable to read catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only table of schemes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeCatalog {
    schemes: Vec<SchemeRecord>,
}

impl SchemeCatalog {
    pub fn new(schemes: Vec<SchemeRecord>) -> Result<Self, CatalogError> {
        if schemes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for scheme in &schemes {
            if !seen.insert(&scheme.id) {
                return Err(CatalogError::DuplicateId(scheme.id.clone()));
            }
        }

        Ok(Self { schemes })
    }

    pub fn standard() -> Self {
        Self {
            schemes: standard_schemes(),
        }
    }

    /// Parses a JSON array of scheme records.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let schemes: Vec<SchemeRecord> = serde_json::from_reader(reader)?;
        Self::new(schemes)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Uses the file at `path` when given, the standard catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::standard()),
        }
    }

    pub fn schemes(&self) -> &[SchemeRecord] {
        &self.schemes
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn get(&self, id: &SchemeId) -> Option<&SchemeRecord> {
        self.schemes.iter().find(|scheme| &scheme.id == id)
    }

    pub fn require(&self, id: &SchemeId) -> Result<&SchemeRecord, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownScheme(id.clone()))
    }

    /// Case-insensitive match on the display name.
    pub fn find_by_name(&self, name: &str) -> Option<&SchemeRecord> {
        let needle = name.trim();
        self.schemes
            .iter()
            .find(|scheme| scheme.name.eq_ignore_ascii_case(needle))
    }
}

fn every_category() -> Option<Vec<Category>> {
    Some(Category::all().to_vec())
}

fn scheme(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    criteria: EligibilityCriteria,
    benefits: &str,
    icon: &str,
) -> SchemeRecord {
    SchemeRecord {
        id: SchemeId(id.to_string()),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        criteria,
        benefits: benefits.to_string(),
        icon: icon.to_string(),
    }
}

fn standard_schemes() -> Vec<SchemeRecord> {
    vec![
        scheme(
            "pmay",
            "Pradhan Mantri Awas Yojana (PMAY)",
            "Housing for all - provides financial assistance for building or buying a house",
            "Housing",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(18),
                max_income: Some(300_000),
                ..EligibilityCriteria::default()
            },
            "₹1.5-2.5 lakh subsidy on home loans",
            "🏠",
        ),
        scheme(
            "ayushman",
            "Ayushman Bharat",
            "Health insurance coverage of ₹5 lakh per family per year",
            "Healthcare",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(0),
                max_income: Some(100_000),
                ..EligibilityCriteria::default()
            },
            "₹5 lakh annual health cover",
            "🏥",
        ),
        scheme(
            "obc-scholarship",
            "OBC Scholarship",
            "Educational scholarship for OBC students pursuing higher education",
            "Education",
            EligibilityCriteria {
                categories: Some(vec![Category::Obc]),
                min_age: Some(16),
                max_age: Some(30),
                max_income: Some(800_000),
                ..EligibilityCriteria::default()
            },
            "₹12,000-20,000 per year",
            "🎓",
        ),
        scheme(
            "sc-scholarship",
            "SC/ST Post-Matric Scholarship",
            "Financial assistance for SC/ST students for post-secondary education",
            "Education",
            EligibilityCriteria {
                categories: Some(vec![Category::Sc, Category::St]),
                min_age: Some(16),
                max_age: Some(30),
                max_income: Some(250_000),
                ..EligibilityCriteria::default()
            },
            "Full tuition + maintenance allowance",
            "📚",
        ),
        scheme(
            "old-age-pension",
            "Old Age Pension",
            "Monthly pension for senior citizens belonging to BPL families",
            "Social Security",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(60),
                max_income: Some(25_000),
                ..EligibilityCriteria::default()
            },
            "₹500-2,000 per month",
            "👴",
        ),
        scheme(
            "pmjdy",
            "Pradhan Mantri Jan Dhan Yojana",
            "Zero balance bank account with RuPay debit card and accident insurance",
            "Banking",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(10),
                ..EligibilityCriteria::default()
            },
            "Free banking + ₹2 lakh accident insurance",
            "💰",
        ),
        scheme(
            "bpl-ration",
            "BPL Ration Card",
            "Subsidized food grains for families below poverty line",
            "Food Security",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(0),
                max_income: Some(25_000),
                requires_bpl: true,
                ..EligibilityCriteria::default()
            },
            "Subsidized rice, wheat, and other essentials",
            "🌾",
        ),
        scheme(
            "mudra-loan",
            "Pradhan Mantri MUDRA Yojana",
            "Loans up to ₹10 lakh for small businesses and micro-enterprises",
            "Business",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(18),
                ..EligibilityCriteria::default()
            },
            "Loans from ₹50,000 to ₹10 lakh",
            "💼",
        ),
        scheme(
            "skill-india",
            "Skill India Mission",
            "Free skill development training for youth",
            "Employment",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(16),
                max_age: Some(35),
                ..EligibilityCriteria::default()
            },
            "Free vocational training + certification",
            "🔧",
        ),
        scheme(
            "ujjwala",
            "Pradhan Mantri Ujjwala Yojana",
            "Free LPG connection for women from BPL families",
            "Energy",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(18),
                max_income: Some(25_000),
                gender: Some(Gender::Female),
                ..EligibilityCriteria::default()
            },
            "Free LPG connection + first refill support",
            "🔥",
        ),
        scheme(
            "kisan-samman",
            "PM-KISAN",
            "Direct income support to farmers",
            "Agriculture",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(18),
                locality_types: Some(vec![LocalityType::Rural]),
                ..EligibilityCriteria::default()
            },
            "₹6,000 per year in three installments",
            "🌱",
        ),
        scheme(
            "widow-pension",
            "Widow Pension Scheme",
            "Monthly pension for widows",
            "Social Security",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(18),
                max_income: Some(100_000),
                gender: Some(Gender::Female),
                ..EligibilityCriteria::default()
            },
            "₹500-1,500 per month",
            "👩",
        ),
        scheme(
            "swachh-bharat",
            "Swachh Bharat Mission",
            "Financial assistance for toilet construction",
            "Sanitation",
            EligibilityCriteria {
                categories: every_category(),
                min_age: Some(18),
                max_income: Some(100_000),
                locality_types: Some(vec![LocalityType::Rural, LocalityType::SemiUrban]),
                ..EligibilityCriteria::default()
            },
            "₹12,000 for toilet construction",
            "🚽",
        ),
    ]
}

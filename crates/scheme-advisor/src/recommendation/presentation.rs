use super::catalog::SchemeCatalog;
use super::domain::{RecommendationBasis, RecommendedScheme, SchemeId, ScoredScheme};

pub const DEFAULT_ICON: &str = "📋";
pub const DEFAULT_CATEGORY: &str = "Government Scheme";
pub const DEFAULT_BENEFITS: &str = "View official website for benefits";

/// Keyword to icon table, matched case-sensitively, first match wins.
const ICON_KEYWORDS: &[(&str, &str)] = &[
    ("PMAY", "🏠"),
    ("Ayushman", "🏥"),
    ("Scholarship", "🎓"),
    ("Pension", "👴"),
    ("PMJDY", "💰"),
    ("BPL", "🍚"),
    ("MUDRA", "💼"),
    ("Skill", "🎯"),
    ("Ujjwala", "🔥"),
    ("KISAN", "🌾"),
    ("Widow", "👩"),
    ("Swachh", "🚽"),
    ("Bus", "🚌"),
];

pub fn icon_for(name: &str) -> &'static str {
    ICON_KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(*keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Lowercase slug with runs of non-alphanumerics collapsed to `-`.
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Display view of one scorer result, enriched from the catalog when the name matches.
pub fn scored_view(scored: &ScoredScheme, catalog: &SchemeCatalog) -> RecommendedScheme {
    let record = catalog.find_by_name(&scored.name);
    let id = record
        .map(|record| record.id.clone())
        .unwrap_or_else(|| SchemeId(slug(&scored.name)));
    let benefits = record
        .map(|record| record.benefits.clone())
        .unwrap_or_else(|| DEFAULT_BENEFITS.to_string());
    let category = scored
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    RecommendedScheme {
        id,
        name: scored.name.clone(),
        description: format!(
            "Personalized recommendation based on your profile (Score: {:.0}%)",
            (scored.score * 100.0).round()
        ),
        category,
        benefits,
        icon: icon_for(&scored.name).to_string(),
        basis: RecommendationBasis::Score {
            score: scored.score,
        },
    }
}

use std::fmt;

use serde::Serialize;

use super::domain::ScoringProfile;

const SEPARATOR: &str = "|";

/// Cache key derived from the scoring-relevant profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds `age|category|income|state|bpl` with case-folded, whitespace-normalized text.
///
/// Only the five scoring fields are read, so name, email, gender, and locality never
/// influence the key.
pub fn fingerprint(profile: &ScoringProfile) -> Fingerprint {
    let state = profile
        .state
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let parts = [
        profile.age.to_string(),
        profile.category.label().to_lowercase(),
        profile.annual_income.to_string(),
        state,
        profile.is_bpl.to_string(),
    ];

    Fingerprint(parts.join(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::domain::{Category, Gender, LocalityType, Profile};

    fn profile() -> Profile {
        Profile {
            name: Some("Ravi Kumar".to_string()),
            email: Some("ravi@example.org".to_string()),
            age: Some(17),
            gender: Some(Gender::Male),
            category: Some(Category::St),
            state: Some("Bihar".to_string()),
            locality_type: Some(LocalityType::Rural),
            annual_income: Some(200_000),
            is_bpl: false,
        }
    }

    fn key(profile: &Profile) -> Fingerprint {
        fingerprint(&profile.scoring_profile().expect("complete profile"))
    }

    #[test]
    fn ignores_identity_and_non_scoring_fields() {
        let first = profile();
        let second = Profile {
            name: Some("Someone Else".to_string()),
            email: None,
            gender: Some(Gender::Female),
            locality_type: Some(LocalityType::Urban),
            ..profile()
        };

        assert_eq!(key(&first), key(&second));
    }

    #[test]
    fn normalizes_state_spelling() {
        let spaced = Profile {
            state: Some("  tamil   NADU ".to_string()),
            ..profile()
        };
        let canonical = Profile {
            state: Some("Tamil Nadu".to_string()),
            ..profile()
        };

        assert_eq!(key(&spaced), key(&canonical));
        assert_eq!(key(&canonical).as_str(), "17|st|200000|tamil nadu|false");
    }

    #[test]
    fn distinguishes_each_scoring_field() {
        let base = key(&profile());
        let variants = [
            Profile {
                age: Some(18),
                ..profile()
            },
            Profile {
                category: Some(Category::Sc),
                ..profile()
            },
            Profile {
                annual_income: Some(200_001),
                ..profile()
            },
            Profile {
                state: Some("Jharkhand".to_string()),
                ..profile()
            },
            Profile {
                is_bpl: true,
                ..profile()
            },
        ];

        for variant in &variants {
            assert_ne!(key(variant), base, "{variant:?} should change the key");
        }
    }

    #[test]
    fn never_embeds_personal_identifiers() {
        let value = key(&profile());
        assert!(!value.as_str().contains("ravi"));
        assert!(!value.as_str().contains("example.org"));
    }
}

use super::super::catalog::EligibilityCriteria;
use super::super::domain::Profile;
use super::{Predicate, PredicateCheck};

/// Evaluates every predicate the criteria declare, in a fixed order.
pub(crate) fn check_criteria(
    criteria: &EligibilityCriteria,
    profile: &Profile,
) -> Vec<PredicateCheck> {
    let mut checks = Vec::new();

    if let Some(categories) = &criteria.categories {
        let allowed = categories
            .iter()
            .map(|category| category.label())
            .collect::<Vec<_>>()
            .join("/");
        checks.push(match profile.category {
            Some(category) if categories.contains(&category) => PredicateCheck::pass(
                Predicate::Category,
                format!("category {} is one of {allowed}", category.label()),
            ),
            Some(category) => PredicateCheck::fail(
                Predicate::Category,
                format!("category {} is not one of {allowed}", category.label()),
            ),
            None => PredicateCheck::fail(Predicate::Category, "category not provided"),
        });
    }

    if criteria.min_age.is_some() || criteria.max_age.is_some() {
        checks.push(check_age(criteria.min_age, criteria.max_age, profile.age));
    }

    if let Some(max_income) = criteria.max_income {
        checks.push(match profile.annual_income {
            Some(income) if income <= max_income => PredicateCheck::pass(
                Predicate::MaxIncome,
                format!("income {income} within limit {max_income}"),
            ),
            Some(income) => PredicateCheck::fail(
                Predicate::MaxIncome,
                format!("income {income} exceeds limit {max_income}"),
            ),
            None => PredicateCheck::fail(Predicate::MaxIncome, "annual income not provided"),
        });
    }

    if let Some(required) = criteria.gender {
        checks.push(match profile.gender {
            Some(gender) if gender == required => PredicateCheck::pass(
                Predicate::Gender,
                format!("open to {} applicants", required.label()),
            ),
            Some(_) => PredicateCheck::fail(
                Predicate::Gender,
                format!("restricted to {} applicants", required.label()),
            ),
            None => PredicateCheck::fail(Predicate::Gender, "gender not provided"),
        });
    }

    if criteria.requires_bpl {
        checks.push(if profile.is_bpl {
            PredicateCheck::pass(Predicate::BelowPovertyLine, "below poverty line household")
        } else {
            PredicateCheck::fail(
                Predicate::BelowPovertyLine,
                "requires below poverty line status",
            )
        });
    }

    if let Some(localities) = &criteria.locality_types {
        let allowed = localities
            .iter()
            .map(|locality| locality.label())
            .collect::<Vec<_>>()
            .join("/");
        checks.push(match profile.locality_type {
            Some(locality) if localities.contains(&locality) => PredicateCheck::pass(
                Predicate::Locality,
                format!("{} locality is one of {allowed}", locality.label()),
            ),
            Some(locality) => PredicateCheck::fail(
                Predicate::Locality,
                format!("{} locality is not one of {allowed}", locality.label()),
            ),
            None => PredicateCheck::fail(Predicate::Locality, "locality type not provided"),
        });
    }

    checks
}

fn check_age(min_age: Option<u32>, max_age: Option<u32>, age: Option<u32>) -> PredicateCheck {
    let Some(age) = age else {
        return PredicateCheck::fail(Predicate::Age, "age not provided");
    };

    match (min_age, max_age) {
        (Some(min), _) if age < min => {
            PredicateCheck::fail(Predicate::Age, format!("age {age} below minimum {min}"))
        }
        (_, Some(max)) if age > max => {
            PredicateCheck::fail(Predicate::Age, format!("age {age} above maximum {max}"))
        }
        (Some(min), Some(max)) => {
            PredicateCheck::pass(Predicate::Age, format!("age {age} within {min}-{max}"))
        }
        (Some(min), None) => {
            PredicateCheck::pass(Predicate::Age, format!("age {age} meets minimum {min}"))
        }
        (None, Some(max)) => {
            PredicateCheck::pass(Predicate::Age, format!("age {age} within maximum {max}"))
        }
        (None, None) => PredicateCheck::pass(Predicate::Age, format!("age {age}")),
    }
}

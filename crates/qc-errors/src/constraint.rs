use regex::Regex;
use std::sync::OnceLock;

///
/// ConstraintCategory
///
/// Classification of a backend constraint name into the family of
/// integrity rule it enforces. Constraint names are generated by the DDL emitters
/// with a family-specific suffix, so a plain regex match is enough — no
/// schema lookup needed for this pass.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstraintCategory {
    Cardinality,
    LinkTarget,
    Constraint,
    NewConstraint,
    Id,
    LinkTargetDel,
    Scalar,
    Unknown,
}

struct Patterns {
    cardinality: Regex,
    link_target: Regex,
    constraint: Regex,
    newconstraint: Regex,
    id: Regex,
    link_target_del: Regex,
    scalar: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        cardinality: Regex::new(r"(?i)_cardinality_idx$").unwrap(),
        link_target: Regex::new(r"(?i)_target_fkey$").unwrap(),
        constraint: Regex::new(r"(?i)^[a-z0-9_]+_constr_[a-z0-9]+$").unwrap(),
        newconstraint: Regex::new(r"(?i)_newconstr_[a-z0-9]+$").unwrap(),
        id: Regex::new(r"(?i)_pkey$").unwrap(),
        link_target_del: Regex::new(r"(?i)_target_del_idx$").unwrap(),
        scalar: Regex::new(r"(?i)_scalar_check$").unwrap(),
    })
}

/// `classify`: match a raw backend constraint name against the
/// family patterns, in a fixed precedence order so an ambiguous name (e.g.
/// one matching both `newconstraint` and `constraint`) resolves to the more
/// specific family.
#[must_use]
pub fn classify(constraint_name: &str) -> ConstraintCategory {
    let p = patterns();
    if p.newconstraint.is_match(constraint_name) {
        ConstraintCategory::NewConstraint
    } else if p.constraint.is_match(constraint_name) {
        ConstraintCategory::Constraint
    } else if p.link_target_del.is_match(constraint_name) {
        ConstraintCategory::LinkTargetDel
    } else if p.link_target.is_match(constraint_name) {
        ConstraintCategory::LinkTarget
    } else if p.cardinality.is_match(constraint_name) {
        ConstraintCategory::Cardinality
    } else if p.id.is_match(constraint_name) {
        ConstraintCategory::Id
    } else if p.scalar.is_match(constraint_name) {
        ConstraintCategory::Scalar
    } else {
        ConstraintCategory::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user_email_constr_ab12", ConstraintCategory::Constraint)]
    #[case("user_email_newconstr_ab12", ConstraintCategory::NewConstraint)]
    #[case("user_best_friend_link_target_fkey", ConstraintCategory::LinkTarget)]
    #[case("user_pkey", ConstraintCategory::Id)]
    #[case("not_a_known_shape", ConstraintCategory::Unknown)]
    fn classify_matches_expected_family(#[case] name: &str, #[case] expected: ConstraintCategory) {
        assert_eq!(classify(name), expected);
    }
}

//! The fixed-share rule table.
//!
//! Each [`Rule`] maps a relationship, under a condition on which heir classes
//! are present, to a [`Portion`] of the estate. The first rule whose
//! relationship matches and whose condition holds applies. Relationships with
//! no matching rule inherit nothing.
//!
//! Percentages are the rounded figures used throughout the calculator
//! (`16.67` for a sixth, `33.33` for a third, `66.67` for two thirds), so
//! fixed shares do not always sum to exactly 100.

use crate::domain::{Presence, Relationship};

/// When a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// At least one son or daughter is on the roster.
    WithDescendants,
    /// No sons and no daughters.
    WithoutDescendants,
    /// At least one son.
    WithSons,
    /// No sons.
    WithoutSons,
    /// Unconditionally.
    Always,
}

impl Condition {
    /// Whether the condition holds for the given presence flags.
    #[must_use]
    pub const fn holds(self, presence: &Presence) -> bool {
        match self {
            Self::WithDescendants => presence.has_descendants(),
            Self::WithoutDescendants => !presence.has_descendants(),
            Self::WithSons => presence.has_sons(),
            Self::WithoutSons => !presence.has_sons(),
            Self::Always => true,
        }
    }
}

/// The portion of the estate a rule grants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Portion {
    /// A fixed percentage for each heir of the class.
    Fixed(f64),
    /// `single` when the heir is alone in their class, otherwise `group`
    /// divided equally between every member of the class.
    ClassSplit {
        /// Percentage for a lone heir.
        single: f64,
        /// Percentage shared by two or more heirs.
        group: f64,
    },
    /// Nothing at the fixed-share stage; settled by the residuary pass.
    Residuary,
}

impl Portion {
    /// The percentage for one heir whose class has `class_size` members.
    #[must_use]
    pub fn percentage(self, class_size: usize) -> f64 {
        match self {
            Self::Fixed(percentage) => percentage,
            Self::ClassSplit { single, .. } if class_size <= 1 => single,
            Self::ClassSplit { group, .. } => group / count_as_f64(class_size),
            Self::Residuary => 0.0,
        }
    }
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// The heir class the rule is for.
    pub relationship: Relationship,
    /// When the rule applies.
    pub condition: Condition,
    /// What it grants.
    pub portion: Portion,
}

const fn rule(relationship: Relationship, condition: Condition, portion: Portion) -> Rule {
    Rule {
        relationship,
        condition,
        portion,
    }
}

/// The fixed shares, in priority order.
///
/// Brothers, sisters and grandparents are deliberately absent and always
/// receive nothing.
pub const FIXED_SHARES: &[Rule] = &[
    rule(Relationship::Spouse, Condition::WithDescendants, Portion::Fixed(12.5)),
    rule(Relationship::Spouse, Condition::WithoutDescendants, Portion::Fixed(25.0)),
    rule(Relationship::Father, Condition::WithDescendants, Portion::Fixed(16.67)),
    rule(Relationship::Father, Condition::WithoutDescendants, Portion::Fixed(25.0)),
    rule(Relationship::Mother, Condition::WithDescendants, Portion::Fixed(16.67)),
    rule(Relationship::Mother, Condition::WithoutDescendants, Portion::Fixed(33.33)),
    rule(Relationship::Son, Condition::Always, Portion::Residuary),
    rule(
        Relationship::Daughter,
        Condition::WithoutSons,
        Portion::ClassSplit {
            single: 50.0,
            group: 66.67,
        },
    ),
    rule(Relationship::Daughter, Condition::WithSons, Portion::Residuary),
];

/// The rule that applies to `relationship` given `presence`, if any.
#[must_use]
pub fn rule_for(relationship: Relationship, presence: &Presence) -> Option<&'static Rule> {
    FIXED_SHARES
        .iter()
        .find(|rule| rule.relationship == relationship && rule.condition.holds(presence))
}

/// The fixed-share percentage for one heir of `relationship`.
#[must_use]
pub fn fixed_percentage(relationship: Relationship, presence: &Presence) -> f64 {
    rule_for(relationship, presence).map_or(0.0, |rule| {
        rule.portion.percentage(class_size(relationship, presence))
    })
}

const fn class_size(relationship: Relationship, presence: &Presence) -> usize {
    match relationship {
        Relationship::Son => presence.sons,
        Relationship::Daughter => presence.daughters,
        _ => 1,
    }
}

/// Converts an heir count for use in share arithmetic.
// counts are far below 2^52, so the conversion is exact
#[allow(clippy::cast_precision_loss)]
pub(crate) const fn count_as_f64(count: usize) -> f64 {
    count as f64
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const EMPTY: Presence = Presence {
        has_spouse: false,
        has_father: false,
        has_mother: false,
        sons: 0,
        daughters: 0,
    };

    const fn with_children(sons: usize, daughters: usize) -> Presence {
        Presence {
            sons,
            daughters,
            ..EMPTY
        }
    }

    #[test_case(Relationship::Spouse, with_children(0, 0), 25.0; "spouse without children")]
    #[test_case(Relationship::Spouse, with_children(1, 0), 12.5; "spouse with a son")]
    #[test_case(Relationship::Spouse, with_children(0, 2), 12.5; "spouse with daughters")]
    #[test_case(Relationship::Father, with_children(0, 0), 25.0; "father without children")]
    #[test_case(Relationship::Father, with_children(0, 1), 16.67; "father with a daughter")]
    #[test_case(Relationship::Mother, with_children(0, 0), 33.33; "mother without children")]
    #[test_case(Relationship::Mother, with_children(2, 0), 16.67; "mother with sons")]
    #[test_case(Relationship::Son, with_children(1, 0), 0.0; "son is residuary")]
    #[test_case(Relationship::Daughter, with_children(0, 1), 50.0; "only daughter")]
    #[test_case(Relationship::Daughter, with_children(1, 1), 0.0; "daughter with a son")]
    fn fixed_share(relationship: Relationship, presence: Presence, expected: f64) {
        let actual = fixed_percentage(relationship, &presence);
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test_case(2, 33.335; "two daughters")]
    #[test_case(3, 66.67 / 3.0; "three daughters")]
    #[test_case(4, 16.6675; "four daughters")]
    fn daughters_split_two_thirds(daughters: usize, expected: f64) {
        let actual = fixed_percentage(Relationship::Daughter, &with_children(0, daughters));
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test_case(Relationship::Brother)]
    #[test_case(Relationship::Sister)]
    #[test_case(Relationship::Grandfather)]
    #[test_case(Relationship::Grandmother)]
    fn collateral_relatives_have_no_rule(relationship: Relationship) {
        for presence in [EMPTY, with_children(1, 1), with_children(0, 3)] {
            assert!(rule_for(relationship, &presence).is_none());
            assert!(fixed_percentage(relationship, &presence).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn every_handled_class_has_exactly_one_rule_per_context() {
        let handled = [
            Relationship::Spouse,
            Relationship::Father,
            Relationship::Mother,
            Relationship::Son,
            Relationship::Daughter,
        ];
        let contexts = [
            with_children(0, 0),
            with_children(1, 0),
            with_children(0, 1),
            with_children(2, 3),
        ];

        for relationship in handled {
            for presence in &contexts {
                let matching = FIXED_SHARES
                    .iter()
                    .filter(|r| r.relationship == relationship && r.condition.holds(presence))
                    .count();
                assert_eq!(matching, 1, "{relationship} in {presence:?}");
            }
        }
    }
}

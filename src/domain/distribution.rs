//! The distribution engine.
//!
//! A distribution is computed in two stages, each producing a new immutable
//! value:
//!
//! 1. [`FixedShares::assign`] gives every heir the percentage of their rule in
//!    [`FIXED_SHARES`](crate::domain::rules::FIXED_SHARES). Sons, and
//!    daughters with a brother, get a zero placeholder.
//! 2. [`FixedShares::reallocate_residue`] splits whatever the fixed shares
//!    leave between sons and daughters, two parts to each son and one to each
//!    daughter. This only happens when both sons and daughters are present.
//!
//! The engine is a pure function of the estate and the roster. It never
//! fails: empty rosters, zero estates and negative net estates all produce a
//! well-defined (possibly degenerate) [`Distribution`].

use std::collections::BTreeMap;

use crate::domain::{
    Allocation, EstateCase, Heir, Presence, Relationship, Share,
    rules::{count_as_f64, fixed_percentage},
};

/// Adjustments to the simplified rules.
///
/// The default options reproduce the simplified rules exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOptions {
    /// Leave deceased heirs out of presence flags and class counts, and give
    /// them nothing.
    pub exclude_deceased_heirs: bool,
    /// Give the residue to sons when no daughters are present.
    pub sons_take_residue: bool,
    /// The largest undistributed amount still reported as complete.
    pub completeness_tolerance: f64,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            exclude_deceased_heirs: false,
            sons_take_residue: false,
            completeness_tolerance: 1.0,
        }
    }
}

impl RuleOptions {
    const fn counts(&self, heir: &Heir) -> bool {
        !self.exclude_deceased_heirs || heir.is_alive()
    }
}

/// Computes the distribution of `estate` between `heirs` under the default
/// rules.
#[must_use]
pub fn compute(estate: &EstateCase, heirs: &[Heir]) -> Distribution {
    compute_with(estate, heirs, &RuleOptions::default())
}

/// Computes the distribution of `estate` between `heirs`.
#[must_use]
pub fn compute_with(estate: &EstateCase, heirs: &[Heir], options: &RuleOptions) -> Distribution {
    let distribution = FixedShares::assign(estate, heirs, options).reallocate_residue();
    tracing::debug!(
        net_estate = distribution.net_estate,
        heirs = heirs.len(),
        distributed = distribution.total_distributed(),
        complete = distribution.is_complete(),
        "computed distribution"
    );
    distribution
}

/// The first stage: every heir holds their fixed share.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedShares {
    net_estate: f64,
    presence: Presence,
    allocations: Vec<Allocation>,
    options: RuleOptions,
}

impl FixedShares {
    /// Assigns each heir, in roster order, the fixed share of their class.
    #[must_use]
    pub fn assign(estate: &EstateCase, heirs: &[Heir], options: &RuleOptions) -> Self {
        let net_estate = estate.net_estate();
        let presence = Presence::of(heirs, |heir| options.counts(heir));

        let allocations = heirs
            .iter()
            .map(|heir| {
                let share = if options.counts(heir) {
                    Share::of(fixed_percentage(heir.relationship(), &presence), net_estate)
                } else {
                    Share::ZERO
                };
                Allocation::new(heir.clone(), share)
            })
            .collect();

        Self {
            net_estate,
            presence,
            allocations,
            options: *options,
        }
    }

    /// The net estate the shares are computed on.
    #[must_use]
    pub const fn net_estate(&self) -> f64 {
        self.net_estate
    }

    /// Presence flags used to select the rules.
    #[must_use]
    pub const fn presence(&self) -> &Presence {
        &self.presence
    }

    /// The fixed-share allocations, in roster order.
    #[must_use]
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Sum of the percentages held by heirs other than sons and daughters.
    #[must_use]
    pub fn used_percentage(&self) -> f64 {
        self.allocations
            .iter()
            .filter(|allocation| !allocation.relationship().is_descendant())
            .map(Allocation::share_percentage)
            .sum()
    }

    /// The second stage: settles the residue between sons and daughters.
    #[must_use]
    pub fn reallocate_residue(self) -> Distribution {
        let residue = self.residue();

        let allocations = match residue {
            Residue::NotReallocated => self.allocations,
            Residue::Reallocated {
                percentage,
                total_shares,
            } => {
                let per_share = percentage / count_as_f64(total_shares);
                self.allocations
                    .into_iter()
                    .map(|allocation| {
                        if !self.options.counts(allocation.heir()) {
                            return allocation;
                        }
                        let parts = match allocation.relationship() {
                            Relationship::Son => 2.0,
                            Relationship::Daughter => 1.0,
                            _ => return allocation,
                        };
                        let share = Share::of(per_share * parts, self.net_estate);
                        Allocation::new(allocation.heir().clone(), share)
                    })
                    .collect()
            }
        };

        Distribution {
            net_estate: self.net_estate,
            allocations,
            residue,
            tolerance: self.options.completeness_tolerance,
        }
    }

    fn residue(&self) -> Residue {
        let presence = &self.presence;
        let applies = presence.has_sons()
            && (presence.has_daughters() || self.options.sons_take_residue);
        if !applies {
            return Residue::NotReallocated;
        }

        let percentage = 100.0 - self.used_percentage();
        let total_shares = 2 * presence.sons + presence.daughters;
        tracing::debug!(percentage, total_shares, "reallocating residue");

        Residue::Reallocated {
            percentage,
            total_shares,
        }
    }
}

/// Whether, and how, the residuary pass ran.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Residue {
    /// Sons and daughters kept their fixed-stage shares.
    NotReallocated,
    /// The residue was split between sons and daughters.
    Reallocated {
        /// `100 − ` the percentage held by the other heirs.
        percentage: f64,
        /// Two parts per son plus one per daughter.
        total_shares: usize,
    },
}

/// Whether the whole net estate has been handed out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completeness {
    /// Distributed to within the tolerance.
    Complete,
    /// The amounts do not add up to the net estate.
    ///
    /// The sign of `undistributed` follows the net estate as well as the
    /// allocation, so compare [`Distribution::total_percentage`] with 100 to
    /// tell a shortfall from an over-allocation.
    Incomplete {
        /// `net estate − Σ amounts`.
        undistributed: f64,
    },
}

/// The computed shares for one estate and roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    net_estate: f64,
    allocations: Vec<Allocation>,
    residue: Residue,
    tolerance: f64,
}

impl Distribution {
    /// The net estate the shares were computed on.
    #[must_use]
    pub const fn net_estate(&self) -> f64 {
        self.net_estate
    }

    /// One allocation per heir, in roster order.
    #[must_use]
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// How the residuary pass ran.
    #[must_use]
    pub const fn residue(&self) -> Residue {
        self.residue
    }

    /// Sum of all heirs' percentages.
    #[must_use]
    pub fn total_percentage(&self) -> f64 {
        self.allocations.iter().map(Allocation::share_percentage).sum()
    }

    /// Sum of all heirs' amounts.
    #[must_use]
    pub fn total_distributed(&self) -> f64 {
        self.allocations.iter().map(Allocation::share_amount).sum()
    }

    /// The part of the net estate not allocated to anyone.
    #[must_use]
    pub fn undistributed(&self) -> f64 {
        self.net_estate - self.total_distributed()
    }

    /// Whether the net estate is fully distributed to within the tolerance.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.undistributed().abs() < self.tolerance
    }

    /// The completeness advisory.
    #[must_use]
    pub fn completeness(&self) -> Completeness {
        if self.is_complete() {
            Completeness::Complete
        } else {
            Completeness::Incomplete {
                undistributed: self.undistributed(),
            }
        }
    }

    /// Total share held by each relationship class present on the roster.
    #[must_use]
    pub fn by_relationship(&self) -> BTreeMap<Relationship, Share> {
        self.allocations
            .iter()
            .fold(BTreeMap::new(), |mut totals, allocation| {
                let total: &mut Share = totals.entry(allocation.relationship()).or_default();
                total.percentage += allocation.share_percentage();
                total.amount += allocation.share_amount();
                totals
            })
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::HeirName;
    use Relationship::{Brother, Daughter, Father, Grandmother, Mother, Sister, Son, Spouse};

    const TOLERANCE: f64 = 1e-6;

    fn heir(relationship: Relationship) -> Heir {
        Heir::new(HeirName::new(relationship.as_str()).unwrap(), relationship)
    }

    fn roster(relationships: &[Relationship]) -> Vec<Heir> {
        relationships.iter().copied().map(heir).collect()
    }

    fn estate(total: f64) -> EstateCase {
        EstateCase::with_total(total).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    fn share_of(distribution: &Distribution, relationship: Relationship) -> Share {
        distribution
            .allocations()
            .iter()
            .find(|a| a.relationship() == relationship)
            .map(Allocation::share)
            .unwrap()
    }

    #[test]
    fn lone_spouse_takes_a_quarter() {
        let distribution = compute(&estate(100_000.0), &roster(&[Spouse]));

        let spouse = share_of(&distribution, Spouse);
        assert_close(spouse.percentage, 25.0);
        assert_close(spouse.amount, 25_000.0);
        assert!(!distribution.is_complete());
    }

    #[test]
    fn spouse_with_son_takes_an_eighth() {
        let distribution = compute(&estate(100_000.0), &roster(&[Spouse, Son]));

        let spouse = share_of(&distribution, Spouse);
        assert_close(spouse.percentage, 12.5);
        assert_close(spouse.amount, 12_500.0);
        assert_close(share_of(&distribution, Son).percentage, 0.0);
    }

    #[test]
    fn parents_with_son_take_a_sixth_each() {
        let distribution = compute(&estate(120_000.0), &roster(&[Father, Mother, Son]));

        for parent in [Father, Mother] {
            let share = share_of(&distribution, parent);
            assert_close(share.percentage, 16.67);
            assert_close(share.amount, 20_004.0);
        }
        assert_close(share_of(&distribution, Son).percentage, 0.0);
        assert_eq!(distribution.residue(), Residue::NotReallocated);
    }

    #[test]
    fn son_and_daughter_split_two_to_one() {
        let distribution = compute(&estate(90_000.0), &roster(&[Son, Daughter]));

        let son = share_of(&distribution, Son);
        let daughter = share_of(&distribution, Daughter);
        assert_close(son.percentage, 200.0 / 3.0);
        assert_close(son.amount, 60_000.0);
        assert_close(daughter.percentage, 100.0 / 3.0);
        assert_close(daughter.amount, 30_000.0);
        assert_eq!(
            distribution.residue(),
            Residue::Reallocated {
                percentage: 100.0,
                total_shares: 3
            }
        );
        assert!(distribution.is_complete());
    }

    #[test]
    fn only_daughter_takes_half() {
        let distribution = compute(&estate(60_000.0), &roster(&[Daughter]));

        let daughter = share_of(&distribution, Daughter);
        assert_close(daughter.percentage, 50.0);
        assert_close(daughter.amount, 30_000.0);
    }

    #[test]
    fn empty_roster_distributes_nothing() {
        let distribution = compute(&estate(50_000.0), &[]);

        assert!(distribution.allocations().is_empty());
        assert_close(distribution.net_estate(), 50_000.0);
        assert_close(distribution.total_distributed(), 0.0);
        assert_eq!(
            distribution.completeness(),
            Completeness::Incomplete {
                undistributed: 50_000.0
            }
        );
    }

    #[test]
    fn residue_after_fixed_shares_sums_to_one_hundred() {
        let heirs = roster(&[Father, Mother, Spouse, Son, Son, Daughter]);
        let distribution = compute(&estate(240_000.0), &heirs);

        let residue = 100.0 - (16.67 + 16.67 + 12.5);
        assert_close(share_of(&distribution, Son).percentage, residue * 2.0 / 5.0);
        assert_close(share_of(&distribution, Daughter).percentage, residue / 5.0);
        assert_close(distribution.total_percentage(), 100.0);
        assert!(distribution.is_complete());
    }

    #[test]
    fn several_daughters_share_two_thirds() {
        let distribution = compute(&estate(30_000.0), &roster(&[Daughter, Daughter, Daughter]));

        for allocation in distribution.allocations() {
            assert_close(allocation.share_percentage(), 66.67 / 3.0);
        }
        assert_close(distribution.total_percentage(), 66.67);
    }

    #[test]
    fn oversubscribed_shares_are_not_scaled() {
        let heirs = roster(&[Spouse, Father, Mother, Daughter, Daughter]);
        let distribution = compute(&estate(100_000.0), &heirs);

        assert_close(distribution.total_percentage(), 12.5 + 16.67 + 16.67 + 66.67);
        assert!(distribution.undistributed() < 0.0);
        assert!(!distribution.is_complete());
    }

    #[test_case(Brother)]
    #[test_case(Sister)]
    #[test_case(Grandmother)]
    fn collateral_relatives_inherit_nothing(relationship: Relationship) {
        let distribution = compute(&estate(10_000.0), &roster(&[relationship, Son, Daughter]));

        assert_close(share_of(&distribution, relationship).percentage, 0.0);
        assert_close(distribution.total_percentage(), 100.0);
    }

    #[test]
    fn every_amount_follows_its_percentage() {
        let heirs = roster(&[Spouse, Mother, Son, Daughter, Daughter, Brother]);
        let distribution = compute(&estate(77_777.0), &heirs);

        for allocation in distribution.allocations() {
            assert_close(
                allocation.share_amount(),
                allocation.share_percentage() / 100.0 * distribution.net_estate(),
            );
        }
    }

    #[test]
    fn zero_estate_gives_zero_amounts() {
        let distribution = compute(&EstateCase::new(), &roster(&[Spouse, Son, Daughter]));

        for allocation in distribution.allocations() {
            assert!(!allocation.share_amount().is_nan());
            assert_close(allocation.share_amount(), 0.0);
        }
        assert!(distribution.is_complete());
    }

    #[test]
    fn negative_net_estate_is_tolerated() {
        let mut estate = estate(1_000.0);
        estate.set_debts(3_000.0).unwrap();

        let distribution = compute(&estate, &roster(&[Spouse]));

        assert_close(distribution.net_estate(), -2_000.0);
        assert_close(share_of(&distribution, Spouse).amount, -500.0);
    }

    #[test]
    fn heirs_are_returned_unchanged_in_roster_order() {
        let heirs = roster(&[Daughter, Spouse, Son]);
        let distribution = compute(&estate(1_000.0), &heirs);

        let returned: Vec<_> = distribution
            .allocations()
            .iter()
            .map(|a| a.heir().clone())
            .collect();
        assert_eq!(returned, heirs);
    }

    #[test]
    fn computing_twice_gives_the_same_result() {
        let heirs = roster(&[Spouse, Mother, Son, Daughter]);
        let estate = estate(64_000.0);

        assert_eq!(compute(&estate, &heirs), compute(&estate, &heirs));
    }

    #[test]
    fn roster_order_does_not_change_class_totals() {
        let estate = estate(100_000.0);
        let heirs = roster(&[Spouse, Father, Son, Daughter, Daughter, Sister]);
        let mut reversed = heirs.clone();
        reversed.reverse();
        let mut rotated = heirs.clone();
        rotated.rotate_left(2);

        let expected = compute(&estate, &heirs).by_relationship();
        for permutation in [reversed, rotated] {
            let actual = compute(&estate, &permutation).by_relationship();
            assert_eq!(actual.len(), expected.len());
            for (relationship, share) in &expected {
                assert_close(actual[relationship].percentage, share.percentage);
                assert_close(actual[relationship].amount, share.amount);
            }
        }
    }

    #[test]
    fn deceased_heirs_count_by_default() {
        let heirs = vec![heir(Son).with_alive(false), heir(Daughter)];
        let distribution = compute(&estate(90_000.0), &heirs);

        assert_close(share_of(&distribution, Son).percentage, 200.0 / 3.0);
        assert_close(share_of(&distribution, Daughter).percentage, 100.0 / 3.0);
    }

    #[test]
    fn deceased_heirs_can_be_excluded() {
        let options = RuleOptions {
            exclude_deceased_heirs: true,
            ..RuleOptions::default()
        };
        let heirs = vec![heir(Son).with_alive(false), heir(Daughter), heir(Spouse)];

        let distribution = compute_with(&estate(80_000.0), &heirs, &options);

        assert_close(share_of(&distribution, Son).percentage, 0.0);
        assert_close(share_of(&distribution, Daughter).percentage, 50.0);
        assert_close(share_of(&distribution, Spouse).percentage, 12.5);
        assert_eq!(distribution.residue(), Residue::NotReallocated);
    }

    #[test]
    fn deceased_heirs_are_skipped_by_the_residuary_pass() {
        let options = RuleOptions {
            exclude_deceased_heirs: true,
            ..RuleOptions::default()
        };
        let heirs = vec![heir(Son), heir(Daughter), heir(Daughter).with_alive(false)];

        let distribution = compute_with(&estate(30_000.0), &heirs, &options);
        let percentages: Vec<_> = distribution
            .allocations()
            .iter()
            .map(Allocation::share_percentage)
            .collect();

        assert_close(percentages[0], 200.0 / 3.0);
        assert_close(percentages[1], 100.0 / 3.0);
        assert_close(percentages[2], 0.0);
    }

    #[test]
    fn sons_alone_get_nothing_by_default() {
        let distribution = compute(&estate(100_000.0), &roster(&[Spouse, Son, Son]));

        assert_close(share_of(&distribution, Son).percentage, 0.0);
        assert_close(distribution.undistributed(), 87_500.0);
    }

    #[test]
    fn sons_alone_can_take_the_residue() {
        let options = RuleOptions {
            sons_take_residue: true,
            ..RuleOptions::default()
        };

        let distribution =
            compute_with(&estate(100_000.0), &roster(&[Spouse, Son, Son]), &options);

        for allocation in distribution.allocations() {
            if allocation.relationship() == Son {
                assert_close(allocation.share_percentage(), 43.75);
                assert_close(allocation.share_amount(), 43_750.0);
            }
        }
        assert!(distribution.is_complete());
    }

    #[test]
    fn completeness_uses_tolerance() {
        let options = RuleOptions {
            completeness_tolerance: 600.0,
            ..RuleOptions::default()
        };
        // 16.67 + 16.67 + 66.67 = 100.01%, over-allocating 100 of 1,000,000.
        let heirs = roster(&[Father, Mother, Daughter, Daughter]);

        let strict = compute(&estate(1_000_000.0), &heirs);
        let lenient = compute_with(&estate(1_000_000.0), &heirs, &options);

        assert_close(strict.undistributed(), -100.0);
        assert!(!strict.is_complete());
        assert!(lenient.is_complete());
    }

    #[test]
    fn fixed_stage_is_observable() {
        let heirs = roster(&[Spouse, Son, Daughter]);
        let fixed = FixedShares::assign(&estate(8_000.0), &heirs, &RuleOptions::default());

        assert_close(fixed.used_percentage(), 12.5);
        assert!(fixed.presence().has_sons());
        let placeholders: Vec<_> = fixed
            .allocations()
            .iter()
            .filter(|a| a.relationship().is_descendant())
            .map(Allocation::share_percentage)
            .collect();
        assert_eq!(placeholders, vec![0.0, 0.0]);

        let distribution = fixed.reallocate_residue();
        assert_close(share_of(&distribution, Son).amount, 8_000.0 * 0.875 * 2.0 / 3.0);
    }
}

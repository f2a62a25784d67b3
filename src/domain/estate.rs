//! Estate financials and the input boundary checks that guard them.

/// The financial snapshot of a deceased's estate.
///
/// All monetary fields are finite and non-negative, and bequests never
/// exceed a third of the total estate. Both are enforced by the setters, so
/// the distribution engine can treat any `EstateCase` as valid input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstateCase {
    deceased_name: Option<String>,
    total_estate: f64,
    debts: f64,
    funeral_costs: f64,
    bequests: f64,
}

/// Which monetary field an [`EstateError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The gross value of the estate.
    TotalEstate,
    /// Outstanding debts.
    Debts,
    /// Funeral costs.
    FuneralCosts,
    /// Bequests to non-heirs.
    Bequests,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TotalEstate => "total estate",
            Self::Debts => "debts",
            Self::FuneralCosts => "funeral costs",
            Self::Bequests => "bequests",
        })
    }
}

/// A monetary input was rejected at the boundary.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EstateError {
    /// The value was negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// The offending field.
        field: Field,
        /// The rejected value.
        value: f64,
    },
    /// The value was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// The offending field.
        field: Field,
    },
}

/// The result of setting the bequests on an estate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BequestOutcome {
    /// The requested amount was within the cap and was stored as given.
    Accepted,
    /// The requested amount exceeded a third of the estate and was reduced.
    Clamped {
        /// The amount that was requested.
        requested: f64,
        /// The amount that was stored.
        stored: f64,
    },
}

fn validate(field: Field, value: f64) -> Result<f64, EstateError> {
    if !value.is_finite() {
        return Err(EstateError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(EstateError::Negative { field, value });
    }
    Ok(value)
}

impl EstateCase {
    /// Creates an empty estate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an estate with the given total value and no deductions.
    ///
    /// # Errors
    ///
    /// Returns an error if `total_estate` is negative or not finite.
    pub fn with_total(total_estate: f64) -> Result<Self, EstateError> {
        let mut estate = Self::new();
        estate.set_total_estate(total_estate)?;
        Ok(estate)
    }

    /// The name of the deceased, if recorded.
    #[must_use]
    pub fn deceased_name(&self) -> Option<&str> {
        self.deceased_name.as_deref()
    }

    /// Records the name of the deceased. Blank names clear the field.
    pub fn set_deceased_name(&mut self, name: Option<String>) {
        self.deceased_name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }

    /// The gross value of the estate.
    #[must_use]
    pub const fn total_estate(&self) -> f64 {
        self.total_estate
    }

    /// Outstanding debts.
    #[must_use]
    pub const fn debts(&self) -> f64 {
        self.debts
    }

    /// Funeral costs.
    #[must_use]
    pub const fn funeral_costs(&self) -> f64 {
        self.funeral_costs
    }

    /// Bequests to non-heirs.
    #[must_use]
    pub const fn bequests(&self) -> f64 {
        self.bequests
    }

    /// The largest permitted bequest: a third of the total estate.
    #[must_use]
    pub fn max_bequest(&self) -> f64 {
        self.total_estate / 3.0
    }

    /// The estate available to heirs.
    ///
    /// `total − debts − funeral costs − bequests`. This may be zero or
    /// negative when deductions exceed the estate; the engine accepts that
    /// as a degenerate but valid input.
    #[must_use]
    pub fn net_estate(&self) -> f64 {
        self.total_estate - self.debts - self.funeral_costs - self.bequests
    }

    /// Sets the total estate value.
    ///
    /// Existing bequests are re-clamped against the new cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not finite.
    pub fn set_total_estate(&mut self, value: f64) -> Result<BequestOutcome, EstateError> {
        self.total_estate = validate(Field::TotalEstate, value)?;
        Ok(self.clamp_bequests(self.bequests))
    }

    /// Sets the outstanding debts.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not finite.
    pub fn set_debts(&mut self, value: f64) -> Result<(), EstateError> {
        self.debts = validate(Field::Debts, value)?;
        Ok(())
    }

    /// Sets the funeral costs.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not finite.
    pub fn set_funeral_costs(&mut self, value: f64) -> Result<(), EstateError> {
        self.funeral_costs = validate(Field::FuneralCosts, value)?;
        Ok(())
    }

    /// Sets the bequests, capped at a third of the total estate.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not finite.
    pub fn set_bequests(&mut self, value: f64) -> Result<BequestOutcome, EstateError> {
        let value = validate(Field::Bequests, value)?;
        Ok(self.clamp_bequests(value))
    }

    fn clamp_bequests(&mut self, requested: f64) -> BequestOutcome {
        let cap = self.max_bequest();
        if requested > cap {
            tracing::debug!(requested, cap, "bequests exceed a third of the estate");
            self.bequests = cap;
            BequestOutcome::Clamped {
                requested,
                stored: cap,
            }
        } else {
            self.bequests = requested;
            BequestOutcome::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn estate(total: f64, debts: f64, funeral: f64, bequests: f64) -> EstateCase {
        let mut estate = EstateCase::with_total(total).unwrap();
        estate.set_debts(debts).unwrap();
        estate.set_funeral_costs(funeral).unwrap();
        estate.set_bequests(bequests).unwrap();
        estate
    }

    #[test_case(100_000.0, 0.0, 0.0, 0.0, 100_000.0; "no deductions")]
    #[test_case(100_000.0, 10_000.0, 2_000.0, 8_000.0, 80_000.0; "all deductions")]
    #[test_case(90_000.0, 0.0, 0.0, 30_000.0, 60_000.0; "bequest at cap")]
    #[test_case(1_000.0, 5_000.0, 0.0, 0.0, -4_000.0; "debts exceed estate")]
    #[test_case(0.0, 0.0, 0.0, 0.0, 0.0; "empty estate")]
    fn net_estate(total: f64, debts: f64, funeral: f64, bequests: f64, expected: f64) {
        let estate = estate(total, debts, funeral, bequests);
        assert!((estate.net_estate() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn bequests_are_clamped_to_a_third() {
        let mut estate = EstateCase::with_total(90_000.0).unwrap();
        let outcome = estate.set_bequests(50_000.0).unwrap();

        assert_eq!(
            outcome,
            BequestOutcome::Clamped {
                requested: 50_000.0,
                stored: 30_000.0
            }
        );
        assert!((estate.bequests() - 30_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lowering_total_reclamps_bequests() {
        let mut estate = EstateCase::with_total(90_000.0).unwrap();
        estate.set_bequests(30_000.0).unwrap();

        let outcome = estate.set_total_estate(30_000.0).unwrap();

        assert!(matches!(outcome, BequestOutcome::Clamped { .. }));
        assert!((estate.bequests() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn raising_total_keeps_bequests() {
        let mut estate = EstateCase::with_total(30_000.0).unwrap();
        estate.set_bequests(10_000.0).unwrap();

        let outcome = estate.set_total_estate(90_000.0).unwrap();

        assert_eq!(outcome, BequestOutcome::Accepted);
        assert!((estate.bequests() - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_values_are_rejected() {
        let mut estate = EstateCase::new();
        assert_eq!(
            estate.set_debts(-1.0),
            Err(EstateError::Negative {
                field: Field::Debts,
                value: -1.0
            })
        );
        assert!(estate.set_total_estate(-10.0).is_err());
        assert!(estate.set_funeral_costs(-0.5).is_err());
        assert!(estate.set_bequests(-3.0).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut estate = EstateCase::new();
        assert_eq!(
            estate.set_total_estate(f64::NAN),
            Err(EstateError::NotFinite {
                field: Field::TotalEstate
            })
        );
        assert!(estate.set_debts(f64::INFINITY).is_err());
    }

    #[test]
    fn rejected_value_leaves_estate_unchanged() {
        let mut estate = EstateCase::with_total(500.0).unwrap();
        let _ = estate.set_total_estate(-1.0);
        assert!((estate.total_estate() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_deceased_name_is_cleared() {
        let mut estate = EstateCase::new();
        estate.set_deceased_name(Some("  ".to_string()));
        assert_eq!(estate.deceased_name(), None);

        estate.set_deceased_name(Some(" Yusuf ".to_string()));
        assert_eq!(estate.deceased_name(), Some("Yusuf"));
    }
}

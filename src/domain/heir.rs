use std::fmt;

use non_empty_string::NonEmptyString;
use uuid::Uuid;

use crate::domain::{Gender, Relationship};

/// The name of an heir. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeirName(NonEmptyString);

impl HeirName {
    /// Creates a new heir name.
    ///
    /// Surrounding whitespace is trimmed before the emptiness check.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if the trimmed name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, EmptyNameError> {
        let name: String = name.into();
        NonEmptyString::new(name.trim().to_string())
            .map(Self)
            .map_err(|_| EmptyNameError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for HeirName {
    type Error = EmptyNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeirName> for String {
    fn from(name: HeirName) -> Self {
        name.as_str().to_owned()
    }
}

impl fmt::Display for HeirName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an heir name is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("heir name must not be empty")]
pub struct EmptyNameError;

/// A person with a claim on the estate.
///
/// An heir carries no computed share. Shares are produced by the
/// distribution engine as [`Allocation`]s, leaving the heir record untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heir {
    id: Uuid,
    name: HeirName,
    relationship: Relationship,
    gender: Gender,
    is_alive: bool,
}

impl Heir {
    /// Creates a living heir with a fresh identifier and the gender implied by
    /// the relationship.
    #[must_use]
    pub fn new(name: HeirName, relationship: Relationship) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            relationship,
            gender: relationship.default_gender(),
            is_alive: true,
        }
    }

    /// Replaces the identifier.
    ///
    /// Used when restoring heirs from storage.
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Overrides the gender.
    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Sets whether the heir is alive.
    #[must_use]
    pub const fn with_alive(mut self, is_alive: bool) -> Self {
        self.is_alive = is_alive;
        self
    }

    /// The heir's unique identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The heir's name.
    #[must_use]
    pub const fn name(&self) -> &HeirName {
        &self.name
    }

    /// The heir's relationship to the deceased.
    #[must_use]
    pub const fn relationship(&self) -> Relationship {
        self.relationship
    }

    /// The heir's gender.
    #[must_use]
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// Whether the heir is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.is_alive
    }
}

/// A share of the net estate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Share {
    /// Percentage of the net estate, in the range `0..=100` for valid rosters.
    pub percentage: f64,
    /// Monetary amount: `percentage / 100 × net estate`.
    pub amount: f64,
}

impl Share {
    /// No share at all.
    pub const ZERO: Self = Self {
        percentage: 0.0,
        amount: 0.0,
    };

    /// The share worth `percentage` of `net_estate`.
    #[must_use]
    pub fn of(percentage: f64, net_estate: f64) -> Self {
        Self {
            percentage,
            amount: percentage / 100.0 * net_estate,
        }
    }
}

/// An heir together with the share computed for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    heir: Heir,
    share: Share,
}

impl Allocation {
    pub(crate) const fn new(heir: Heir, share: Share) -> Self {
        Self { heir, share }
    }

    /// The heir, unchanged from the input roster.
    #[must_use]
    pub const fn heir(&self) -> &Heir {
        &self.heir
    }

    /// The computed share.
    #[must_use]
    pub const fn share(&self) -> Share {
        self.share
    }

    /// Shorthand for the heir's relationship.
    #[must_use]
    pub const fn relationship(&self) -> Relationship {
        self.heir.relationship
    }

    /// Percentage of the net estate allocated to this heir.
    #[must_use]
    pub const fn share_percentage(&self) -> f64 {
        self.share.percentage
    }

    /// Amount of the net estate allocated to this heir.
    #[must_use]
    pub const fn share_amount(&self) -> f64 {
        self.share.amount
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The relationship of an heir to the deceased.
///
/// Only spouse, parents and children carry rules in the simplified
/// calculation. The remaining kinds are accepted so that a roster can be
/// recorded in full, but they always inherit nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Husband or wife of the deceased.
    Spouse,
    /// Father of the deceased.
    Father,
    /// Mother of the deceased.
    Mother,
    /// Son of the deceased.
    Son,
    /// Daughter of the deceased.
    Daughter,
    /// Brother of the deceased.
    Brother,
    /// Sister of the deceased.
    Sister,
    /// Grandfather of the deceased.
    Grandfather,
    /// Grandmother of the deceased.
    Grandmother,
}

impl Relationship {
    /// Every relationship kind, in display order.
    pub const ALL: [Self; 9] = [
        Self::Spouse,
        Self::Father,
        Self::Mother,
        Self::Son,
        Self::Daughter,
        Self::Brother,
        Self::Sister,
        Self::Grandfather,
        Self::Grandmother,
    ];

    /// The lowercase name used in case files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spouse => "spouse",
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Son => "son",
            Self::Daughter => "daughter",
            Self::Brother => "brother",
            Self::Sister => "sister",
            Self::Grandfather => "grandfather",
            Self::Grandmother => "grandmother",
        }
    }

    /// Whether this relationship shares in the residue (sons and daughters).
    #[must_use]
    pub const fn is_descendant(self) -> bool {
        matches!(self, Self::Son | Self::Daughter)
    }

    /// Relatives outside spouse, parents and children. They never inherit.
    #[must_use]
    pub const fn is_collateral(self) -> bool {
        matches!(
            self,
            Self::Brother | Self::Sister | Self::Grandfather | Self::Grandmother
        )
    }

    /// The gender implied by the relationship.
    ///
    /// A spouse has no implied gender and defaults to male.
    #[must_use]
    pub const fn default_gender(self) -> Gender {
        match self {
            Self::Mother | Self::Daughter | Self::Sister | Self::Grandmother => Gender::Female,
            Self::Spouse | Self::Father | Self::Son | Self::Brother | Self::Grandfather => {
                Gender::Male
            }
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = ParseRelationshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|relationship| relationship.as_str() == normalised)
            .ok_or_else(|| ParseRelationshipError(s.to_string()))
    }
}

/// Error returned when a string is not a known relationship.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "unknown relationship '{0}': expected one of spouse, father, mother, son, daughter, brother, \
     sister, grandfather, grandmother"
)]
pub struct ParseRelationshipError(String);

/// The gender of an heir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(ParseGenderError(s.to_string())),
        }
    }
}

/// Error returned when a string is not a known gender.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown gender '{0}': expected 'male' or 'female'")]
pub struct ParseGenderError(String);

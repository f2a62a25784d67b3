//! The on-disk format of an estate case.
//!
//! A case file stores the estate financials and the heir roster. TOML is the
//! default format; files with a `.yaml` or `.yml` extension are read and
//! written as YAML.

use std::{fmt, io, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    BequestOutcome, Distribution, EmptyNameError, EstateCase, EstateError, Gender, Heir, HeirName,
    Relationship, Roster, RuleOptions, compute_with,
};

/// An estate case: the financial snapshot and the heirs, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct CaseFile {
    created: DateTime<Utc>,
    estate: EstateCase,
    roster: Roster,
}

impl CaseFile {
    /// Creates a case created now.
    #[must_use]
    pub fn new(estate: EstateCase, roster: Roster) -> Self {
        Self {
            created: Utc::now(),
            estate,
            roster,
        }
    }

    /// When the case was first created.
    #[must_use]
    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// The estate financials.
    #[must_use]
    pub const fn estate(&self) -> &EstateCase {
        &self.estate
    }

    /// Mutable access to the estate financials.
    pub const fn estate_mut(&mut self) -> &mut EstateCase {
        &mut self.estate
    }

    /// The heir roster.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable access to the heir roster.
    pub const fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Computes the distribution of this case.
    #[must_use]
    pub fn distribution(&self, options: &RuleOptions) -> Distribution {
        compute_with(&self.estate, self.roster.as_slice(), options)
    }

    /// Loads a case from the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or holds
    /// values rejected by the estate or heir validation.
    pub fn load(path: &Path) -> Result<Self, CaseFileError> {
        let content = std::fs::read_to_string(path)?;
        let case = match Format::of(path) {
            Format::Toml => toml::from_str(&content)?,
            Format::Yaml => serde_yaml::from_str(&content)?,
        };
        tracing::debug!("Loaded case from {}", path.display());
        Ok(case)
    }

    /// Saves the case to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the case cannot be serialized or the file cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), CaseFileError> {
        let content = match Format::of(path) {
            Format::Toml => toml::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        std::fs::write(path, content)?;
        tracing::debug!("Saved case to {}", path.display());
        Ok(())
    }
}

impl Default for CaseFile {
    fn default() -> Self {
        Self::new(EstateCase::new(), Roster::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

/// Error reading or writing a case file.
#[derive(Debug, thiserror::Error)]
pub enum CaseFileError {
    /// The file could not be read or written.
    #[error("failed to access case file: {0}")]
    Io(#[from] io::Error),
    /// The TOML content was invalid.
    #[error("failed to parse case file: {0}")]
    ParseToml(#[from] toml::de::Error),
    /// The case could not be rendered as TOML.
    #[error("failed to serialize case file: {0}")]
    SerializeToml(#[from] toml::ser::Error),
    /// The YAML content was invalid, or could not be rendered.
    #[error("invalid YAML case file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A stored value failed validation.
#[derive(Debug, thiserror::Error)]
pub enum InvalidCase {
    /// A monetary value was rejected.
    #[error(transparent)]
    Estate(#[from] EstateError),
    /// An heir had an empty name.
    #[error("heir {id}: {source}")]
    HeirName {
        /// The heir's identifier.
        id: Uuid,
        /// The underlying error.
        source: EmptyNameError,
    },
}

/// The serialized versions of a case file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deceased_name: Option<String>,
        created: DateTime<Utc>,
        #[serde(default)]
        estate: EstateV1,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        heirs: Vec<HeirV1>,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct EstateV1 {
    #[serde(default)]
    total: f64,
    #[serde(default)]
    debts: f64,
    #[serde(default)]
    funeral_costs: f64,
    #[serde(default)]
    bequests: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct HeirV1 {
    /// Generated when missing, so hand-written files may omit it.
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    name: String,
    relationship: Relationship,
    /// Defaults to the gender implied by the relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<Gender>,
    #[serde(default = "alive", skip_serializing_if = "is_alive")]
    is_alive: bool,
}

const fn alive() -> bool {
    true
}

// serde hands `skip_serializing_if` predicates a reference
#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_alive(value: &bool) -> bool {
    *value
}

impl TryFrom<Versions> for CaseFile {
    type Error = InvalidCase;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                deceased_name,
                created,
                estate: stored,
                heirs,
            } => {
                let mut estate = EstateCase::with_total(stored.total)?;
                estate.set_deceased_name(deceased_name);
                estate.set_debts(stored.debts)?;
                estate.set_funeral_costs(stored.funeral_costs)?;
                if let BequestOutcome::Clamped { requested, stored: capped } =
                    estate.set_bequests(stored.bequests)?
                {
                    tracing::warn!(
                        "Stored bequests of {requested} exceed a third of the estate; using \
                         {capped}"
                    );
                }

                let roster = heirs
                    .into_iter()
                    .map(|heir| {
                        let name = HeirName::try_from(heir.name).map_err(|source| {
                            InvalidCase::HeirName {
                                id: heir.id,
                                source,
                            }
                        })?;
                        let mut domain = Heir::new(name, heir.relationship)
                            .with_id(heir.id)
                            .with_alive(heir.is_alive);
                        if let Some(gender) = heir.gender {
                            domain = domain.with_gender(gender);
                        }
                        Ok(domain)
                    })
                    .collect::<Result<Roster, InvalidCase>>()?;

                Ok(Self {
                    created,
                    estate,
                    roster,
                })
            }
        }
    }
}

impl From<CaseFile> for Versions {
    fn from(case: CaseFile) -> Self {
        let estate = &case.estate;
        Self::V1 {
            deceased_name: estate.deceased_name().map(ToString::to_string),
            created: case.created,
            estate: EstateV1 {
                total: estate.total_estate(),
                debts: estate.debts(),
                funeral_costs: estate.funeral_costs(),
                bequests: estate.bequests(),
            },
            heirs: case
                .roster
                .iter()
                .map(|heir| HeirV1 {
                    id: heir.id(),
                    name: heir.name().clone().into(),
                    relationship: heir.relationship(),
                    gender: (heir.gender() != heir.relationship().default_gender())
                        .then_some(heir.gender()),
                    is_alive: heir.is_alive(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for CaseFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.estate.deceased_name() {
            Some(name) => write!(f, "estate of {name}")?,
            None => write!(f, "unnamed estate")?,
        }
        write!(f, " ({} heirs)", self.roster.len())
    }
}

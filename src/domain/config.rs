use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::RuleOptions;

/// Configuration for a case directory.
///
/// Holds the opt-in corrections to the simplified rules and the presentation
/// settings used when reporting a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether heirs marked as deceased are left out of the calculation.
    ///
    /// When `false` (default) they are counted exactly like living heirs.
    pub exclude_deceased_heirs: bool,

    /// Whether sons with no daughters present take the residue.
    ///
    /// When `false` (default) sons only inherit alongside daughters.
    pub sons_take_residue: bool,

    /// The largest undistributed amount still reported as a complete
    /// distribution.
    completeness_tolerance: f64,

    /// Symbol printed in front of monetary amounts.
    currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_deceased_heirs: false,
            sons_take_residue: false,
            completeness_tolerance: default_tolerance(),
            currency: default_currency(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the completeness tolerance.
    #[must_use]
    pub const fn completeness_tolerance(&self) -> f64 {
        self.completeness_tolerance
    }

    /// Sets the completeness tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or not finite.
    pub fn set_completeness_tolerance(&mut self, tolerance: f64) -> Result<(), String> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(format!(
                "Tolerance must be a non-negative number, got {tolerance}"
            ));
        }
        self.completeness_tolerance = tolerance;
        Ok(())
    }

    /// Returns the currency symbol.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Sets the currency symbol.
    pub fn set_currency(&mut self, currency: String) {
        self.currency = currency;
    }

    /// The rule options handed to the distribution engine.
    #[must_use]
    pub const fn rule_options(&self) -> RuleOptions {
        RuleOptions {
            exclude_deceased_heirs: self.exclude_deceased_heirs,
            sons_take_residue: self.sons_take_residue,
            completeness_tolerance: self.completeness_tolerance,
        }
    }
}

const fn default_tolerance() -> f64 {
    1.0
}

fn default_currency() -> String {
    "$".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        exclude_deceased_heirs: bool,

        #[serde(default)]
        sons_take_residue: bool,

        #[serde(default = "default_tolerance")]
        completeness_tolerance: f64,

        #[serde(default = "default_currency")]
        currency: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                exclude_deceased_heirs,
                sons_take_residue,
                completeness_tolerance,
                currency,
            } => Self {
                exclude_deceased_heirs,
                sons_take_residue,
                completeness_tolerance,
                currency,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            exclude_deceased_heirs: config.exclude_deceased_heirs,
            sons_take_residue: config.sons_take_residue,
            completeness_tolerance: config.completeness_tolerance,
            currency: config.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nexclude_deceased_heirs = true\nsons_take_residue = true\ncompleteness_tolerance = 0.01\ncurrency = \"\xc2\xa3\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(config.exclude_deceased_heirs);
        assert!(config.sons_take_residue);
        assert!((config.completeness_tolerance() - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.currency(), "£");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nsons_take_residue = \"yes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = Config::default();
        config.sons_take_residue = true;
        config.set_currency("€".to_string());

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let mut config = Config::default();
        assert!(config.set_completeness_tolerance(-1.0).is_err());
        assert!(config.set_completeness_tolerance(f64::NAN).is_err());
        assert!((config.completeness_tolerance() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn defaults_reproduce_simplified_rules() {
        let options = Config::default().rule_options();
        assert!(!options.exclude_deceased_heirs);
        assert!(!options.sons_take_residue);
    }
}

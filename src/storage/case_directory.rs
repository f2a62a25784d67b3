//! A filesystem backed estate case
//!
//! A [`CaseDirectory`] is a directory holding a `case.toml` (or `case.yaml`)
//! and an optional `.faraid/config.toml`. It is the unit the command line
//! tool operates on.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    domain::{Config, Distribution},
    storage::{CaseFile, CaseFileError},
};

/// File names recognised as a case file, in order of preference.
pub const CASE_FILE_NAMES: [&str; 3] = ["case.toml", "case.yaml", "case.yml"];

/// Directory holding per-case metadata.
pub const METADATA_DIR: &str = ".faraid";

/// An estate case stored in a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDirectory {
    root: PathBuf,
    case_path: PathBuf,
    config: Config,
    case: CaseFile,
}

impl CaseDirectory {
    /// Creates a new, empty case in `root`.
    ///
    /// The directory is created if needed. A default configuration is written
    /// alongside the case file.
    ///
    /// # Errors
    ///
    /// Returns an error if a case already exists in `root`, or if any file
    /// cannot be written.
    pub fn init(root: PathBuf, deceased_name: Option<String>) -> Result<Self, InitError> {
        if let Some(existing) = find_case_file(&root) {
            return Err(InitError::AlreadyInitialised(existing));
        }

        std::fs::create_dir_all(root.join(METADATA_DIR))?;

        let config = Config::default();
        config
            .save(&config_path(&root))
            .map_err(InitError::Config)?;

        let mut case = CaseFile::default();
        case.estate_mut().set_deceased_name(deceased_name);
        let case_path = root.join(CASE_FILE_NAMES[0]);
        case.save(&case_path)?;

        tracing::info!("Initialised case in {}", root.display());
        Ok(Self {
            root,
            case_path,
            config,
            case,
        })
    }

    /// Opens the case stored in `root`.
    ///
    /// A missing or unreadable configuration falls back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no case file in `root`, or if it cannot be
    /// loaded.
    pub fn open(root: PathBuf) -> Result<Self, OpenError> {
        let case_path = find_case_file(&root).ok_or_else(|| OpenError::NotFound(root.clone()))?;
        let case = CaseFile::load(&case_path).map_err(|source| OpenError::Load {
            path: case_path.clone(),
            source,
        })?;
        let config = load_config(&root);
        tracing::debug!("Opened {case} in {}", root.display());

        Ok(Self {
            root,
            case_path,
            config,
            case,
        })
    }

    /// Writes the case file back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the case cannot be serialized or written.
    pub fn save(&self) -> Result<(), CaseFileError> {
        self.case.save(&self.case_path)
    }

    /// Writes the configuration back to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata directory or the configuration file
    /// cannot be written.
    pub fn save_config(&self) -> Result<(), String> {
        std::fs::create_dir_all(self.root.join(METADATA_DIR))
            .map_err(|e| format!("Failed to create {METADATA_DIR} directory: {e}"))?;
        self.config.save(&config_path(&self.root))
    }

    /// The directory the case lives in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path of the case file.
    #[must_use]
    pub fn case_path(&self) -> &Path {
        &self.case_path
    }

    /// The case configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration.
    pub const fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The stored case.
    #[must_use]
    pub const fn case(&self) -> &CaseFile {
        &self.case
    }

    /// Mutable access to the stored case.
    pub const fn case_mut(&mut self) -> &mut CaseFile {
        &mut self.case
    }

    /// Computes the distribution with the configured rule options.
    #[must_use]
    pub fn distribution(&self) -> Distribution {
        self.case.distribution(&self.config.rule_options())
    }
}

/// Finds every case directory below `root`.
///
/// Directories are returned in a stable (sorted) order. Anything inside a
/// `.faraid` metadata directory is ignored.
#[must_use]
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != OsStr::new(METADATA_DIR))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| CASE_FILE_NAMES.contains(&name))
        })
        .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
        .collect();
    roots.sort();
    roots.dedup();
    roots
}

fn find_case_file(root: &Path) -> Option<PathBuf> {
    CASE_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

fn config_path(root: &Path) -> PathBuf {
    root.join(METADATA_DIR).join("config.toml")
}

fn load_config(root: &Path) -> Config {
    let path = config_path(root);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

/// Error creating a new case.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// A case file already exists.
    #[error("a case already exists at {}", .0.display())]
    AlreadyInitialised(PathBuf),
    /// The configuration could not be written.
    #[error("failed to write configuration: {0}")]
    Config(String),
    /// The case file could not be written.
    #[error(transparent)]
    CaseFile(#[from] CaseFileError),
    /// The directories could not be created.
    #[error("failed to create case directory: {0}")]
    Io(#[from] io::Error),
}

/// Error opening an existing case.
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    /// No case file was found.
    #[error("no case found in {}; run 'faraid init' first", .0.display())]
    NotFound(PathBuf),
    /// The case file could not be loaded.
    #[error("failed to load {}: {source}", .path.display())]
    Load {
        /// The case file.
        path: PathBuf,
        /// The underlying error.
        source: CaseFileError,
    },
}

mod case_directory;
/// The versioned on-disk case format.
pub mod case_file;

pub use case_directory::{
    CASE_FILE_NAMES, CaseDirectory, InitError, METADATA_DIR, OpenError, discover,
};
pub use case_file::{CaseFile, CaseFileError, InvalidCase};

//! Simplified Islamic inheritance (Faraid) distribution
//!
//! An estate's net value is shared between heirs by a small table of fixed
//! shares, with sons and daughters splitting the residue two to one.

pub mod domain;
pub use domain::{
    Allocation, Config, Distribution, EstateCase, Gender, Heir, HeirName, Relationship, Roster,
    compute, compute_with,
};

/// Filesystem storage for estate cases.
pub mod storage;
pub use storage::{CaseDirectory, CaseFile};

//! Domain models for inheritance distribution.
//!
//! This module contains the estate and heir types, the fixed-share rule table
//! and the distribution engine that combines them.

mod config;
pub use config::Config;

/// The distribution engine.
pub mod distribution;
pub use distribution::{
    Completeness, Distribution, FixedShares, Residue, RuleOptions, compute, compute_with,
};

pub mod estate;
pub use estate::{BequestOutcome, EstateCase, EstateError};

mod heir;
pub use heir::{Allocation, EmptyNameError, Heir, HeirName, Share};

mod relationship;
pub use relationship::{Gender, ParseGenderError, ParseRelationshipError, Relationship};

mod roster;
pub use roster::{Presence, Roster};

pub mod rules;

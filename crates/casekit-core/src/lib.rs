//! # casekit-core
//!
//! Core types, traits, and custom-attribute logic for casekit.
//!
//! Case objects (IOCs, events, assets, tasks, notes, evidence files) each
//! carry a tenant-configurable custom-attribute document. This crate
//! reconciles those documents against the administered default schema,
//! merges submitted values into them, and validates candidate schemas.
//! Storage is abstracted behind the traits in [`traits`].

pub mod attributes;
pub mod error;
pub mod logging;
pub mod mock;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use attributes::{
    merge_into_object, merge_into_template, reconcile_schema, validate_attribute,
    AttributeReconciler, MergeOutcome, MergeResult, MergeTarget, ReconcileReport,
    ValidationReport,
};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;

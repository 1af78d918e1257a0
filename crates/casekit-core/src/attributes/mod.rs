//! Custom-attribute schema handling.
//!
//! - [`reconcile`]: structural sync of stored documents against the default.
//! - [`merge`]: writing submitted values into a document.
//! - [`validate`]: advisory checks on documents supplied as text.
//! - [`reconciler`]: the repository-backed service tying these together.

pub mod merge;
pub mod reconcile;
pub mod reconciler;
pub mod validate;

pub use merge::{merge_into_object, merge_into_template, MergeOutcome};
pub use reconcile::reconcile_schema;
pub use reconciler::{AttributeReconciler, MergeResult, MergeTarget, ReconcileReport};
pub use validate::{validate_attribute, ValidationReport};

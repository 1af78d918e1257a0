//! Repository-backed reconciliation and merge of custom attributes.
//!
//! ## Write discipline
//!
//! - `reconcile_all` saves each modified object on its own. A failure
//!   partway through leaves earlier objects migrated and later ones
//!   untouched; there is no run-wide rollback.
//! - Objects whose document did not change are never written, which makes
//!   repeated runs against an unchanged default free of writes.
//! - `merge_values` without a live object works on a clone of the default
//!   and never persists it.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::attributes::merge::{merge_into_object, merge_into_template};
use crate::attributes::reconcile::reconcile_schema;
use crate::attributes::validate::validate_attribute;
use crate::error::{Error, Result};
use crate::models::{AttributeSchema, AttributeValues, CustomAttributeDefinition, ObjectType};
use crate::traits::{AttributedObjectRepository, CustomAttributeRepository};

/// Outcome of one reconciliation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub object_type: ObjectType,
    /// Objects loaded.
    pub scanned: usize,
    /// Objects written.
    pub updated: usize,
}

/// Which document a merge was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MergeTarget {
    /// A stored object, by primary key.
    Object(i64),
    /// A transient copy of the default schema.
    Template,
}

/// Outcome of [`AttributeReconciler::merge_values`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeResult {
    pub target: MergeTarget,
    /// The object's full current document, or the filled-in template.
    pub schema: AttributeSchema,
    pub diagnostics: Vec<String>,
    /// Whether a write was issued.
    pub persisted: bool,
}

/// Service reconciling stored custom attributes with their defaults.
#[derive(Clone)]
pub struct AttributeReconciler {
    defaults: Arc<dyn CustomAttributeRepository>,
    objects: Arc<dyn AttributedObjectRepository>,
}

impl AttributeReconciler {
    pub fn new(
        defaults: Arc<dyn CustomAttributeRepository>,
        objects: Arc<dyn AttributedObjectRepository>,
    ) -> Self {
        Self { defaults, objects }
    }

    /// Fetch the default schema for a type.
    ///
    /// The returned document is an owned copy; mutating it does not affect
    /// the administered default.
    pub async fn default_schema(&self, object_type: ObjectType) -> Result<AttributeSchema> {
        self.defaults
            .get_default(object_type)
            .await?
            .ok_or(Error::DefaultSchemaNotFound(object_type))
    }

    /// List every administered default.
    pub async fn list_defaults(&self) -> Result<Vec<CustomAttributeDefinition>> {
        self.defaults.list_definitions().await
    }

    /// Bring every stored object of `object_type` in line with the default.
    pub async fn reconcile_all(&self, object_type: ObjectType) -> Result<ReconcileReport> {
        let start = Instant::now();
        let run_id = Uuid::now_v7();

        let objects = self.objects.list_all(object_type).await?;
        let default = self.default_schema(object_type).await?;

        info!(
            subsystem = "attributes",
            component = "reconciler",
            op = "reconcile_all",
            run_id = %run_id,
            object_type = %object_type,
            scanned = objects.len(),
            "Migrating custom attributes"
        );

        let mut report = ReconcileReport {
            object_type,
            scanned: objects.len(),
            updated: 0,
        };

        for mut obj in objects {
            if !reconcile_schema(&mut obj.custom_attributes, &default) {
                continue;
            }

            let Some(schema) = obj.custom_attributes.as_ref() else {
                continue;
            };

            if let Err(e) = self.objects.save(object_type, obj.id, schema).await {
                error!(
                    subsystem = "attributes",
                    component = "reconciler",
                    op = "reconcile_all",
                    run_id = %run_id,
                    object_type = %object_type,
                    object_id = obj.id,
                    updated = report.updated,
                    error = %e,
                    "Reconciliation aborted; earlier objects keep their update"
                );
                return Err(e);
            }

            report.updated += 1;
            debug!(
                run_id = %run_id,
                object_type = %object_type,
                object_id = obj.id,
                "Custom attributes updated"
            );
        }

        info!(
            subsystem = "attributes",
            component = "reconciler",
            op = "reconcile_all",
            run_id = %run_id,
            object_type = %object_type,
            scanned = report.scanned,
            updated = report.updated,
            duration_ms = start.elapsed().as_millis() as u64,
            "Custom attribute migration complete"
        );

        Ok(report)
    }

    /// Run [`Self::reconcile_all`] for every object type, stopping at the first error.
    pub async fn reconcile_every(&self) -> Result<Vec<ReconcileReport>> {
        let mut reports = Vec::with_capacity(ObjectType::ALL.len());
        for object_type in ObjectType::ALL {
            reports.push(self.reconcile_all(object_type).await?);
        }
        Ok(reports)
    }

    /// Write submitted values into an object's document.
    ///
    /// With an `object_id` that resolves, only changed values are written and
    /// the object is saved if anything changed. Otherwise the values are
    /// applied to a copy of the default schema, which is returned unsaved.
    pub async fn merge_values(
        &self,
        data: &AttributeValues,
        object_id: Option<i64>,
        object_type: ObjectType,
    ) -> Result<MergeResult> {
        let existing = match object_id {
            Some(id) => self.objects.get(object_type, id).await?,
            None => None,
        };

        let Some(obj) = existing else {
            if let Some(id) = object_id {
                debug!(
                    object_type = %object_type,
                    object_id = id,
                    "Object not found, merging into default template"
                );
            }
            let mut template = self.default_schema(object_type).await?;
            let outcome = merge_into_template(&mut template, data, object_type);
            return Ok(MergeResult {
                target: MergeTarget::Template,
                schema: template,
                diagnostics: outcome.diagnostics,
                persisted: false,
            });
        };

        let mut schema = obj.custom_attributes.unwrap_or_default();
        let outcome = merge_into_object(&mut schema, data, object_type);

        if outcome.modified {
            self.objects.save(object_type, obj.id, &schema).await?;
        }

        debug!(
            subsystem = "attributes",
            component = "reconciler",
            op = "merge_values",
            object_type = %object_type,
            object_id = obj.id,
            persisted = outcome.modified,
            diagnostic_count = outcome.diagnostics.len(),
            "Merged custom attribute values"
        );

        Ok(MergeResult {
            target: MergeTarget::Object(obj.id),
            schema,
            diagnostics: outcome.diagnostics,
            persisted: outcome.modified,
        })
    }

    /// Validate `raw` and store it as the default schema for `object_type`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if validation produced any diagnostic; nothing is stored.
    pub async fn update_default(
        &self,
        object_type: ObjectType,
        raw: &str,
    ) -> Result<CustomAttributeDefinition> {
        let schema = validate_attribute(raw).into_schema()?;
        let definition = self.defaults.set_default(object_type, &schema).await?;

        info!(
            subsystem = "attributes",
            component = "reconciler",
            op = "update_default",
            object_type = %object_type,
            tabs = schema.len(),
            "Default custom attributes updated"
        );

        Ok(definition)
    }
}

//! Structural sync of a stored attribute document against the default schema.

use tracing::trace;

use crate::models::AttributeSchema;

/// Bring `stored` up to date with `default` without touching any `value`.
///
/// Missing tabs and fields are copied from the default; fields present on
/// both sides get `type` and `mandatory` reset to the default's. A `None`
/// document is replaced by a copy of the whole default.
///
/// Returns `true` if anything changed, i.e. the document needs saving.
pub fn reconcile_schema(stored: &mut Option<AttributeSchema>, default: &AttributeSchema) -> bool {
    let Some(current) = stored else {
        *stored = Some(default.clone());
        return true;
    };

    let mut modified = false;

    for (tab, default_fields) in default {
        let Some(fields) = current.get_mut(tab) else {
            trace!(tab = %tab, "Adding missing tab");
            current.insert(tab.clone(), default_fields.clone());
            modified = true;
            continue;
        };

        for (name, default_field) in default_fields {
            let Some(field) = fields.get_mut(name) else {
                trace!(tab = %tab, field = %name, "Adding missing field");
                fields.insert(name.clone(), default_field.clone());
                modified = true;
                continue;
            };

            if field.field_type != default_field.field_type {
                field.field_type = default_field.field_type.clone();
                modified = true;
            }

            if field.mandatory != default_field.mandatory {
                field.mandatory = default_field.mandatory;
                modified = true;
            }
        }
    }

    modified
}

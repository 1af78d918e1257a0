//! Writing caller-supplied values into attribute documents.

use tracing::{trace, warn};

use crate::models::{AttributeSchema, AttributeValues, ObjectType};

/// Result of merging values into a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// At least one value was written.
    pub modified: bool,
    /// One entry per skipped tab or field.
    pub diagnostics: Vec<String>,
}

/// Merge values into an object's stored document.
///
/// Only values that differ from the stored ones are written, so an
/// unchanged submission leaves `modified` false.
pub fn merge_into_object(
    schema: &mut AttributeSchema,
    data: &AttributeValues,
    object_type: ObjectType,
) -> MergeOutcome {
    merge(schema, data, object_type, Target::Object)
}

/// Merge values into a copy of the default template.
///
/// Known fields are overwritten unconditionally.
pub fn merge_into_template(
    template: &mut AttributeSchema,
    data: &AttributeValues,
    object_type: ObjectType,
) -> MergeOutcome {
    merge(template, data, object_type, Target::Template)
}

#[derive(Clone, Copy)]
enum Target {
    Object,
    Template,
}

impl Target {
    fn describe(self, object_type: ObjectType) -> String {
        match self {
            Target::Object => object_type.to_string(),
            Target::Template => format!("{} default attribute", object_type),
        }
    }
}

fn merge(
    schema: &mut AttributeSchema,
    data: &AttributeValues,
    object_type: ObjectType,
    target: Target,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (tab, values) in data {
        let Some(fields) = schema.get_mut(tab) else {
            let msg = format!("Missing tab {} in {}", tab, target.describe(object_type));
            warn!(object_type = %object_type, tab = %tab, "{}", msg);
            outcome.diagnostics.push(msg);
            continue;
        };

        for (name, value) in values {
            let Some(field) = fields.get_mut(name) else {
                let msg = format!("Missing field {} in {}", name, target.describe(object_type));
                warn!(object_type = %object_type, tab = %tab, field = %name, "{}", msg);
                outcome.diagnostics.push(msg);
                continue;
            };

            match target {
                Target::Object if field.value == *value => {}
                _ => {
                    trace!(tab = %tab, field = %name, "Writing attribute value");
                    field.value = value.clone();
                    outcome.modified = true;
                }
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> AttributeSchema {
        serde_json::from_value(json!({
            "Details": {
                "Owner": {"type": "input_string", "mandatory": true, "value": "alice"},
                "Reviewed": {"type": "input_checkbox", "mandatory": false, "value": false}
            }
        }))
        .unwrap()
    }

    fn values(value: serde_json::Value) -> AttributeValues {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_object_merge_writes_changed_value() {
        let mut doc = schema();
        let outcome = merge_into_object(
            &mut doc,
            &values(json!({"Details": {"Owner": "bob"}})),
            ObjectType::Asset,
        );

        assert!(outcome.modified);
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(doc["Details"]["Owner"].value, json!("bob"));
    }

    #[test]
    fn test_object_merge_with_same_value_is_unmodified() {
        let mut doc = schema();
        let outcome = merge_into_object(
            &mut doc,
            &values(json!({"Details": {"Owner": "alice", "Reviewed": false}})),
            ObjectType::Asset,
        );

        assert!(!outcome.modified);
        assert_eq!(doc, schema());
    }

    #[test]
    fn test_unknown_tab_and_field_are_diagnosed() {
        let mut doc = schema();
        let outcome = merge_into_object(
            &mut doc,
            &values(json!({
                "Nope": {"X": 1},
                "Details": {"Ghost": "boo", "Reviewed": true}
            })),
            ObjectType::Ioc,
        );

        assert!(outcome.modified);
        assert_eq!(
            outcome.diagnostics,
            vec![
                "Missing field Ghost in ioc".to_string(),
                "Missing tab Nope in ioc".to_string(),
            ]
        );
        assert!(!doc.contains_key("Nope"));
        assert!(!doc["Details"].contains_key("Ghost"));
        assert_eq!(doc["Details"]["Reviewed"].value, json!(true));
    }

    #[test]
    fn test_template_merge_overwrites_unconditionally() {
        let mut doc = schema();
        let outcome = merge_into_template(
            &mut doc,
            &values(json!({"Details": {"Owner": "alice"}, "Other": {}})),
            ObjectType::Task,
        );

        assert!(outcome.modified);
        assert_eq!(
            outcome.diagnostics,
            vec!["Missing tab Other in task default attribute".to_string()]
        );
    }
}

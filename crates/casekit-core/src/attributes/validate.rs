//! Advisory validation of custom-attribute documents supplied as text.
//!
//! Validation never fails hard: a document that parses is always returned
//! alongside any diagnostics, and only a JSON syntax error yields no
//! document. Callers decide whether diagnostics block a save, see
//! [`ValidationReport::into_schema`].

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AttributeSchema, FieldType};

/// Parsed document and the issues found in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// `None` only when the input is not a JSON object.
    pub schema: Option<Map<String, JsonValue>>,
    pub diagnostics: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.schema.is_some() && self.diagnostics.is_empty()
    }

    /// Convert a clean report into a typed schema.
    ///
    /// # Errors
    ///
    /// `InvalidInput` listing every diagnostic if the report is not clean.
    pub fn into_schema(self) -> Result<AttributeSchema> {
        match self.schema {
            Some(map) if self.diagnostics.is_empty() => {
                Ok(serde_json::from_value(JsonValue::Object(map))?)
            }
            _ => Err(Error::InvalidInput(format!(
                "{} validation issue(s): {}",
                self.diagnostics.len(),
                self.diagnostics.join("; ")
            ))),
        }
    }
}

/// Validate a custom-attribute document.
pub fn validate_attribute(raw: &str) -> ValidationReport {
    let parsed: JsonValue = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            return ValidationReport {
                schema: None,
                diagnostics: vec![e.to_string()],
            }
        }
    };

    let document = match parsed {
        JsonValue::Object(map) => map,
        other => {
            return ValidationReport {
                schema: None,
                diagnostics: vec![format!(
                    "attribute document must be a JSON object, but got {}",
                    json_type_name(&other)
                )],
            }
        }
    };

    let mut diagnostics = Vec::new();

    for (tab, fields) in &document {
        let Some(fields) = fields.as_object() else {
            diagnostics.push(format!(
                "{} must be an object of fields, but got {}",
                tab,
                json_type_name(fields)
            ));
            continue;
        };

        for (field, spec) in fields {
            match spec.as_object() {
                Some(spec) => check_field(tab, field, spec, &mut diagnostics),
                None => diagnostics.push(format!(
                    "{} -> {} must be an object, but got {}",
                    tab,
                    field,
                    json_type_name(spec)
                )),
            }
        }
    }

    debug!(
        subsystem = "attributes",
        component = "validator",
        op = "validate",
        tabs = document.len(),
        diagnostic_count = diagnostics.len(),
        "Validated attribute document"
    );

    ValidationReport {
        schema: Some(document),
        diagnostics,
    }
}

fn check_field(tab: &str, field: &str, spec: &Map<String, JsonValue>, out: &mut Vec<String>) {
    let Some(type_tag) = spec.get("type").filter(|tag| !is_falsy(tag)) else {
        out.push(format!("{}::{} is missing mandatory \"type\" tag", tab, field));
        return;
    };

    let type_name = match type_tag {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    let Some(field_type) = type_tag.as_str().and_then(FieldType::from_tag) else {
        out.push(format!(
            "{} -> {}, unknown field type \"{}\"",
            tab, field, type_name
        ));
        return;
    };

    let value = present(spec, "value");

    if field_type.is_input() {
        match present(spec, "mandatory") {
            None => out.push(format!(
                "{} -> {} of type {} is missing mandatory \"mandatory\" tag",
                tab, field, field_type
            )),
            Some(JsonValue::Bool(_)) => {}
            Some(other) => out.push(format!(
                "{} -> {} -> \"mandatory\" expects a value of type bool, but got {}",
                tab,
                field,
                json_type_name(other)
            )),
        }
    }

    if value.is_none() {
        out.push(format!(
            "{} -> {} of type {} is missing mandatory \"value\" tag",
            tab, field, field_type
        ));
    }

    if field_type == FieldType::InputCheckbox && !value.is_some_and(JsonValue::is_boolean) {
        out.push(format!(
            "{} -> {} of type {} expects a value of type bool, but got {}",
            tab,
            field,
            field_type,
            value.map_or("null", json_type_name)
        ));
    }
}

/// `null`, `false`, zero, and empty strings, arrays and objects.
fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}

/// A key counts as present when it exists and is not `null`.
fn present<'a>(spec: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    spec.get(key).filter(|v| !v.is_null())
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

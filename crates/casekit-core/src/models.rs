//! Domain models for casekit custom attributes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Error;

// =============================================================================
// OBJECT TYPES
// =============================================================================

/// Case object kinds that carry a custom-attribute document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Indicator of compromise.
    Ioc,
    /// Timeline event.
    Event,
    /// Case asset (host, account, ...).
    Asset,
    /// Case task.
    Task,
    /// Case note.
    Note,
    /// Received evidence file.
    Evidence,
}

impl ObjectType {
    /// Every supported object type, in reconciliation order.
    pub const ALL: [ObjectType; 6] = [
        Self::Ioc,
        Self::Event,
        Self::Asset,
        Self::Task,
        Self::Note,
        Self::Evidence,
    ];

    /// Tag stored in `custom_attributes.attribute_for`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ioc => "ioc",
            Self::Event => "event",
            Self::Asset => "asset",
            Self::Task => "task",
            Self::Note => "note",
            Self::Evidence => "evidence",
        }
    }

    /// Human-readable name used for administered default rows.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ioc => "IOC",
            Self::Event => "Events",
            Self::Asset => "Assets",
            Self::Task => "Tasks",
            Self::Note => "Notes",
            Self::Evidence => "Evidences",
        }
    }

    /// Table holding objects of this type.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Ioc => "ioc",
            Self::Event => "cases_events",
            Self::Asset => "case_assets",
            Self::Task => "case_tasks",
            Self::Note => "notes",
            Self::Evidence => "case_received_file",
        }
    }

    /// Primary key column of [`Self::table`].
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Ioc => "ioc_id",
            Self::Event => "event_id",
            Self::Asset => "asset_id",
            Self::Task => "id",
            Self::Note => "note_id",
            Self::Evidence => "id",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ioc" => Ok(Self::Ioc),
            "event" => Ok(Self::Event),
            "asset" => Ok(Self::Asset),
            "task" => Ok(Self::Task),
            "note" => Ok(Self::Note),
            "evidence" => Ok(Self::Evidence),
            _ => Err(Error::InvalidObjectType(s.to_string())),
        }
    }
}

// =============================================================================
// ATTRIBUTE SCHEMA TYPES
// =============================================================================

/// Widget type of a custom attribute field.
///
/// Tags this crate does not know are kept as [`FieldType::Other`] so that
/// stored documents carrying legacy fields still load and save unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    InputString,
    InputTextfield,
    InputCheckbox,
    Raw,
    Html,
    Other(String),
}

impl FieldType {
    /// Parse a `type` tag as found in attribute documents.
    ///
    /// Returns `None` for tags outside the known widget set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "input_string" => Some(Self::InputString),
            "input_textfield" => Some(Self::InputTextfield),
            "input_checkbox" => Some(Self::InputCheckbox),
            "raw" => Some(Self::Raw),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InputString => "input_string",
            Self::InputTextfield => "input_textfield",
            Self::InputCheckbox => "input_checkbox",
            Self::Raw => "raw",
            Self::Html => "html",
            Self::Other(tag) => tag,
        }
    }

    /// Input widgets carry a `mandatory` flag; display-only types do not.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::InputString | Self::InputTextfield | Self::InputCheckbox
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag).unwrap_or(Self::Other(tag))
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One custom attribute field.
///
/// `field_type` is `None` when the stored field has no `type` tag (absent or
/// `null`). Default schemas always carry one, see `validate_attribute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
    #[serde(default)]
    pub value: JsonValue,
    /// Keys this crate does not interpret, kept so they survive a save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl FieldSpec {
    pub fn new(field_type: FieldType, mandatory: Option<bool>, value: JsonValue) -> Self {
        Self {
            field_type: Some(field_type),
            mandatory,
            value,
            extra: serde_json::Map::new(),
        }
    }
}

/// Fields of one tab, keyed by field name.
pub type AttributeTab = BTreeMap<String, FieldSpec>;

/// A custom-attribute document: tab name -> field name -> field.
pub type AttributeSchema = BTreeMap<String, AttributeTab>;

/// Caller-supplied values for a merge: tab name -> field name -> value.
pub type AttributeValues = BTreeMap<String, BTreeMap<String, JsonValue>>;

// =============================================================================
// STORED RECORDS
// =============================================================================

/// A case object's custom-attribute column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributedObject {
    pub object_type: ObjectType,
    pub id: i64,
    /// `None` until the first reconciliation pass initializes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_attributes: Option<AttributeSchema>,
}

/// The administered default schema for one object type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAttributeDefinition {
    pub id: i64,
    pub object_type: ObjectType,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: AttributeSchema,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_type_round_trips_through_tag() {
        for ty in ObjectType::ALL {
            let parsed: ObjectType = ty.as_str().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn test_object_type_parse_is_case_insensitive() {
        assert_eq!("IOC".parse::<ObjectType>().unwrap(), ObjectType::Ioc);
        assert_eq!(" note ".parse::<ObjectType>().unwrap(), ObjectType::Note);
    }

    #[test]
    fn test_object_type_parse_rejects_unknown_tag() {
        let err = "case".parse::<ObjectType>().unwrap_err();
        assert!(matches!(err, Error::InvalidObjectType(ref t) if t == "case"));
    }

    #[test]
    fn test_object_type_tables() {
        assert_eq!(ObjectType::Event.table(), "cases_events");
        assert_eq!(ObjectType::Evidence.table(), "case_received_file");
        assert_eq!(ObjectType::Task.id_column(), "id");
        assert_eq!(ObjectType::Asset.id_column(), "asset_id");
    }

    #[test]
    fn test_field_spec_deserialize() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "type": "input_checkbox",
            "mandatory": false,
            "value": true
        }))
        .unwrap();

        assert_eq!(spec.field_type, Some(FieldType::InputCheckbox));
        assert_eq!(spec.mandatory, Some(false));
        assert_eq!(spec.value, json!(true));
        assert!(spec.extra.is_empty());
    }

    #[test]
    fn test_field_spec_keeps_unknown_keys() {
        let raw = json!({
            "type": "html",
            "value": "<b>hi</b>",
            "options": ["a", "b"]
        });
        let spec: FieldSpec = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(spec.mandatory, None);
        assert_eq!(spec.extra.get("options"), Some(&json!(["a", "b"])));

        assert_eq!(serde_json::to_value(&spec).unwrap(), raw);
    }

    #[test]
    fn test_field_spec_keeps_unknown_type() {
        let raw = json!({"type": "color", "value": "red"});
        let spec: FieldSpec = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(spec.field_type, Some(FieldType::Other("color".to_string())));
        assert!(!spec.field_type.as_ref().unwrap().is_known());
        assert_eq!(serde_json::to_value(&spec).unwrap(), raw);
    }

    #[test]
    fn test_field_spec_without_type() {
        let raw = json!({"value": "orphan"});
        let spec: FieldSpec = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(spec.field_type, None);
        assert_eq!(serde_json::to_value(&spec).unwrap(), raw);

        let spec: FieldSpec = serde_json::from_value(json!({"type": null, "value": 1})).unwrap();
        assert_eq!(spec.field_type, None);
    }

    #[test]
    fn test_schema_with_legacy_tab_decodes() {
        let schema: AttributeSchema = serde_json::from_value(json!({
            "Details": {"Owner": {"type": "input_string", "mandatory": true, "value": "alice"}},
            "Legacy": {
                "Colour": {"type": "color", "value": "red"},
                "Note": {"value": "untyped"}
            }
        }))
        .unwrap();

        assert_eq!(
            schema["Legacy"]["Colour"].field_type,
            Some(FieldType::Other("color".to_string()))
        );
        assert_eq!(schema["Legacy"]["Note"].field_type, None);
    }

    #[test]
    fn test_field_type_tags() {
        assert_eq!(FieldType::from_tag("raw"), Some(FieldType::Raw));
        assert_eq!(FieldType::from_tag("color"), None);
        assert_eq!(
            FieldType::from("color".to_string()),
            FieldType::Other("color".to_string())
        );
        assert_eq!(FieldType::from("html".to_string()), FieldType::Html);
        assert!(FieldType::InputTextfield.is_input());
        assert!(!FieldType::Html.is_input());
        assert_eq!(FieldType::InputCheckbox.to_string(), "input_checkbox");
    }
}

//! In-memory repositories for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use casekit_core::mock::{MockAttributeStore, MockObjectStore};
//! use casekit_core::{AttributeReconciler, ObjectType};
//! use std::sync::Arc;
//!
//! let defaults = MockAttributeStore::new();
//! let objects = MockObjectStore::new().with_object(ObjectType::Ioc, 1, None);
//! let reconciler = AttributeReconciler::new(Arc::new(defaults), Arc::new(objects.clone()));
//! assert!(objects.saves().is_empty());
//! # let _ = reconciler;
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::{AttributedObjectRepository, CustomAttributeRepository};

/// In-memory default-schema store.
#[derive(Clone, Default)]
pub struct MockAttributeStore {
    definitions: Arc<Mutex<BTreeMap<ObjectType, CustomAttributeDefinition>>>,
}

impl MockAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a default schema.
    pub fn with_default(self, object_type: ObjectType, content: AttributeSchema) -> Self {
        self.insert(object_type, content);
        self
    }

    fn insert(&self, object_type: ObjectType, content: AttributeSchema) -> CustomAttributeDefinition {
        let mut defs = self.definitions.lock().unwrap();
        let next_id = defs.len() as i64 + 1;
        let entry = defs
            .entry(object_type)
            .or_insert_with(|| CustomAttributeDefinition {
                id: next_id,
                object_type,
                display_name: object_type.display_name().to_string(),
                description: None,
                content: AttributeSchema::new(),
                updated_at: Utc::now(),
            });
        entry.content = content;
        entry.updated_at = Utc::now();
        entry.clone()
    }
}

#[async_trait]
impl CustomAttributeRepository for MockAttributeStore {
    async fn get_default(&self, object_type: ObjectType) -> Result<Option<AttributeSchema>> {
        let defs = self.definitions.lock().unwrap();
        Ok(defs.get(&object_type).map(|d| d.content.clone()))
    }

    async fn get_definition(
        &self,
        object_type: ObjectType,
    ) -> Result<Option<CustomAttributeDefinition>> {
        let defs = self.definitions.lock().unwrap();
        Ok(defs.get(&object_type).cloned())
    }

    async fn set_default(
        &self,
        object_type: ObjectType,
        content: &AttributeSchema,
    ) -> Result<CustomAttributeDefinition> {
        Ok(self.insert(object_type, content.clone()))
    }

    async fn list_definitions(&self) -> Result<Vec<CustomAttributeDefinition>> {
        let defs = self.definitions.lock().unwrap();
        Ok(defs.values().cloned().collect())
    }
}

/// A recorded call to [`AttributedObjectRepository::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct SaveCall {
    pub object_type: ObjectType,
    pub id: i64,
    pub schema: AttributeSchema,
}

#[derive(Default)]
struct ObjectState {
    objects: BTreeMap<(ObjectType, i64), Option<AttributeSchema>>,
    saves: Vec<SaveCall>,
    fail_on: HashSet<(ObjectType, i64)>,
}

/// In-memory object store that records every save.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    state: Arc<Mutex<ObjectState>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object.
    pub fn with_object(
        self,
        object_type: ObjectType,
        id: i64,
        custom_attributes: Option<AttributeSchema>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert((object_type, id), custom_attributes);
        self
    }

    /// Make saves of one object fail.
    pub fn failing_on(self, object_type: ObjectType, id: i64) -> Self {
        self.state.lock().unwrap().fail_on.insert((object_type, id));
        self
    }

    /// Current stored document of an object.
    pub fn attributes(&self, object_type: ObjectType, id: i64) -> Option<AttributeSchema> {
        self.state
            .lock()
            .unwrap()
            .objects
            .get(&(object_type, id))
            .cloned()
            .flatten()
    }

    /// Every save issued so far.
    pub fn saves(&self) -> Vec<SaveCall> {
        self.state.lock().unwrap().saves.clone()
    }

    pub fn clear_saves(&self) {
        self.state.lock().unwrap().saves.clear();
    }
}

#[async_trait]
impl AttributedObjectRepository for MockObjectStore {
    async fn list_all(&self, object_type: ObjectType) -> Result<Vec<AttributedObject>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .objects
            .iter()
            .filter(|((ty, _), _)| *ty == object_type)
            .map(|((ty, id), attrs)| AttributedObject {
                object_type: *ty,
                id: *id,
                custom_attributes: attrs.clone(),
            })
            .collect())
    }

    async fn get(&self, object_type: ObjectType, id: i64) -> Result<Option<AttributedObject>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .objects
            .get(&(object_type, id))
            .map(|attrs| AttributedObject {
                object_type,
                id,
                custom_attributes: attrs.clone(),
            }))
    }

    async fn save(
        &self,
        object_type: ObjectType,
        id: i64,
        schema: &AttributeSchema,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_on.contains(&(object_type, id)) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        state.saves.push(SaveCall {
            object_type,
            id,
            schema: schema.clone(),
        });
        state.objects.insert((object_type, id), Some(schema.clone()));
        Ok(())
    }
}

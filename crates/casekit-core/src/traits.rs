//! Core traits for casekit storage abstractions.
//!
//! The reconciler only consumes these record-query contracts; concrete
//! backends live in `casekit-db` (PostgreSQL) and [`crate::mock`] (tests).

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// DEFAULT SCHEMA REPOSITORY
// =============================================================================

/// Repository for the administered default schema of each object type.
#[async_trait]
pub trait CustomAttributeRepository: Send + Sync {
    /// Get the default schema for an object type.
    async fn get_default(&self, object_type: ObjectType) -> Result<Option<AttributeSchema>>;

    /// Get the full definition row for an object type.
    async fn get_definition(
        &self,
        object_type: ObjectType,
    ) -> Result<Option<CustomAttributeDefinition>>;

    /// Replace the default schema for an object type, creating the row if needed.
    async fn set_default(
        &self,
        object_type: ObjectType,
        content: &AttributeSchema,
    ) -> Result<CustomAttributeDefinition>;

    /// List all administered definitions.
    async fn list_definitions(&self) -> Result<Vec<CustomAttributeDefinition>>;
}

// =============================================================================
// ATTRIBUTED OBJECT REPOSITORY
// =============================================================================

/// Repository for the `custom_attributes` column of case objects.
#[async_trait]
pub trait AttributedObjectRepository: Send + Sync {
    /// Load every object of a type.
    async fn list_all(&self, object_type: ObjectType) -> Result<Vec<AttributedObject>>;

    /// Load one object by primary key.
    async fn get(&self, object_type: ObjectType, id: i64) -> Result<Option<AttributedObject>>;

    /// Write an object's custom attributes. Each call commits on its own.
    async fn save(&self, object_type: ObjectType, id: i64, schema: &AttributeSchema)
        -> Result<()>;
}

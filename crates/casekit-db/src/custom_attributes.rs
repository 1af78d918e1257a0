//! Default custom-attribute schema repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use casekit_core::{
    AttributeSchema, CustomAttributeDefinition, CustomAttributeRepository, Error, ObjectType,
    Result,
};

/// PostgreSQL implementation of CustomAttributeRepository.
#[derive(Clone)]
pub struct PgCustomAttributeRepository {
    pool: Pool<Postgres>,
}

impl PgCustomAttributeRepository {
    /// Create a new PgCustomAttributeRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<CustomAttributeDefinition> {
        let tag: String = row.get("attribute_for");
        let Json(content) = row
            .try_get::<Json<AttributeSchema>, _>("attribute_content")
            .map_err(|e| {
                Error::Serialization(format!("custom_attributes for {}: {}", tag, e))
            })?;

        Ok(CustomAttributeDefinition {
            id: row.get("attribute_id"),
            object_type: tag.parse()?,
            display_name: row.get("attribute_display_name"),
            description: row.get("attribute_description"),
            content,
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl CustomAttributeRepository for PgCustomAttributeRepository {
    async fn get_default(&self, object_type: ObjectType) -> Result<Option<AttributeSchema>> {
        Ok(self
            .get_definition(object_type)
            .await?
            .map(|def| def.content))
    }

    async fn get_definition(
        &self,
        object_type: ObjectType,
    ) -> Result<Option<CustomAttributeDefinition>> {
        let row = sqlx::query(
            r#"
            SELECT attribute_id, attribute_display_name, attribute_description,
                   attribute_for, attribute_content, updated_at
            FROM custom_attributes
            WHERE attribute_for = $1
            "#,
        )
        .bind(object_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn set_default(
        &self,
        object_type: ObjectType,
        content: &AttributeSchema,
    ) -> Result<CustomAttributeDefinition> {
        let row = sqlx::query(
            r#"
            INSERT INTO custom_attributes
                (attribute_display_name, attribute_for, attribute_content)
            VALUES ($1, $2, $3)
            ON CONFLICT (attribute_for) DO UPDATE
                SET attribute_content = EXCLUDED.attribute_content,
                    updated_at = NOW()
            RETURNING attribute_id, attribute_display_name, attribute_description,
                      attribute_for, attribute_content, updated_at
            "#,
        )
        .bind(object_type.display_name())
        .bind(object_type.as_str())
        .bind(Json(content))
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "custom_attribute_repo",
            op = "set_default",
            object_type = %object_type,
            "Stored default custom attributes"
        );

        Self::map_row(&row)
    }

    async fn list_definitions(&self) -> Result<Vec<CustomAttributeDefinition>> {
        let rows = sqlx::query(
            r#"
            SELECT attribute_id, attribute_display_name, attribute_description,
                   attribute_for, attribute_content, updated_at
            FROM custom_attributes
            ORDER BY attribute_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(Self::map_row).collect()
    }
}

//! Repository for the `custom_attributes` column of case objects.
//!
//! Table and key names come from [`ObjectType::table`] and
//! [`ObjectType::id_column`], which are fixed identifiers, so they are
//! interpolated into the SQL text while values are always bound.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::{trace, warn};

use casekit_core::{
    AttributeSchema, AttributedObject, AttributedObjectRepository, Error, ObjectType, Result,
};

/// PostgreSQL implementation of AttributedObjectRepository.
#[derive(Clone)]
pub struct PgAttributedObjectRepository {
    pool: Pool<Postgres>,
}

impl PgAttributedObjectRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(object_type: ObjectType, row: &PgRow) -> Result<AttributedObject> {
        let id: i64 = row.get("id");
        let raw: Option<JsonValue> = row.get("custom_attributes");

        let custom_attributes = match raw {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(serde_json::from_value(value).map_err(|e| {
                Error::Serialization(format!(
                    "{} {} custom_attributes: {}",
                    object_type, id, e
                ))
            })?),
        };

        Ok(AttributedObject {
            object_type,
            id,
            custom_attributes,
        })
    }
}

#[async_trait]
impl AttributedObjectRepository for PgAttributedObjectRepository {
    async fn list_all(&self, object_type: ObjectType) -> Result<Vec<AttributedObject>> {
        let query = format!(
            "SELECT {id}::BIGINT AS id, custom_attributes FROM {table} ORDER BY {id}",
            id = object_type.id_column(),
            table = object_type.table(),
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        // A row that still fails to decode (e.g. a non-string `type`) is
        // left for an operator; the rest of the batch proceeds.
        let objects = rows
            .iter()
            .filter_map(|row| match Self::map_row(object_type, row) {
                Ok(obj) => Some(obj),
                Err(e) => {
                    warn!(
                        subsystem = "database",
                        component = "object_repo",
                        op = "list_all",
                        object_type = %object_type,
                        error = %e,
                        "Skipping undecodable custom attributes"
                    );
                    None
                }
            })
            .collect();

        Ok(objects)
    }

    async fn get(&self, object_type: ObjectType, id: i64) -> Result<Option<AttributedObject>> {
        let query = format!(
            "SELECT {id}::BIGINT AS id, custom_attributes FROM {table} WHERE {id} = $1",
            id = object_type.id_column(),
            table = object_type.table(),
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref()
            .map(|row| Self::map_row(object_type, row))
            .transpose()
    }

    async fn save(
        &self,
        object_type: ObjectType,
        id: i64,
        schema: &AttributeSchema,
    ) -> Result<()> {
        let query = format!(
            "UPDATE {table} SET custom_attributes = $1 WHERE {id} = $2",
            id = object_type.id_column(),
            table = object_type.table(),
        );

        let result = sqlx::query(&query)
            .bind(Json(schema))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("{} {}", object_type, id)));
        }

        trace!(
            db_table = object_type.table(),
            object_id = id,
            "Saved custom attributes"
        );
        Ok(())
    }
}

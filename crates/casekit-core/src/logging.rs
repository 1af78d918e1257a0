//! Structured logging schema and field name constants for casekit.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Batch aborted, requires operator attention |
//! | WARN  | Input skipped (unknown tab or field), processing continues |
//! | INFO  | Lifecycle events, batch completions |
//! | DEBUG | Per-object decisions (object updated, value overwritten) |
//! | TRACE | Per-field iteration |
//!
//! `tracing` macros take identifier keys, so call sites spell the names
//! out; the constants are what log queries and dashboards should use:
//!
//! ```
//! use casekit_core::logging::{OBJECT_TYPE, OPERATION, RUN_ID, SUBSYSTEM};
//!
//! tracing::info!(
//!     subsystem = "attributes",
//!     op = "reconcile_all",
//!     run_id = "0190a1b2-0000-7000-8000-000000000000",
//!     object_type = "ioc",
//!     "Migrating custom attributes"
//! );
//! assert_eq!([SUBSYSTEM, OPERATION, RUN_ID, OBJECT_TYPE], ["subsystem", "op", "run_id", "object_type"]);
//! ```

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID of one reconciliation or merge run.
/// Format: UUIDv7 (time-ordered).
pub const RUN_ID: &str = "run_id";

/// Subsystem originating the log event.
/// Values: "attributes", "database", "admin"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "reconciler", "validator", "pool", "object_repo"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "reconcile_all", "merge_values", "validate", "update_default"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Object type tag ("ioc", "event", ...).
pub const OBJECT_TYPE: &str = "object_type";

/// Primary key of the object being operated on.
pub const OBJECT_ID: &str = "object_id";

/// Attribute tab name.
pub const TAB: &str = "tab";

/// Attribute field name.
pub const FIELD: &str = "field";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of objects loaded by a batch.
pub const SCANNED: &str = "scanned";

/// Number of objects written by a batch.
pub const UPDATED: &str = "updated";

/// Number of diagnostics produced.
pub const DIAGNOSTIC_COUNT: &str = "diagnostic_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let fields = [
            RUN_ID,
            SUBSYSTEM,
            COMPONENT,
            OPERATION,
            OBJECT_TYPE,
            OBJECT_ID,
            TAB,
            FIELD,
            DURATION_MS,
            SCANNED,
            UPDATED,
            DIAGNOSTIC_COUNT,
            POOL_SIZE,
            POOL_IDLE,
            DB_TABLE,
            SUCCESS,
            ERROR_MSG,
        ];
        let unique: HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), fields.len());
    }

    #[test]
    fn test_constants_match_call_site_keys() {
        // Keys as written in the reconciler, validator and repositories.
        assert_eq!(OPERATION, "op");
        assert_eq!(ERROR_MSG, "error");
        assert_eq!(SUBSYSTEM, "subsystem");
        assert_eq!(COMPONENT, "component");
        assert_eq!(SCANNED, "scanned");
        assert_eq!(UPDATED, "updated");
        assert_eq!(DURATION_MS, "duration_ms");
        assert_eq!(DIAGNOSTIC_COUNT, "diagnostic_count");
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for name in [RUN_ID, OBJECT_TYPE, OBJECT_ID, DURATION_MS, DIAGNOSTIC_COUNT] {
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}

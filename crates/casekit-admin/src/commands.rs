//! Command implementations.

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use casekit_core::{validate_attribute, AttributeValues, ObjectType, ValidationReport};
use casekit_db::Database;
use serde_json::json;
use tracing::info;

use crate::config::AdminConfig;

pub async fn connect(config: &AdminConfig) -> anyhow::Result<Database> {
    Database::connect_with_config(&config.database_url, config.pool.clone())
        .await
        .context("connecting to the case database")
}

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn parse_object_type(tag: &str) -> anyhow::Result<ObjectType> {
    Ok(tag.parse::<ObjectType>()?)
}

/// Parse merge input: tab -> field -> value.
pub fn parse_values(raw: &str) -> anyhow::Result<AttributeValues> {
    serde_json::from_str(raw).context("merge input must be a JSON object of tabs -> fields -> values")
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// JSON rendering of a validation report.
pub fn render_validation(report: &ValidationReport) -> serde_json::Value {
    json!({
        "valid": report.is_valid(),
        "diagnostics": report.diagnostics,
    })
}

pub fn validate(input: &Path) -> anyhow::Result<ExitCode> {
    let raw = read_input(input)?;
    let report = validate_attribute(&raw);
    print_json(&render_validation(&report))?;

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn migrate(db: &Database) -> anyhow::Result<ExitCode> {
    db.migrate().await.context("running migrations")?;
    info!(subsystem = "admin", op = "migrate", "Migrations applied");
    Ok(ExitCode::SUCCESS)
}

pub async fn reconcile(db: &Database, object_type: Option<&str>) -> anyhow::Result<ExitCode> {
    let reconciler = db.reconciler();
    let reports = match object_type {
        Some(tag) => vec![reconciler.reconcile_all(parse_object_type(tag)?).await?],
        None => reconciler.reconcile_every().await?,
    };
    print_json(&reports)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn merge(
    db: &Database,
    object_type: &str,
    id: Option<i64>,
    input: &Path,
) -> anyhow::Result<ExitCode> {
    let object_type = parse_object_type(object_type)?;
    let data = parse_values(&read_input(input)?)?;

    let result = db
        .reconciler()
        .merge_values(&data, id, object_type)
        .await?;
    print_json(&result)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn list_defaults(db: &Database) -> anyhow::Result<ExitCode> {
    print_json(&db.reconciler().list_defaults().await?)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn show_default(db: &Database, object_type: &str) -> anyhow::Result<ExitCode> {
    let object_type = parse_object_type(object_type)?;
    print_json(&db.reconciler().default_schema(object_type).await?)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn set_default(
    db: &Database,
    object_type: &str,
    input: &Path,
    reconcile: bool,
) -> anyhow::Result<ExitCode> {
    let object_type = parse_object_type(object_type)?;
    let raw = read_input(input)?;
    let reconciler = db.reconciler();

    let definition = reconciler.update_default(object_type, &raw).await?;
    let report = if reconcile {
        Some(reconciler.reconcile_all(object_type).await?)
    } else {
        None
    };

    print_json(&json!({
        "definition": definition,
        "reconciled": report,
    }))?;
    Ok(ExitCode::SUCCESS)
}

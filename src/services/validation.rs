use serde_json::Value;
use tracing::info;

use crate::db::repository::Catalog;
use crate::error::AppError;
use crate::models::panel::prof_total_hours_statement;
use crate::models::{ClassFilter, ProcedureFilter, Record, Warning, WarningKind};

const TOTAL_HOURS: &str = "total_hours";
const PROFESSOR_LABELS: [&str; 5] = ["prof_acronym", "acronym", "prof_name", "name", "prof_id"];
const CLASS_LABELS: [&str; 2] = ["class_id", "id"];

pub async fn validate_dsd(
    catalog: &dyn Catalog,
    max_hours: Option<f64>,
) -> Result<Vec<Warning>, AppError> {
    let mut warnings = Vec::new();

    if let Some(max_hours) = max_hours {
        let totals = catalog.fetch(&prof_total_hours_statement()).await?;
        warnings.extend(overloaded_professors(&totals, max_hours));
    }

    let classes = catalog.fetch(&ClassFilter::default().statement()).await?;
    warnings.extend(unassigned_classes(&classes));

    info!("DSD validation produced {} warning(s)", warnings.len());
    Ok(warnings)
}

pub fn overloaded_professors(totals: &[Record], max_hours: f64) -> Vec<Warning> {
    totals
        .iter()
        .filter_map(|record| {
            let hours = number(record.get(TOTAL_HOURS)?)?;
            (hours > max_hours).then(|| Warning {
                kind: WarningKind::OverloadedProfessor,
                message: format!(
                    "professor {} has {} hours assigned, above the limit of {}",
                    label(record, &PROFESSOR_LABELS),
                    hours,
                    max_hours
                ),
                record: record.clone(),
            })
        })
        .collect()
}

/// Classes whose `prof_id` column is present and null.
pub fn unassigned_classes(classes: &[Record]) -> Vec<Warning> {
    classes
        .iter()
        .filter(|record| matches!(record.get("prof_id"), Some(Value::Null)))
        .map(|record| Warning {
            kind: WarningKind::UnassignedClass,
            message: format!("class {} has no professor assigned", label(record, &CLASS_LABELS)),
            record: record.clone(),
        })
        .collect()
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn label(record: &Record, candidates: &[&str]) -> String {
    candidates
        .iter()
        .find_map(|key| match record.get(*key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_else(|| "<unknown>".to_string())
}

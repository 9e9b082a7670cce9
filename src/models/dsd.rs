use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::Record;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateParams {
    /// Maximum teaching hours per professor; omit to skip the check.
    pub max_hours: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Json,
    Csv,
    /// Office Open XML workbook.
    Xls,
}

impl FileType {
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Json => "json",
            FileType::Csv => "csv",
            FileType::Xls => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            FileType::Json => "application/json",
            FileType::Csv => "text/csv; charset=utf-8",
            FileType::Xls => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    #[serde(default)]
    #[param(inline)]
    pub file_type: FileType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    OverloadedProfessor,
    UnassignedClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    #[schema(value_type = Object)]
    pub record: Record,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationReport {
    pub warnings: Vec<Warning>,
}

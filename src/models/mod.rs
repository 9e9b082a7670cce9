pub mod dsd;
pub mod filters;
pub mod panel;
pub mod update;

use serde_json::{Map, Value};

pub use dsd::{ExportParams, FileType, ValidateParams, ValidationReport, Warning, WarningKind};
pub use filters::{
    ClassFilter, CourseFilter, DepartmentFilter, DsderFilter, ProcedureFilter, ProfessorFilter,
    UcFilter, WishlistFilter,
};
pub use panel::{PanelParams, ProfessorPanelParams};
pub use update::{AssignProfessorRequest, UpdateAcronymRequest, UpdateResponse};

/// One result row: column name to value, in column order.
pub type Record = Map<String, Value>;

/// Wrap records under `key`, e.g. `{"classes": [...]}`.
pub fn keyed(key: &str, records: Vec<Record>) -> Value {
    let mut body = Map::new();
    body.insert(
        key.to_string(),
        Value::Array(records.into_iter().map(Value::Object).collect()),
    );
    Value::Object(body)
}

use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::query::{OrderBy, Statement, parse_id_list};
use crate::error::AppError;

pub const CLASSES_PANEL_VIEW: &str = "classes_main_panel_info";
pub const PROFESSORS_PANEL_VIEW: &str = "professors_main_panel_info";
pub const PROF_TOTAL_HOURS_VIEW: &str = "prof_total_hours";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PanelParams {
    /// Ordering clause, e.g. `uc_name asc, prof_acronym desc`.
    pub params: Option<String>,
}

impl PanelParams {
    pub fn classes_statement(&self) -> Result<Statement, AppError> {
        let order = OrderBy::parse_or(
            self.params.as_deref(),
            OrderBy::asc(&["uc_name", "prof_acronym"]),
        )?;
        Ok(Statement::select_all(CLASSES_PANEL_VIEW).order_by(order).build())
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfessorPanelParams {
    /// Ordering clause, e.g. `total_hours desc`.
    pub params: Option<String>,
    /// Comma-separated professor ids, e.g. `1,4,7`.
    pub prof_ids: Option<String>,
}

impl ProfessorPanelParams {
    pub fn statement(&self) -> Result<Statement, AppError> {
        let order = OrderBy::parse_or(self.params.as_deref(), OrderBy::asc(&["prof_acronym"]))?;
        let ids = parse_id_list(self.prof_ids.as_deref())?;
        Ok(Statement::select_all(PROFESSORS_PANEL_VIEW)
            .where_in("prof_id", ids)
            .order_by(order)
            .build())
    }
}

pub fn prof_total_hours_statement() -> Statement {
    Statement::select_all(PROF_TOTAL_HOURS_VIEW).build()
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::query::{NO_INT, SqlArg, Statement};

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AssignProfessorRequest {
    pub class_id: i64,
    /// Professor to assign; `-1` clears the assignment.
    pub prof_id: i64,
}

impl AssignProfessorRequest {
    pub fn statement(&self) -> Statement {
        let prof_id = (self.prof_id != NO_INT).then_some(self.prof_id);
        Statement {
            sql: "UPDATE classes SET prof_id = ? WHERE class_id = ?".to_string(),
            args: vec![SqlArg::NullableInt(prof_id), SqlArg::Int(self.class_id)],
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateAcronymRequest {
    pub prof_id: i64,
    pub acronym: String,
}

impl UpdateAcronymRequest {
    pub fn statement(&self) -> Statement {
        Statement {
            sql: "UPDATE professors SET acronym = ? WHERE prof_id = ?".to_string(),
            args: vec![SqlArg::Text(Some(self.acronym.clone())), SqlArg::Int(self.prof_id)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateResponse {
    /// E.g. `1 record(s) affected`.
    pub response: String,
}

impl UpdateResponse {
    pub fn affected(rows: u64) -> Self {
        Self {
            response: format!("{} record(s) affected", rows),
        }
    }
}

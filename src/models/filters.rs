//! Query-string filters for the stored-procedure backed resources.
//!
//! Each filter binds its fields positionally, in the order the procedure
//! declares its parameters. Absent fields are bound as sentinels.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::query::{SqlArg, Statement};

pub trait ProcedureFilter {
    /// Stored procedure doing the actual filtering.
    const PROCEDURE: &'static str;
    /// Key the records are returned under.
    const KEY: &'static str;

    fn args(&self) -> Vec<SqlArg>;

    fn statement(&self) -> Statement {
        Statement::call(Self::PROCEDURE, self.args())
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilter {
    pub id: Option<i64>,
    pub year: Option<i64>,
    pub uc_id: Option<i64>,
    /// Class component, e.g. `T`, `TP`, `P`.
    pub component: Option<String>,
    pub hours: Option<f64>,
    pub prof_id: Option<i64>,
}

impl ProcedureFilter for ClassFilter {
    const PROCEDURE: &'static str = "FilterClasses";
    const KEY: &'static str = "classes";

    fn args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::int(self.id),
            SqlArg::int(self.year),
            SqlArg::int(self.uc_id),
            SqlArg::text(self.component.as_deref()),
            SqlArg::float(self.hours),
            SqlArg::int(self.prof_id),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepartmentFilter {
    pub id: Option<i64>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl ProcedureFilter for DepartmentFilter {
    const PROCEDURE: &'static str = "FilterDepartments";
    const KEY: &'static str = "departments";

    fn args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::int(self.id),
            SqlArg::text(self.acronym.as_deref()),
            SqlArg::text(self.name.as_deref()),
            SqlArg::text(self.address.as_deref()),
            SqlArg::text(self.phone.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfessorFilter {
    pub prof_id: Option<i64>,
    /// Mechanographic number.
    pub nmec: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub rank: Option<String>,
    pub situation: Option<String>,
    /// Department id.
    pub department: Option<i64>,
}

impl ProcedureFilter for ProfessorFilter {
    const PROCEDURE: &'static str = "FilterProfessors";
    const KEY: &'static str = "professors";

    fn args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::int(self.prof_id),
            SqlArg::int(self.nmec),
            SqlArg::text(self.email.as_deref()),
            SqlArg::text(self.phone.as_deref()),
            SqlArg::text(self.acronym.as_deref()),
            SqlArg::text(self.name.as_deref()),
            SqlArg::text(self.rank.as_deref()),
            SqlArg::text(self.situation.as_deref()),
            SqlArg::int(self.department),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DsderFilter {
    pub id: Option<i64>,
}

impl ProcedureFilter for DsderFilter {
    const PROCEDURE: &'static str = "FilterDsders";
    const KEY: &'static str = "dsders";

    fn args(&self) -> Vec<SqlArg> {
        vec![SqlArg::int(self.id)]
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilter {
    pub id: Option<i64>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    /// Department id.
    pub department: Option<i64>,
    /// Director's professor id.
    pub director: Option<i64>,
}

impl ProcedureFilter for CourseFilter {
    const PROCEDURE: &'static str = "FilterCourses";
    const KEY: &'static str = "courses";

    fn args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::int(self.id),
            SqlArg::text(self.acronym.as_deref()),
            SqlArg::text(self.name.as_deref()),
            SqlArg::int(self.department),
            SqlArg::int(self.director),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UcFilter {
    pub id: Option<i64>,
    pub acronym: Option<String>,
    pub name: Option<String>,
    /// Director's professor id.
    pub director: Option<i64>,
}

impl ProcedureFilter for UcFilter {
    const PROCEDURE: &'static str = "FilterUcs";
    const KEY: &'static str = "ucs";

    fn args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::int(self.id),
            SqlArg::text(self.acronym.as_deref()),
            SqlArg::text(self.name.as_deref()),
            SqlArg::int(self.director),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WishlistFilter {
    pub id: Option<i64>,
    pub year: Option<i64>,
    pub prof_id: Option<i64>,
    pub class_id: Option<i64>,
}

impl ProcedureFilter for WishlistFilter {
    const PROCEDURE: &'static str = "FilterWishlists";
    const KEY: &'static str = "wishlists";

    fn args(&self) -> Vec<SqlArg> {
        vec![
            SqlArg::int(self.id),
            SqlArg::int(self.year),
            SqlArg::int(self.prof_id),
            SqlArg::int(self.class_id),
        ]
    }
}

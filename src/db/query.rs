//! SQL statements with positional bind arguments.
//!
//! Filter values never reach the SQL text; only identifiers that passed
//! [`OrderBy::parse`] are rendered into it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

/// Sentinel bound for an absent integer filter.
pub const NO_INT: i64 = -1;
/// Sentinel bound for an absent float filter.
pub const NO_FLOAT: f64 = -1.0;
/// Sentinel a client may send for an absent string filter.
pub const NO_TEXT: &str = "NULL";

#[derive(Clone, Debug, PartialEq)]
pub enum SqlArg {
    Int(i64),
    /// `None` binds SQL `NULL`.
    NullableInt(Option<i64>),
    Float(f64),
    /// `None` binds SQL `NULL`.
    Text(Option<String>),
}

impl SqlArg {
    pub fn int(value: Option<i64>) -> Self {
        SqlArg::Int(value.unwrap_or(NO_INT))
    }

    pub fn float(value: Option<f64>) -> Self {
        SqlArg::Float(value.unwrap_or(NO_FLOAT))
    }

    /// The string `"NULL"` is treated like an absent value.
    pub fn text(value: Option<&str>) -> Self {
        SqlArg::Text(value.filter(|v| *v != NO_TEXT).map(str::to_string))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

impl Statement {
    /// `CALL <name>(?, ?, ...)` with one placeholder per argument.
    pub fn call(procedure: &str, args: Vec<SqlArg>) -> Self {
        let placeholders = vec!["?"; args.len()].join(", ");
        Self {
            sql: format!("CALL {}({})", procedure, placeholders),
            args,
        }
    }

    pub fn select_all(view: &str) -> SelectBuilder {
        SelectBuilder {
            view: view.to_string(),
            filter: None,
            order_by: None,
        }
    }
}

pub struct SelectBuilder {
    view: String,
    filter: Option<(String, Vec<i64>)>,
    order_by: Option<OrderBy>,
}

impl SelectBuilder {
    /// Restrict `column` to `ids`; an empty list adds no restriction.
    pub fn where_in(mut self, column: &str, ids: Vec<i64>) -> Self {
        if !ids.is_empty() {
            self.filter = Some((column.to_string(), ids));
        }
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn build(self) -> Statement {
        let mut sql = format!("SELECT * FROM {}", self.view);
        let mut args = Vec::new();

        if let Some((column, ids)) = self.filter {
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" WHERE `{}` IN ({})", column, placeholders));
            args.extend(ids.into_iter().map(SqlArg::Int));
        }
        if let Some(order) = self.order_by {
            sql.push_str(&format!(" ORDER BY {}", order));
        }

        Statement { sql, args }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A validated ORDER BY clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy(Vec<(String, Direction)>);

static ORDER_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([A-Za-z_][A-Za-z0-9_]*)(?:\s+(asc|desc))?\s*$")
        .expect("static regex is valid")
});

impl OrderBy {
    pub fn asc(columns: &[&str]) -> Self {
        Self(
            columns
                .iter()
                .map(|c| (c.to_string(), Direction::Asc))
                .collect(),
        )
    }

    /// Parse `"col [asc|desc], col2 ..."`.
    pub fn parse(clause: &str) -> Result<Self, AppError> {
        let mut items = Vec::new();
        for item in clause.split(',') {
            let caps = ORDER_ITEM.captures(item).ok_or_else(|| {
                AppError::BadRequest(format!("invalid ordering item: {:?}", item.trim()))
            })?;
            let direction = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
                Some(d) if d == "desc" => Direction::Desc,
                _ => Direction::Asc,
            };
            items.push((caps[1].to_string(), direction));
        }
        Ok(Self(items))
    }

    /// Parse `clause` when present and non-blank, otherwise use `default`.
    pub fn parse_or(clause: Option<&str>, default: OrderBy) -> Result<Self, AppError> {
        match clause.map(str::trim) {
            Some(c) if !c.is_empty() => Self::parse(c),
            _ => Ok(default),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|(column, direction)| {
                let dir = match direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                format!("`{}` {}", column, dir)
            })
            .collect();
        f.write_str(&rendered.join(", "))
    }
}

/// Parse a comma-separated id list such as `"1,4, 7"`.
pub fn parse_id_list(raw: Option<&str>) -> Result<Vec<i64>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("invalid id in list: {:?}", s)))
        })
        .collect()
}

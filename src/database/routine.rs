use chrono::{DateTime, Utc};

/// How a routine is invoked: functions through `SELECT`, procedures through `CALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    Function,
    Procedure,
}

/// A positional routine argument.
///
/// Optional variants bind a typed SQL `NULL` when empty, which the routines
/// read as "leave unchanged".
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    OptInt(Option<i32>),
    Text(String),
    OptText(Option<String>),
    Timestamp(DateTime<Utc>),
    OptTimestamp(Option<DateTime<Utc>>),
    OptBool(Option<bool>),
    IntList(Option<Vec<i32>>),
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(v)
    }
}

impl From<Option<i32>> for SqlParam {
    fn from(v: Option<i32>) -> Self {
        SqlParam::OptInt(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<Option<String>> for SqlParam {
    fn from(v: Option<String>) -> Self {
        SqlParam::OptText(v)
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

impl From<Option<DateTime<Utc>>> for SqlParam {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        SqlParam::OptTimestamp(v)
    }
}

impl From<Option<bool>> for SqlParam {
    fn from(v: Option<bool>) -> Self {
        SqlParam::OptBool(v)
    }
}

impl From<Option<Vec<i32>>> for SqlParam {
    fn from(v: Option<Vec<i32>>) -> Self {
        SqlParam::IntList(v)
    }
}

/// One invocation of a named routine with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineCall {
    kind: RoutineKind,
    name: &'static str,
    params: Vec<SqlParam>,
}

impl RoutineCall {
    pub fn function(name: &'static str) -> Self {
        Self {
            kind: RoutineKind::Function,
            name,
            params: Vec::new(),
        }
    }

    pub fn procedure(name: &'static str) -> Self {
        Self {
            kind: RoutineKind::Procedure,
            name,
            params: Vec::new(),
        }
    }

    pub fn arg(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn kind(&self) -> RoutineKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// SQL text for this call against `schema`.
    ///
    /// Function results are cast so they decode the same way whether the
    /// routine returns `json`, `jsonb`, `text` or an integer id.
    pub fn to_sql(&self, schema: &str, cast: Option<&str>) -> String {
        let placeholders = (1..=self.params.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");

        match self.kind {
            RoutineKind::Procedure => format!("CALL {}.{}({})", schema, self.name, placeholders),
            RoutineKind::Function => match cast {
                Some(ty) => format!("SELECT {}.{}({})::{}", schema, self.name, placeholders, ty),
                None => format!("SELECT {}.{}({})", schema, self.name, placeholders),
            },
        }
    }
}

//! # Criterion Expression Tree
//!
//! Filter predicates over a table's columns. Compound predicates are built
//! with explicit `and`/`or`/`negate` calls, so grouping is always exactly
//! the shape of the tree.

use serde_json::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    /// Operator text in the rendered statement
    pub fn as_sql(&self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }
}

/// A composable filter predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Matches every row
    MatchAll,

    /// `column <op> value`
    Cmp {
        column: String,
        op: CmpOp,
        value: Value,
    },

    /// `column BETWEEN low AND high` (inclusive)
    Between {
        column: String,
        low: Value,
        high: Value,
    },

    /// `column IN (values...)`
    In { column: String, values: Vec<Value> },

    And(Box<Criterion>, Box<Criterion>),

    Or(Box<Criterion>, Box<Criterion>),

    Not(Box<Criterion>),
}

impl Criterion {
    /// Whether this is the match-all criterion
    pub fn is_match_all(&self) -> bool {
        matches!(self, Criterion::MatchAll)
    }

    /// Conjunction; `MatchAll` is the identity element
    pub fn and(self, other: Criterion) -> Criterion {
        match (self, other) {
            (Criterion::MatchAll, c) | (c, Criterion::MatchAll) => c,
            (a, b) => Criterion::And(Box::new(a), Box::new(b)),
        }
    }

    /// Disjunction; `MatchAll` absorbs
    pub fn or(self, other: Criterion) -> Criterion {
        match (self, other) {
            (Criterion::MatchAll, _) | (_, Criterion::MatchAll) => Criterion::MatchAll,
            (a, b) => Criterion::Or(Box::new(a), Box::new(b)),
        }
    }

    /// Negation
    pub fn negate(self) -> Criterion {
        match self {
            Criterion::Not(inner) => *inner,
            c => Criterion::Not(Box::new(c)),
        }
    }

    /// AND-combine every criterion; empty input yields `MatchAll`
    pub fn all_of(criteria: impl IntoIterator<Item = Criterion>) -> Criterion {
        criteria
            .into_iter()
            .fold(Criterion::MatchAll, Criterion::and)
    }

    /// Every column referenced by this criterion, in first-seen order
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Criterion::MatchAll => {}
            Criterion::Cmp { column, .. }
            | Criterion::Between { column, .. }
            | Criterion::In { column, .. } => {
                if !out.contains(&column.as_str()) {
                    out.push(column);
                }
            }
            Criterion::And(a, b) | Criterion::Or(a, b) => {
                a.collect_columns(out);
                b.collect_columns(out);
            }
            Criterion::Not(inner) => inner.collect_columns(out),
        }
    }
}

/// Column reference used to build leaf predicates
#[derive(Debug, Clone)]
pub struct Field {
    column: String,
}

impl Field {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    fn cmp(&self, op: CmpOp, value: impl Into<Value>) -> Criterion {
        Criterion::Cmp {
            column: self.column.clone(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(&self, value: impl Into<Value>) -> Criterion {
        self.cmp(CmpOp::Eq, value)
    }

    pub fn ne(&self, value: impl Into<Value>) -> Criterion {
        self.cmp(CmpOp::Ne, value)
    }

    pub fn gt(&self, value: impl Into<Value>) -> Criterion {
        self.cmp(CmpOp::Gt, value)
    }

    pub fn ge(&self, value: impl Into<Value>) -> Criterion {
        self.cmp(CmpOp::Ge, value)
    }

    pub fn lt(&self, value: impl Into<Value>) -> Criterion {
        self.cmp(CmpOp::Lt, value)
    }

    pub fn le(&self, value: impl Into<Value>) -> Criterion {
        self.cmp(CmpOp::Le, value)
    }

    /// Inclusive range
    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> Criterion {
        Criterion::Between {
            column: self.column.clone(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Set membership
    pub fn isin<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Criterion {
        Criterion::In {
            column: self.column.clone(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Field accessor scoped to one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelector {
    table: String,
}

impl FieldSelector {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Table this selector builds predicates for
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Reference a column of this table
    pub fn field(&self, column: impl Into<String>) -> Field {
        Field::new(column)
    }
}

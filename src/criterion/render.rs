//! Renders a criterion into a parameterized statement fragment.
//!
//! Every compound node is parenthesized, so the rendered text groups
//! exactly as the tree does regardless of SQL operator precedence.

use serde_json::Value;

use super::expr::{CmpOp, Criterion};
use crate::schema::quote_ident;

/// A statement fragment plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Criterion {
    /// Render to a `WHERE`-clause body
    ///
    /// `MatchAll` renders as the constant `1`.
    pub fn render(&self) -> Rendered {
        let mut out = Rendered {
            sql: String::new(),
            params: Vec::new(),
        };
        write_criterion(self, &mut out);
        out
    }

    /// Render a full ` WHERE ...` suffix, empty for `MatchAll`
    pub fn render_where(&self) -> Rendered {
        if self.is_match_all() {
            return Rendered {
                sql: String::new(),
                params: Vec::new(),
            };
        }
        let mut rendered = self.render();
        rendered.sql = format!(" WHERE {}", rendered.sql);
        rendered
    }
}

fn write_criterion(criterion: &Criterion, out: &mut Rendered) {
    match criterion {
        Criterion::MatchAll => out.sql.push('1'),
        Criterion::Cmp { column, op, value } => {
            out.sql.push_str(&quote_ident(column));
            match (op, value) {
                (CmpOp::Eq, Value::Null) => out.sql.push_str(" IS NULL"),
                (CmpOp::Ne, Value::Null) => out.sql.push_str(" IS NOT NULL"),
                _ => {
                    out.sql.push(' ');
                    out.sql.push_str(op.as_sql());
                    out.sql.push_str(" ?");
                    out.params.push(value.clone());
                }
            }
        }
        Criterion::Between { column, low, high } => {
            out.sql.push_str(&quote_ident(column));
            out.sql.push_str(" BETWEEN ? AND ?");
            out.params.push(low.clone());
            out.params.push(high.clone());
        }
        Criterion::In { column, values } => {
            if values.is_empty() {
                out.sql.push('0');
                return;
            }
            out.sql.push_str(&quote_ident(column));
            out.sql.push_str(" IN (");
            out.sql.push_str(&vec!["?"; values.len()].join(", "));
            out.sql.push(')');
            out.params.extend(values.iter().cloned());
        }
        Criterion::And(a, b) => write_binary(a, "AND", b, out),
        Criterion::Or(a, b) => write_binary(a, "OR", b, out),
        Criterion::Not(inner) => {
            out.sql.push_str("NOT (");
            write_criterion(inner, out);
            out.sql.push(')');
        }
    }
}

fn write_binary(a: &Criterion, op: &str, b: &Criterion, out: &mut Rendered) {
    out.sql.push('(');
    write_criterion(a, out);
    out.sql.push_str(") ");
    out.sql.push_str(op);
    out.sql.push_str(" (");
    write_criterion(b, out);
    out.sql.push(')');
}

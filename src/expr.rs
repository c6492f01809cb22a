//! Filter expression mini-language: `<field> <op> <value>`.
//!
//! Expressions are parsed once into a [`FilterExpr`] when the pipeline runs,
//! then evaluated per row. An unparseable expression is not an error: the
//! caller treats it as "include all rows".

use std::cmp::Ordering;

use crate::value::{Row, Value};

/// Comparison operator, matched longest-first so `>` never shadows `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Ge,
    Le,
    Ne,
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    const TOKENS: [(&'static str, CompareOp); 6] = [
        (">=", CompareOp::Ge),
        ("<=", CompareOp::Le),
        ("!=", CompareOp::Ne),
        ("==", CompareOp::Eq),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
    ];

    fn matches(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Ge => ord != Ordering::Less,
            CompareOp::Le => ord != Ordering::Greater,
            CompareOp::Ne => ord != Ordering::Equal,
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Lt => ord == Ordering::Less,
        }
    }
}

/// A parsed filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    field: String,
    op: CompareOp,
    literal: Value,
}

impl FilterExpr {
    /// Parse `<field> <op> <value>`. Returns `None` when no operator is found
    /// or either side is empty.
    pub fn parse(expr: &str) -> Option<FilterExpr> {
        let (idx, token, op) = CompareOp::TOKENS
            .iter()
            .filter_map(|(token, op)| expr.find(token).map(|idx| (idx, *token, *op)))
            .next()?;

        let field = strip_qualifier(expr[..idx].trim());
        let literal = strip_quotes(expr[idx + token.len()..].trim());
        if field.is_empty() || literal.is_empty() {
            return None;
        }

        Some(FilterExpr {
            field: field.to_string(),
            op,
            literal: Value::Text(literal.to_string()),
        })
    }

    /// Evaluate against a row. Rows lacking the field never match.
    pub fn eval(&self, row: &Row) -> bool {
        match row.get(&self.field) {
            Some(value) => self.op.matches(value.compare(&self.literal)),
            None => false,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Drop a dotted qualifier prefix: `datum.value` reads field `value`.
fn strip_qualifier(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

fn strip_quotes(literal: &str) -> &str {
    let bytes = literal.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &literal[1..literal.len() - 1];
        }
    }
    literal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(field: &str, value: impl Into<Value>) -> Row {
        let mut r = Row::new();
        r.insert(field, value);
        r
    }

    #[test]
    fn test_parse_basic() {
        let e = FilterExpr::parse("value > 10").unwrap();
        assert_eq!(e.field(), "value");
        assert!(e.eval(&row("value", 15.0)));
        assert!(!e.eval(&row("value", 5.0)));
    }

    #[test]
    fn test_longest_operator_wins() {
        let e = FilterExpr::parse("value >= 10").unwrap();
        assert_eq!(e.op, CompareOp::Ge);
        assert!(e.eval(&row("value", 10.0)));
    }

    #[test]
    fn test_qualifier_stripped() {
        let e = FilterExpr::parse("datum.value <= 3").unwrap();
        assert_eq!(e.field(), "value");
        assert!(e.eval(&row("value", 3.0)));
    }

    #[test]
    fn test_quoted_literal() {
        let e = FilterExpr::parse("name == \"Alice\"").unwrap();
        assert!(e.eval(&row("name", "alice"))); // case-insensitive text
        assert!(!e.eval(&row("name", "Bob")));

        let e = FilterExpr::parse("name != 'x'").unwrap();
        assert!(e.eval(&row("name", "y")));
    }

    #[test]
    fn test_missing_field_never_matches() {
        let e = FilterExpr::parse("value > 10").unwrap();
        assert!(!e.eval(&row("other", 99.0)));
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert!(FilterExpr::parse("just some words").is_none());
        assert!(FilterExpr::parse("").is_none());
        assert!(FilterExpr::parse("> 10").is_none());
        assert!(FilterExpr::parse("value >").is_none());
    }

    #[test]
    fn test_numeric_vs_text_comparison() {
        // both sides numeric: "9" < "10" numerically even though not lexically
        let e = FilterExpr::parse("v < 10").unwrap();
        assert!(e.eval(&row("v", "9")));
        // non-numeric side: lexicographic on lowercase
        let e = FilterExpr::parse("v < b").unwrap();
        assert!(e.eval(&row("v", "Apple")));
    }
}

//! Statement Builder: turns a SQL template with `$1, $2, ...` placeholders and
//! a list of arguments into a fully bound statement.
//!
//! # Example
//!
//! ```ignore
//! use user_platform::{StatementBuilder, TypeAccessors, Value};
//!
//! let accessors = TypeAccessors::standard();
//! let stmt = StatementBuilder::new(&accessors).build(
//!     "SELECT id FROM users WHERE name = $1 AND password = $2",
//!     vec![Value::from("alice"), Value::from("p1")],
//! )?;
//! assert_eq!(stmt.params().len(), 2);
//! ```

use crate::accessor::{BoxedParam, TypeAccessors};
use crate::error::{OrmError, OrmResult};
use crate::value::{ScalarType, Value};
use std::fmt;
use tokio_postgres::types::ToSql;

/// The kind of SQL statement, detected from its first keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Other SQL (e.g., DDL)
    Other,
}

impl StatementKind {
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = strip_sql_prefix(sql);
        if starts_with_keyword(trimmed, "SELECT") {
            StatementKind::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            StatementKind::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            StatementKind::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            StatementKind::Delete
        } else {
            StatementKind::Other
        }
    }
}

/// Strip leading whitespace, SQL comments (`--` and `/* */`), and parentheses
/// from a SQL string to find the first meaningful keyword.
fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") {
            if let Some(pos) = s.find('\n') {
                s = &s[pos + 1..];
                continue;
            }
            return "";
        }
        if s.starts_with("/*") {
            if let Some(pos) = s.find("*/") {
                s = &s[pos + 2..];
                continue;
            }
            return "";
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    match s.get(0..keyword.len()) {
        Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
        None => false,
    }
}

/// Bytes that may continue an unquoted identifier (`$` included).
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Highest `$n` placeholder index used in `sql`.
///
/// Placeholders inside string literals (including `E'...'` escape strings),
/// quoted identifiers, dollar-quoted bodies, comments and identifiers such as
/// `col$1` are ignored.
pub fn placeholder_count(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut max = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                let escape_string = quote == b'\''
                    && i > 0
                    && matches!(bytes[i - 1], b'E' | b'e')
                    && (i < 2 || !is_ident_byte(bytes[i - 2]));
                i += 1;
                while i < bytes.len() {
                    if escape_string && bytes[i] == b'\\' {
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        // doubled quote is an escape
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b'$' if i > 0 && is_ident_byte(bytes[i - 1]) => i += 1,
            b'$' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(n) = sql[start..end].parse::<usize>() {
                        max = max.max(n);
                    }
                    i = end;
                    continue;
                }
                // `$tag$ ... $tag$` dollar quoting
                let mut tag_end = start;
                while tag_end < bytes.len()
                    && (bytes[tag_end].is_ascii_alphanumeric() || bytes[tag_end] == b'_')
                {
                    tag_end += 1;
                }
                if bytes.get(tag_end) == Some(&b'$') {
                    let tag = &sql[i..=tag_end];
                    let body_start = tag_end + 1;
                    i = match sql[body_start..].find(tag) {
                        Some(pos) => body_start + pos + tag.len(),
                        None => bytes.len(),
                    };
                    continue;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    max
}

/// One bound argument of a statement.
pub struct BoundParam {
    /// 1-based placeholder position.
    pub position: usize,
    pub scalar: ScalarType,
    pub value: Value,
    param: BoxedParam,
}

impl BoundParam {
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.param
    }
}

impl fmt::Debug for BoundParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundParam")
            .field("position", &self.position)
            .field("scalar", &self.scalar)
            .field("value", &self.value)
            .finish()
    }
}

/// A SQL template with every placeholder bound.
///
/// Built fresh for each call; never cached or shared.
#[must_use]
#[derive(Debug)]
pub struct BoundStatement {
    sql: String,
    kind: StatementKind,
    params: Vec<BoundParam>,
}

impl BoundStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    /// Bound values in position order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.params.iter().map(|p| &p.value)
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(BoundParam::as_sql).collect()
    }
}

/// Builds [`BoundStatement`]s using a [`TypeAccessors`] registry.
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder<'a> {
    accessors: &'a TypeAccessors,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(accessors: &'a TypeAccessors) -> Self {
        Self { accessors }
    }

    /// Bind `args` to the placeholders of `sql`, in order.
    ///
    /// Fails without returning a statement when:
    /// - the number of arguments differs from the number of placeholders
    ///   ([`OrmError::Bind`]);
    /// - an argument is `Null` ([`OrmError::Bind`]);
    /// - an argument's type has no accessor ([`OrmError::Configuration`]);
    /// - the accessor refuses the value ([`OrmError::Bind`]).
    pub fn build(&self, sql: impl Into<String>, args: Vec<Value>) -> OrmResult<BoundStatement> {
        let sql = sql.into();
        let expected = placeholder_count(&sql);
        if expected != args.len() {
            return Err(OrmError::bind(format!(
                "placeholders({expected}) != args({})",
                args.len()
            )));
        }

        let mut params = Vec::with_capacity(args.len());
        for (idx, value) in args.into_iter().enumerate() {
            let position = idx + 1;
            let scalar = value
                .scalar_type()
                .ok_or_else(|| OrmError::bind(format!("argument ${position} is NULL")))?;
            let accessor = self.accessors.get(scalar)?;
            let param = (accessor.bind)(&value).ok_or_else(|| {
                OrmError::bind(format!(
                    "{} refused a {} argument at ${position}",
                    accessor.bind_name,
                    value.type_label()
                ))
            })?;
            params.push(BoundParam {
                position,
                scalar,
                value,
                param,
            });
        }

        let kind = StatementKind::from_sql(&sql);
        Ok(BoundStatement { sql, kind, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_highest_placeholder() {
        assert_eq!(placeholder_count("SELECT 1"), 0);
        assert_eq!(placeholder_count("SELECT * FROM t WHERE a = $1 AND b = $2"), 2);
        assert_eq!(placeholder_count("SELECT $2, $1, $2"), 2);
        assert_eq!(placeholder_count("SELECT $10"), 10);
    }

    #[test]
    fn ignores_placeholders_in_literals_and_comments() {
        assert_eq!(placeholder_count("SELECT '$1', \"$2\" FROM t WHERE a = $1"), 1);
        assert_eq!(placeholder_count("SELECT 'it''s $3' -- $4\n, $1"), 1);
        assert_eq!(placeholder_count("SELECT /* $5 */ $1"), 1);
        assert_eq!(placeholder_count("SELECT $body$ $7 $body$, $2"), 2);
        assert_eq!(placeholder_count(r"SELECT E'it\'s $2', $1"), 1);
        assert_eq!(placeholder_count(r"SELECT e'a\\', $1"), 1);
        // backslash is literal in a standard string
        assert_eq!(placeholder_count(r"SELECT 'a\', $1"), 1);
        assert_eq!(placeholder_count("SELECT col$1 FROM t"), 0);
        assert_eq!(placeholder_count("SELECT col$1 FROM t WHERE a = $1"), 1);
    }

    #[test]
    fn binds_positions_in_order() {
        let accessors = TypeAccessors::standard();
        let stmt = StatementBuilder::new(&accessors)
            .build(
                "INSERT INTO users(name, age) VALUES ($1, $2)",
                vec![Value::from("alice"), Value::from(30_i64)],
            )
            .unwrap();

        assert_eq!(stmt.kind(), StatementKind::Insert);
        assert_eq!(stmt.params_ref().len(), 2);
        let positions: Vec<_> = stmt.params().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(stmt.params()[0].scalar, ScalarType::Text);
        assert_eq!(stmt.params()[1].value, Value::I64(30));
    }

    #[test]
    fn escape_string_with_embedded_quote_builds() {
        let accessors = TypeAccessors::standard();
        let stmt = StatementBuilder::new(&accessors)
            .build(r"SELECT E'it\'s $2', $1", vec![Value::from("a")])
            .unwrap();
        assert_eq!(stmt.params().len(), 1);
    }

    #[test]
    fn zero_argument_template_is_valid() {
        let accessors = TypeAccessors::empty();
        let stmt = StatementBuilder::new(&accessors)
            .build("SELECT id FROM users", Vec::new())
            .unwrap();
        assert!(stmt.params().is_empty());
        assert_eq!(stmt.kind(), StatementKind::Select);
    }

    #[test]
    fn arity_mismatch_is_bind_error() {
        let accessors = TypeAccessors::standard();
        let err = StatementBuilder::new(&accessors)
            .build("SELECT * FROM users WHERE id = $1", Vec::new())
            .unwrap_err();
        assert!(matches!(err, OrmError::Bind(ref m) if m.contains("placeholders(1) != args(0)")));
    }

    #[test]
    fn null_argument_is_rejected() {
        let accessors = TypeAccessors::standard();
        let err = StatementBuilder::new(&accessors)
            .build("SELECT $1", vec![Value::Null])
            .unwrap_err();
        assert!(matches!(err, OrmError::Bind(ref m) if m.contains("$1")));
    }

    #[test]
    fn unregistered_type_is_configuration_error() {
        let accessors = TypeAccessors::only(&[ScalarType::Text]);
        let err = StatementBuilder::new(&accessors)
            .build("SELECT $1, $2", vec![Value::from("a"), Value::from(1_i64)])
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("i64"));
    }

    #[test]
    fn wrapper_integers_bind_through_normalized_category() {
        let accessors = TypeAccessors::only(&[ScalarType::I32]);
        let stmt = StatementBuilder::new(&accessors)
            .build("SELECT $1", vec![Value::from(5_u16)])
            .unwrap();
        assert_eq!(stmt.params()[0].scalar, ScalarType::I32);
    }

    #[test]
    fn detects_statement_kind() {
        assert_eq!(StatementKind::from_sql("  -- note\nselect 1"), StatementKind::Select);
        assert_eq!(StatementKind::from_sql("(SELECT 1)"), StatementKind::Select);
        assert_eq!(StatementKind::from_sql("delete from t"), StatementKind::Delete);
        assert_eq!(StatementKind::from_sql("CREATE TABLE t()"), StatementKind::Other);
        assert_eq!(StatementKind::from_sql("UPDATE t SET a = 1"), StatementKind::Update);
    }
}

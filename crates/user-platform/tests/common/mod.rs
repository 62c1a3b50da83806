//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use user_platform::repository::{
    INSERT_USER_DML_SQL, QUERY_ALL_USERS_DML_SQL, QUERY_USER_BY_NAME_AND_PASSWORD_DML_SQL,
};
use user_platform::{BoundStatement, GenericClient, OrmError, OrmResult, Value, ValueRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Execute,
}

/// One statement seen by a test client.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub sql: String,
    pub values: Vec<Value>,
}

fn record(stmt: &BoundStatement, kind: CallKind) -> RecordedCall {
    RecordedCall {
        kind,
        sql: stmt.sql().to_string(),
        values: stmt.values().cloned().collect(),
    }
}

/// Replays queued results and records every statement it receives.
///
/// An empty queue answers queries with no rows and executes with one affected row.
#[derive(Default)]
pub struct ScriptedClient {
    calls: Mutex<Vec<RecordedCall>>,
    query_results: Mutex<VecDeque<OrmResult<Vec<ValueRow>>>>,
    execute_results: Mutex<VecDeque<OrmResult<u64>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_rows(&self, rows: Vec<ValueRow>) -> &Self {
        self.query_results.lock().unwrap().push_back(Ok(rows));
        self
    }

    pub fn push_query_error(&self, err: OrmError) -> &Self {
        self.query_results.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn push_execute_error(&self, err: OrmError) -> &Self {
        self.execute_results.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl GenericClient for ScriptedClient {
    type Row = ValueRow;

    async fn query(&self, stmt: &BoundStatement) -> OrmResult<Vec<ValueRow>> {
        self.calls.lock().unwrap().push(record(stmt, CallKind::Query));
        self.query_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn execute(&self, stmt: &BoundStatement) -> OrmResult<u64> {
        self.calls.lock().unwrap().push(record(stmt, CallKind::Execute));
        self.execute_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(1))
    }
}

/// A tiny in-memory `users` table that understands the repository's statements.
#[derive(Default)]
pub struct MemoryUsersClient {
    rows: Mutex<Vec<ValueRow>>,
}

impl MemoryUsersClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn text(values: &[Value], idx: usize) -> OrmResult<String> {
        match values.get(idx) {
            Some(Value::Text(s)) => Ok(s.clone()),
            other => Err(OrmError::Other(format!("expected text argument, got {other:?}"))),
        }
    }
}

impl GenericClient for MemoryUsersClient {
    type Row = ValueRow;

    async fn query(&self, stmt: &BoundStatement) -> OrmResult<Vec<ValueRow>> {
        let rows = self.rows.lock().unwrap();
        let values: Vec<Value> = stmt.values().cloned().collect();
        match stmt.sql() {
            QUERY_ALL_USERS_DML_SQL => Ok(rows.clone()),
            QUERY_USER_BY_NAME_AND_PASSWORD_DML_SQL => {
                let name = Value::Text(Self::text(&values, 0)?);
                let password = Value::Text(Self::text(&values, 1)?);
                Ok(rows
                    .iter()
                    .filter(|r| r.value("name") == Some(&name))
                    .filter(|r| r.value("password") == Some(&password))
                    .cloned()
                    .collect())
            }
            other => Err(OrmError::Other(format!("unsupported query: {other}"))),
        }
    }

    async fn execute(&self, stmt: &BoundStatement) -> OrmResult<u64> {
        if stmt.sql() != INSERT_USER_DML_SQL {
            return Err(OrmError::Other(format!("unsupported statement: {}", stmt.sql())));
        }
        let values: Vec<Value> = stmt.values().cloned().collect();
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(
            ValueRow::new()
                .with("id", id)
                .with("name", Self::text(&values, 0)?)
                .with("password", Self::text(&values, 1)?)
                .with("email", Self::text(&values, 2)?)
                .with("phoneNumber", Self::text(&values, 3)?),
        );
        Ok(1)
    }
}

pub fn user_row(id: i64, name: &str, password: &str) -> ValueRow {
    ValueRow::new()
        .with("id", id)
        .with("name", name)
        .with("password", password)
        .with("email", format!("{name}@x.com"))
        .with("phoneNumber", "555")
}

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Statement, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL for better concurrent read performance; FKs stay application
        // enforced (protect/cascade rules live in the entity store).
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
            }
        })
        .collect()
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        bound.iter().map(|b| b.as_ref()).collect();

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            let mut columns = Vec::new();
            for (i, name) in column_names.iter().enumerate() {
                columns.push((name.clone(), row_value_at(row, i)));
            }
            Ok(Row { columns })
        })
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
    }
    Ok(result)
}

fn run_exec(conn: &Connection, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
    let bound = bind_params(params);
    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        bound.iter().map(|b| b.as_ref()).collect();

    let affected = conn
        .execute(sql, param_refs.as_slice())
        .map_err(|e| SQLError::Execution(e.to_string()))?;

    Ok(affected as u64)
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Query(e.to_string()))?;
        run_query(&conn, sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        run_exec(&conn, sql, params)
    }

    fn exec_batch(&self, stmts: &[Statement]) -> Result<u64, SQLError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;

        let tx = conn
            .transaction()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;

        let mut affected = 0u64;
        for stmt in stmts {
            match run_exec(&tx, &stmt.sql, &stmt.params) {
                Ok(n) => affected += n,
                Err(e) => {
                    // Drop of `tx` rolls back.
                    tracing::debug!(sql = %stmt.sql, error = %e, "batch statement failed");
                    return Err(SQLError::Transaction(e.to_string()));
                }
            }
        }

        tx.commit()
            .map_err(|e| SQLError::Transaction(e.to_string()))?;
        Ok(affected)
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> Value {
    // Try integer first, then real, then text, then null.
    if let Ok(i) = row.get::<_, i64>(idx) {
        return Value::Integer(i);
    }
    if let Ok(f) = row.get::<_, f64>(idx) {
        return Value::Real(f);
    }
    if let Ok(s) = row.get::<_, String>(idx) {
        return Value::Text(s);
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec("CREATE TABLE t (id TEXT PRIMARY KEY, n INTEGER)", &[])
            .unwrap();
        s
    }

    #[test]
    fn query_and_exec_roundtrip() {
        let s = store();
        s.exec(
            "INSERT INTO t (id, n) VALUES (?1, ?2)",
            &[Value::Text("a".into()), Value::Integer(7)],
        )
        .unwrap();

        let rows = s.query("SELECT id, n FROM t", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("id"), Some("a"));
        assert_eq!(rows[0].get_i64("n"), Some(7));
    }

    #[test]
    fn batch_commits_all_statements() {
        let s = store();
        let stmts = vec![
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                vec![Value::Text("a".into()), Value::Integer(1)],
            ),
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                vec![Value::Text("b".into()), Value::Integer(2)],
            ),
        ];
        assert_eq!(s.exec_batch(&stmts).unwrap(), 2);
        let rows = s.query("SELECT id FROM t", &[]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn batch_rolls_back_on_failure() {
        let s = store();
        let stmts = vec![
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                vec![Value::Text("a".into()), Value::Integer(1)],
            ),
            // Duplicate primary key — the whole batch must roll back.
            Statement::new(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                vec![Value::Text("a".into()), Value::Integer(2)],
            ),
        ];
        assert!(s.exec_batch(&stmts).is_err());
        let rows = s.query("SELECT id FROM t", &[]).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn unique_violation_is_detectable() {
        let s = store();
        s.exec(
            "INSERT INTO t (id, n) VALUES (?1, ?2)",
            &[Value::Text("a".into()), Value::Integer(1)],
        )
        .unwrap();
        let err = s
            .exec(
                "INSERT INTO t (id, n) VALUES (?1, ?2)",
                &[Value::Text("a".into()), Value::Integer(2)],
            )
            .unwrap_err();
        assert!(err.is_unique_violation());
    }
}

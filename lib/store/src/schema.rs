use tinta_core::ServiceError;
use tinta_sql::SQLStore;

use crate::spec::{ColumnKind, Registry, ResourceSpec};

fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text => "TEXT",
        ColumnKind::Integer | ColumnKind::Boolean => "INTEGER",
        ColumnKind::Real => "REAL",
    }
}

/// DDL statements for one resource: the table plus one index per
/// non-unique declared column (unique columns get their index from the
/// constraint).
pub fn ddl(spec: &ResourceSpec) -> Vec<String> {
    let mut cols = vec![
        "id TEXT PRIMARY KEY".to_string(),
        "data TEXT NOT NULL".to_string(),
    ];
    for c in spec.columns {
        let unique = if c.unique { " UNIQUE" } else { "" };
        cols.push(format!("{} {}{}", c.name, sql_type(c.kind), unique));
    }
    cols.push("create_at TEXT".to_string());
    cols.push("update_at TEXT".to_string());

    let mut stmts = vec![format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        spec.table,
        cols.join(", "),
    )];

    for c in spec.columns {
        if !c.unique {
            stmts.push(format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                spec.table, c.name, spec.table, c.name,
            ));
        }
    }
    stmts
}

/// Initialize tables and indexes for every registered resource.
pub fn init_schema(sql: &dyn SQLStore, registry: &Registry) -> Result<(), ServiceError> {
    for spec in registry.iter() {
        for stmt in ddl(spec) {
            sql.exec(&stmt, &[])
                .map_err(|e| ServiceError::Storage(format!("schema init failed: {e}")))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ColumnSpec;

    #[test]
    fn ddl_includes_declared_and_timestamp_columns() {
        const COLS: &[ColumnSpec] = &[ColumnSpec::text("name"), ColumnSpec::boolean("idle")];
        let spec = ResourceSpec {
            name: "things",
            table: "things",
            columns: COLS,
            references: &[],
            default_order: "name",
            default_desc: false,
            display: |_| String::new(),
        };
        let stmts = ddl(&spec);
        assert!(stmts[0].contains("name TEXT"));
        assert!(stmts[0].contains("idle INTEGER"));
        assert!(stmts[0].contains("create_at TEXT"));
        // One index per non-unique column.
        assert_eq!(stmts.len(), 3);
    }
}

use std::sync::Arc;

use serde_json::{Value as Json, json};

use tinta_core::{ServiceError, new_id, now_rfc3339};
use tinta_sql::{SQLError, SQLStore, Statement, Value};

use crate::spec::{ColumnKind, ColumnSpec, OnDelete, Registry, ResourceSpec};

// ── Query inputs ────────────────────────────────────────────────────

/// A field-level predicate on an indexed column.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Exact match.
    Eq { column: String, value: Value },
    /// Case-insensitive substring match.
    Contains { column: String, needle: String },
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq { column: column.into(), value: value.into() }
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::Contains { column: column.into(), needle: needle.into() }
    }

    fn column(&self) -> &str {
        match self {
            Predicate::Eq { column, .. } | Predicate::Contains { column, .. } => column,
        }
    }
}

/// Requested ordering. Columns outside the resource spec fall back to the
/// store-default ordering rather than erroring.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

// ── Tree writes ─────────────────────────────────────────────────────

/// One pending write against a child collection row.
#[derive(Debug, Clone)]
pub enum ChildWrite {
    Insert(Json),
    Update(String, Json),
    Delete(String),
}

/// All pending writes for one child collection of a parent record.
#[derive(Debug, Clone)]
pub struct CollectionWrite {
    pub resource: String,
    /// FK column on the child pointing back at the parent.
    pub parent_column: String,
    pub writes: Vec<ChildWrite>,
}

// ── EntityStore ─────────────────────────────────────────────────────

/// Entity store adapter: JSON-document records over the SQL store, driven
/// by the resource registry. Owns the transaction boundary for
/// multi-record saves and enforces protect/cascade referential rules.
pub struct EntityStore {
    sql: Arc<dyn SQLStore>,
    registry: Arc<Registry>,
}

impl EntityStore {
    pub fn new(sql: Arc<dyn SQLStore>, registry: Arc<Registry>) -> Self {
        Self { sql, registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn spec(&self, resource: &str) -> Result<&ResourceSpec, ServiceError> {
        self.registry
            .get(resource)
            .ok_or_else(|| ServiceError::Internal(format!("unknown resource: {resource}")))
    }

    // ── Reads ──

    /// Query records matching `predicates`, with ordering and pagination.
    /// Returns the page of records plus the total match count.
    pub fn find(
        &self,
        resource: &str,
        predicates: &[Predicate],
        order: Option<&OrderBy>,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Json>, usize), ServiceError> {
        let spec = self.spec(resource)?;
        let (where_sql, mut params) = where_clause(spec, predicates)?;

        let count_sql = format!("SELECT COUNT(*) AS cnt FROM {}{}", spec.table, where_sql);
        let rows = self.sql.query(&count_sql, &params).map_err(storage_err)?;
        let total = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        let (order_col, desc) = match order {
            Some(o) if spec.has_column(&o.column) => (o.column.as_str(), o.descending),
            _ => (spec.default_order, spec.default_desc),
        };
        let direction = if desc { "DESC" } else { "ASC" };

        let limit_idx = params.len() + 1;
        let offset_idx = params.len() + 2;
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));

        let sql = format!(
            "SELECT data FROM {}{} ORDER BY {} {} LIMIT ?{} OFFSET ?{}",
            spec.table, where_sql, order_col, direction, limit_idx, offset_idx,
        );

        let rows = self.sql.query(&sql, &params).map_err(storage_err)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(parse_data(row.get_str("data"))?);
        }
        Ok((records, total))
    }

    /// Count records matching `predicates`.
    pub fn count(&self, resource: &str, predicates: &[Predicate]) -> Result<usize, ServiceError> {
        let spec = self.spec(resource)?;
        let (where_sql, params) = where_clause(spec, predicates)?;
        let sql = format!("SELECT COUNT(*) AS cnt FROM {}{}", spec.table, where_sql);
        let rows = self.sql.query(&sql, &params).map_err(storage_err)?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize)
    }

    /// Fetch a record by id, or None.
    pub fn try_get(&self, resource: &str, id: &str) -> Result<Option<Json>, ServiceError> {
        let spec = self.spec(resource)?;
        let sql = format!("SELECT data FROM {} WHERE id = ?1", spec.table);
        let rows = self
            .sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(storage_err)?;
        match rows.first() {
            Some(row) => Ok(Some(parse_data(row.get_str("data"))?)),
            None => Ok(None),
        }
    }

    /// Fetch a record by id, or NotFound.
    pub fn get(&self, resource: &str, id: &str) -> Result<Json, ServiceError> {
        self.try_get(resource, id)?
            .ok_or_else(|| ServiceError::NotFound(format!("{resource}/{id}")))
    }

    // ── Writes ──

    /// Insert or update one record. Assigns an id when missing, stamps
    /// timestamps, and returns the stored document.
    pub fn save(&self, resource: &str, doc: Json) -> Result<Json, ServiceError> {
        let spec = self.spec(resource)?;
        let (doc, stmt) = self.prepare_save(spec, doc)?;
        self.sql.exec(&stmt.sql, &stmt.params).map_err(storage_err)?;
        Ok(doc)
    }

    /// Save a parent together with its child collections as one transaction.
    ///
    /// The parent is written first (its id assigned when new); every child
    /// insert/update gets the parent id attached on its FK column. All
    /// statements commit or none do.
    pub fn save_tree(
        &self,
        parent_resource: &str,
        parent: Json,
        collections: Vec<CollectionWrite>,
    ) -> Result<Json, ServiceError> {
        let spec = self.spec(parent_resource)?;
        let (parent, parent_stmt) = self.prepare_save(spec, parent)?;
        let parent_id = parent["id"].as_str().unwrap_or_default().to_string();

        let mut stmts = vec![parent_stmt];
        for coll in collections {
            let cspec = self.spec(&coll.resource)?;
            for write in coll.writes {
                match write {
                    ChildWrite::Insert(mut doc) => {
                        doc[coll.parent_column.as_str()] = json!(parent_id);
                        let (_, stmt) = self.prepare_insert(cspec, doc)?;
                        stmts.push(stmt);
                    }
                    ChildWrite::Update(id, mut doc) => {
                        doc[coll.parent_column.as_str()] = json!(parent_id);
                        doc["id"] = json!(id);
                        doc["update_at"] = json!(now_rfc3339());
                        stmts.push(update_stmt(cspec, &id, &doc)?);
                    }
                    ChildWrite::Delete(id) => {
                        stmts.push(Statement::new(
                            format!("DELETE FROM {} WHERE id = ?1", cspec.table),
                            vec![Value::Text(id)],
                        ));
                    }
                }
            }
        }

        self.sql.exec_batch(&stmts).map_err(storage_err)?;
        Ok(parent)
    }

    /// Delete a record, honoring referential rules: protect references
    /// block the delete with a conflict, cascade references are removed in
    /// the same transaction.
    pub fn delete(&self, resource: &str, id: &str) -> Result<(), ServiceError> {
        let spec = self.spec(resource)?;
        if self.try_get(resource, id)?.is_none() {
            return Err(ServiceError::NotFound(format!("{resource}/{id}")));
        }

        let mut stmts = Vec::new();
        for (child, link) in self.registry.referencing(resource) {
            let sql = format!(
                "SELECT COUNT(*) AS cnt FROM {} WHERE {} = ?1",
                child.table, link.column,
            );
            let rows = self
                .sql
                .query(&sql, &[Value::Text(id.to_string())])
                .map_err(storage_err)?;
            let n = rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0);
            if n == 0 {
                continue;
            }
            match link.on_delete {
                OnDelete::Protect => {
                    return Err(ServiceError::Conflict(format!(
                        "{resource}/{id} is still referenced by {} {} record(s)",
                        n, child.name,
                    )));
                }
                OnDelete::Cascade => {
                    stmts.push(Statement::new(
                        format!("DELETE FROM {} WHERE {} = ?1", child.table, link.column),
                        vec![Value::Text(id.to_string())],
                    ));
                }
            }
        }

        stmts.push(Statement::new(
            format!("DELETE FROM {} WHERE id = ?1", spec.table),
            vec![Value::Text(id.to_string())],
        ));
        self.sql.exec_batch(&stmts).map_err(storage_err)?;
        Ok(())
    }

    // ── Statement preparation ──

    fn prepare_save(
        &self,
        spec: &ResourceSpec,
        mut doc: Json,
    ) -> Result<(Json, Statement), ServiceError> {
        ensure_object(&doc)?;
        let id = match doc.get("id").and_then(Json::as_str) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => new_id(),
        };
        doc["id"] = json!(id);
        let now = now_rfc3339();

        match self.try_get(spec.name, &id)? {
            Some(prev) => {
                if doc.get("create_at").and_then(Json::as_str).is_none() {
                    doc["create_at"] = prev["create_at"].clone();
                }
                doc["update_at"] = json!(now);
                let stmt = update_stmt(spec, &id, &doc)?;
                Ok((doc, stmt))
            }
            None => {
                doc["create_at"] = json!(now.clone());
                doc["update_at"] = json!(now);
                let stmt = insert_stmt(spec, &id, &doc)?;
                Ok((doc, stmt))
            }
        }
    }

    fn prepare_insert(
        &self,
        spec: &ResourceSpec,
        mut doc: Json,
    ) -> Result<(Json, Statement), ServiceError> {
        ensure_object(&doc)?;
        let id = match doc.get("id").and_then(Json::as_str) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => new_id(),
        };
        doc["id"] = json!(id);
        let now = now_rfc3339();
        doc["create_at"] = json!(now.clone());
        doc["update_at"] = json!(now);
        let stmt = insert_stmt(spec, &id, &doc)?;
        Ok((doc, stmt))
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn ensure_object(doc: &Json) -> Result<(), ServiceError> {
    if doc.is_object() {
        Ok(())
    } else {
        Err(ServiceError::Internal("record must be a JSON object".into()))
    }
}

fn parse_data(data: Option<&str>) -> Result<Json, ServiceError> {
    let data = data.ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
}

fn storage_err(e: SQLError) -> ServiceError {
    if e.is_unique_violation() {
        ServiceError::Conflict(e.to_string())
    } else {
        tracing::error!(error = %e, "entity store failure");
        ServiceError::Storage(e.to_string())
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped.
fn like_pattern(needle: &str) -> String {
    let mut pat = String::with_capacity(needle.len() + 2);
    pat.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pat.push('\\');
        }
        pat.push(c);
    }
    pat.push('%');
    pat
}

fn where_clause(
    spec: &ResourceSpec,
    predicates: &[Predicate],
) -> Result<(String, Vec<Value>), ServiceError> {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    for p in predicates {
        if !spec.has_column(p.column()) {
            return Err(ServiceError::Internal(format!(
                "predicate on undeclared column {}.{}",
                spec.name,
                p.column(),
            )));
        }
        let idx = params.len() + 1;
        match p {
            Predicate::Eq { column, value } => {
                clauses.push(format!("{column} = ?{idx}"));
                params.push(value.clone());
            }
            Predicate::Contains { column, needle } => {
                clauses.push(format!("LOWER({column}) LIKE LOWER(?{idx}) ESCAPE '\\'"));
                params.push(Value::Text(like_pattern(needle)));
            }
        }
    }

    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    Ok((sql, params))
}

/// Extract an indexed column's SQL value from the record document.
fn column_value(col: &ColumnSpec, doc: &Json) -> Value {
    let v = &doc[col.name];
    match col.kind {
        ColumnKind::Text => v.as_str().map(Value::from).unwrap_or(Value::Null),
        ColumnKind::Integer => v.as_i64().map(Value::Integer).unwrap_or(Value::Null),
        ColumnKind::Boolean => v.as_bool().map(Value::from).unwrap_or(Value::Null),
        ColumnKind::Real => v.as_f64().map(Value::Real).unwrap_or(Value::Null),
    }
}

fn timestamp_value(doc: &Json, field: &str) -> Value {
    doc[field].as_str().map(Value::from).unwrap_or(Value::Null)
}

fn insert_stmt(spec: &ResourceSpec, id: &str, doc: &Json) -> Result<Statement, ServiceError> {
    let json = serde_json::to_string(doc).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut cols = vec!["id", "data"];
    let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];
    for c in spec.columns {
        cols.push(c.name);
        params.push(column_value(c, doc));
    }
    cols.push("create_at");
    params.push(timestamp_value(doc, "create_at"));
    cols.push("update_at");
    params.push(timestamp_value(doc, "update_at"));

    let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("?{i}")).collect();
    Ok(Statement::new(
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            spec.table,
            cols.join(", "),
            placeholders.join(", "),
        ),
        params,
    ))
}

fn update_stmt(spec: &ResourceSpec, id: &str, doc: &Json) -> Result<Statement, ServiceError> {
    let json = serde_json::to_string(doc).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let mut sets = vec!["data = ?1".to_string()];
    let mut params = vec![Value::Text(json)];
    for c in spec.columns {
        sets.push(format!("{} = ?{}", c.name, params.len() + 1));
        params.push(column_value(c, doc));
    }
    sets.push(format!("update_at = ?{}", params.len() + 1));
    params.push(timestamp_value(doc, "update_at"));

    let id_idx = params.len() + 1;
    params.push(Value::Text(id.to_string()));

    Ok(Statement::new(
        format!("UPDATE {} SET {} WHERE id = ?{}", spec.table, sets.join(", "), id_idx),
        params,
    ))
}

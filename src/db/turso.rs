use crate::types::{AppError, Result};
use libsql::{params::Params, Builder, Connection, Database, Row, Value};

/// Relational store for companies, jobs, users and applications.
///
/// Holds one connection for its lifetime; libsql connections are cheap to
/// clone and share the same underlying database, which also keeps
/// `:memory:` databases alive across calls.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Connects to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens (or creates) a local SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    /// Creates a private in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to enable foreign keys: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS companies (
                handle TEXT PRIMARY KEY CHECK (handle = lower(handle)),
                name TEXT UNIQUE NOT NULL,
                num_employees INTEGER CHECK (num_employees >= 0),
                description TEXT NOT NULL,
                logo_url TEXT
            ) STRICT",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create companies table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                salary INTEGER CHECK (salary >= 0),
                equity REAL CHECK (equity >= 0 AND equity <= 1.0),
                company_handle TEXT NOT NULL
                    REFERENCES companies(handle) ON DELETE CASCADE
            ) STRICT",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create jobs table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT NOT NULL CHECK (instr(email, '@') > 1),
                is_admin INTEGER NOT NULL DEFAULT 0
            ) STRICT",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS applications (
                username TEXT NOT NULL
                    REFERENCES users(username) ON DELETE CASCADE,
                job_id INTEGER NOT NULL
                    REFERENCES jobs(id) ON DELETE CASCADE,
                PRIMARY KEY (username, job_id)
            ) STRICT",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create applications table: {}", e)))?;

        Ok(())
    }

    /// Runs a statement with positional values, mapping every returned row.
    ///
    /// Rows are mapped while the cursor is positioned on them.
    pub(crate) async fn query_map<T, F>(
        &self,
        sql: &str,
        values: Vec<serde_json::Value>,
        mut map: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let conn = self.connection()?;
        let params = to_params(values)?;

        tracing::debug!(sql, "query");
        let mut rows = conn.query(sql, params).await.map_err(map_db_error)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().await.map_err(map_db_error)? {
            out.push(map(&row)?);
        }

        Ok(out)
    }

    /// Like [`query_map`](Self::query_map), keeping only the first row.
    pub(crate) async fn query_opt<T, F>(
        &self,
        sql: &str,
        values: Vec<serde_json::Value>,
        map: F,
    ) -> Result<Option<T>>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        Ok(self.query_map(sql, values, map).await?.into_iter().next())
    }

    /// Runs a statement that returns no rows. Returns the affected row count.
    pub(crate) async fn execute(&self, sql: &str, values: Vec<serde_json::Value>) -> Result<u64> {
        let conn = self.connection()?;
        let params = to_params(values)?;

        tracing::debug!(sql, "execute");
        conn.execute(sql, params).await.map_err(map_db_error)
    }
}

/// Converts request values into SQLite values.
pub(crate) fn to_sql_value(value: serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    Ok(match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Integer(b as i64),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Real(
                n.as_f64()
                    .ok_or_else(|| AppError::InvalidInput(format!("Unsupported number: {}", n)))?,
            ),
        },
        Json::String(s) => Value::Text(s),
        other => {
            return Err(AppError::Contract(format!(
                "Cannot bind non-scalar value: {}",
                other
            )))
        }
    })
}

fn to_params(values: Vec<serde_json::Value>) -> Result<Params> {
    if values.is_empty() {
        return Ok(Params::None);
    }

    let values = values
        .into_iter()
        .map(to_sql_value)
        .collect::<Result<Vec<_>>>()?;

    Ok(Params::Positional(values))
}

/// Maps constraint failures to client errors, everything else to a
/// database error.
pub(crate) fn map_db_error(e: libsql::Error) -> AppError {
    let msg = e.to_string();

    if msg.contains("UNIQUE constraint failed") {
        AppError::InvalidInput(format!("Duplicate entry: {}", constraint_target(&msg)))
    } else if msg.contains("FOREIGN KEY constraint failed") {
        AppError::InvalidInput("Referenced record does not exist".to_string())
    } else if msg.contains("CHECK constraint failed") || msg.contains("NOT NULL constraint failed") {
        AppError::InvalidInput(format!("Invalid value: {}", constraint_target(&msg)))
    } else if msg.contains("cannot store") || msg.contains("datatype mismatch") {
        AppError::InvalidInput("Invalid value type".to_string())
    } else {
        AppError::Database(msg)
    }
}

fn constraint_target(msg: &str) -> &str {
    msg.rsplit_once(": ")
        .map(|(_, target)| target)
        .unwrap_or(msg)
        .trim_matches('`')
}

// Typed column readers over `Row::get_value`.

pub(crate) fn get_text(row: &Row, idx: i32) -> Result<String> {
    match row.get_value(idx).map_err(map_db_error)? {
        Value::Text(s) => Ok(s),
        other => Err(AppError::Database(format!(
            "Column {} is not text: {:?}",
            idx, other
        ))),
    }
}

pub(crate) fn get_opt_text(row: &Row, idx: i32) -> Result<Option<String>> {
    match row.get_value(idx).map_err(map_db_error)? {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        other => Err(AppError::Database(format!(
            "Column {} is not text: {:?}",
            idx, other
        ))),
    }
}

pub(crate) fn get_integer(row: &Row, idx: i32) -> Result<i64> {
    get_opt_integer(row, idx)?
        .ok_or_else(|| AppError::Database(format!("Column {} is NULL", idx)))
}

pub(crate) fn get_opt_integer(row: &Row, idx: i32) -> Result<Option<i64>> {
    match row.get_value(idx).map_err(map_db_error)? {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(i)),
        other => Err(AppError::Database(format!(
            "Column {} is not an integer: {:?}",
            idx, other
        ))),
    }
}

pub(crate) fn get_opt_real(row: &Row, idx: i32) -> Result<Option<f64>> {
    match row.get_value(idx).map_err(map_db_error)? {
        Value::Null => Ok(None),
        Value::Real(f) => Ok(Some(f)),
        Value::Integer(i) => Ok(Some(i as f64)),
        other => Err(AppError::Database(format!(
            "Column {} is not a number: {:?}",
            idx, other
        ))),
    }
}

pub(crate) fn get_bool(row: &Row, idx: i32) -> Result<bool> {
    Ok(get_integer(row, idx)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_sql_value_scalars() {
        assert!(matches!(to_sql_value(json!(null)), Ok(Value::Null)));
        assert!(matches!(to_sql_value(json!(true)), Ok(Value::Integer(1))));
        assert!(matches!(to_sql_value(json!(42)), Ok(Value::Integer(42))));
        assert!(matches!(to_sql_value(json!(0.5)), Ok(Value::Real(f)) if f == 0.5));
        assert!(matches!(to_sql_value(json!("text")), Ok(Value::Text(s)) if s == "text"));
    }

    #[test]
    fn test_to_sql_value_rejects_composites() {
        assert!(to_sql_value(json!([1, 2])).is_err());
        assert!(to_sql_value(json!({"a": 1})).is_err());
    }

    #[test]
    fn test_constraint_target() {
        assert_eq!(
            constraint_target("UNIQUE constraint failed: companies.name"),
            "companies.name"
        );
        assert_eq!(constraint_target("plain"), "plain");
    }
}

// Copyright 2025 Rowmap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SQLite backend over rusqlite
//!
//! Implements the driver traits for [`rusqlite::Connection`] and
//! [`rusqlite::Transaction`]. Placeholder names resolve against the
//! `:name`, `@name`, and `$name` SQL syntaxes; a declared field with no
//! placeholder in the statement text is inert.
//!
//! # Examples
//!
//! ```ignore
//! use rowmap::{named_params, ConnectionExt};
//!
//! let conn = rusqlite::Connection::open_in_memory()?;
//! conn.exec("CREATE TABLE kv (Key TEXT, Value INTEGER)", ())?;
//! conn.exec(
//!     "INSERT INTO kv VALUES (:key, :value)",
//!     named_params! { key: "Meaning of Life", value: 42 },
//! )?;
//! let count: i64 = conn.query_scalar("SELECT COUNT(*) FROM kv", ())?;
//! ```

use std::sync::Arc;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Value};

use super::{Connection, Cursor, Statement};

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Driver(err.to_string())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Float(f) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*f)),
            Value::Boolean(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*b as i64)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Timestamp(ts) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Text(ts.to_rfc3339()))
            }
        })
    }
}

/// Normalize a rusqlite cell into a [`Value`]
fn value_from_ref(cell: ValueRef<'_>) -> Result<Value> {
    Ok(match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(t) => {
            let s = std::str::from_utf8(t).map_err(|e| Error::driver(e.to_string()))?;
            Value::Text(Arc::from(s))
        }
        ValueRef::Blob(b) => Value::Blob(Arc::from(b)),
    })
}

/// A compiled SQLite statement with resolved placeholder indices
#[derive(Debug)]
pub struct SqliteStatement<'c> {
    stmt: rusqlite::Statement<'c>,
    /// Field name -> 1-based parameter index, for fields with a placeholder
    indices: FxHashMap<String, usize>,
}

impl<'c> SqliteStatement<'c> {
    fn new(stmt: rusqlite::Statement<'c>) -> Self {
        Self {
            stmt,
            indices: FxHashMap::default(),
        }
    }
}

impl Statement for SqliteStatement<'_> {
    type Cursor<'s>
        = SqliteCursor<'s>
    where
        Self: 's;

    fn declare(&mut self, name: &str) -> Result<()> {
        for prefix in [':', '@', '$'] {
            if let Some(index) = self.stmt.parameter_index(&format!("{prefix}{name}"))? {
                self.indices.insert(name.to_string(), index);
                return Ok(());
            }
        }
        // No placeholder in the SQL text for this field
        Ok(())
    }

    fn bind(&mut self, name: &str, value: &Value) -> Result<()> {
        if let Some(&index) = self.indices.get(name) {
            self.stmt.raw_bind_parameter(index, value)?;
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<usize> {
        Ok(self.stmt.raw_execute()?)
    }

    fn cursor(&mut self) -> Result<SqliteCursor<'_>> {
        let columns: Vec<String> = self
            .stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(SqliteCursor {
            rows: self.stmt.raw_query(),
            columns,
            current: Vec::new(),
        })
    }

    fn scalar(&mut self) -> Result<Option<Value>> {
        let mut rows = self.stmt.raw_query();
        match rows.next()? {
            Some(row) => Ok(Some(value_from_ref(row.get_ref(0)?)?)),
            None => Ok(None),
        }
    }
}

/// Forward-only cursor over a SQLite result set
///
/// The current row is copied into an owned buffer on each advance, which
/// keeps the cursor free of self-references into the statement.
pub struct SqliteCursor<'s> {
    rows: rusqlite::Rows<'s>,
    columns: Vec<String>,
    current: Vec<Value>,
}

impl Cursor for SqliteCursor<'_> {
    fn advance(&mut self) -> Result<bool> {
        match self.rows.next()? {
            Some(row) => {
                self.current.clear();
                for index in 0..self.columns.len() {
                    self.current.push(value_from_ref(row.get_ref(index)?)?);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> &str {
        &self.columns[index]
    }

    fn value(&self, index: usize) -> Result<Value> {
        self.current
            .get(index)
            .cloned()
            .ok_or(Error::ColumnIndexOutOfBounds { index })
    }
}

impl Connection for rusqlite::Connection {
    type Stmt<'c>
        = SqliteStatement<'c>
    where
        Self: 'c;

    fn prepare_statement(&self, sql: &str) -> Result<SqliteStatement<'_>> {
        Ok(SqliteStatement::new(self.prepare(sql)?))
    }
}

impl Connection for rusqlite::Transaction<'_> {
    type Stmt<'c>
        = SqliteStatement<'c>
    where
        Self: 'c;

    fn prepare_statement(&self, sql: &str) -> Result<SqliteStatement<'_>> {
        // Deref to the underlying connection; SQLite scopes the statement
        // to the open transaction implicitly.
        Ok(SqliteStatement::new(
            rusqlite::Connection::prepare(self, sql)?,
        ))
    }
}

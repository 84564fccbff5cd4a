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

//! One-shot convenience layer
//!
//! [`ConnectionExt`] adds the per-verb helpers to every driver
//! [`Connection`]: each one prepares a command, runs it once, and drops
//! it. The `prepare_*` variants hand back the prepared command instead,
//! for repeated execution with different bound values.
//!
//! Because transactions implement [`Connection`] too, the same surface
//! works inside a transaction.
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
//!
//! let count: i64 = conn.query_scalar("SELECT COUNT(*) FROM kv", ())?;
//! let keys: Vec<String> = conn.query_sequence("SELECT Key FROM kv ORDER BY Key", ())?;
//! ```

use crate::core::{Error, FromValue, Result};
use crate::driver::Connection;

use super::params::Params;
use super::prepared::{
    Affected, ArgsMapper, ColumnMapper, Prepared, PreparedExecute, PreparedQuery,
    PreparedQueryArgs, PreparedScalar, PreparedSequence, RowMapper, ScalarMapper,
};
use super::row::{FromArgs, FromRow};

fn checked_sql(sql: &str) -> Result<&str> {
    if sql.trim().is_empty() {
        return Err(Error::invalid_argument("sql must not be empty"));
    }
    Ok(sql)
}

/// Convenience methods over any driver connection or transaction
pub trait ConnectionExt: Connection {
    /// Prepare a non-query command
    fn prepare_exec<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<PreparedExecute<Self::Stmt<'_>>> {
        let stmt = self.prepare_statement(checked_sql(sql)?)?;
        Prepared::new(stmt, &params, Affected)
    }

    /// Execute a SQL statement once, returning the affected-row count
    fn exec<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.prepare_exec(sql, params)?.execute(())
    }

    /// Prepare a typed-row query
    ///
    /// `T` needs a default value and writable fields; see
    /// [`FromRow`](crate::FromRow).
    fn prepare_query<T: FromRow, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<PreparedQuery<Self::Stmt<'_>, T>> {
        let stmt = self.prepare_statement(checked_sql(sql)?)?;
        Prepared::new(stmt, &params, RowMapper::default())
    }

    /// Query for a list of rows, one [`FromRow`](crate::FromRow) target
    /// per row
    fn query<T: FromRow, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        self.prepare_query(sql, params)?.execute(())
    }

    /// Prepare a constructor-row query
    ///
    /// `T` is built from positional arguments matched to columns by name;
    /// see [`FromArgs`](crate::FromArgs).
    fn prepare_query_args<T: FromArgs, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<PreparedQueryArgs<Self::Stmt<'_>, T>> {
        let stmt = self.prepare_statement(checked_sql(sql)?)?;
        Prepared::new(stmt, &params, ArgsMapper::default())
    }

    /// Query for a list of rows built through their constructor arguments
    fn query_args<T: FromArgs, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        self.prepare_query_args(sql, params)?.execute(())
    }

    /// Prepare a single-column sequence query
    fn prepare_sequence<T: FromValue, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<PreparedSequence<Self::Stmt<'_>, T>> {
        let stmt = self.prepare_statement(checked_sql(sql)?)?;
        Prepared::new(stmt, &params, ColumnMapper::default())
    }

    /// Query for the first column of every row
    fn query_sequence<T: FromValue, P: Params>(&self, sql: &str, params: P) -> Result<Vec<T>> {
        self.prepare_sequence(sql, params)?.execute(())
    }

    /// Prepare a scalar query
    fn prepare_scalar<T: FromValue, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<PreparedScalar<Self::Stmt<'_>, T>> {
        let stmt = self.prepare_statement(checked_sql(sql)?)?;
        Prepared::new(stmt, &params, ScalarMapper::default())
    }

    /// Query for a single value: the first column of the first row
    ///
    /// With no row, or a NULL cell, an `Option<T>` target yields `None`
    /// where a non-nullable `T` fails with a conversion error.
    fn query_scalar<T: FromValue, P: Params>(&self, sql: &str, params: P) -> Result<T> {
        self.prepare_scalar(sql, params)?.execute(())
    }
}

impl<C: Connection + ?Sized> ConnectionExt for C {}

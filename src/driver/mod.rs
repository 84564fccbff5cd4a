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

//! Backend driver traits
//!
//! The binding and materialization layers talk to the database through
//! three capabilities: a [`Connection`] that compiles SQL into a
//! [`Statement`], a statement that accepts named parameter values and runs
//! as a non-query, a reader, or a single-value fetch, and a forward-only
//! [`Cursor`] over result rows.
//!
//! Everything is synchronous and blocking; a statement is a scoped
//! resource released when it is dropped.

use crate::core::{Result, Value};

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// A connection or transaction that can compile SQL text into a statement
///
/// Both connections and transactions implement this, so the convenience
/// layer works uniformly over either.
pub trait Connection {
    /// The statement type produced by this connection
    type Stmt<'c>: Statement
    where
        Self: 'c;

    /// Compile `sql` into a prepared statement with named placeholders
    fn prepare_statement(&self, sql: &str) -> Result<Self::Stmt<'_>>;
}

/// One compiled statement with named placeholders
///
/// Placeholder values persist across runs until rebound, which is what
/// allows a prepared command to re-execute with its previous values when
/// no new ones are supplied.
pub trait Statement {
    /// The cursor type produced by [`Statement::cursor`]
    type Cursor<'s>: Cursor
    where
        Self: 's;

    /// Resolve the named placeholder for a declared parameter field
    ///
    /// A field with no matching placeholder in the SQL text is inert:
    /// declaring it succeeds and binding it is a no-op.
    fn declare(&mut self, name: &str) -> Result<()>;

    /// Bind a value to a named placeholder
    fn bind(&mut self, name: &str, value: &Value) -> Result<()>;

    /// Run as a non-query, returning the affected-row count
    fn execute(&mut self) -> Result<usize>;

    /// Run as a reader over the full result set
    fn cursor(&mut self) -> Result<Self::Cursor<'_>>;

    /// Run as a single-value fetch: the first column of the first row,
    /// or `None` when the result set is empty
    fn scalar(&mut self) -> Result<Option<Value>>;
}

/// Forward-only cursor over result rows
///
/// `advance` moves to the next row; column accessors read the current row.
/// Cell values are NULL-normalized to [`Value::Null`].
pub trait Cursor {
    /// Move to the next row, returning whether one is available
    fn advance(&mut self) -> Result<bool>;

    /// Number of columns in the result set
    fn field_count(&self) -> usize;

    /// Name of the column at `index`
    fn column_name(&self, index: usize) -> &str;

    /// Value of the column at `index` in the current row
    fn value(&self, index: usize) -> Result<Value>;
}

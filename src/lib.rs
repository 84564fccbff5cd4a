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

//! # rowmap - named-parameter binding and typed row materialization
//!
//! rowmap is a thin convenience layer over a relational database client:
//! it prepares parameterized statements from named-parameter objects,
//! executes them, and maps result rows into typed objects, sequences, or
//! scalars. It is synchronous, blocking, and backend-agnostic; a SQLite
//! backend over rusqlite ships behind the `sqlite` feature (on by
//! default).
//!
//! ## Quick Start
//!
//! ```rust
//! use rowmap::{named_params, ConnectionExt};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Entry {
//!     key: Option<String>,
//!     value: i64,
//! }
//!
//! rowmap::from_row!(Entry {
//!     key => "Key",
//!     value => "Value",
//! });
//!
//! let conn = rusqlite::Connection::open_in_memory().unwrap();
//! conn.exec("CREATE TABLE kv (Key TEXT, Value INTEGER)", ()).unwrap();
//!
//! // One prepared command, executed with different bound values
//! let mut insert = conn
//!     .prepare_exec(
//!         "INSERT INTO kv VALUES (:key, :value)",
//!         named_params! { key: "A", value: 1 },
//!     )
//!     .unwrap();
//! insert.execute(()).unwrap();
//! insert.execute(named_params! { key: "B", value: 2 }).unwrap();
//! drop(insert);
//!
//! let entries: Vec<Entry> = conn
//!     .query("SELECT Key, Value FROM kv ORDER BY Key", ())
//!     .unwrap();
//! assert_eq!(entries.len(), 2);
//!
//! let count: i64 = conn.query_scalar("SELECT COUNT(*) FROM kv", ()).unwrap();
//! assert_eq!(count, 2);
//! ```
//!
//! ## Binding model
//!
//! The parameter shape is captured once, when a command is prepared: the
//! params object's fields, in declaration order, become the statement's
//! named placeholders. Every later execution reads those same field names
//! off whatever values object it is given. Column-to-field mappings for
//! query results are likewise derived once, on the first row, and reused
//! for the command's lifetime.
//!
//! ## Modules
//!
//! - [`core`] - cell values ([`Value`]), coercion ([`FromValue`]), errors
//! - [`api`] - parameter binding, row materialization, prepared commands,
//!   and the [`ConnectionExt`] convenience surface
//! - [`driver`] - backend traits plus the in-memory and SQLite backends

pub mod api;
pub mod core;
pub mod driver;

pub use crate::core::{Error, FromValue, Result, Value};

pub use api::{
    arg_value, Affected, ArgsMapper, ColumnMapper, ConnectionExt, FromArgs, FromRow, Materialize,
    NamedParams, Params, Prepared, PreparedExecute, PreparedQuery, PreparedQueryArgs,
    PreparedScalar, PreparedSequence, RowMapper, ScalarMapper, ToParam,
};

pub use driver::{Connection, Cursor, Statement};

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

//! Prepared commands
//!
//! A [`Prepared`] owns one compiled driver statement plus the cached
//! parameter and column mappings, and can be executed repeatedly with
//! different bound values. The per-run behavior is a [`Materialize`]
//! strategy: affected-row count, typed rows, constructor rows, a
//! single-column sequence, or a scalar. Prepare/bind/drop are shared by
//! every variant.
//!
//! # Examples
//!
//! ```ignore
//! use rowmap::{named_params, ConnectionExt};
//!
//! let mut insert = conn.prepare_exec(
//!     "INSERT INTO kv VALUES (:key, :value)",
//!     named_params! { key: "A", value: 1 },
//! )?;
//! insert.execute(())?; // runs with the values bound at preparation
//! insert.execute(named_params! { key: "B", value: 2 })?;
//! ```

use std::marker::PhantomData;

use crate::core::{Error, FromValue, Result, Value};
use crate::driver::{Cursor, Statement};

use super::params::Params;
use super::row::{arg_bindings, row_bindings, ColumnBindings, FromArgs, FromRow};

/// Per-run behavior of a prepared command
///
/// A strategy runs the already-bound statement and materializes its
/// output. Strategies own their lazily built column caches, so the cache
/// survives across executions of the same prepared command.
pub trait Materialize {
    /// What one execution returns
    type Output;

    /// Run the statement and materialize the result
    fn materialize<S: Statement>(&mut self, stmt: &mut S) -> Result<Self::Output>;
}

/// A prepared command: one compiled statement plus cached bindings
///
/// Created through the [`ConnectionExt`](crate::ConnectionExt)
/// `prepare_*` methods. The parameter shape supplied at preparation fixes
/// the placeholder list for the command's lifetime; each
/// [`execute`](Prepared::execute) call rebinds values, runs, and drains
/// the result eagerly. Dropping the command releases the statement.
pub struct Prepared<S: Statement, M: Materialize> {
    stmt: S,
    /// Declared field names in declaration order; None when the command
    /// was prepared without parameters
    fields: Option<Vec<String>>,
    strategy: M,
}

impl<S: Statement, M: Materialize> Prepared<S, M> {
    /// Capture the parameter shape, assign initial values, and finish
    /// preparing the statement
    pub(crate) fn new<P: Params>(mut stmt: S, params: &P, strategy: M) -> Result<Self> {
        let fields = if params.is_declared() {
            let names = params.names();
            for name in &names {
                stmt.declare(name)?;
            }
            Some(names)
        } else {
            None
        };

        let mut prepared = Self {
            stmt,
            fields,
            strategy,
        };
        prepared.assign(params)?;
        Ok(prepared)
    }

    /// Rebind parameter values for the next run
    ///
    /// Reads each declared field off `values` by name. `()` leaves the
    /// previously bound values in place.
    fn assign<P: Params>(&mut self, values: &P) -> Result<()> {
        if !values.is_declared() {
            return Ok(());
        }
        let fields = self
            .fields
            .as_ref()
            .ok_or(Error::ParametersNotDeclared)?;
        for name in fields {
            let value = values.get(name)?;
            self.stmt.bind(name, &value)?;
        }
        Ok(())
    }

    /// Execute the command with the given parameter values
    ///
    /// Pass `()` to run with the values from the previous execution (or
    /// from preparation). Supplying values when the command was prepared
    /// without a parameter shape is an error.
    pub fn execute<P: Params>(&mut self, values: P) -> Result<M::Output> {
        self.assign(&values)?;
        self.strategy.materialize(&mut self.stmt)
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// Run as a non-query and report the affected-row count
#[derive(Debug, Default)]
pub struct Affected;

impl Materialize for Affected {
    type Output = usize;

    fn materialize<S: Statement>(&mut self, stmt: &mut S) -> Result<usize> {
        stmt.execute()
    }
}

/// Materialize every row into a [`FromRow`] target
pub struct RowMapper<T: FromRow> {
    bindings: Option<ColumnBindings>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromRow> Default for RowMapper<T> {
    fn default() -> Self {
        Self {
            bindings: None,
            _marker: PhantomData,
        }
    }
}

impl<T: FromRow> Materialize for RowMapper<T> {
    type Output = Vec<T>;

    fn materialize<S: Statement>(&mut self, stmt: &mut S) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut cursor = stmt.cursor()?;
        while cursor.advance()? {
            if self.bindings.is_none() {
                self.bindings = Some(row_bindings::<T, _>(&cursor)?);
            }
            let mut item = T::default();
            if let Some(bindings) = &self.bindings {
                for &(index, slot) in bindings.iter() {
                    item.assign(T::columns()[slot], cursor.value(index)?)?;
                }
            }
            items.push(item);
        }
        Ok(items)
    }
}

/// Materialize every row into a [`FromArgs`] target
pub struct ArgsMapper<T: FromArgs> {
    bindings: Option<ColumnBindings>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromArgs> Default for ArgsMapper<T> {
    fn default() -> Self {
        Self {
            bindings: None,
            _marker: PhantomData,
        }
    }
}

impl<T: FromArgs> Materialize for ArgsMapper<T> {
    type Output = Vec<T>;

    fn materialize<S: Statement>(&mut self, stmt: &mut S) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut cursor = stmt.cursor()?;
        while cursor.advance()? {
            if self.bindings.is_none() {
                self.bindings = Some(arg_bindings::<T, _>(&cursor));
            }
            let mut args = vec![Value::Null; T::args().len()];
            if let Some(bindings) = &self.bindings {
                for &(index, slot) in bindings.iter() {
                    args[slot] = cursor.value(index)?;
                }
            }
            items.push(T::from_args(args)?);
        }
        Ok(items)
    }
}

/// Materialize column 0 of every row into a scalar type
pub struct ColumnMapper<T: FromValue> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromValue> Default for ColumnMapper<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: FromValue> Materialize for ColumnMapper<T> {
    type Output = Vec<T>;

    fn materialize<S: Statement>(&mut self, stmt: &mut S) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut cursor = stmt.cursor()?;
        while cursor.advance()? {
            items.push(T::from_value(&cursor.value(0)?)?);
        }
        Ok(items)
    }
}

/// Materialize the first column of the first row into a scalar type
///
/// No row at all normalizes to NULL, so `Option<T>` yields `None` where a
/// non-nullable `T` fails with a conversion error.
pub struct ScalarMapper<T: FromValue> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromValue> Default for ScalarMapper<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: FromValue> Materialize for ScalarMapper<T> {
    type Output = T;

    fn materialize<S: Statement>(&mut self, stmt: &mut S) -> Result<T> {
        let value = stmt.scalar()?.unwrap_or(Value::Null);
        T::from_value(&value)
    }
}

// =============================================================================
// Variant aliases
// =============================================================================

/// Prepared non-query command
pub type PreparedExecute<S> = Prepared<S, Affected>;

/// Prepared typed-row query
pub type PreparedQuery<S, T> = Prepared<S, RowMapper<T>>;

/// Prepared constructor-row query
pub type PreparedQueryArgs<S, T> = Prepared<S, ArgsMapper<T>>;

/// Prepared single-column sequence query
pub type PreparedSequence<S, T> = Prepared<S, ColumnMapper<T>>;

/// Prepared scalar query
pub type PreparedScalar<S, T> = Prepared<S, ScalarMapper<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::driver::memory::MemoryStatement;
    use crate::named_params;

    #[derive(Default, Debug, PartialEq)]
    struct Record {
        key: Option<String>,
        value: i64,
    }

    crate::from_row!(Record {
        key => "Key",
        value => "Value",
    });

    #[derive(Debug, PartialEq)]
    struct Pair {
        key: String,
        value: i64,
    }

    crate::from_args!(Pair {
        key => "Key",
        value => "Value",
    });

    #[test]
    fn test_preparation_declares_one_placeholder_per_field() {
        let stmt = MemoryStatement::with_affected(1);
        let params = named_params! { key: "a", value: 1, extra: true };
        let prepared = Prepared::new(stmt, &params, Affected).unwrap();

        assert_eq!(prepared.stmt.declared, vec!["key", "value", "extra"]);
    }

    #[test]
    fn test_preparation_assigns_initial_values() {
        let stmt = MemoryStatement::with_affected(1);
        let params = named_params! { key: "a", value: 1 };
        let prepared = Prepared::new(stmt, &params, Affected).unwrap();

        assert_eq!(prepared.stmt.bound.get("key"), Some(&Value::text("a")));
        assert_eq!(prepared.stmt.bound.get("value"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_execute_without_values_keeps_previous_bindings() {
        let stmt = MemoryStatement::with_affected(3);
        let params = named_params! { key: "a" };
        let mut prepared = Prepared::new(stmt, &params, Affected).unwrap();

        assert_eq!(prepared.execute(()).unwrap(), 3);
        // One bind from preparation, none from the parameterless run
        assert_eq!(prepared.stmt.bind_log.len(), 1);
        assert_eq!(prepared.stmt.bound.get("key"), Some(&Value::text("a")));
    }

    #[test]
    fn test_execute_rebinds_by_declared_names() {
        let stmt = MemoryStatement::with_affected(1);
        let mut prepared =
            Prepared::new(stmt, &named_params! { key: "a", value: 1 }, Affected).unwrap();

        // The new object may carry extra fields; only declared ones are read
        prepared
            .execute(named_params! { key: "b", value: 2, ignored: 9 })
            .unwrap();

        assert_eq!(prepared.stmt.bound.get("key"), Some(&Value::text("b")));
        assert_eq!(prepared.stmt.bound.get("value"), Some(&Value::Integer(2)));
        assert!(!prepared.stmt.bound.contains_key("ignored"));
    }

    #[test]
    fn test_execute_with_missing_field_fails() {
        let stmt = MemoryStatement::with_affected(1);
        let mut prepared =
            Prepared::new(stmt, &named_params! { key: "a", value: 1 }, Affected).unwrap();

        let err = prepared.execute(named_params! { key: "b" }).unwrap_err();
        assert_eq!(err, Error::MissingField("value".to_string()));
    }

    #[test]
    fn test_values_without_declared_shape_fail() {
        let stmt = MemoryStatement::with_affected(1);
        let mut prepared = Prepared::new(stmt, &(), Affected).unwrap();

        let err = prepared.execute(named_params! { key: "b" }).unwrap_err();
        assert_eq!(err, Error::ParametersNotDeclared);

        // A parameterless run is still fine
        assert_eq!(prepared.execute(()).unwrap(), 1);
    }

    #[test]
    fn test_row_mapper_materializes_rows() {
        let stmt = MemoryStatement::with_rows(
            ["Key", "Value"],
            vec![
                vec![Value::text("Magic"), Value::Integer(42)],
                vec![Value::Null, Value::Integer(7)],
            ],
        );
        let mut prepared = Prepared::new(stmt, &(), RowMapper::<Record>::default()).unwrap();

        let records = prepared.execute(()).unwrap();
        assert_eq!(
            records,
            vec![
                Record {
                    key: Some("Magic".to_string()),
                    value: 42,
                },
                Record {
                    key: None,
                    value: 7,
                },
            ]
        );
    }

    #[test]
    fn test_row_mapper_empty_result_is_empty_vec() {
        let stmt = MemoryStatement::with_rows(["Nope"], vec![]);
        let mut prepared = Prepared::new(stmt, &(), RowMapper::<Record>::default()).unwrap();

        // Zero rows: the (empty) column mapping is never derived
        assert!(prepared.execute(()).unwrap().is_empty());
    }

    #[test]
    fn test_row_mapper_zero_matching_columns_fails() {
        let stmt = MemoryStatement::with_rows(["Nope"], vec![vec![Value::Integer(1)]]);
        let mut prepared = Prepared::new(stmt, &(), RowMapper::<Record>::default()).unwrap();

        assert_eq!(prepared.execute(()).unwrap_err(), Error::NoMatchingColumns);
    }

    #[test]
    fn test_args_mapper_zero_matching_columns_builds_defaults() {
        let stmt = MemoryStatement::with_rows(["Nope"], vec![vec![Value::Integer(1)]]);
        let mut prepared = Prepared::new(stmt, &(), ArgsMapper::<Pair>::default()).unwrap();

        let pairs = prepared.execute(()).unwrap();
        assert_eq!(
            pairs,
            vec![Pair {
                key: String::new(),
                value: 0,
            }]
        );
    }

    #[test]
    fn test_args_mapper_fills_matched_slots() {
        let stmt = MemoryStatement::with_rows(
            ["Value", "Key"],
            vec![vec![Value::Integer(42), Value::text("Magic")]],
        );
        let mut prepared = Prepared::new(stmt, &(), ArgsMapper::<Pair>::default()).unwrap();

        let pairs = prepared.execute(()).unwrap();
        assert_eq!(
            pairs,
            vec![Pair {
                key: "Magic".to_string(),
                value: 42,
            }]
        );
    }

    #[test]
    fn test_column_mapper_takes_column_zero() {
        let stmt = MemoryStatement::with_rows(
            ["Key", "Value"],
            vec![
                vec![Value::text("A"), Value::Integer(1)],
                vec![Value::text("B"), Value::Integer(2)],
            ],
        );
        let mut prepared = Prepared::new(stmt, &(), ColumnMapper::<String>::default()).unwrap();

        assert_eq!(prepared.execute(()).unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_scalar_mapper_empty_result() {
        let stmt = MemoryStatement::with_rows(["n"], vec![]);
        let mut prepared = Prepared::new(stmt, &(), ScalarMapper::<Option<i64>>::default()).unwrap();
        assert_eq!(prepared.execute(()).unwrap(), None);

        let stmt = MemoryStatement::with_rows(["n"], vec![]);
        let mut prepared = Prepared::new(stmt, &(), ScalarMapper::<i64>::default()).unwrap();
        assert!(prepared.execute(()).is_err());
    }

    #[test]
    fn test_scalar_mapper_reads_first_cell() {
        let stmt = MemoryStatement::with_rows(
            ["n", "m"],
            vec![vec![Value::Integer(1), Value::Integer(9)]],
        );
        let mut prepared = Prepared::new(stmt, &(), ScalarMapper::<i64>::default()).unwrap();
        assert_eq!(prepared.execute(()).unwrap(), 1);
    }

    #[test]
    fn test_column_bindings_cached_across_executions() {
        let stmt = MemoryStatement::with_rows(
            ["Key", "Value"],
            vec![vec![Value::text("A"), Value::Integer(1)]],
        );
        let mut prepared = Prepared::new(stmt, &(), RowMapper::<Record>::default()).unwrap();

        prepared.execute(()).unwrap();
        assert!(prepared.strategy.bindings.is_some());
        let first = prepared.strategy.bindings.clone();

        prepared.execute(()).unwrap();
        assert_eq!(prepared.strategy.bindings, first);
    }
}

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

//! Column-to-field binding for row materialization
//!
//! Two target shapes are supported. [`FromRow`] is the mutable shape: a
//! default-constructible type whose writable fields are assigned by column
//! name. [`FromArgs`] is the immutable shape: a type built in one call from
//! a positional argument list whose slots are matched to columns by name.
//!
//! Column names match field names exactly, case-sensitively. Columns with
//! no matching field are ignored in both modes. The zero-match policies
//! differ on purpose: a [`FromRow`] result where nothing matched is an
//! error, a [`FromArgs`] result where nothing matched builds all-default
//! instances.
//!
//! # Examples
//!
//! ```ignore
//! #[derive(Default, Debug, PartialEq)]
//! struct Record {
//!     key: Option<String>,
//!     value: i64,
//! }
//!
//! rowmap::from_row!(Record {
//!     key => "Key",
//!     value => "Value",
//! });
//!
//! let records: Vec<Record> = conn.query("SELECT Key, Value FROM kv", ())?;
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{Error, FromValue, Result, Value};
use crate::driver::Cursor;

/// Cached (column index, field/argument slot) pairs for one prepared command
pub(crate) type ColumnBindings = SmallVec<[(usize, usize); 8]>;

/// A row target built by assigning columns into a default instance
///
/// `columns()` lists the writable field names; `assign` writes one coerced
/// cell into the named field. Use the [`from_row!`] macro to generate the
/// descriptor for a struct.
pub trait FromRow: Default {
    /// Writable field names, used to match result columns
    fn columns() -> &'static [&'static str];

    /// Assign a cell into the named field
    ///
    /// `column` is always one of `columns()`. NULL cells arrive as
    /// [`Value::Null`]; an `Option` field becomes `None`, a non-nullable
    /// field fails with a conversion error.
    fn assign(&mut self, column: &str, value: Value) -> Result<()>;
}

/// A row target built in one call from positional arguments
///
/// `args()` lists the argument names in slot order; `from_args` consumes
/// one value per slot, in that order. Use the [`from_args!`] macro to
/// generate the descriptor for a struct.
pub trait FromArgs: Sized {
    /// Argument names in slot order, used to match result columns
    fn args() -> &'static [&'static str];

    /// Build an instance from one value per argument slot
    ///
    /// Slots with no matching column hold [`Value::Null`] and take the
    /// field type's default value.
    fn from_args(args: Vec<Value>) -> Result<Self>;
}

/// Coerce one argument slot, giving NULL slots the type's default
///
/// This is the constructor-mode NULL rule: an unmatched or NULL slot
/// becomes zero, the empty string, `None`, and so on.
pub fn arg_value<T: FromValue + Default>(slot: Option<Value>) -> Result<T> {
    match slot {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::from_value(&value),
    }
}

/// Build the property-mode column bindings from the cursor's column list
///
/// Fails when no column matches any field; derived once per prepared
/// command, at first-row time.
pub(crate) fn row_bindings<T: FromRow, C: Cursor>(cursor: &C) -> Result<ColumnBindings> {
    let mut bindings = ColumnBindings::new();
    for index in 0..cursor.field_count() {
        let name = cursor.column_name(index);
        if let Some(slot) = T::columns().iter().position(|c| *c == name) {
            bindings.push((index, slot));
        }
    }
    if bindings.is_empty() {
        return Err(Error::NoMatchingColumns);
    }
    Ok(bindings)
}

/// Build the constructor-mode column bindings from the cursor's column list
///
/// Zero matches is allowed here; unmatched slots stay at their defaults.
pub(crate) fn arg_bindings<T: FromArgs, C: Cursor>(cursor: &C) -> ColumnBindings {
    let slots: FxHashMap<&str, usize> = T::args()
        .iter()
        .enumerate()
        .map(|(slot, name)| (*name, slot))
        .collect();

    let mut bindings = ColumnBindings::new();
    for index in 0..cursor.field_count() {
        if let Some(&slot) = slots.get(cursor.column_name(index)) {
            bindings.push((index, slot));
        }
    }
    bindings
}

/// Implement [`FromRow`] for a default-constructible struct
///
/// Each entry maps a field to the result-column name it is assigned from.
///
/// # Examples
///
/// ```ignore
/// #[derive(Default)]
/// struct Record {
///     key: Option<String>,
///     value: i64,
/// }
///
/// rowmap::from_row!(Record {
///     key => "Key",
///     value => "Value",
/// });
/// ```
#[macro_export]
macro_rules! from_row {
    ($ty:ty { $($field:ident => $column:literal),+ $(,)? }) => {
        impl $crate::FromRow for $ty {
            fn columns() -> &'static [&'static str] {
                &[$($column),+]
            }

            fn assign(&mut self, column: &str, value: $crate::Value) -> $crate::Result<()> {
                match column {
                    $($column => self.$field = $crate::FromValue::from_value(&value)?,)+
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }
        }
    };
}

/// Implement [`FromArgs`] for a struct built from positional arguments
///
/// Entries are in constructor slot order; each maps a field to the
/// result-column name that fills its slot.
///
/// # Examples
///
/// ```ignore
/// struct Pair {
///     key: String,
///     value: i64,
/// }
///
/// rowmap::from_args!(Pair {
///     key => "Key",
///     value => "Value",
/// });
/// ```
#[macro_export]
macro_rules! from_args {
    ($ty:ty { $($field:ident => $column:literal),+ $(,)? }) => {
        impl $crate::FromArgs for $ty {
            fn args() -> &'static [&'static str] {
                &[$($column),+]
            }

            fn from_args(args: ::std::vec::Vec<$crate::Value>) -> $crate::Result<Self> {
                let mut slots = args.into_iter();
                ::std::result::Result::Ok(Self {
                    $($field: $crate::arg_value(slots.next())?,)+
                })
            }
        }
    };
}

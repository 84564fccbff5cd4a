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

//! Named parameter binding
//!
//! A parameter object is anything implementing [`Params`]: it declares its
//! field names in declaration order and reads a field's value by name. The
//! shape captured at preparation time fixes the statement's placeholder
//! list; later executions only read values off whatever object they are
//! given, by those captured names.
//!
//! `()` is the "no parameters" marker: it declares no shape at preparation
//! time, and at execution time it means "keep the previously bound values".
//!
//! # Examples
//!
//! ```ignore
//! use rowmap::{named_params, ConnectionExt};
//!
//! conn.exec(
//!     "INSERT INTO kv VALUES (:key, :value)",
//!     named_params! { key: "Meaning of Life", value: 42 },
//! )?;
//!
//! // Or a struct descriptor, once per type:
//! struct Entry { key: String, value: i64 }
//! rowmap::bind_params!(Entry { key, value });
//! conn.exec("INSERT INTO kv VALUES (:key, :value)", entry)?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::{Error, Result, Value};

/// Trait for single values convertible to a SQL parameter
pub trait ToParam {
    /// Convert self into a Value for parameter binding
    fn to_param(&self) -> Value;
}

impl ToParam for i64 {
    fn to_param(&self) -> Value {
        Value::Integer(*self)
    }
}

impl ToParam for i32 {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for i16 {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for i8 {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for u32 {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for u16 {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for u8 {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for usize {
    fn to_param(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ToParam for f64 {
    fn to_param(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToParam for f32 {
    fn to_param(&self) -> Value {
        Value::Float(*self as f64)
    }
}

impl ToParam for bool {
    fn to_param(&self) -> Value {
        Value::Boolean(*self)
    }
}

impl ToParam for String {
    fn to_param(&self) -> Value {
        Value::Text(Arc::from(self.as_str()))
    }
}

impl ToParam for &str {
    fn to_param(&self) -> Value {
        Value::Text(Arc::from(*self))
    }
}

impl ToParam for Arc<str> {
    fn to_param(&self) -> Value {
        Value::Text(Arc::clone(self))
    }
}

impl ToParam for Vec<u8> {
    fn to_param(&self) -> Value {
        Value::Blob(Arc::from(self.as_slice()))
    }
}

impl ToParam for &[u8] {
    fn to_param(&self) -> Value {
        Value::Blob(Arc::from(*self))
    }
}

impl ToParam for DateTime<Utc> {
    fn to_param(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl ToParam for Value {
    fn to_param(&self) -> Value {
        self.clone()
    }
}

impl<T: ToParam> ToParam for Option<T> {
    fn to_param(&self) -> Value {
        match self {
            Some(v) => v.to_param(),
            None => Value::Null,
        }
    }
}

impl<T: ToParam> ToParam for &T {
    fn to_param(&self) -> Value {
        (*self).to_param()
    }
}

/// A named-field view over a parameter object
///
/// Implementations enumerate their readable fields in declaration order and
/// read a field by name. `()` is the absent marker and declares no shape.
pub trait Params {
    /// Whether this value declares a parameter shape at all
    ///
    /// `()` returns false; everything else returns true, including objects
    /// with zero fields.
    fn is_declared(&self) -> bool {
        true
    }

    /// Field names in declaration order
    fn names(&self) -> Vec<String>;

    /// Read the named field's value
    ///
    /// Fails with [`Error::MissingField`] when this object's shape has no
    /// field of that name.
    fn get(&self, name: &str) -> Result<Value>;
}

// The "no parameters" marker
impl Params for () {
    fn is_declared(&self) -> bool {
        false
    }

    fn names(&self) -> Vec<String> {
        Vec::new()
    }

    fn get(&self, name: &str) -> Result<Value> {
        Err(Error::MissingField(name.to_string()))
    }
}

impl<P: Params + ?Sized> Params for &P {
    fn is_declared(&self) -> bool {
        (*self).is_declared()
    }

    fn names(&self) -> Vec<String> {
        (*self).names()
    }

    fn get(&self, name: &str) -> Result<Value> {
        (*self).get(name)
    }
}

/// An ordered collection of named parameters
///
/// The run-time stand-in for an anonymous parameter object: insertion order
/// is declaration order. Built manually or with the [`named_params!`] macro.
///
/// # Examples
///
/// ```ignore
/// let params = NamedParams::new()
///     .add("key", "Meaning of Life")
///     .add("value", 42);
/// conn.exec("INSERT INTO kv VALUES (:key, :value)", params)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamedParams {
    fields: Vec<(String, Value)>,
}

impl NamedParams {
    /// Create an empty parameter object
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a named field (builder style)
    pub fn add<T: ToParam>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a named field, replacing an existing one of the same name
    pub fn insert<T: ToParam>(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        let value = value.to_param();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Params for NamedParams {
    fn names(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }

    fn get(&self, name: &str) -> Result<Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| Error::MissingField(name.to_string()))
    }
}

/// Create an ordered named-parameter object
///
/// # Examples
///
/// ```ignore
/// use rowmap::{named_params, ConnectionExt};
///
/// conn.exec(
///     "INSERT INTO users VALUES (:id, :name, :active)",
///     named_params! { id: 1, name: "Alice", active: true },
/// )?;
/// ```
#[macro_export]
macro_rules! named_params {
    () => {
        $crate::NamedParams::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {
        {
            let mut params = $crate::NamedParams::new();
            $(
                params.insert(stringify!($name), $value);
            )+
            params
        }
    };
}

/// Implement [`Params`] for a struct by listing its bindable fields
///
/// The listed fields, in the listed order, become the parameter shape; each
/// field type must implement [`ToParam`]. This is the compile-time stand-in
/// for enumerating an object's readable properties.
///
/// # Examples
///
/// ```ignore
/// struct Entry {
///     key: String,
///     value: i64,
/// }
///
/// rowmap::bind_params!(Entry { key, value });
///
/// conn.exec("INSERT INTO kv VALUES (:key, :value)", entry)?;
/// ```
#[macro_export]
macro_rules! bind_params {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::Params for $ty {
            fn names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![$(::std::string::String::from(stringify!($field))),+]
            }

            fn get(&self, name: &str) -> $crate::Result<$crate::Value> {
                match name {
                    $(stringify!($field) => ::std::result::Result::Ok(
                        $crate::ToParam::to_param(&self.$field),
                    ),)+
                    _ => ::std::result::Result::Err(
                        $crate::Error::MissingField(name.to_string()),
                    ),
                }
            }
        }
    };
}

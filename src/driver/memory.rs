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

//! Scripted in-memory backend
//!
//! A test double for the driver traits: the statement replays a scripted
//! result set and records every declared placeholder and bound value so
//! tests can assert on the binding behavior without a real database.

use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Value};

use super::{Connection, Cursor, Statement};

/// A scripted statement that records declarations and bindings
#[derive(Debug, Clone, Default)]
pub struct MemoryStatement {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    affected: usize,
    /// Placeholder names in declaration order
    pub declared: Vec<String>,
    /// Latest value bound to each placeholder
    pub bound: FxHashMap<String, Value>,
    /// Every bind call in order, across executions
    pub bind_log: Vec<(String, Value)>,
}

impl MemoryStatement {
    /// Statement with no result set, reporting `affected` rows changed
    pub fn with_affected(affected: usize) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    /// Statement replaying the given columns and rows
    pub fn with_rows(
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            ..Self::default()
        }
    }
}

impl Statement for MemoryStatement {
    type Cursor<'s>
        = MemoryCursor
    where
        Self: 's;

    fn declare(&mut self, name: &str) -> Result<()> {
        self.declared.push(name.to_string());
        Ok(())
    }

    fn bind(&mut self, name: &str, value: &Value) -> Result<()> {
        if !self.declared.iter().any(|n| n == name) {
            return Err(Error::driver(format!("unknown placeholder '{name}'")));
        }
        self.bound.insert(name.to_string(), value.clone());
        self.bind_log.push((name.to_string(), value.clone()));
        Ok(())
    }

    fn execute(&mut self) -> Result<usize> {
        Ok(self.affected)
    }

    fn cursor(&mut self) -> Result<MemoryCursor> {
        Ok(MemoryCursor {
            columns: self.columns.clone(),
            rows: self.rows.clone().into_iter(),
            current: Vec::new(),
        })
    }

    fn scalar(&mut self) -> Result<Option<Value>> {
        match self.rows.first() {
            Some(row) => row
                .first()
                .cloned()
                .map(Some)
                .ok_or(Error::ColumnIndexOutOfBounds { index: 0 }),
            None => Ok(None),
        }
    }
}

/// Cursor over a scripted result set
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Vec<Value>,
}

impl Cursor for MemoryCursor {
    fn advance(&mut self) -> Result<bool> {
        match self.rows.next() {
            Some(row) => {
                self.current = row;
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

/// A connection handing out clones of one scripted statement
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
    template: MemoryStatement,
}

impl MemoryConnection {
    /// Connection whose statements replay the given result set
    pub fn with_rows(
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        Self {
            template: MemoryStatement::with_rows(columns, rows),
        }
    }

    /// Connection whose statements report `affected` rows changed
    pub fn with_affected(affected: usize) -> Self {
        Self {
            template: MemoryStatement::with_affected(affected),
        }
    }
}

impl Connection for MemoryConnection {
    type Stmt<'c>
        = MemoryStatement
    where
        Self: 'c;

    fn prepare_statement(&self, _sql: &str) -> Result<MemoryStatement> {
        Ok(self.template.clone())
    }
}

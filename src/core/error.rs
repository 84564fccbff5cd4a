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

//! Error types for rowmap
//!
//! This module defines all error types used by the binding and
//! materialization layers.

use thiserror::Error;

/// Result type alias for rowmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for rowmap operations
///
/// Covers the four failure families: precondition violations raised before
/// any backend interaction, shape mismatches at bind or first-row time,
/// coercion failures at materialization time, and backend failures carried
/// through verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Precondition errors
    // =========================================================================
    /// A required argument was empty or otherwise unusable
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Parameter values were supplied at execution time, but the command
    /// was prepared without a parameter shape
    #[error("parameters have to be declared when the command is prepared")]
    ParametersNotDeclared,

    // =========================================================================
    // Shape mismatch errors
    // =========================================================================
    /// The values object passed to an execution lacks a field that was
    /// declared when the command was prepared
    #[error("missing field '{0}' on parameter values")]
    MissingField(String),

    /// No writable field on the target type matches any result column
    #[error("no fields on the target type match columns in the result")]
    NoMatchingColumns,

    /// Column index is beyond the cursor's field count
    #[error("column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    // =========================================================================
    // Coercion errors
    // =========================================================================
    /// The value's runtime type cannot convert to the requested type
    #[error("cannot convert {from} to {to}")]
    TypeConversion { from: String, to: &'static str },

    /// Text value failed to parse as the requested type
    #[error("cannot parse '{value}' as {to}")]
    Format { value: String, to: &'static str },

    // =========================================================================
    // Backend errors
    // =========================================================================
    /// Failure reported by the underlying database driver, message intact
    #[error("{0}")]
    Driver(String),
}

impl Error {
    /// Shorthand for an invalid-argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Shorthand for a driver error carrying the backend's message
    pub fn driver(msg: impl Into<String>) -> Self {
        Error::Driver(msg.into())
    }
}

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

//! Binding, materialization, and the convenience layer

pub mod connection;
pub mod params;
pub mod prepared;
pub mod row;

pub use connection::ConnectionExt;
pub use params::{NamedParams, Params, ToParam};
pub use prepared::{
    Affected, ArgsMapper, ColumnMapper, Materialize, Prepared, PreparedExecute, PreparedQuery,
    PreparedQueryArgs, PreparedScalar, PreparedSequence, RowMapper, ScalarMapper,
};
pub use row::{arg_value, FromArgs, FromRow};

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

//! Typed-row query tests against the SQLite backend

#![cfg(feature = "sqlite")]

use rowmap::{named_params, ConnectionExt, Error};

#[derive(Default, Debug, PartialEq)]
struct Record {
    key: Option<String>,
    value: i64,
}

rowmap::from_row!(Record {
    key => "Key",
    value => "Value",
});

fn connection() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().expect("open in-memory database");
    conn.exec("CREATE TABLE kv (Key TEXT, Value INTEGER)", ())
        .expect("create table");
    conn
}

#[test]
fn test_query_maps_columns_to_fields() {
    let conn = connection();
    conn.exec(
        "INSERT INTO kv VALUES (:key, :value)",
        named_params! { key: "Magic", value: 42 },
    )
    .unwrap();

    let records: Vec<Record> = conn.query("SELECT Key, Value FROM kv", ()).unwrap();
    assert_eq!(
        records,
        vec![Record {
            key: Some("Magic".to_string()),
            value: 42,
        }]
    );
}

#[test]
fn test_query_preserves_row_order() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('B', 2), ('A', 1), ('C', 3)", ())
        .unwrap();

    let records: Vec<Record> = conn
        .query("SELECT Key, Value FROM kv ORDER BY Value DESC", ())
        .unwrap();
    let keys: Vec<_> = records.iter().map(|r| r.key.as_deref()).collect();
    assert_eq!(keys, vec![Some("C"), Some("B"), Some("A")]);
}

#[test]
fn test_unmatched_fields_keep_defaults() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('only-key', 99)", ())
        .unwrap();

    // Value column not selected: field stays at its default
    let records: Vec<Record> = conn.query("SELECT Key FROM kv", ()).unwrap();
    assert_eq!(
        records,
        vec![Record {
            key: Some("only-key".to_string()),
            value: 0,
        }]
    );
}

#[test]
fn test_extra_columns_are_ignored() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('k', 5)", ()).unwrap();

    let records: Vec<Record> = conn
        .query("SELECT Key, Value, 'noise' AS Extra FROM kv", ())
        .unwrap();
    assert_eq!(records[0].value, 5);
}

#[test]
fn test_null_column_becomes_none() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES (NULL, 1)", ()).unwrap();

    let records: Vec<Record> = conn.query("SELECT Key, Value FROM kv", ()).unwrap();
    assert_eq!(records[0].key, None);
}

#[test]
fn test_null_into_non_nullable_field_fails() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('k', NULL)", ()).unwrap();

    let err = conn
        .query::<Record, _>("SELECT Key, Value FROM kv", ())
        .unwrap_err();
    assert!(matches!(err, Error::TypeConversion { .. }));
}

#[test]
fn test_zero_matching_columns_fails() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('k', 1)", ()).unwrap();

    let err = conn
        .query::<Record, _>("SELECT Key AS Wrong, Value AS Names FROM kv", ())
        .unwrap_err();
    assert_eq!(err, Error::NoMatchingColumns);
}

#[test]
fn test_empty_result_set_is_empty_list() {
    let conn = connection();

    // Even with column names that match nothing, zero rows never fail
    let records: Vec<Record> = conn
        .query("SELECT Key AS Wrong FROM kv WHERE 0", ())
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_column_matching_is_case_sensitive() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('k', 1)", ()).unwrap();

    let err = conn
        .query::<Record, _>("SELECT Key AS KEY, Value AS VALUE FROM kv", ())
        .unwrap_err();
    assert_eq!(err, Error::NoMatchingColumns);
}

#[test]
fn test_prepared_query_reused_with_parameters() {
    let conn = connection();
    conn.exec("INSERT INTO kv VALUES ('A', 1), ('B', 2)", ())
        .unwrap();

    let mut select = conn
        .prepare_query::<Record, _>(
            "SELECT Key, Value FROM kv WHERE Key = :key",
            named_params! { key: "A" },
        )
        .unwrap();

    let first = select.execute(()).unwrap();
    assert_eq!(first[0].value, 1);

    let second = select.execute(named_params! { key: "B" }).unwrap();
    assert_eq!(second[0].value, 2);

    let none = select.execute(named_params! { key: "missing" }).unwrap();
    assert!(none.is_empty());
}

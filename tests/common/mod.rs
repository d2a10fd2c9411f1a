//! Shared fixtures for integration tests

#![allow(dead_code)]

use arrayquery::{QueryBuilder, Record};
use serde_json::{json, Value};

fn user(
    id: u32,
    name: &str,
    username: &str,
    city: &str,
    company: &str,
    tags: &[&str],
    registered: &str,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": username,
        "email": format!("{}@example.org", username.to_lowercase()),
        "address": {
            "city": city,
            "geo": {"lat": format!("-{}.31", id), "lng": format!("{}.14", id * 10)}
        },
        "company": {"name": company, "catchPhrase": "Multi-layered client-server neural-net"},
        "tags": tags,
        "registered": registered
    })
}

/// Ten users with consistent shape
pub fn users() -> Vec<Value> {
    vec![
        user(1, "Leanne Graham", "Bret", "Gwenborough", "Romaguera-Crona", &["pinapple", "apple-pie", "cherry"], "2015-03-12"),
        user(2, "Ervin Howell", "Antonette", "Wisokyburgh", "Deckow-Crist", &["banana", "pear-pie"], "2016-07-01"),
        user(3, "Clementine Bauch", "Samantha", "McKenziehaven", "Romaguera-Jacobson", &["pinapple", "pear-pie"], "2014-11-23"),
        user(4, "Patricia Lebsack", "Karianne", "South Elvis", "Robel-Corkery", &["pinapple", "cherry"], "2018-01-05"),
        user(5, "Chelsey Dietrich", "Kamren", "Roscoeview", "Keebler LLC", &["pinapple", "banana"], "2017-09-30"),
        user(6, "Mrs. Dennis Schulist", "Leopoldo_Corkery", "South Christy", "Considine-Lockman", &["pinapple", "apple-pie"], "2019-02-14"),
        user(7, "Kurtis Weissnat", "Elwyn.Skiles", "Howemouth", "Johns Group", &["pinapple"], "2013-06-08"),
        user(8, "Nicholas Runolfsdottir V", "Maxime_Nienow", "Aliyaview", "Abernathy Group", &["pinapple", "cherry", "banana"], "2020-12-01"),
        user(9, "Glenna Reichert", "Delphine", "Bartholomebury", "Yost and Sons", &["pinapple", "apple-pie", "pear-pie"], "2016-04-19"),
        user(10, "Clementina DuBuque", "Moriah.Stanton", "Lebsackbury", "Hoeger LLC", &["pinapple", "pear-pie"], "2018-08-27"),
    ]
}

/// Query over the ten users
pub fn users_query() -> QueryBuilder {
    QueryBuilder::create(users()).unwrap()
}

/// Converts a fixture value into a record
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not a record: {}", other),
    }
}

pub fn ids(rows: &[Record]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

pub fn names(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

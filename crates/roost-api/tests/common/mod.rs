#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use roost_api::Admin;
use roost_api::notify::Urls;
use roost_db::Database;
use roost_db::models::NewUser;
use roost_db::queries;

pub const BASE_URL: &str = "https://roost.example";

pub const SQUARE: &str =
    r#"{"type":"MultiPolygon","coordinates":[[[[0,0],[0,1],[1,1],[1,0],[0,0]]]]}"#;

pub fn admin() -> Admin {
    Admin::new(Database::open_in_memory().unwrap(), Urls::new(BASE_URL))
}

pub fn add_user(admin: &Admin, username: &str) -> i64 {
    insert_user(admin, username, false)
}

pub fn add_superuser(admin: &Admin, username: &str) -> i64 {
    insert_user(admin, username, true)
}

fn insert_user(admin: &Admin, username: &str, is_superuser: bool) -> i64 {
    let email = format!("{}@example.com", username);
    let name = format!("{} Person", capitalize(username));
    admin
        .db()
        .with_conn(|conn| {
            queries::insert_user(
                conn,
                &NewUser {
                    username,
                    email: &email,
                    name: &name,
                    gender: "Woman",
                    birthdate: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
                    is_superuser,
                    joined: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                },
            )
        })
        .unwrap()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A fixed day in 2021 at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 1, hour, minute, 0).unwrap()
}

pub fn notification_topics(admin: &Admin, user_id: i64) -> Vec<String> {
    admin
        .db()
        .with_conn(|conn| queries::notifications_for_user(conn, user_id))
        .unwrap()
        .into_iter()
        .map(|n| n.topic)
        .collect()
}

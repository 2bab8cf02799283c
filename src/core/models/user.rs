use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub email: String,
    pub password: String,
    pub salt: String,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserItem {
    pub id: i32,
    pub email: String,
}

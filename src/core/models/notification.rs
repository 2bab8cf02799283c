use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub company_id: i32,
    pub message: String,
    pub status: i32,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Participant {
    pub id: i32,
    pub quiz_id: i32,
    pub user_id: i32,
    pub completed_at: DateTime<Utc>,
}

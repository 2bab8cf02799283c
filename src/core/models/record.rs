use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct Insert {
    pub participant_id: i32,
    pub score: i32,
}

/// One attempt's percentage score within a company scope.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyAttemptScore {
    pub quiz_id: i32,
    pub average_score: f64,
    pub completed_at: DateTime<Utc>,
}

/// One attempt's percentage score across the whole system.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SystemAttemptScore {
    pub title: String,
    pub description: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub average_score: f64,
}

#[derive(Debug, Serialize)]
pub struct AverageScore<T> {
    pub overall_average: f64,
    pub scores: Vec<T>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::models::question::{QuestionCreate, QuestionWithAnswers};

#[derive(Debug, Clone, FromRow)]
pub struct Quiz {
    pub id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub frequency: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub company_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub frequency: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Authoring payload: a quiz with its nested questions and answers.
#[derive(Debug, Deserialize)]
pub struct QuizCreate {
    pub title: String,
    pub description: Option<String>,
    /// Days a participant has to wait before retaking the quiz.
    pub frequency: i32,
    pub questions: Vec<QuestionCreate>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct QuizItem {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub frequency: i32,
    pub is_available: bool,
}

#[derive(Debug, Serialize)]
pub struct QuizWithQuestions {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub frequency: i32,
    pub questions: Vec<QuestionWithAnswers>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedQuestion {
    pub id: i32,
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSubmit {
    pub quiz_id: i32,
    pub user_id: i32,
    pub company_id: i32,
    pub score: i32,
    pub questions: Vec<SubmittedQuestion>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Submission {
    pub participant_id: i32,
    pub record_id: i32,
    pub selected_answer_ids: Vec<i32>,
}

/// Denormalized export row; always hydrated from the relational store.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct QuizDataRow {
    pub quiz_title: String,
    pub quiz_description: Option<String>,
    pub question_text: String,
    pub answer_text: String,
    pub is_correct: bool,
}

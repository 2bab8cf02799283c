use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::models::answer::{AnswerCreate, AnswerDetail};

#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: i32,
    pub quiz_id: i32,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub quiz_id: i32,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionCreate {
    pub text: String,
    pub answers: Vec<AnswerCreate>,
}

#[derive(Debug, Serialize)]
pub struct QuestionWithAnswers {
    pub id: i32,
    pub text: String,
    pub answers: Vec<AnswerDetail>,
}

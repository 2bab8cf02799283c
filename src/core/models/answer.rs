use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Deserialize)]
pub struct AnswerCreate {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i32,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Serialize, FromRow)]
pub struct AnswerDetail {
    pub id: i32,
    pub text: String,
    pub is_correct: bool,
}

/// One durable audit row: an answer choice persisted against a score record.
#[derive(Debug, Clone, FromRow)]
pub struct SelectedAnswer {
    pub id: i32,
    pub record_id: i32,
    pub answer_id: i32,
}

/// Query over the durable selected-answer trail, joined up to the quiz so it
/// can be scoped by tenant. `exclude_ids` carries the ids already found in
/// the cache.
#[derive(Debug, Default)]
pub struct SelectedAnswerQuery {
    pub user_id: i32,
    pub quiz_id: Option<i32>,
    pub company_id: Option<i32>,
    pub exclude_ids: Vec<i32>,
}

/// Cache mirror of one selected answer. `answer_id` is the generated
/// `selected_answers.id`; field names are part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAnswer {
    pub quiz_id: i32,
    pub company_id: i32,
    pub answer_id: i32,
    pub participant_id: i32,
    pub user_id: i32,
    pub record_id: i32,
}

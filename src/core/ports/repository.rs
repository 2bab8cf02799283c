use chrono::NaiveDate;

use crate::core::models::{
    answer::{AnswerDetail, Insert as AnswerInsert, SelectedAnswer, SelectedAnswerQuery},
    company::{Company, Insert as CompanyInsert, Role},
    notification::Notification,
    participant::Participant,
    question::{Insert as QuestionInsert, Question},
    quiz::{Insert as QuizInsert, Quiz, QuizDataRow, QuizItem, Update as QuizUpdate},
    record::{CompanyAttemptScore, Insert as RecordInsert, SystemAttemptScore},
    user::{Insert as UserInsert, User},
};
use crate::error::Error;

pub trait UserCommon {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
}

pub trait CompanyCommon {
    async fn insert(&mut self, data: CompanyInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Company>, Error>;
    async fn add_member(&mut self, company_id: i32, user_id: i32, role: Role) -> Result<(), Error>;
    async fn member_role(&mut self, company_id: i32, user_id: i32) -> Result<Option<Role>, Error>;
    async fn member_ids(&mut self, company_id: i32) -> Result<Vec<i32>, Error>;
}

pub trait QuizCommon {
    async fn insert(&mut self, data: QuizInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Quiz>, Error>;
    async fn update(&mut self, id: i32, data: QuizUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
    /// Per-company page with availability computed against the caller's
    /// participant row (frequency gating).
    async fn list(&mut self, company_id: i32, user_id: i32, page: i64, size: i64) -> Result<Vec<QuizItem>, Error>;
    async fn count(&mut self, company_id: i32) -> Result<i64, Error>;
    /// Hydration join for the export assembler: selected answer ids to
    /// denormalized quiz/question/answer rows.
    async fn full_quiz_data(&mut self, selected_answer_ids: &[i32]) -> Result<Vec<QuizDataRow>, Error>;
}

pub trait QuestionCommon {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error>;
    async fn by_quiz(&mut self, quiz_id: i32) -> Result<Vec<Question>, Error>;
}

pub trait AnswerCommon {
    async fn bulk_insert(&mut self, answers: Vec<AnswerInsert>) -> Result<Vec<i32>, Error>;
    async fn by_question(&mut self, question_id: i32) -> Result<Vec<AnswerDetail>, Error>;
    /// Persist the flattened answer choices of one attempt, returning the
    /// generated selected-answer ids in insertion order.
    async fn insert_selected(&mut self, record_id: i32, answer_ids: &[i32]) -> Result<Vec<i32>, Error>;
    /// Durable selected answers for a user, minus the ids the cache already
    /// produced (the reconcile delta).
    async fn selected_excluding(&mut self, query: SelectedAnswerQuery) -> Result<Vec<SelectedAnswer>, Error>;
}

pub trait ParticipantCommon {
    /// Atomic insert-or-touch of the (quiz, user) participant row. On
    /// conflict only `completed_at` moves forward; the row id is stable.
    async fn upsert(&mut self, quiz_id: i32, user_id: i32) -> Result<i32, Error>;
    async fn get(&mut self, quiz_id: i32, user_id: i32) -> Result<Option<Participant>, Error>;
}

pub trait RecordCommon {
    async fn insert(&mut self, data: RecordInsert) -> Result<i32, Error>;
    async fn company_attempt_scores(
        &mut self,
        user_id: i32,
        company_id: i32,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<CompanyAttemptScore>, Error>;
    async fn system_attempt_scores(
        &mut self,
        user_id: i32,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<SystemAttemptScore>, Error>;
}

pub trait NotificationCommon {
    async fn bulk_insert(&mut self, user_ids: &[i32], company_id: i32, message: &str) -> Result<(), Error>;
    async fn for_user(&mut self, user_id: i32, page: i64, size: i64) -> Result<Vec<Notification>, Error>;
}

pub trait Common:
    UserCommon + CompanyCommon + QuizCommon + QuestionCommon + AnswerCommon + ParticipantCommon + RecordCommon + NotificationCommon
{
}

pub trait Store: Common {}

/// The unit of work: a `Store` bound to one open transaction. Dropping it
/// without `commit` rolls every write of the logical operation back.
pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

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
use crate::core::ports::repository::{
    AnswerCommon, Common, CompanyCommon, NotificationCommon, ParticipantCommon, QuestionCommon, QuizCommon, RecordCommon, Store, TxStore,
    UserCommon,
};
use crate::error::Error;

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One unit of work: repositories bound to a fresh transaction.
    pub async fn tx(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx { executor: tx })
    }

    /// Read path: repositories bound to a pooled connection.
    pub async fn db(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx { executor: conn })
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO users (email, password, salt) VALUES ($1, $2, $3) RETURNING id")
            .bind(user.email)
            .bind(user.password)
            .bind(user.salt)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(user)
    }
}

impl<E> CompanyCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: CompanyInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO companies (name, description, owner_id) VALUES ($1, $2, $3) RETURNING id")
            .bind(data.name)
            .bind(data.description)
            .bind(data.owner_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Company>, Error> {
        let company = query_as("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(company)
    }

    async fn add_member(&mut self, company_id: i32, user_id: i32, role: Role) -> Result<(), Error> {
        query("INSERT INTO memberships (company_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(company_id)
            .bind(user_id)
            .bind(role)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn member_role(&mut self, company_id: i32, user_id: i32) -> Result<Option<Role>, Error> {
        let role = query_scalar("SELECT role FROM memberships WHERE company_id = $1 AND user_id = $2")
            .bind(company_id)
            .bind(user_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(role)
    }

    async fn member_ids(&mut self, company_id: i32) -> Result<Vec<i32>, Error> {
        let ids = query_scalar("SELECT user_id FROM memberships WHERE company_id = $1")
            .bind(company_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(ids)
    }
}

impl<E> QuizCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: QuizInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO quizzes (company_id, title, description, frequency) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(data.company_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.frequency)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Quiz>, Error> {
        let quiz = query_as("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(quiz)
    }

    async fn update(&mut self, id: i32, data: QuizUpdate) -> Result<(), Error> {
        query(
            "UPDATE quizzes
            SET title = COALESCE($1, title), description = COALESCE($2, description), updated_at = now()
            WHERE id = $3",
        )
        .bind(data.title)
        .bind(data.description)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }

    async fn list(&mut self, company_id: i32, user_id: i32, page: i64, size: i64) -> Result<Vec<QuizItem>, Error> {
        let quizzes = query_as(
            "
        SELECT
            q.id,
            q.title,
            q.description,
            q.frequency,
            (p.completed_at IS NULL OR now() >= p.completed_at + q.frequency * INTERVAL '1 day') AS is_available
        FROM quizzes AS q
        LEFT JOIN quiz_participants AS p ON p.quiz_id = q.id AND p.user_id = $2
        WHERE q.company_id = $1
        ORDER BY q.id
        LIMIT $3
        OFFSET $4",
        )
        .bind(company_id)
        .bind(user_id)
        .bind(size)
        .bind((page - 1) * size)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(quizzes)
    }

    async fn count(&mut self, company_id: i32) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM quizzes WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(total)
    }

    async fn full_quiz_data(&mut self, selected_answer_ids: &[i32]) -> Result<Vec<QuizDataRow>, Error> {
        if selected_answer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = query_as(
            "
        SELECT
            qz.title AS quiz_title,
            qz.description AS quiz_description,
            qn.text AS question_text,
            a.text AS answer_text,
            a.is_correct
        FROM selected_answers AS sa
        JOIN answers AS a ON sa.answer_id = a.id
        JOIN questions AS qn ON a.question_id = qn.id
        JOIN quizzes AS qz ON qn.quiz_id = qz.id
        WHERE sa.id = ANY($1)",
        )
        .bind(selected_answer_ids.to_vec())
        .fetch_all(&mut self.executor)
        .await?;
        Ok(rows)
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO questions (quiz_id, text) VALUES ($1, $2) RETURNING id")
            .bind(question.quiz_id)
            .bind(question.text)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn by_quiz(&mut self, quiz_id: i32) -> Result<Vec<Question>, Error> {
        let questions = query_as("SELECT * FROM questions WHERE quiz_id = $1 ORDER BY id")
            .bind(quiz_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(questions)
    }
}

impl<E> AnswerCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn bulk_insert(&mut self, answers: Vec<AnswerInsert>) -> Result<Vec<i32>, Error> {
        if answers.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = QueryBuilder::new("INSERT INTO answers (question_id, text, is_correct)");
        stmt.push_values(answers.into_iter(), |mut b, a| {
            b.push_bind(a.question_id);
            b.push_bind(a.text);
            b.push_bind(a.is_correct);
        });
        stmt.push(" RETURNING id");
        let ids: Vec<(i32,)> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn by_question(&mut self, question_id: i32) -> Result<Vec<AnswerDetail>, Error> {
        let answers = query_as("SELECT id, text, is_correct FROM answers WHERE question_id = $1 ORDER BY id")
            .bind(question_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(answers)
    }

    async fn insert_selected(&mut self, record_id: i32, answer_ids: &[i32]) -> Result<Vec<i32>, Error> {
        if answer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = QueryBuilder::new("INSERT INTO selected_answers (record_id, answer_id)");
        stmt.push_values(answer_ids.iter(), |mut b, answer_id| {
            b.push_bind(record_id);
            b.push_bind(*answer_id);
        });
        stmt.push(" RETURNING id");
        let ids: Vec<(i32,)> = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn selected_excluding(&mut self, q: SelectedAnswerQuery) -> Result<Vec<SelectedAnswer>, Error> {
        let mut stmt = QueryBuilder::new(
            "
        SELECT sa.id, sa.record_id, sa.answer_id
        FROM selected_answers AS sa
        JOIN records AS r ON sa.record_id = r.id
        JOIN quiz_participants AS p ON r.participant_id = p.id
        JOIN quizzes AS qz ON p.quiz_id = qz.id
        WHERE p.user_id = ",
        );
        stmt.push_bind(q.user_id);
        if let Some(quiz_id) = q.quiz_id {
            stmt.push(" AND p.quiz_id = ").push_bind(quiz_id);
        }
        if let Some(company_id) = q.company_id {
            stmt.push(" AND qz.company_id = ").push_bind(company_id);
        }
        if !q.exclude_ids.is_empty() {
            stmt.push(" AND sa.id <> ALL(").push_bind(q.exclude_ids).push(")");
        }
        let rows = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(rows)
    }
}

impl<E> ParticipantCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn upsert(&mut self, quiz_id: i32, user_id: i32) -> Result<i32, Error> {
        // relies on UNIQUE(quiz_id, user_id), so concurrent re-submissions
        // cannot create a duplicate participant row
        let id = query_scalar(
            "INSERT INTO quiz_participants (quiz_id, user_id) VALUES ($1, $2)
            ON CONFLICT (quiz_id, user_id) DO UPDATE SET completed_at = now()
            RETURNING id",
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, quiz_id: i32, user_id: i32) -> Result<Option<Participant>, Error> {
        let participant = query_as("SELECT * FROM quiz_participants WHERE quiz_id = $1 AND user_id = $2")
            .bind(quiz_id)
            .bind(user_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(participant)
    }
}

impl<E> RecordCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: RecordInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO records (participant_id, score) VALUES ($1, $2) RETURNING id")
            .bind(data.participant_id)
            .bind(data.score)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn company_attempt_scores(
        &mut self,
        user_id: i32,
        company_id: i32,
        from_date: Option<chrono::NaiveDate>,
        to_date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<CompanyAttemptScore>, Error> {
        // inner join against the question-count subquery drops quizzes with
        // zero questions, so the division is never by zero
        let scores = query_as(
            "
        SELECT
            s.quiz_id,
            s.total_score::float8 / (s.record_count * t.total_questions) * 100 AS average_score,
            s.completed_at
        FROM (
            SELECT p.quiz_id, SUM(r.score) AS total_score, COUNT(r.id) AS record_count, p.completed_at
            FROM quiz_participants AS p
            JOIN records AS r ON r.participant_id = p.id
            JOIN quizzes AS q ON q.id = p.quiz_id
            WHERE p.user_id = $1
                AND q.company_id = $2
                AND ($3::date IS NULL OR p.completed_at::date >= $3)
                AND ($4::date IS NULL OR p.completed_at::date <= $4)
            GROUP BY p.quiz_id, p.completed_at
        ) AS s
        JOIN (
            SELECT qn.quiz_id, COUNT(qn.id) AS total_questions
            FROM questions AS qn
            JOIN quizzes AS q ON q.id = qn.quiz_id
            WHERE q.company_id = $2
            GROUP BY qn.quiz_id
        ) AS t ON t.quiz_id = s.quiz_id",
        )
        .bind(user_id)
        .bind(company_id)
        .bind(from_date)
        .bind(to_date)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(scores)
    }

    async fn system_attempt_scores(
        &mut self,
        user_id: i32,
        from_date: Option<chrono::NaiveDate>,
        to_date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<SystemAttemptScore>, Error> {
        let scores = query_as(
            "
        SELECT
            q.title,
            q.description,
            s.completed_at,
            s.total_score::float8 / (s.record_count * t.total_questions) * 100 AS average_score
        FROM (
            SELECT p.quiz_id, SUM(r.score) AS total_score, COUNT(r.id) AS record_count, p.completed_at
            FROM quiz_participants AS p
            JOIN records AS r ON r.participant_id = p.id
            WHERE p.user_id = $1
                AND ($2::date IS NULL OR p.completed_at::date >= $2)
                AND ($3::date IS NULL OR p.completed_at::date <= $3)
            GROUP BY p.quiz_id, p.completed_at
        ) AS s
        JOIN (
            SELECT quiz_id, COUNT(id) AS total_questions
            FROM questions
            GROUP BY quiz_id
        ) AS t ON t.quiz_id = s.quiz_id
        JOIN quizzes AS q ON q.id = s.quiz_id",
        )
        .bind(user_id)
        .bind(from_date)
        .bind(to_date)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(scores)
    }
}

impl<E> NotificationCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn bulk_insert(&mut self, user_ids: &[i32], company_id: i32, message: &str) -> Result<(), Error> {
        if user_ids.is_empty() {
            return Ok(());
        }
        let mut stmt = QueryBuilder::new("INSERT INTO notifications (user_id, company_id, message)");
        stmt.push_values(user_ids.iter(), |mut b, user_id| {
            b.push_bind(*user_id);
            b.push_bind(company_id);
            b.push_bind(message.to_owned());
        });
        stmt.build().execute(&mut self.executor).await?;
        Ok(())
    }

    async fn for_user(&mut self, user_id: i32, page: i64, size: i64) -> Result<Vec<Notification>, Error> {
        let notifications = query_as(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(size)
        .bind((page - 1) * size)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(notifications)
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

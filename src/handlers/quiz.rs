use actix_web::web::{Data, Json, Path, Query};
use actix_web::HttpResponse;
use serde::Deserialize;

use crate::cache::redis::RedisAnswerCache;
use crate::context::UserInfo;
use crate::core::models::quiz::{QuizCreate, QuizItem, QuizSubmit, QuizWithQuestions, Submission, SubmittedQuestion, Update as QuizUpdate};
use crate::core::services::quiz as quiz_service;
use crate::database::notifier::PgNotifier;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::{require_manager, require_member};
use crate::request::Pagination;
use crate::response::{CreateResponse, List};

#[derive(Debug, Deserialize)]
pub struct QuizCreatePayload {
    /// Previous revision to replace; its questions, answers and participation
    /// history go with it.
    pub replace_quiz_id: Option<i32>,
    #[serde(flatten)]
    pub quiz: QuizCreate,
}

pub async fn create(
    user_info: UserInfo,
    company_id: Path<(i32,)>,
    Json(payload): Json<QuizCreatePayload>,
    manager: Data<PgSqlxManager>,
    notifier: Data<PgNotifier>,
) -> Result<Json<CreateResponse>, Error> {
    let company_id = company_id.into_inner().0;
    let mut tx = manager.tx().await?;
    require_manager(&mut tx, company_id, user_info.id).await?;
    let id = quiz_service::create_quiz(tx, notifier.get_ref(), company_id, payload.replace_quiz_id, payload.quiz).await?;
    Ok(Json(CreateResponse::new(id)))
}

pub async fn list(
    user_info: UserInfo,
    company_id: Path<(i32,)>,
    Query(pagination): Query<Pagination>,
    manager: Data<PgSqlxManager>,
) -> Result<Json<List<QuizItem>>, Error> {
    let company_id = company_id.into_inner().0;
    let mut db = manager.db().await?;
    require_member(&mut db, company_id, user_info.id).await?;
    let (quizzes, total) = quiz_service::list_quizzes(&mut db, company_id, user_info.id, pagination.page, pagination.size).await?;
    Ok(Json(List::new(quizzes, total)))
}

pub async fn detail(user_info: UserInfo, path: Path<(i32, i32)>, manager: Data<PgSqlxManager>) -> Result<Json<QuizWithQuestions>, Error> {
    let (company_id, quiz_id) = path.into_inner();
    let mut db = manager.db().await?;
    require_member(&mut db, company_id, user_info.id).await?;
    let quiz = quiz_service::quiz_detail(&mut db, quiz_id, company_id).await?;
    Ok(Json(quiz))
}

pub async fn update(
    user_info: UserInfo,
    path: Path<(i32, i32)>,
    Json(data): Json<QuizUpdate>,
    manager: Data<PgSqlxManager>,
) -> Result<HttpResponse, Error> {
    let (company_id, quiz_id) = path.into_inner();
    let mut tx = manager.tx().await?;
    require_manager(&mut tx, company_id, user_info.id).await?;
    quiz_service::update_quiz(tx, quiz_id, data).await?;
    Ok(HttpResponse::Ok().finish())
}

pub async fn delete_quiz(user_info: UserInfo, path: Path<(i32, i32)>, manager: Data<PgSqlxManager>) -> Result<HttpResponse, Error> {
    let (company_id, quiz_id) = path.into_inner();
    let mut tx = manager.tx().await?;
    require_manager(&mut tx, company_id, user_info.id).await?;
    quiz_service::delete_quiz(tx, quiz_id).await?;
    Ok(HttpResponse::Ok().finish())
}

#[derive(Debug, Deserialize)]
pub struct SubmitPayload {
    pub user_id: i32,
    pub company_id: i32,
    pub score: i32,
    pub questions: Vec<SubmittedQuestion>,
}

pub async fn submit(
    user_info: UserInfo,
    quiz_id: Path<(i32,)>,
    Json(payload): Json<SubmitPayload>,
    manager: Data<PgSqlxManager>,
    cache: Data<RedisAnswerCache>,
) -> Result<Json<Submission>, Error> {
    let quiz_id = quiz_id.into_inner().0;
    let tx = manager.tx().await?;
    let submission = quiz_service::submit_quiz(
        tx,
        cache.get_ref(),
        user_info.id,
        QuizSubmit {
            quiz_id,
            user_id: payload.user_id,
            company_id: payload.company_id,
            score: payload.score,
            questions: payload.questions,
        },
    )
    .await?;
    Ok(Json(submission))
}

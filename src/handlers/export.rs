use actix_web::web::{Data, Json, Query};
use serde::Deserialize;

use crate::cache::redis::RedisAnswerCache;
use crate::context::UserInfo;
use crate::core::models::quiz::QuizDataRow;
use crate::core::services::export as export_service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub quiz_id: Option<i32>,
    pub company_id: Option<i32>,
}

pub async fn my_quiz_data(
    user_info: UserInfo,
    Query(query): Query<ExportQuery>,
    manager: Data<PgSqlxManager>,
    cache: Data<RedisAnswerCache>,
) -> Result<Json<Vec<QuizDataRow>>, Error> {
    let mut db = manager.db().await?;
    let rows = export_service::quiz_data_for_user(&mut db, cache.get_ref(), user_info.id, query.quiz_id, query.company_id).await?;
    Ok(Json(rows))
}

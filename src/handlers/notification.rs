use actix_web::web::{Data, Json, Query};

use crate::context::UserInfo;
use crate::core::models::notification::Notification;
use crate::core::ports::repository::NotificationCommon;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::request::Pagination;

pub async fn list(user_info: UserInfo, Query(pagination): Query<Pagination>, manager: Data<PgSqlxManager>) -> Result<Json<Vec<Notification>>, Error> {
    let mut db = manager.db().await?;
    let notifications = NotificationCommon::for_user(&mut db, user_info.id, pagination.page, pagination.size).await?;
    Ok(Json(notifications))
}

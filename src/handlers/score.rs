use actix_web::web::{Data, Json, Path, Query};

use crate::context::UserInfo;
use crate::core::models::record::{AverageScore, CompanyAttemptScore, SystemAttemptScore};
use crate::core::services::score as score_service;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::require_member;
use crate::request::DateRange;

/// A member sees their own scores; admins and owners see any member's.
pub async fn company_average(
    user_info: UserInfo,
    path: Path<(i32, i32)>,
    Query(range): Query<DateRange>,
    manager: Data<PgSqlxManager>,
) -> Result<Json<AverageScore<CompanyAttemptScore>>, Error> {
    range.validate()?;
    let (company_id, target_user_id) = path.into_inner();
    let mut db = manager.db().await?;
    let role = require_member(&mut db, company_id, user_info.id).await?;
    if target_user_id != user_info.id && !role.can_view_company_analytics() {
        return Err(Error::Forbidden("cannot view another member's scores".into()));
    }
    let result = score_service::average_in_company(&mut db, target_user_id, company_id, range.from_date, range.to_date).await?;
    Ok(Json(result))
}

pub async fn my_average(
    user_info: UserInfo,
    Query(range): Query<DateRange>,
    manager: Data<PgSqlxManager>,
) -> Result<Json<AverageScore<SystemAttemptScore>>, Error> {
    range.validate()?;
    let mut db = manager.db().await?;
    let result = score_service::average_in_system(&mut db, user_info.id, range.from_date, range.to_date).await?;
    Ok(Json(result))
}

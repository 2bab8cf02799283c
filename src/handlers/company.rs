use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use serde::Deserialize;

use crate::context::UserInfo;
use crate::core::models::company::{Insert as CompanyInsert, Role};
use crate::core::ports::repository::{CompanyCommon, TxStore};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::handlers::require_manager;
use crate::response::CreateResponse;

#[derive(Debug, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create(user_info: UserInfo, Json(data): Json<CompanyCreate>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    let mut tx = manager.tx().await?;
    let id = CompanyCommon::insert(
        &mut tx,
        CompanyInsert {
            name: data.name,
            description: data.description,
            owner_id: user_info.id,
        },
    )
    .await?;
    CompanyCommon::add_member(&mut tx, id, user_info.id, Role::Owner).await?;
    tx.commit().await?;
    Ok(Json(CreateResponse::new(id)))
}

#[derive(Debug, Deserialize)]
pub struct AddMember {
    pub user_id: i32,
    pub role: Role,
}

pub async fn add_member(
    user_info: UserInfo,
    company_id: Path<(i32,)>,
    Json(data): Json<AddMember>,
    manager: Data<PgSqlxManager>,
) -> Result<HttpResponse, Error> {
    let company_id = company_id.into_inner().0;
    let mut tx = manager.tx().await?;
    require_manager(&mut tx, company_id, user_info.id).await?;
    CompanyCommon::add_member(&mut tx, company_id, data.user_id, data.role).await?;
    tx.commit().await?;
    Ok(HttpResponse::Ok().finish())
}

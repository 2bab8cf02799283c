pub mod company;
pub mod export;
pub mod notification;
pub mod quiz;
pub mod score;
pub mod user;

use crate::core::models::company::Role;
use crate::core::ports::repository::{CompanyCommon, Store};
use crate::error::Error;

/// Membership gate: any role will do.
pub(crate) async fn require_member<S: Store>(db: &mut S, company_id: i32, user_id: i32) -> Result<Role, Error> {
    CompanyCommon::member_role(db, company_id, user_id)
        .await?
        .ok_or_else(|| Error::Forbidden(format!("not a member of company {}", company_id)))
}

/// Authoring gate: members can take quizzes, only admins and owners manage them.
pub(crate) async fn require_manager<S: Store>(db: &mut S, company_id: i32, user_id: i32) -> Result<(), Error> {
    let role = require_member(db, company_id, user_id).await?;
    if !matches!(role, Role::Admin | Role::Owner) {
        return Err(Error::Forbidden(format!("requires admin or owner of company {}", company_id)));
    }
    Ok(())
}

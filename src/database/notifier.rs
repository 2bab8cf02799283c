use sqlx::PgPool;

use crate::core::ports::notifier::Notifier;
use crate::core::ports::repository::{CompanyCommon, NotificationCommon};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;

/// Durable notification sink: one row per company member. The delivery
/// transport polls these rows.
pub struct PgNotifier {
    manager: PgSqlxManager,
}

impl PgNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self {
            manager: PgSqlxManager::new(pool),
        }
    }
}

impl Notifier for PgNotifier {
    async fn notify_company(&self, company_id: i32, message: &str) -> Result<(), Error> {
        let mut db = self.manager.db().await?;
        let member_ids = CompanyCommon::member_ids(&mut db, company_id).await?;
        NotificationCommon::bulk_insert(&mut db, &member_ids, company_id, message).await?;
        log::info!("notified {} members of company {}", member_ids.len(), company_id);
        Ok(())
    }
}

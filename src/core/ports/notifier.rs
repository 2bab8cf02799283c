use crate::error::Error;

/// Outbound notification sink. The transport (WebSocket fan-out, scheduler)
/// lives behind this boundary.
pub trait Notifier {
    async fn notify_company(&self, company_id: i32, message: &str) -> Result<(), Error>;
}

use crate::core::models::answer::CachedAnswer;
use crate::error::Error;

/// Expiry of one mirrored answer entry: 48 hours.
pub const ANSWER_TTL_SECONDS: usize = 172_800;

/// Write-through mirror of recent selected-answer events. The relational
/// store stays the source of truth; this only accelerates identity lookups.
pub trait AnswerCache {
    /// Mirror all entries of one submission in a single round trip.
    async fn save_answers(&self, answers: &[CachedAnswer]) -> Result<(), Error>;
    /// All live entries for a user, optionally narrowed to one quiz and/or
    /// company. Entries expired between enumeration and fetch are skipped.
    async fn answers_for_user(&self, user_id: i32, quiz_id: Option<i32>, company_id: Option<i32>) -> Result<Vec<CachedAnswer>, Error>;
}

use itertools::Itertools;

use crate::core::models::answer::SelectedAnswerQuery;
use crate::core::models::quiz::QuizDataRow;
use crate::core::ports::cache::AnswerCache;
use crate::core::ports::repository::{AnswerCommon, QuizCommon, Store};
use crate::error::Error;

/// Assemble a user's export rows from both sources of truth: the cache first,
/// then the durable selected-answer trail for everything the cache no longer
/// holds (entries expire after two days). The union is hydrated in one join so
/// the output is complete even when the cache is empty.
pub async fn quiz_data_for_user<S, C>(
    db: &mut S,
    cache: &C,
    user_id: i32,
    quiz_id: Option<i32>,
    company_id: Option<i32>,
) -> Result<Vec<QuizDataRow>, Error>
where
    S: Store,
    C: AnswerCache,
{
    let cached = cache.answers_for_user(user_id, quiz_id, company_id).await?;
    let cached_ids: Vec<i32> = cached.iter().map(|c| c.answer_id).collect();
    let remainder = AnswerCommon::selected_excluding(
        db,
        SelectedAnswerQuery {
            user_id,
            quiz_id,
            company_id,
            exclude_ids: cached_ids.clone(),
        },
    )
    .await?;
    let ids: Vec<i32> = cached_ids.into_iter().chain(remainder.into_iter().map(|sa| sa.id)).unique().collect();
    QuizCommon::full_quiz_data(db, &ids).await
}

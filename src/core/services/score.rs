use chrono::NaiveDate;

use crate::core::models::record::{AverageScore, CompanyAttemptScore, SystemAttemptScore};
use crate::core::ports::repository::{RecordCommon, Store};
use crate::error::Error;

/// Unweighted mean of per-attempt averages: an attempt at a two-question quiz
/// counts as much toward the overall figure as one at a twenty-question quiz.
fn overall(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub async fn average_in_company<S>(
    db: &mut S,
    user_id: i32,
    company_id: i32,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> Result<AverageScore<CompanyAttemptScore>, Error>
where
    S: Store,
{
    let scores = RecordCommon::company_attempt_scores(db, user_id, company_id, from_date, to_date).await?;
    let overall_average = overall(scores.iter().map(|s| s.average_score));
    Ok(AverageScore { overall_average, scores })
}

pub async fn average_in_system<S>(
    db: &mut S,
    user_id: i32,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> Result<AverageScore<SystemAttemptScore>, Error>
where
    S: Store,
{
    let scores = RecordCommon::system_attempt_scores(db, user_id, from_date, to_date).await?;
    let overall_average = overall(scores.iter().map(|s| s.average_score));
    Ok(AverageScore { overall_average, scores })
}

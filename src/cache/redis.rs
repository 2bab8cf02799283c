use redis::Client;

use crate::core::models::answer::CachedAnswer;
use crate::core::ports::cache::{AnswerCache, ANSWER_TTL_SECONDS};
use crate::error::Error;

/// Key of one mirrored answer entry. Segment order is load-bearing: lookups
/// always know the user but may leave quiz/company as `*` wildcards.
pub fn answer_key(user_id: i32, quiz_id: i32, company_id: i32, answer_id: i32) -> String {
    format!("{}:{}:{}:{}", user_id, quiz_id, company_id, answer_id)
}

fn answer_pattern(user_id: i32, quiz_id: Option<i32>, company_id: Option<i32>) -> String {
    let quiz = quiz_id.map(|v| v.to_string()).unwrap_or_else(|| "*".into());
    let company = company_id.map(|v| v.to_string()).unwrap_or_else(|| "*".into());
    format!("{}:{}:{}:*", user_id, quiz, company)
}

// a malformed value is a fetch-side cache failure, not a caller error
fn decode_entry(value: &str) -> Result<CachedAnswer, Error> {
    serde_json::from_str(value)
        .map_err(|e| Error::CacheFetch(redis::RedisError::from((redis::ErrorKind::TypeError, "corrupted cache entry", e.to_string()))))
}

pub struct RedisAnswerCache {
    client: Client,
}

impl RedisAnswerCache {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AnswerCache for RedisAnswerCache {
    async fn save_answers(&self, answers: &[CachedAnswer]) -> Result<(), Error> {
        if answers.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_async_connection().await.map_err(Error::CacheWrite)?;
        let mut pipe = redis::pipe();
        for answer in answers {
            let key = answer_key(answer.user_id, answer.quiz_id, answer.company_id, answer.answer_id);
            pipe.set_ex(key, serde_json::to_string(answer)?, ANSWER_TTL_SECONDS);
        }
        pipe.query_async::<_, ()>(&mut conn).await.map_err(Error::CacheWrite)?;
        Ok(())
    }

    async fn answers_for_user(&self, user_id: i32, quiz_id: Option<i32>, company_id: Option<i32>) -> Result<Vec<CachedAnswer>, Error> {
        let mut conn = self.client.get_async_connection().await.map_err(Error::CacheScan)?;
        let pattern = answer_pattern(user_id, quiz_id, company_id);
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        // SCAN pages are not exhaustive until the cursor wraps back to 0
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .query_async(&mut conn)
                .await
                .map_err(Error::CacheScan)?;
            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(Error::CacheFetch)?;
        let mut answers = Vec::with_capacity(values.len());
        // a key may expire between SCAN and MGET; nil is not an error
        for value in values.into_iter().flatten() {
            answers.push(decode_entry(&value)?);
        }
        Ok(answers)
    }
}

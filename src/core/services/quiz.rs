use crate::core::models::{
    answer::{CachedAnswer, Insert as AnswerInsert},
    question::{Insert as QuestionInsert, QuestionWithAnswers},
    quiz::{Insert as QuizInsert, QuizCreate, QuizItem, QuizSubmit, QuizWithQuestions, Submission, Update as QuizUpdate},
    record::Insert as RecordInsert,
};
use crate::core::ports::cache::AnswerCache;
use crate::core::ports::notifier::Notifier;
use crate::core::ports::repository::{AnswerCommon, ParticipantCommon, QuestionCommon, QuizCommon, RecordCommon, Store, TxStore};
use crate::error::Error;

/// Create a quiz with its nested questions and answers in one transaction.
/// `replace_quiz_id` deletes the previous revision first (cascading to its
/// questions and answers). Members are notified after the commit.
pub async fn create_quiz<T, N>(mut storer: T, notifier: &N, company_id: i32, replace_quiz_id: Option<i32>, quiz: QuizCreate) -> Result<i32, Error>
where
    T: TxStore,
    N: Notifier,
{
    if let Some(old_id) = replace_quiz_id {
        QuizCommon::delete(&mut storer, old_id).await?;
    }
    let title = quiz.title.clone();
    let quiz_id = QuizCommon::insert(
        &mut storer,
        QuizInsert {
            company_id,
            title: quiz.title,
            description: quiz.description,
            frequency: quiz.frequency,
        },
    )
    .await?;
    for question in quiz.questions {
        let question_id = QuestionCommon::insert(&mut storer, QuestionInsert { quiz_id, text: question.text }).await?;
        let answers = question
            .answers
            .into_iter()
            .map(|a| AnswerInsert {
                question_id,
                text: a.text,
                is_correct: a.is_correct,
            })
            .collect();
        AnswerCommon::bulk_insert(&mut storer, answers).await?;
    }
    storer.commit().await?;
    log::info!("created quiz id: {}", quiz_id);
    notifier.notify_company(company_id, &format!("New quiz \"{}\" is available", title)).await?;
    Ok(quiz_id)
}

pub async fn update_quiz<T>(mut storer: T, quiz_id: i32, data: QuizUpdate) -> Result<(), Error>
where
    T: TxStore,
{
    if QuizCommon::get(&mut storer, quiz_id).await?.is_none() {
        return Err(Error::NotFound(format!("quiz {} not found", quiz_id)));
    }
    QuizCommon::update(&mut storer, quiz_id, data).await?;
    storer.commit().await?;
    Ok(())
}

pub async fn delete_quiz<T>(mut storer: T, quiz_id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    QuizCommon::delete(&mut storer, quiz_id).await?;
    storer.commit().await?;
    log::info!("deleted quiz id: {}", quiz_id);
    Ok(())
}

pub async fn list_quizzes<S>(db: &mut S, company_id: i32, user_id: i32, page: i64, size: i64) -> Result<(Vec<QuizItem>, i64), Error>
where
    S: Store,
{
    let total = QuizCommon::count(db, company_id).await?;
    let quizzes = QuizCommon::list(db, company_id, user_id, page, size).await?;
    Ok((quizzes, total))
}

pub async fn quiz_detail<S>(db: &mut S, quiz_id: i32, company_id: i32) -> Result<QuizWithQuestions, Error>
where
    S: Store,
{
    let quiz = QuizCommon::get(db, quiz_id)
        .await?
        .filter(|q| q.company_id == company_id)
        .ok_or_else(|| Error::NotFound(format!("quiz {} not found", quiz_id)))?;
    let mut questions = Vec::new();
    for question in QuestionCommon::by_quiz(db, quiz_id).await? {
        let answers = AnswerCommon::by_question(db, question.id).await?;
        questions.push(QuestionWithAnswers {
            id: question.id,
            text: question.text,
            answers,
        });
    }
    Ok(QuizWithQuestions {
        id: quiz.id,
        title: quiz.title,
        description: quiz.description,
        frequency: quiz.frequency,
        questions,
    })
}

/// One submission: participant upsert, score record, selected-answer trail,
/// then the cache mirror. The first three share the unit of work; the cache
/// write runs after the commit, so a cache failure surfaces to the caller
/// without undoing the durable rows.
pub async fn submit_quiz<T, C>(mut storer: T, cache: &C, acting_user_id: i32, data: QuizSubmit) -> Result<Submission, Error>
where
    T: TxStore,
    C: AnswerCache,
{
    if acting_user_id != data.user_id {
        return Err(Error::Forbidden("cannot submit a quiz on behalf of another user".into()));
    }
    if QuizCommon::get(&mut storer, data.quiz_id).await?.is_none() {
        return Err(Error::NotFound(format!("quiz {} not found", data.quiz_id)));
    }
    let participant_id = ParticipantCommon::upsert(&mut storer, data.quiz_id, data.user_id).await?;
    let record_id = RecordCommon::insert(
        &mut storer,
        RecordInsert {
            participant_id,
            score: data.score,
        },
    )
    .await?;
    let chosen: Vec<i32> = data.questions.iter().flat_map(|q| q.answers.iter().map(|a| a.id)).collect();
    let selected_answer_ids = AnswerCommon::insert_selected(&mut storer, record_id, &chosen).await?;
    storer.commit().await?;

    let entries: Vec<CachedAnswer> = selected_answer_ids
        .iter()
        .map(|&answer_id| CachedAnswer {
            quiz_id: data.quiz_id,
            company_id: data.company_id,
            answer_id,
            participant_id,
            user_id: data.user_id,
            record_id,
        })
        .collect();
    cache.save_answers(&entries).await?;
    log::info!("user {} submitted quiz {} as record {}", data.user_id, data.quiz_id, record_id);
    Ok(Submission {
        participant_id,
        record_id,
        selected_answer_ids,
    })
}

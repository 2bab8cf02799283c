//! In-memory store, cache and notifier for service tests. The store clones
//! share one `RefCell` state so a test keeps a handle after a service
//! consumes its `TxStore` by value.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, Utc};

use crate::core::models::{
    answer::{AnswerDetail, CachedAnswer, Insert as AnswerInsert, SelectedAnswer, SelectedAnswerQuery},
    company::{Company, Insert as CompanyInsert, Role},
    notification::Notification,
    participant::Participant,
    question::{Insert as QuestionInsert, Question},
    quiz::{Insert as QuizInsert, Quiz, QuizDataRow, QuizItem, Update as QuizUpdate},
    record::{CompanyAttemptScore, Insert as RecordInsert, SystemAttemptScore},
    user::{Insert as UserInsert, User},
};
use crate::core::ports::cache::AnswerCache;
use crate::core::ports::notifier::Notifier;
use crate::core::ports::repository::{
    AnswerCommon, Common, CompanyCommon, NotificationCommon, ParticipantCommon, QuestionCommon, QuizCommon, RecordCommon, Store, TxStore,
    UserCommon,
};
use crate::error::Error;

#[derive(Default)]
pub struct MockState {
    next_id: i32,
    pub users: Vec<User>,
    pub companies: Vec<Company>,
    pub members: Vec<(i32, i32, Role)>,
    pub quizzes: Vec<Quiz>,
    pub questions: Vec<Question>,
    pub answers: Vec<(i32, AnswerInsert)>,
    pub participants: Vec<Participant>,
    pub records: Vec<(i32, RecordInsert)>,
    pub selected: Vec<SelectedAnswer>,
    pub notifications: Vec<Notification>,
    pub committed: bool,
    pub rolled_back: bool,
}

impl MockState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn total_questions(&self, quiz_id: i32) -> i32 {
        self.questions.iter().filter(|q| q.quiz_id == quiz_id).count() as i32
    }

    fn in_range(date: chrono::DateTime<Utc>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        let d = date.date_naive();
        from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t)
    }

    /// Mirrors the aggregate query: one row per attempt group, the group's
    /// summed score over (records * questions), as a percentage. Groups
    /// with a zero-question quiz are dropped.
    fn attempt_scores(&self, user_id: i32, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<(i32, f64, chrono::DateTime<Utc>)> {
        self.participants
            .iter()
            .filter(|p| p.user_id == user_id && Self::in_range(p.completed_at, from, to))
            .filter_map(|p| {
                let total_questions = self.total_questions(p.quiz_id);
                if total_questions == 0 {
                    return None;
                }
                let attempts: Vec<&(i32, RecordInsert)> = self.records.iter().filter(|(_, r)| r.participant_id == p.id).collect();
                if attempts.is_empty() {
                    return None;
                }
                let sum: i32 = attempts.iter().map(|(_, r)| r.score).sum();
                let average = f64::from(sum) / f64::from(attempts.len() as i32 * total_questions) * 100.0;
                Some((p.quiz_id, average, p.completed_at))
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MockStore(pub Rc<RefCell<MockState>>);

impl MockStore {
    pub fn add_member(&self, company_id: i32, user_id: i32) {
        self.0.borrow_mut().members.push((company_id, user_id, Role::Member));
    }
}

impl UserCommon for MockStore {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let mut state = self.0.borrow_mut();
        let id = state.next_id();
        state.users.push(User {
            id,
            email: user.email,
            password: user.password,
            salt: user.salt,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.0.borrow().users.iter().find(|u| u.email == email).cloned())
    }
}

impl CompanyCommon for MockStore {
    async fn insert(&mut self, data: CompanyInsert) -> Result<i32, Error> {
        let mut state = self.0.borrow_mut();
        let id = state.next_id();
        state.companies.push(Company {
            id,
            name: data.name,
            description: data.description,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Company>, Error> {
        Ok(self.0.borrow().companies.iter().find(|c| c.id == id).cloned())
    }

    async fn add_member(&mut self, company_id: i32, user_id: i32, role: Role) -> Result<(), Error> {
        self.0.borrow_mut().members.push((company_id, user_id, role));
        Ok(())
    }

    async fn member_role(&mut self, company_id: i32, user_id: i32) -> Result<Option<Role>, Error> {
        Ok(self
            .0
            .borrow()
            .members
            .iter()
            .find(|(c, u, _)| *c == company_id && *u == user_id)
            .map(|(_, _, role)| *role))
    }

    async fn member_ids(&mut self, company_id: i32) -> Result<Vec<i32>, Error> {
        Ok(self.0.borrow().members.iter().filter(|(c, _, _)| *c == company_id).map(|(_, u, _)| *u).collect())
    }
}

impl QuizCommon for MockStore {
    async fn insert(&mut self, data: QuizInsert) -> Result<i32, Error> {
        let mut state = self.0.borrow_mut();
        let id = state.next_id();
        let now = Utc::now();
        state.quizzes.push(Quiz {
            id,
            company_id: data.company_id,
            title: data.title,
            description: data.description,
            frequency: data.frequency,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Quiz>, Error> {
        Ok(self.0.borrow().quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn update(&mut self, id: i32, data: QuizUpdate) -> Result<(), Error> {
        let mut state = self.0.borrow_mut();
        if let Some(quiz) = state.quizzes.iter_mut().find(|q| q.id == id) {
            if let Some(title) = data.title {
                quiz.title = title;
            }
            if let Some(description) = data.description {
                quiz.description = Some(description);
            }
            quiz.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let mut state = self.0.borrow_mut();
        let question_ids: Vec<i32> = state.questions.iter().filter(|q| q.quiz_id == id).map(|q| q.id).collect();
        let answer_ids: Vec<i32> = state
            .answers
            .iter()
            .filter(|(_, a)| question_ids.contains(&a.question_id))
            .map(|(id, _)| *id)
            .collect();
        let participant_ids: Vec<i32> = state.participants.iter().filter(|p| p.quiz_id == id).map(|p| p.id).collect();
        let record_ids: Vec<i32> = state
            .records
            .iter()
            .filter(|(_, r)| participant_ids.contains(&r.participant_id))
            .map(|(id, _)| *id)
            .collect();
        state.selected.retain(|sa| !record_ids.contains(&sa.record_id) && !answer_ids.contains(&sa.answer_id));
        state.records.retain(|(id, _)| !record_ids.contains(id));
        state.participants.retain(|p| p.quiz_id != id);
        state.answers.retain(|(id, _)| !answer_ids.contains(id));
        state.questions.retain(|q| q.quiz_id != id);
        state.quizzes.retain(|q| q.id != id);
        Ok(())
    }

    async fn list(&mut self, company_id: i32, user_id: i32, page: i64, size: i64) -> Result<Vec<QuizItem>, Error> {
        let state = self.0.borrow();
        let now = Utc::now();
        Ok(state
            .quizzes
            .iter()
            .filter(|q| q.company_id == company_id)
            .skip(((page - 1) * size) as usize)
            .take(size as usize)
            .map(|q| {
                let is_available = state
                    .participants
                    .iter()
                    .find(|p| p.quiz_id == q.id && p.user_id == user_id)
                    .map_or(true, |p| now >= p.completed_at + Duration::days(i64::from(q.frequency)));
                QuizItem {
                    id: q.id,
                    title: q.title.clone(),
                    description: q.description.clone(),
                    frequency: q.frequency,
                    is_available,
                }
            })
            .collect())
    }

    async fn count(&mut self, company_id: i32) -> Result<i64, Error> {
        Ok(self.0.borrow().quizzes.iter().filter(|q| q.company_id == company_id).count() as i64)
    }

    async fn full_quiz_data(&mut self, selected_answer_ids: &[i32]) -> Result<Vec<QuizDataRow>, Error> {
        let state = self.0.borrow();
        let mut rows = Vec::new();
        for sa in state.selected.iter().filter(|sa| selected_answer_ids.contains(&sa.id)) {
            let (_, answer) = state
                .answers
                .iter()
                .find(|(id, _)| *id == sa.answer_id)
                .ok_or_else(|| Error::NotFound(format!("answer {} not found", sa.answer_id)))?;
            let question = state
                .questions
                .iter()
                .find(|q| q.id == answer.question_id)
                .ok_or_else(|| Error::NotFound(format!("question {} not found", answer.question_id)))?;
            let quiz = state
                .quizzes
                .iter()
                .find(|q| q.id == question.quiz_id)
                .ok_or_else(|| Error::NotFound(format!("quiz {} not found", question.quiz_id)))?;
            rows.push(QuizDataRow {
                quiz_title: quiz.title.clone(),
                quiz_description: quiz.description.clone(),
                question_text: question.text.clone(),
                answer_text: answer.text.clone(),
                is_correct: answer.is_correct,
            });
        }
        Ok(rows)
    }
}

impl QuestionCommon for MockStore {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error> {
        let mut state = self.0.borrow_mut();
        let id = state.next_id();
        state.questions.push(Question {
            id,
            quiz_id: question.quiz_id,
            text: question.text,
        });
        Ok(id)
    }

    async fn by_quiz(&mut self, quiz_id: i32) -> Result<Vec<Question>, Error> {
        Ok(self.0.borrow().questions.iter().filter(|q| q.quiz_id == quiz_id).cloned().collect())
    }
}

impl AnswerCommon for MockStore {
    async fn bulk_insert(&mut self, answers: Vec<AnswerInsert>) -> Result<Vec<i32>, Error> {
        let mut state = self.0.borrow_mut();
        let mut ids = Vec::with_capacity(answers.len());
        for answer in answers {
            let id = state.next_id();
            state.answers.push((id, answer));
            ids.push(id);
        }
        Ok(ids)
    }

    async fn by_question(&mut self, question_id: i32) -> Result<Vec<AnswerDetail>, Error> {
        Ok(self
            .0
            .borrow()
            .answers
            .iter()
            .filter(|(_, a)| a.question_id == question_id)
            .map(|(id, a)| AnswerDetail {
                id: *id,
                text: a.text.clone(),
                is_correct: a.is_correct,
            })
            .collect())
    }

    async fn insert_selected(&mut self, record_id: i32, answer_ids: &[i32]) -> Result<Vec<i32>, Error> {
        let mut state = self.0.borrow_mut();
        let mut ids = Vec::with_capacity(answer_ids.len());
        for &answer_id in answer_ids {
            let id = state.next_id();
            state.selected.push(SelectedAnswer { id, record_id, answer_id });
            ids.push(id);
        }
        Ok(ids)
    }

    async fn selected_excluding(&mut self, query: SelectedAnswerQuery) -> Result<Vec<SelectedAnswer>, Error> {
        let state = self.0.borrow();
        Ok(state
            .selected
            .iter()
            .filter(|sa| !query.exclude_ids.contains(&sa.id))
            .filter(|sa| {
                let Some((_, record)) = state.records.iter().find(|(id, _)| *id == sa.record_id) else {
                    return false;
                };
                let Some(participant) = state.participants.iter().find(|p| p.id == record.participant_id) else {
                    return false;
                };
                if participant.user_id != query.user_id {
                    return false;
                }
                if query.quiz_id.is_some_and(|q| participant.quiz_id != q) {
                    return false;
                }
                if let Some(company_id) = query.company_id {
                    return state
                        .quizzes
                        .iter()
                        .any(|q| q.id == participant.quiz_id && q.company_id == company_id);
                }
                true
            })
            .cloned()
            .collect())
    }
}

impl ParticipantCommon for MockStore {
    async fn upsert(&mut self, quiz_id: i32, user_id: i32) -> Result<i32, Error> {
        let mut state = self.0.borrow_mut();
        if let Some(p) = state.participants.iter_mut().find(|p| p.quiz_id == quiz_id && p.user_id == user_id) {
            p.completed_at = Utc::now();
            return Ok(p.id);
        }
        let id = state.next_id();
        state.participants.push(Participant {
            id,
            quiz_id,
            user_id,
            completed_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get(&mut self, quiz_id: i32, user_id: i32) -> Result<Option<Participant>, Error> {
        Ok(self
            .0
            .borrow()
            .participants
            .iter()
            .find(|p| p.quiz_id == quiz_id && p.user_id == user_id)
            .cloned())
    }
}

impl RecordCommon for MockStore {
    async fn insert(&mut self, data: RecordInsert) -> Result<i32, Error> {
        let mut state = self.0.borrow_mut();
        let id = state.next_id();
        state.records.push((id, data));
        Ok(id)
    }

    async fn company_attempt_scores(
        &mut self,
        user_id: i32,
        company_id: i32,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<CompanyAttemptScore>, Error> {
        let state = self.0.borrow();
        Ok(state
            .attempt_scores(user_id, from_date, to_date)
            .into_iter()
            .filter(|(quiz_id, _, _)| state.quizzes.iter().any(|q| q.id == *quiz_id && q.company_id == company_id))
            .map(|(quiz_id, average_score, completed_at)| CompanyAttemptScore {
                quiz_id,
                average_score,
                completed_at,
            })
            .collect())
    }

    async fn system_attempt_scores(
        &mut self,
        user_id: i32,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<Vec<SystemAttemptScore>, Error> {
        let state = self.0.borrow();
        Ok(state
            .attempt_scores(user_id, from_date, to_date)
            .into_iter()
            .filter_map(|(quiz_id, average_score, completed_at)| {
                state.quizzes.iter().find(|q| q.id == quiz_id).map(|q| SystemAttemptScore {
                    title: q.title.clone(),
                    description: q.description.clone(),
                    completed_at,
                    average_score,
                })
            })
            .collect())
    }
}

impl NotificationCommon for MockStore {
    async fn bulk_insert(&mut self, user_ids: &[i32], company_id: i32, message: &str) -> Result<(), Error> {
        let mut state = self.0.borrow_mut();
        for &user_id in user_ids {
            let id = state.next_id();
            state.notifications.push(Notification {
                id,
                user_id,
                company_id,
                message: message.to_owned(),
                status: 0,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn for_user(&mut self, user_id: i32, page: i64, size: i64) -> Result<Vec<Notification>, Error> {
        Ok(self
            .0
            .borrow()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .skip(((page - 1) * size) as usize)
            .take(size as usize)
            .cloned()
            .collect())
    }
}

impl Common for MockStore {}
impl Store for MockStore {}

impl TxStore for MockStore {
    async fn commit(self) -> Result<(), Error> {
        self.0.borrow_mut().committed = true;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.0.borrow_mut().rolled_back = true;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockCache(pub Rc<RefCell<Vec<CachedAnswer>>>);

impl AnswerCache for MockCache {
    async fn save_answers(&self, answers: &[CachedAnswer]) -> Result<(), Error> {
        self.0.borrow_mut().extend_from_slice(answers);
        Ok(())
    }

    async fn answers_for_user(&self, user_id: i32, quiz_id: Option<i32>, company_id: Option<i32>) -> Result<Vec<CachedAnswer>, Error> {
        Ok(self
            .0
            .borrow()
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter(|c| quiz_id.map_or(true, |q| c.quiz_id == q))
            .filter(|c| company_id.map_or(true, |co| c.company_id == co))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MockNotifier(pub RefCell<Vec<(i32, String)>>);

impl Notifier for MockNotifier {
    async fn notify_company(&self, company_id: i32, message: &str) -> Result<(), Error> {
        self.0.borrow_mut().push((company_id, message.to_owned()));
        Ok(())
    }
}

pub struct SeededQuiz {
    pub quiz_id: i32,
    pub question_ids: Vec<i32>,
    /// All answer ids, flattened in question order.
    pub answer_ids: Vec<i32>,
}

/// Seed a quiz directly into the state: one question per layout entry, one
/// answer per flag (`true` marks it correct). Titles follow the generated
/// ids, answer texts restart at "answer 1" per quiz.
pub fn seed_quiz(store: &MockStore, company_id: i32, layout: &[&[bool]]) -> SeededQuiz {
    let mut state = store.0.borrow_mut();
    let quiz_id = state.next_id();
    let now = Utc::now();
    state.quizzes.push(Quiz {
        id: quiz_id,
        company_id,
        title: format!("quiz {}", quiz_id),
        description: None,
        frequency: 7,
        created_at: now,
        updated_at: now,
    });
    let mut question_ids = Vec::new();
    let mut answer_ids = Vec::new();
    let mut answer_no = 0;
    for (i, answers) in layout.iter().enumerate() {
        let question_id = state.next_id();
        state.questions.push(Question {
            id: question_id,
            quiz_id,
            text: format!("question {}", i + 1),
        });
        question_ids.push(question_id);
        for &is_correct in answers.iter() {
            answer_no += 1;
            let id = state.next_id();
            state.answers.push((
                id,
                AnswerInsert {
                    question_id,
                    text: format!("answer {}", answer_no),
                    is_correct,
                },
            ));
            answer_ids.push(id);
        }
    }
    SeededQuiz {
        quiz_id,
        question_ids,
        answer_ids,
    }
}

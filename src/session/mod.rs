// src/session/mod.rs

pub mod registry;
pub mod timer;

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    grade::{AnswerEntry, ResultEntry, SubmittedAnswer},
    quiz::{Quiz, QuizTarget},
    session::{Feedback, QuestionView, SessionView},
};

/// Lifecycle of a quiz attempt.
///
/// `Submitting` is entered synchronously before the grading call starts, so a
/// second confirmation observes it and is turned away without touching the
/// network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Submitting,
    Graded,
}

/// A command the current session state does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownQuestion(String),
    InvalidOption { question_id: String, answer: String },
    NotActive(Status),
    NotOnLastQuestion,
    NotGraded,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownQuestion(id) => write!(f, "Question {} is not part of this quiz", id),
            SessionError::InvalidOption { question_id, answer } => {
                write!(f, "{:?} is not an option of question {}", answer, question_id)
            }
            SessionError::NotActive(Status::Submitting) => f.write_str("Answers are being graded"),
            SessionError::NotActive(_) => f.write_str("This quiz has already been graded"),
            SessionError::NotOnLastQuestion => f.write_str("Answers can only be confirmed on the last question"),
            SessionError::NotGraded => f.write_str("The quiz can only be closed once it has been graded"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Timed attempt at a quiz.
///
/// One countdown covers the whole quiz. Every tick is also charged to the
/// question under the cursor; that per-question counter is the time recorded
/// with a selection.
#[derive(Debug)]
pub struct QuizSession {
    quiz: Quiz,
    opened_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    remaining_time: u32,
    current_question_index: usize,
    status: Status,
    answers: HashMap<String, AnswerEntry>,
    results: Vec<ResultEntry>,
    elapsed: Vec<u32>,
}

impl QuizSession {
    pub fn new(quiz: Quiz) -> Self {
        let remaining_time = quiz.total_time();
        let elapsed = vec![0; quiz.questions.len()];
        let now = Utc::now();

        Self {
            quiz,
            opened_at: now,
            last_activity: now,
            remaining_time,
            current_question_index: 0,
            status: Status::Active,
            answers: HashMap::new(),
            results: Vec::new(),
            elapsed,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Last command or countdown tick.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// The countdown is still running.
    pub fn is_running(&self) -> bool {
        self.status != Status::Graded && self.remaining_time > 0
    }

    pub fn remaining_time(&self) -> u32 {
        self.remaining_time
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn answers(&self) -> &HashMap<String, AnswerEntry> {
        &self.answers
    }

    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    fn last_index(&self) -> usize {
        self.quiz.questions.len().saturating_sub(1)
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.status == Status::Active {
            Ok(())
        } else {
            Err(SessionError::NotActive(self.status))
        }
    }

    fn step_forward(&mut self) {
        if self.current_question_index < self.last_index() {
            self.current_question_index += 1;
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `false` once ticking must stop: the clock hit zero (which also
    /// moves the cursor forward once) or the attempt has been graded.
    /// The clock keeps running while a submission is in flight.
    pub fn tick(&mut self) -> bool {
        if self.status == Status::Graded || self.remaining_time == 0 {
            return false;
        }

        self.remaining_time -= 1;
        self.touch();
        if let Some(spent) = self.elapsed.get_mut(self.current_question_index) {
            *spent = spent.saturating_add(1);
        }

        if self.remaining_time == 0 {
            self.step_forward();
            return false;
        }

        true
    }

    /// Moves to the next question. No-op on the last one.
    /// The cursor is locked once a submission has started.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.step_forward();
        self.touch();
        Ok(())
    }

    /// Moves to the previous question. No-op on the first one.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.current_question_index = self.current_question_index.saturating_sub(1);
        self.touch();
        Ok(())
    }

    /// Records `answer` for `question_id`, replacing any earlier choice.
    pub fn select_answer(&mut self, question_id: &str, answer: &str) -> Result<(), SessionError> {
        self.ensure_active()?;

        let question = self
            .quiz
            .question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_owned()))?;

        if !question.has_option(answer) {
            return Err(SessionError::InvalidOption {
                question_id: question_id.to_owned(),
                answer: answer.to_owned(),
            });
        }

        let time = self
            .elapsed
            .get(self.current_question_index)
            .copied()
            .unwrap_or(0);

        self.answers.insert(
            question_id.to_owned(),
            AnswerEntry {
                answer: answer.to_owned(),
                time,
            },
        );
        self.touch();

        Ok(())
    }

    /// First half of a confirmation: locks the attempt and builds the
    /// submission in question order.
    pub fn begin_submit(&mut self) -> Result<Vec<SubmittedAnswer>, SessionError> {
        self.ensure_active()?;
        if self.current_question_index != self.last_index() {
            return Err(SessionError::NotOnLastQuestion);
        }

        self.status = Status::Submitting;
        self.touch();

        Ok(self
            .quiz
            .questions
            .iter()
            .map(|question| {
                self.answers
                    .get(&question.id)
                    .map(SubmittedAnswer::from)
                    .unwrap_or_else(SubmittedAnswer::unanswered)
            })
            .collect())
    }

    /// Stores the grader's verdict and stops the clock.
    /// `None` (a payload without results) still grades the attempt.
    pub fn complete_submit(&mut self, results: Option<Vec<ResultEntry>>) {
        if self.status != Status::Submitting {
            return;
        }

        self.results = results.unwrap_or_default();
        self.remaining_time = 0;
        self.status = Status::Graded;
        self.touch();
    }

    /// Reopens the attempt after a failed grading call.
    pub fn abort_submit(&mut self) {
        if self.status == Status::Submitting {
            self.status = Status::Active;
            self.touch();
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.status == Status::Active && self.current_question_index == self.last_index()
    }

    /// The dismiss affordance only works on a graded attempt.
    pub fn ensure_closable(&self) -> Result<(), SessionError> {
        if self.status == Status::Graded {
            Ok(())
        } else {
            Err(SessionError::NotGraded)
        }
    }

    pub fn view(&self, id: Uuid, target: &QuizTarget) -> SessionView {
        let questions = self
            .quiz
            .questions
            .iter()
            .enumerate()
            .map(|(idx, question)| {
                let selected = self.answers.get(&question.id);
                let feedback = self
                    .results
                    .get(idx)
                    .map(|result| Feedback::derive(result, selected.map(|entry| entry.time)));

                QuestionView {
                    id: question.id.clone(),
                    prompt: question.prompt.clone(),
                    options: question.options.clone(),
                    allotted_time: question.time,
                    selected: selected.map(|entry| entry.answer.clone()),
                    feedback,
                }
            })
            .collect();

        SessionView {
            id,
            target: target.clone(),
            topic: self.quiz.topic.clone(),
            difficulty: self.quiz.difficulty,
            creator: self.quiz.creator.full_name(),
            opened_at: self.opened_at,
            remaining_time: self.remaining_time,
            current_question_index: self.current_question_index,
            status: self.status,
            can_go_back: self.status == Status::Active && self.current_question_index > 0,
            can_go_forward: self.status == Status::Active && self.current_question_index < self.last_index(),
            can_confirm: self.can_confirm(),
            can_close: self.status == Status::Graded,
            questions,
        }
    }
}

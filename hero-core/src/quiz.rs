use hero_types::{Card, QuizQuestion, ValidationReason};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{HeroError, HeroResult};
use crate::progression::ProgressionModel;
use crate::rules::RulesConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Unanswered,
    Answered { selected: usize, correct: bool },
}

/// Questions drawn for one session and the answers given so far.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRound {
    questions: Vec<QuizQuestion>,
    answers: Vec<QuestionState>,
    current: usize,
    correct_count: usize,
}

impl QuizRound {
    fn new(questions: Vec<QuizQuestion>) -> Self {
        let answers = vec![QuestionState::Unanswered; questions.len()];
        Self {
            questions,
            answers,
            current: 0,
            correct_count: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn current_answer(&self) -> QuestionState {
        self.answers[self.current]
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    fn is_last(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }
}

/// Final score of a session. `card` is filled in once the card resolver
/// has answered for a perfect session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub correct_count: usize,
    pub session_length: usize,
    pub experience: u32,
    pub coins: u32,
    pub card: Option<Card>,
}

impl QuizResult {
    pub fn is_perfect(&self) -> bool {
        self.session_length > 0 && self.correct_count == self.session_length
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizState {
    NotStarted,
    Loading,
    InProgress(QuizRound),
    Completed(QuizResult),
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::NotStarted => "not started",
            QuizState::Loading => "loading",
            QuizState::InProgress(_) => "in progress",
            QuizState::Completed(_) => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded { correct: bool, correct_index: usize },
    /// The current question already had an answer; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    NextQuestion(usize),
    Finished(QuizResult),
}

/// One quiz session, driven by named transitions.
#[derive(Debug, Clone)]
pub struct QuizSession {
    state: QuizState,
    quiz_length: usize,
    points_per_correct: u32,
}

impl QuizSession {
    pub fn new(rules: &RulesConfig) -> Self {
        Self {
            state: QuizState::NotStarted,
            quiz_length: rules.quiz_length,
            points_per_correct: rules.points_per_correct,
        }
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn round(&self) -> Option<&QuizRound> {
        match &self.state {
            QuizState::InProgress(round) => Some(round),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            QuizState::Completed(result) => Some(result),
            _ => None,
        }
    }

    fn invalid_state(&self) -> HeroError {
        HeroError::validation(ValidationReason::InvalidQuizState {
            current_state: self.state.name().to_string(),
        })
    }

    /// Begins fetching a pool. A session in progress is abandoned; only a
    /// fetch already underway is refused.
    pub fn begin_loading(&mut self) -> HeroResult<()> {
        match &self.state {
            QuizState::NotStarted | QuizState::Completed(_) => {
                self.state = QuizState::Loading;
                Ok(())
            }
            QuizState::InProgress(round) => {
                tracing::debug!(answered = round.current, length = round.len(), "Abandoning quiz session");
                self.state = QuizState::Loading;
                Ok(())
            }
            _ => Err(self.invalid_state()),
        }
    }

    /// The pool fetch failed; return to `NotStarted`.
    pub fn abort_loading(&mut self) {
        if matches!(self.state, QuizState::Loading) {
            self.state = QuizState::NotStarted;
        }
    }

    /// Draws a session from the fetched pool. A pool shorter than the session
    /// length is used whole, shuffled.
    pub fn load<R: Rng + ?Sized>(&mut self, mut pool: Vec<QuizQuestion>, rng: &mut R) -> HeroResult<usize> {
        if !matches!(self.state, QuizState::Loading) {
            return Err(self.invalid_state());
        }
        pool.retain(|question| {
            let usable = question.options().len() >= 2
                && (question.correct_index as usize) < question.options().len();
            if !usable {
                tracing::warn!(question_id = %question.id, "Skipping malformed quiz question");
            }
            usable
        });
        if pool.is_empty() {
            self.state = QuizState::NotStarted;
            return Err(HeroError::EmptyPool);
        }

        pool.shuffle(rng);
        pool.truncate(self.quiz_length);
        let length = pool.len();
        tracing::debug!(length, "Quiz session drawn");
        self.state = QuizState::InProgress(QuizRound::new(pool));
        Ok(length)
    }

    /// Grades the current question. A second answer to the same question is
    /// ignored.
    pub fn answer(&mut self, selected: usize) -> HeroResult<AnswerOutcome> {
        let invalid = self.invalid_state();
        let QuizState::InProgress(round) = &mut self.state else {
            return Err(invalid);
        };
        if round.current_answer() != QuestionState::Unanswered {
            return Ok(AnswerOutcome::Ignored);
        }

        let question = round.current_question();
        let option_count = question.options().len();
        if selected >= option_count {
            return Err(HeroError::validation(ValidationReason::AnswerOutOfRange {
                selected: u32::try_from(selected).unwrap_or(u32::MAX),
                options: u32::try_from(option_count).unwrap_or(u32::MAX),
            }));
        }

        let correct = question.is_correct(selected);
        let correct_index = question.correct_index as usize;
        round.answers[round.current] = QuestionState::Answered { selected, correct };
        if correct {
            round.correct_count += 1;
        }
        Ok(AnswerOutcome::Recorded { correct, correct_index })
    }

    /// Moves past an answered question, completing the session after the last.
    pub fn advance(&mut self) -> HeroResult<Advance> {
        let invalid = self.invalid_state();
        let QuizState::InProgress(round) = &mut self.state else {
            return Err(invalid);
        };
        if round.current_answer() == QuestionState::Unanswered {
            return Err(invalid);
        }

        if !round.is_last() {
            round.current += 1;
            return Ok(Advance::NextQuestion(round.current));
        }

        let correct_count = round.correct_count;
        let result = QuizResult {
            correct_count,
            session_length: round.len(),
            experience: ProgressionModel::quiz_experience(correct_count, self.points_per_correct),
            coins: ProgressionModel::quiz_coin_bonus(correct_count),
            card: None,
        };
        self.state = QuizState::Completed(result.clone());
        Ok(Advance::Finished(result))
    }

    /// Stores the card awarded for a perfect session.
    pub fn attach_card(&mut self, card: Card) -> HeroResult<()> {
        let invalid = self.invalid_state();
        match &mut self.state {
            QuizState::Completed(result) if result.is_perfect() => {
                result.card = Some(card);
                Ok(())
            }
            _ => Err(invalid),
        }
    }
}

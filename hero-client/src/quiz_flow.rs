use hero_core::{
    AnswerOutcome, Advance, CardReveal, HeroError, HeroEvent, QuizResult, QuizState, is_duplicate_card,
};
use hero_types::{QuizQuestion, ValidationReason};
use rand::Rng;

use crate::home::StudentHome;
use crate::in_flight::MutationKind;

/// Rewards confirmed by the authority for a finished session.
#[derive(Debug, Clone)]
pub struct QuizCompletion {
    pub result: QuizResult,
    /// Present when a perfect session earned a card.
    pub reveal: Option<CardReveal>,
}

/// A finished session and how far its reward has been confirmed.
#[derive(Debug, Clone)]
pub(crate) struct PendingReward {
    pub(crate) result: QuizResult,
    pub(crate) stats_reported: bool,
}

#[derive(Debug, Clone)]
pub enum QuizTurn {
    /// The question was already answered.
    Ignored,
    NextQuestion {
        correct: bool,
        correct_index: usize,
        next_index: usize,
    },
    Finished {
        correct: bool,
        correct_index: usize,
        completion: QuizCompletion,
    },
}

impl StudentHome {
    /// Fetches the pool and draws a new session, abandoning one in progress.
    /// Returns its length.
    pub async fn start_quiz<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Result<usize, HeroError> {
        let result = self.try_start_quiz(rng).await;
        self.reported("start quiz", result).await
    }

    async fn try_start_quiz<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Result<usize, HeroError> {
        if self.pending_reward.lock().await.is_some() {
            return Err(HeroError::validation(ValidationReason::InvalidQuizState {
                current_state: "a reward is still owed".to_string(),
            }));
        }
        self.quiz.lock().await.begin_loading()?;

        let pool = match self.authority.get_quiz_pool().await {
            Ok(pool) => pool,
            Err(err) => {
                self.quiz.lock().await.abort_loading();
                return Err(err);
            }
        };

        let length = self.quiz.lock().await.load(pool, rng)?;
        tracing::info!(user_id = %self.account.id, length, "Quiz started");
        Ok(length)
    }

    pub async fn quiz_state(&self) -> QuizState {
        self.quiz.lock().await.state().clone()
    }

    pub async fn current_question(&self) -> Option<(usize, QuizQuestion)> {
        let quiz = self.quiz.lock().await;
        quiz.round()
            .map(|round| (round.current_index(), round.current_question().clone()))
    }

    /// Grades an answer, waits the display delay, then moves on. The last
    /// answer settles the session with the authority.
    pub async fn answer_question(&self, selected: usize) -> Result<QuizTurn, HeroError> {
        let result = self.try_answer_question(selected).await;
        self.reported("quiz answer", result).await
    }

    async fn try_answer_question(&self, selected: usize) -> Result<QuizTurn, HeroError> {
        let outcome = self.quiz.lock().await.answer(selected)?;
        let AnswerOutcome::Recorded { correct, correct_index } = outcome else {
            return Ok(QuizTurn::Ignored);
        };

        tokio::time::sleep(self.rules.answer_display_delay).await;

        let advance = self.quiz.lock().await.advance()?;
        match advance {
            Advance::NextQuestion(next_index) => Ok(QuizTurn::NextQuestion {
                correct,
                correct_index,
                next_index,
            }),
            Advance::Finished(result) => {
                let completion = self.finish_quiz(result).await?;
                Ok(QuizTurn::Finished {
                    correct,
                    correct_index,
                    completion,
                })
            }
        }
    }

    /// Holds the finished session until the authority has confirmed every
    /// part of its reward. A failed step is re-sent by `retry_quiz_reward`.
    async fn finish_quiz(&self, result: QuizResult) -> Result<QuizCompletion, HeroError> {
        *self.pending_reward.lock().await = Some(PendingReward {
            result,
            stats_reported: false,
        });
        self.settle_quiz_reward().await
    }

    /// The finished session whose reward the authority has not yet confirmed.
    pub async fn pending_quiz_reward(&self) -> Option<QuizResult> {
        self.pending_reward
            .lock()
            .await
            .as_ref()
            .map(|pending| pending.result.clone())
    }

    /// Re-sends whatever part of a finished session's reward is still owed.
    pub async fn retry_quiz_reward(&self) -> Result<QuizCompletion, HeroError> {
        let result = self.settle_quiz_reward().await;
        self.reported("quiz reward", result).await
    }

    /// Reports the experience gain, then claims a card for a perfect session.
    async fn settle_quiz_reward(&self) -> Result<QuizCompletion, HeroError> {
        let _guard = self.in_flight.begin(MutationKind::QuizReward)?;
        let Some(mut pending) = self.pending_reward.lock().await.clone() else {
            return Err(HeroError::validation(ValidationReason::InvalidQuizState {
                current_state: "no reward is owed".to_string(),
            }));
        };
        let user_id = self.account.id.as_str();

        if !pending.stats_reported {
            self.authority
                .update_avatar_stats(user_id, pending.result.experience)
                .await?;
            pending.stats_reported = true;
            *self.pending_reward.lock().await = Some(pending.clone());

            let result = &pending.result;
            tracing::info!(
                user_id,
                correct = result.correct_count,
                length = result.session_length,
                "Quiz completed"
            );
            self.publish(HeroEvent::QuizCompleted {
                user_id: user_id.to_string(),
                correct_count: result.correct_count,
                session_length: result.session_length,
                experience: result.experience,
                coins: result.coins,
            })
            .await;
        }

        let mut reveal = None;
        if pending.result.is_perfect() && pending.result.card.is_none() {
            let owned_before = self.snapshot.read().await.cards.clone();
            let card = match self.authority.award_random_card(user_id).await {
                Ok(card) => card,
                Err(err) => {
                    // Experience is recorded; only the card stays owed.
                    self.settle().await;
                    return Err(err);
                }
            };

            let is_duplicate = is_duplicate_card(&card, &owned_before);
            if let Err(err) = self.quiz.lock().await.attach_card(card.clone()) {
                tracing::debug!(user_id, "Session moved on before its card arrived: {}", err);
            }
            pending.result.card = Some(card.clone());
            self.publish(HeroEvent::CardAwarded {
                user_id: user_id.to_string(),
                card: card.clone(),
                is_duplicate,
            })
            .await;
            reveal = Some(CardReveal::new(card, is_duplicate, self.rules.reveal_duration));

            if let Ok(cards) = self.authority.get_user_cards(user_id).await {
                self.snapshot.write().await.cards = cards;
            }
        }

        *self.pending_reward.lock().await = None;
        self.settle().await;
        Ok(QuizCompletion {
            result: pending.result,
            reveal,
        })
    }
}

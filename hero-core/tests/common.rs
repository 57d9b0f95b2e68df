#![allow(dead_code)]

use hero_core::{HeroEvent, HeroEventHandler, QuizSession, RulesConfig};
use hero_types::{AvatarState, LeaderboardRow, QuizQuestion};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

/// Deterministic RNG so drawn sessions are reproducible
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

/// Creates a question whose correct option is `answer`
pub fn create_test_question(id: usize, answer: u32) -> QuizQuestion {
    QuizQuestion {
        id: format!("q{id}"),
        prompt: format!("Healthy habit question {id}"),
        option1: "Yes".to_string(),
        option2: "No".to_string(),
        option3: "Sometimes".to_string(),
        option4: "Never".to_string(),
        correct_index: answer,
        icon: "🥦".to_string(),
    }
}

pub fn create_test_pool(size: usize) -> Vec<QuizQuestion> {
    (0..size)
        .map(|i| create_test_question(i, (i % 4) as u32))
        .collect()
}

/// Starts a session over a pool of `size` questions
pub fn start_session(size: usize) -> QuizSession {
    let mut session = QuizSession::new(&RulesConfig::default());
    session.begin_loading().unwrap();
    session.load(create_test_pool(size), &mut seeded_rng()).unwrap();
    session
}

/// Answers every remaining question, getting the first `correct` right
pub fn play_through(session: &mut QuizSession, correct: usize) {
    let mut answered = 0;
    while let Some(round) = session.round() {
        let right = round.current_question().correct_index as usize;
        let pick = if answered < correct { right } else { (right + 1) % 4 };
        session.answer(pick).unwrap();
        session.advance().unwrap();
        answered += 1;
    }
}

pub fn create_test_avatar(level: u32, experience: u32, currency: u32) -> AvatarState {
    AvatarState {
        level,
        experience,
        currency,
        ..AvatarState::initial("student-1")
    }
}

pub fn create_leaderboard_row(user_id: &str, level: u32, experience: u32) -> LeaderboardRow {
    LeaderboardRow {
        user_id: user_id.to_string(),
        display_name: format!("Student {user_id}"),
        cohort: "P5/2".to_string(),
        level,
        experience,
        base_appearance: "🐼".to_string(),
    }
}

/// Event collector for testing event emissions
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<HeroEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<HeroEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl HeroEventHandler for EventCollector {
    fn handle_event(&mut self, event: &HeroEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

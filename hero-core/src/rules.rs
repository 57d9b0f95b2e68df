use std::time::Duration;

pub const DEFAULT_QUIZ_LENGTH: usize = 20;
pub const DEFAULT_POINTS_PER_CORRECT: u32 = 10;
pub const DEFAULT_MYSTERY_BOX_COST: u32 = 20;

/// Gameplay constants shared by the engine components.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesConfig {
    pub quiz_length: usize,
    pub points_per_correct: u32,
    pub mystery_box_cost: u32,
    /// How long a graded answer stays on screen before the next question.
    pub answer_display_delay: Duration,
    /// Length of the card "shaking" animation before the reveal.
    pub reveal_duration: Duration,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            quiz_length: DEFAULT_QUIZ_LENGTH,
            points_per_correct: DEFAULT_POINTS_PER_CORRECT,
            mystery_box_cost: DEFAULT_MYSTERY_BOX_COST,
            answer_display_delay: Duration::from_millis(1200),
            reveal_duration: Duration::from_millis(1500),
        }
    }
}

pub mod cosmetics;
pub mod daily_gate;
pub mod errors;
pub mod events;
pub mod health_log;
pub mod leaderboard;
pub mod progression;
pub mod quiz;
pub mod quiz_import;
pub mod rewards;
pub mod rules;

// Re-export main components
pub use cosmetics::*;
pub use daily_gate::*;
pub use errors::*;
pub use events::*;
pub use health_log::*;
pub use leaderboard::*;
pub use progression::*;
pub use quiz::*;
pub use quiz_import::*;
pub use rewards::*;
pub use rules::*;

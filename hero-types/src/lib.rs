pub mod account;
pub mod actions;
pub mod catalog;
pub mod errors;
pub mod health;
pub mod lenient;
pub mod social;

// Re-export all types
pub use account::*;
pub use actions::*;
pub use catalog::*;
pub use errors::*;
pub use health::*;
pub use social::*;

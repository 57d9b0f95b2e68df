use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// How a failure is presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FailureKind {
    /// Local precondition; informational, never alarming.
    Validation,
    /// The authority answered `success: false`.
    Remote,
    /// Network or transport problem.
    Transport,
    /// No answer within the deadline.
    Timeout,
}

/// Local precondition that stopped an action before any remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ValidationReason {
    InsufficientCurrency { have: u32, need: u32 },
    AlreadyLoggedToday,
    BoxAlreadyOpenedToday,
    OutOfStock { reward_id: String },
    MutationInFlight { flow: String },
    InvalidHealthLog { field: String, reason: String },
    ItemNotOwned { item_id: String },
    UnknownAppearance { value: String },
    InvalidQuizState { current_state: String },
    AnswerOutOfRange { selected: u32, options: u32 },
    InvalidReward { reason: String },
    InvalidBroadcast { reason: String },
    MissingCredentials,
    MissingField { field: String },
    AdminOnly,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::InsufficientCurrency { have, need } => {
                write!(f, "Not enough coins yet: you have {have}, this needs {need}")
            }
            ValidationReason::AlreadyLoggedToday => {
                write!(f, "Today's health log is already done. See you tomorrow!")
            }
            ValidationReason::BoxAlreadyOpenedToday => {
                write!(f, "The mystery box was already opened today. Come back tomorrow!")
            }
            ValidationReason::OutOfStock { reward_id } => {
                write!(f, "Reward {reward_id} is out of stock")
            }
            ValidationReason::MutationInFlight { flow } => {
                write!(f, "Still working on the previous {flow} request")
            }
            ValidationReason::InvalidHealthLog { field, reason } => {
                write!(f, "Health log field '{field}' {reason}")
            }
            ValidationReason::ItemNotOwned { item_id } => {
                write!(f, "Item {item_id} is not in your backpack")
            }
            ValidationReason::UnknownAppearance { value } => {
                write!(f, "'{value}' is not one of the available heroes")
            }
            ValidationReason::InvalidQuizState { current_state } => {
                write!(f, "The quiz cannot do that while {current_state}")
            }
            ValidationReason::AnswerOutOfRange { selected, options } => {
                write!(f, "Answer {selected} is not one of the {options} options")
            }
            ValidationReason::InvalidReward { reason } => write!(f, "Invalid reward: {reason}"),
            ValidationReason::InvalidBroadcast { reason } => {
                write!(f, "Invalid broadcast: {reason}")
            }
            ValidationReason::MissingCredentials => {
                write!(f, "Please enter both a username and a password")
            }
            ValidationReason::MissingField { field } => write!(f, "Please fill in {field}"),
            ValidationReason::AdminOnly => write!(f, "Only administrators can do that"),
        }
    }
}
